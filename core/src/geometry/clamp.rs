use crate::geometry::transform::{solve, Solution};
use crate::prelude::{CalcError, CalcResult, Calibration, ProbeAngles, ProbeInput};
use log::debug;

/// Mechanically reachable envelope for the target x axis, millimetres.
pub const X_ENVELOPE_MM: (f64, f64) = (50.0, 150.0);
/// Mechanically reachable envelope for the target y axis, millimetres.
pub const Y_ENVELOPE_MM: (f64, f64) = (70.0, 170.0);

/// Solution with the target snapped to the reachable envelope and the angle
/// that would have produced the boundary value back-solved per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedSolution {
    pub solution: Solution,
    pub arc_deg: f64,
    pub collar_deg: f64,
    pub x_clamped: bool,
    pub y_clamped: bool,
}

/// Like [`solve`], but bounds the target x/y to the probe's envelope.
///
/// When an axis is snapped to its boundary, the reported angle is the one
/// that reaches the boundary, read off via arccos, so the operator can apply
/// a corrected setting instead of an unreachable request. Unclamped axes
/// report the input angle unchanged; z is never clamped.
pub fn solve_clamped(
    input: &ProbeInput,
    angles: &ProbeAngles,
    calibration: &Calibration,
) -> CalcResult<ClampedSolution> {
    let mut solution = solve(input, angles, calibration)?;
    let delta_d = calibration.d0 - solution.d;

    let mut arc_deg = angles.arc_deg;
    let mut collar_deg = angles.collar_deg;

    let x_bounded = solution.x.clamp(X_ENVELOPE_MM.0, X_ENVELOPE_MM.1);
    let x_clamped = x_bounded != solution.x;
    if x_clamped {
        arc_deg = back_solve_deg((input.x - x_bounded) / nonzero(delta_d, "arc")?, "arc")?;
        debug!(
            "x {:.4} outside envelope, snapped to {:.1}, arc {:.2}° -> {:.2}°",
            solution.x, x_bounded, angles.arc_deg, arc_deg
        );
        solution.x = x_bounded;
    }

    let y_bounded = solution.y.clamp(Y_ENVELOPE_MM.0, Y_ENVELOPE_MM.1);
    let y_clamped = y_bounded != solution.y;
    if y_clamped {
        collar_deg = back_solve_deg((y_bounded - input.y) / nonzero(delta_d, "collar")?, "collar")?;
        debug!(
            "y {:.4} outside envelope, snapped to {:.1}, collar {:.2}° -> {:.2}°",
            solution.y, y_bounded, angles.collar_deg, collar_deg
        );
        solution.y = y_bounded;
    }

    Ok(ClampedSolution {
        solution,
        arc_deg,
        collar_deg,
        x_clamped,
        y_clamped,
    })
}

fn nonzero(delta_d: f64, axis: &str) -> CalcResult<f64> {
    if delta_d == 0.0 {
        return Err(CalcError::Domain(format!(
            "zero offset delta, cannot back-solve {} angle",
            axis
        )));
    }
    Ok(delta_d)
}

fn back_solve_deg(ratio: f64, axis: &str) -> CalcResult<f64> {
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(CalcError::Domain(format!(
            "{} ratio {:.4} outside [-1, 1], boundary unreachable",
            axis, ratio
        )));
    }
    Ok(ratio.acos().to_degrees())
}
