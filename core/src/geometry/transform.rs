use crate::prelude::{CalcError, CalcResult, Calibration, ProbeAngles, ProbeInput};

/// Fixed probe reference length in millimetres; `L = 205 - D`.
pub const REFERENCE_LENGTH_MM: f64 = 205.0;

/// A collar whose sine falls below this has no usable radial component.
const SIN_COLLAR_FLOOR: f64 = 1e-12;

/// Target coordinate and distance pair produced by one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Radial offset distance derived from the height difference and collar.
    pub d: f64,
    /// Remaining distance to the reference length.
    pub l: f64,
}

/// Reduces a measured GTF coordinate and angle pair to the M1-frame target.
///
/// Pure and deterministic; identical inputs yield bit-identical output. The
/// only failure is a collar at a multiple of 180°, where the radial offset
/// is undefined.
pub fn solve(
    input: &ProbeInput,
    angles: &ProbeAngles,
    calibration: &Calibration,
) -> CalcResult<Solution> {
    let arc_rad = angles.arc_deg.to_radians();
    let collar_rad = angles.collar_deg.to_radians();

    let sin_collar = collar_rad.sin();
    if sin_collar.abs() < SIN_COLLAR_FLOOR {
        return Err(CalcError::Domain(format!(
            "collar {}° has no radial component",
            angles.collar_deg
        )));
    }

    let d = calibration.d0 - (input.z - calibration.z_ref) / sin_collar;
    let delta_d = calibration.d0 - d;

    Ok(Solution {
        x: input.x - delta_d * arc_rad.cos(),
        y: input.y + delta_d * collar_rad.cos(),
        z: input.z - delta_d * sin_collar,
        d,
        l: REFERENCE_LENGTH_MM - d,
    })
}
