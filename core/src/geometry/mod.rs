pub mod clamp;
pub mod transform;

pub use clamp::{solve_clamped, ClampedSolution, X_ENVELOPE_MM, Y_ENVELOPE_MM};
pub use transform::{solve, Solution, REFERENCE_LENGTH_MM};
