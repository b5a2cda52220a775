//! Core geometry and experiment-log storage for the GTF probe coordinate
//! calculator.
//!
//! The modules mirror the bench-side workflow: a measured GTF coordinate and
//! two probe angles are reduced to an M1-frame target coordinate and distance
//! pair, and accepted results are appended to a durable experiment log.

pub mod geometry;
pub mod logbook;
pub mod prelude;

pub use prelude::{CalcError, CalcResult, Calibration, ProbeAngles, ProbeInput};
