use anyhow::Context;
use gtfcore::Calibration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Site-calibration override file. Fields left out of the YAML keep the
/// shipped defaults, so a site can pin just `z_ref`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationFile {
    pub z_ref: f64,
    pub d0: f64,
    pub l0: f64,
}

impl Default for CalibrationFile {
    fn default() -> Self {
        let defaults = Calibration::default();
        Self {
            z_ref: defaults.z_ref,
            d0: defaults.d0,
            l0: defaults.l0,
        }
    }
}

impl CalibrationFile {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading calibration file {}", path_ref.display()))?;
        let file: CalibrationFile = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing calibration file {}", path_ref.display()))?;
        Ok(file)
    }

    pub fn to_calibration(&self) -> Calibration {
        Calibration {
            z_ref: self.z_ref,
            d0: self.d0,
            l0: self.l0,
        }
    }
}
