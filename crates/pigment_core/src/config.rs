//! Simulation configuration.
//!
//! A [`SimulationConfig`] is built once at setup, validated, and then only
//! read. It can be stored as pretty-printed JSON.
//!
//! # Example
//!
//! ```ignore
//! use pigment_core::config::{load_config, SimulationConfig};
//!
//! let config = load_config("configs/stripes.json")?;
//! config.validate()?;
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::initial::InitialCondition;
use crate::neighbor::Connectivity;
use crate::rates::{RateConstants, RateModel};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Every parameter of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    pub rates: RateConstants,
    /// Characteristic distance of long-range activation; about half the
    /// pattern wavelength.
    pub h: f64,
    /// Short-range neighborhood; serialized as the neighbor count (4 or 8).
    pub connectivity: Connectivity,
    /// Number of batches to process.
    pub iterations: usize,
    /// Events per batch. `None` means one sweep (`rows * cols`).
    pub batch_size: Option<usize>,
    pub seed: u64,
    pub initial: InitialCondition,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            rates: RateConstants::default(),
            h: 15.0,
            connectivity: Connectivity::VonNeumann,
            iterations: 100,
            batch_size: None,
            seed: 42,
            initial: InitialCondition::Blank,
        }
    }
}

impl SimulationConfig {
    /// Events processed per iteration.
    pub fn events_per_batch(&self) -> usize {
        self.batch_size.unwrap_or(self.rows * self.cols)
    }

    /// Check every parameter and build the rate model.
    pub fn validate(&self) -> ConfigResult<RateModel> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyLattice {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.h.is_finite() && self.h > 0.0) {
            return Err(ConfigError::InvalidDistance(self.h));
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.batch_size == Some(0) {
            return Err(ConfigError::ZeroBatchSize);
        }
        if let InitialCondition::Random { iridophore_ratio } = self.initial {
            if !(0.0..=1.0).contains(&iridophore_ratio) {
                return Err(ConfigError::InvalidIridophoreRatio(iridophore_ratio));
            }
        }
        Ok(RateModel::new(self.rates)?)
    }
}

/// Load a config from a JSON file. Missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<SimulationConfig> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Save a config as pretty-printed JSON, creating parent directories.
pub fn save_config<P: AsRef<Path>>(config: &SimulationConfig, path: P) -> ConfigResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, config)?;
    Ok(())
}
