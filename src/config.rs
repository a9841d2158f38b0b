//! Settings for the message passer, loadable from a JSON file.
//!
//! ```json
//! { "noise": 0.05, "seed": 1234 }
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transmission::check_error_rate;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Probability of dropping a byte, and separately of doubling it
    pub noise: f64,

    /// Fixed RNG seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,

    /// Message file to transmit
    pub filename: Option<PathBuf>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !check_error_rate(self.noise) {
            return Err(ConfigError::InvalidNoise(self.noise));
        }
        Ok(())
    }
}
