//! Runtime settings read from the environment: bind address, data directory and simulation
//! threads. Log filtering is handled separately by `RUST_LOG` in the binary.

use std::env;
use std::path::PathBuf;

use crate::data::DEFAULT_DATA_DIR;

pub const BIND_ENV: &str = "QUINTAL_BIND";
pub const DATA_DIR_ENV: &str = "QUINTAL_DATA_DIR";
pub const WORKERS_ENV: &str = "QUINTAL_WORKERS";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    /// Simulation threads; 0 uses every core.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            workers: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            bind_addr: read(BIND_ENV).unwrap_or(defaults.bind_addr),
            data_dir: read(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            workers: read(WORKERS_ENV)
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(defaults.workers),
        }
    }
}
