//! Goal configuration loading from config.toml
//!
//! Goals listed in the configuration file are created on start-up when no goal
//! with the same name exists yet. Dates are written as strings and accept the
//! same formats as [`crate::core::time::parse_instant`].

use crate::{
    core::time,
    errors::{Error, Result},
    models::NewGoal,
};
use chrono::TimeDelta;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Goals to seed
    #[serde(default)]
    pub goals: Vec<GoalConfig>,
}

/// Configuration for a single goal
#[derive(Debug, Deserialize, Clone)]
pub struct GoalConfig {
    /// Name of the goal
    pub name: String,
    /// Unit label (e.g., "kcal")
    pub unit: String,
    /// Beginning of the first interval
    pub interval_start_date: String,
    /// Amount expected at the start of each interval
    #[serde(default)]
    pub interval_start_amount: f64,
    /// Amount expected at the end of each interval
    pub interval_target_amount: f64,
    /// Interval length in seconds
    pub interval_length_secs: i64,
    /// Display bucket size in seconds; defaults to the interval length
    #[serde(default)]
    pub bucket_size_secs: Option<i64>,
    /// Whether progress resets every interval
    #[serde(default)]
    pub reset: bool,
}

impl GoalConfig {
    /// Converts the configuration entry into goal-creation input.
    ///
    /// Fails if the start date cannot be parsed or a duration is out of range.
    /// Positivity of the durations is checked when the goal is created.
    pub fn to_new_goal(&self) -> Result<NewGoal> {
        let interval_start_date = time::parse_instant(&self.interval_start_date)?;
        let interval_length = seconds(self.interval_length_secs)?;
        let bucket_size = seconds(self.bucket_size_secs.unwrap_or(self.interval_length_secs))?;

        Ok(NewGoal {
            name: self.name.clone(),
            interval_start_date,
            interval_start_amount: self.interval_start_amount,
            interval_target_amount: self.interval_target_amount,
            interval_length,
            bucket_size,
            unit: self.unit.clone(),
            reset: self.reset,
        })
    }
}

fn seconds(value: i64) -> Result<TimeDelta> {
    TimeDelta::try_seconds(value).ok_or(Error::InvalidInterval { seconds: value })
}

/// Loads goal configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Path of the goal configuration: `GOALS_CONFIG` if set, else `./config.toml`.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var("GOALS_CONFIG").map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Loads goal configuration from [`config_path`], or `None` if no file exists there.
pub fn load_default_config() -> Result<Option<Config>> {
    let path = config_path();
    if !path.exists() {
        tracing::info!("No goal configuration at {}, skipping seed", path.display());
        return Ok(None);
    }
    load_config(&path).map(Some)
}
