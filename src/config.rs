//! Run configuration and the optional TOML config file.
//!
//! A config file uses the same keys as the command line:
//!
//! ```toml
//! file = "grids/demo.txt"
//! steps = 200
//! time_ms = 50
//! start_x = 0
//! start_y = 0
//! regrowth_rate = 0.2
//! horizon = 2
//! allow_stay = false
//! second_step = "repeat_first"
//! starts = [[0, 0], [4, 4]]
//! ```
//!
//! Command-line values override file values.
//!
//! This is real TOML, not the older `key = value` line format: strings must be quoted and
//! booleans are `true`/`false`, so `file = grids/x.txt` or `allow_stay = yes` is rejected
//! with [`Error::ConfigFile`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::{Error, Result};
use super::pathfinding::SecondStep;
use super::vec2::Vec2;

/// Parameters of a single simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of time steps including the t=0 visit of the start cell.
    pub total_steps: u32,

    /// Wall-clock budget, checked once per time step.
    pub time_budget_ms: u64,

    /// Lookahead depth; the engine clamps it to 1 or 2.
    pub horizon: u8,

    pub allow_stay: bool,

    pub second_step: SecondStep,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_steps: 1,
            time_budget_ms: 1_000,
            horizon: 2,
            allow_stay: true,
            second_step: SecondStep::RepeatFirst,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.total_steps == 0 {
            return Err(Error::Configuration(
                "steps must be a positive integer".into(),
            ));
        }
        if self.time_budget_ms == 0 {
            return Err(Error::Configuration(
                "time_ms must be a positive integer (milliseconds)".into(),
            ));
        }
        if !(1..=2).contains(&self.horizon) {
            return Err(Error::Configuration("horizon must be 1 or 2".into()));
        }
        Ok(())
    }
}

/// Every option that can come from a config file or the command line, all optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PartialConfig {
    pub file: Option<PathBuf>,
    pub steps: Option<u32>,
    pub time_ms: Option<u64>,
    pub start_x: Option<i32>,
    pub start_y: Option<i32>,
    pub starts: Option<Vec<[i32; 2]>>,
    pub regrowth_rate: Option<f64>,
    pub horizon: Option<u8>,
    pub allow_stay: Option<bool>,
    pub second_step: Option<SecondStep>,
}

impl PartialConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Values set in `other` win over values set in `self`.
    pub fn overlay(self, other: PartialConfig) -> PartialConfig {
        PartialConfig {
            file: other.file.or(self.file),
            steps: other.steps.or(self.steps),
            time_ms: other.time_ms.or(self.time_ms),
            start_x: other.start_x.or(self.start_x),
            start_y: other.start_y.or(self.start_y),
            starts: other.starts.or(self.starts),
            regrowth_rate: other.regrowth_rate.or(self.regrowth_rate),
            horizon: other.horizon.or(self.horizon),
            allow_stay: other.allow_stay.or(self.allow_stay),
            second_step: other.second_step.or(self.second_step),
        }
    }

    pub fn resolve(self) -> Result<AppConfig> {
        let file = self
            .file
            .ok_or_else(|| Error::Configuration("missing required option: --file <path>".into()))?;

        let defaults = RunConfig::default();
        let run = RunConfig {
            total_steps: self.steps.unwrap_or(0),
            time_budget_ms: self.time_ms.unwrap_or(0),
            horizon: self.horizon.unwrap_or(defaults.horizon),
            allow_stay: self.allow_stay.unwrap_or(defaults.allow_stay),
            second_step: self.second_step.unwrap_or(defaults.second_step),
        };
        run.validate()?;

        let regrowth_rate = self.regrowth_rate.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&regrowth_rate) {
            return Err(Error::Configuration(
                "regrowth_rate must be in [0.0, 1.0]".into(),
            ));
        }

        let starts = match self.starts {
            Some(starts) if !starts.is_empty() => {
                starts.into_iter().map(|[x, y]| Vec2::new(x, y)).collect()
            }
            _ => vec![Vec2::new(
                self.start_x.unwrap_or(0),
                self.start_y.unwrap_or(0),
            )],
        };

        Ok(AppConfig {
            file,
            regrowth_rate,
            starts,
            run,
        })
    }
}

/// Fully validated settings for one process run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub file: PathBuf,
    pub regrowth_rate: f64,
    pub starts: Vec<Vec2>,
    pub run: RunConfig,
}
