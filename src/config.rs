//! Run settings consumed by the front-ends that drive a machine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::types::TuringMachineError;

/// Default pause between automatic steps, in milliseconds.
pub const DEFAULT_STEP_DELAY_MS: u64 = 300;
/// Fastest allowed automatic stepping.
pub const MIN_STEP_DELAY_MS: u64 = 50;
/// Slowest allowed automatic stepping.
pub const MAX_STEP_DELAY_MS: u64 = 2000;
/// The maximum number of steps an automatic run executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Settings for automatic runs. The engine itself never sleeps; these values are advisory
/// and read by whatever loop calls `step()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Pause between automatic steps.
    pub step_delay_ms: u64,
    /// Step budget for a run to completion.
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            max_steps: MAX_EXECUTION_STEPS,
        }
    }
}

impl RunConfig {
    /// Parses settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, TuringMachineError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TuringMachineError::ParseError(e.to_string()))?;
        Ok(config.clamped())
    }

    /// Reads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Sets the step delay, clamped to the supported range.
    pub fn set_step_delay_ms(&mut self, delay_ms: u64) {
        self.step_delay_ms = delay_ms.clamp(MIN_STEP_DELAY_MS, MAX_STEP_DELAY_MS);
    }

    fn clamped(mut self) -> Self {
        self.set_step_delay_ms(self.step_delay_ms);
        self
    }
}
