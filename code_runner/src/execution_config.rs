use serde::{Deserialize, Serialize};
use std::time::Duration;
use util::config::AppConfig;

use crate::error::RunnerError;

/// Runtime settings for re-executing submissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_python_interpreter")]
    pub python_interpreter: String,

    /// Slack applied on top of the judged time limit.
    #[serde(default = "default_timeout_multiplier")]
    pub timeout_multiplier: f64,
}

fn default_python_interpreter() -> String {
    "python3".to_string()
}

fn default_timeout_multiplier() -> f64 {
    1.5
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            python_interpreter: default_python_interpreter(),
            timeout_multiplier: default_timeout_multiplier(),
        }
    }
}

impl ExecutionConfig {
    /// Builds the execution settings from the global [`AppConfig`].
    pub fn from_app_config() -> Self {
        let cfg = AppConfig::global();
        Self {
            python_interpreter: cfg.python_interpreter.clone(),
            timeout_multiplier: cfg.timeout_multiplier,
        }
    }

    /// Wall-clock budget for a problem whose judged limit is `time_limit_ms`.
    ///
    /// `time_limit_ms / 1000 * timeout_multiplier` seconds.
    pub fn timeout_for(&self, time_limit_ms: f64) -> Result<Duration, RunnerError> {
        let secs = time_limit_ms / 1000.0 * self.timeout_multiplier;
        Duration::try_from_secs_f64(secs).map_err(|_| RunnerError::InvalidTimeLimit(time_limit_ms))
    }
}
