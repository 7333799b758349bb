//! Global pipeline configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete pipeline configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// Directory holding `Project_CodeNet/` and `generated/`.
    pub input_root: String,
    /// Size of the worker pool used by every stage.
    pub workers: usize,
    pub force_clean: bool,
    pub force_pairs: bool,
    pub force_errors: bool,
    pub force_labels: bool,
    /// Interpreter binary used to run scripted submissions.
    pub python_interpreter: String,
    /// Execution timeout as a multiple of the judged time limit.
    pub timeout_multiplier: f64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_var(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing or malformed values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "codenet-pipeline".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "pipeline.log".into()),
            log_to_stdout: flag_var("LOG_TO_STDOUT", true),
            input_root: env::var("INPUT_ROOT").unwrap_or_else(|_| "../input".into()),
            workers: parse_var("WORKERS", 8usize).max(1),
            force_clean: flag_var("FORCE_CLEAN", false),
            force_pairs: flag_var("FORCE_PAIRS", false),
            force_errors: flag_var("FORCE_ERRORS", false),
            force_labels: flag_var("FORCE_LABELS", false),
            python_interpreter: env::var("PYTHON_INTERPRETER")
                .unwrap_or_else(|_| "python3".into()),
            timeout_multiplier: parse_var("TIMEOUT_MULTIPLIER", 1.5f64),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_input_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.input_root = value.into());
    }
}
