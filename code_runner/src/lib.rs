//! Re-execution of judged submissions and classification of their failures.
//!
//! Dispatch goes through [`strategy::strategy_for`], keyed by the submission's
//! [`Language`]: one [`strategy::RuntimeStrategy`] per language family.

use std::path::Path;
use std::time::Duration;
use util::languages::Language;

pub mod classifier;
pub mod error;
pub mod execution_config;
pub mod executor;
pub mod strategy;

use crate::classifier::ErrorClass;
use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use crate::executor::ExecutionResult;
use crate::strategy::strategy_for;

/// Runs one submission written in `language` (a CodeNet language name).
///
/// Crashes, non-zero exits and timeouts are returned as data. Only problems
/// with the run itself (unknown language, interpreter missing, I/O failure)
/// are errors.
pub async fn execute(
    language: &str,
    source_path: &Path,
    stdin_text: Option<&str>,
    limit: Duration,
    config: &ExecutionConfig,
) -> Result<ExecutionResult, RunnerError> {
    let lang = Language::from_codenet(language)
        .ok_or_else(|| RunnerError::UnsupportedLanguage(language.to_string()))?;
    strategy_for(lang)
        .execute(source_path, stdin_text, limit, config)
        .await
}

/// Maps captured stderr and exit status to `(error_class, error_class_extra)`.
///
/// Languages outside the known families yield two empty strings.
pub fn classify(language: &str, stderr: &str, exit_status: i32) -> ErrorClass {
    match Language::from_codenet(language) {
        Some(lang) => strategy_for(lang).classify(stderr, exit_status),
        None => ErrorClass::default(),
    }
}
