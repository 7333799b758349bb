use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use util::languages::LanguageFamily;

use super::RuntimeStrategy;
use crate::classifier::{CompiledTable, INTERPRETED};
use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use crate::executor::{ExecutionResult, handle_process};

pub struct InterpretedStrategy;

/// Scripts are handed to the interpreter binary as its only argument.
#[async_trait]
impl RuntimeStrategy for InterpretedStrategy {
    fn family(&self) -> LanguageFamily {
        LanguageFamily::Interpreted
    }

    fn table(&self) -> &'static CompiledTable {
        &INTERPRETED
    }

    async fn execute(
        &self,
        source_path: &Path,
        stdin_text: Option<&str>,
        limit: Duration,
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, RunnerError> {
        let command = vec![
            config.python_interpreter.clone(),
            source_path.to_string_lossy().to_string(),
        ];
        handle_process(&command, stdin_text, limit).await
    }
}
