use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use util::languages::LanguageFamily;

use super::RuntimeStrategy;
use crate::classifier::{CompiledTable, MANAGED};
use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use crate::executor::ExecutionResult;

pub struct ManagedStrategy;

/// JVM languages. Only classification is implemented.
#[async_trait]
impl RuntimeStrategy for ManagedStrategy {
    fn family(&self) -> LanguageFamily {
        LanguageFamily::Managed
    }

    fn table(&self) -> &'static CompiledTable {
        &MANAGED
    }

    async fn execute(
        &self,
        _source_path: &Path,
        _stdin_text: Option<&str>,
        _limit: Duration,
        _config: &ExecutionConfig,
    ) -> Result<ExecutionResult, RunnerError> {
        Err(RunnerError::UnsupportedFamily(self.family()))
    }
}
