use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use util::languages::LanguageFamily;

use super::RuntimeStrategy;
use crate::classifier::{CompiledTable, NATIVE};
use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use crate::executor::ExecutionResult;

pub struct NativeStrategy;

/// C and C++. Classification is available; running needs a compile step that
/// is not wired up.
#[async_trait]
impl RuntimeStrategy for NativeStrategy {
    fn family(&self) -> LanguageFamily {
        LanguageFamily::Native
    }

    fn table(&self) -> &'static CompiledTable {
        &NATIVE
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
