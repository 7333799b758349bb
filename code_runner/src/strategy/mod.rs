use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use util::languages::{Language, LanguageFamily};

use crate::classifier::{CompiledTable, ErrorClass};
use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use crate::executor::ExecutionResult;

/// How one language family is run and how its failures are read.
#[async_trait]
pub trait RuntimeStrategy: Send + Sync {
    fn family(&self) -> LanguageFamily;

    /// Pattern table used by [`RuntimeStrategy::classify`].
    fn table(&self) -> &'static CompiledTable;

    /// Runs the submission at `source_path` with `stdin_text` on stdin.
    async fn execute(
        &self,
        source_path: &Path,
        stdin_text: Option<&str>,
        limit: Duration,
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, RunnerError>;

    fn classify(&self, stderr: &str, exit_status: i32) -> ErrorClass {
        self.table().classify(stderr, exit_status)
    }
}

pub use interpreted::InterpretedStrategy;
pub use managed::ManagedStrategy;
pub use native::NativeStrategy;

static INTERPRETED: InterpretedStrategy = InterpretedStrategy;
static NATIVE: NativeStrategy = NativeStrategy;
static MANAGED: ManagedStrategy = ManagedStrategy;

pub fn strategy_for(lang: Language) -> &'static dyn RuntimeStrategy {
    match lang.family() {
        LanguageFamily::Interpreted => &INTERPRETED,
        LanguageFamily::Native => &NATIVE,
        LanguageFamily::Managed => &MANAGED,
    }
}

mod interpreted;
mod managed;
mod native;
