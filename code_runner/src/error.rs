use util::languages::LanguageFamily;

/// Errors raised while preparing or running a submission.
///
/// A program that crashes, exits non-zero or runs out of time is *not* an
/// error: those outcomes come back as an [`crate::executor::ExecutionResult`].
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("no runtime registered for language '{0}'")]
    UnsupportedLanguage(String),

    #[error("execution of {0} submissions is not supported yet")]
    UnsupportedFamily(LanguageFamily),

    #[error("empty command line")]
    EmptyCommand,

    #[error("failed to spawn '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid time limit: {0}")]
    InvalidTimeLimit(f64),

    #[error("I/O error while running submission")]
    Io(#[from] std::io::Error),
}
