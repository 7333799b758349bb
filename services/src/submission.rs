use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::artifact;
use crate::error::ServiceError;

/// Judge verdict of a submission, spelled exactly as in the metadata files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    Accepted,
    WrongAnswer,
    CompileError,
    RuntimeError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    OutputLimitExceeded,
    PresentationError,
    JudgeNotAvailable,
    /// Any verdict not listed above, kept verbatim.
    Other(String),
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubmissionStatus::Accepted => "Accepted",
            SubmissionStatus::WrongAnswer => "Wrong Answer",
            SubmissionStatus::CompileError => "Compile Error",
            SubmissionStatus::RuntimeError => "Runtime Error",
            SubmissionStatus::TimeLimitExceeded => "Time Limit Exceeded",
            SubmissionStatus::MemoryLimitExceeded => "Memory Limit Exceeded",
            SubmissionStatus::OutputLimitExceeded => "Output Limit Exceeded",
            SubmissionStatus::PresentationError => "WA: Presentation Error",
            SubmissionStatus::JudgeNotAvailable => "Judge Not Available",
            SubmissionStatus::Other(s) => s,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionStatus::Accepted)
    }
}

impl From<String> for SubmissionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Accepted" => SubmissionStatus::Accepted,
            "Wrong Answer" => SubmissionStatus::WrongAnswer,
            "Compile Error" => SubmissionStatus::CompileError,
            "Runtime Error" => SubmissionStatus::RuntimeError,
            "Time Limit Exceeded" => SubmissionStatus::TimeLimitExceeded,
            "Memory Limit Exceeded" => SubmissionStatus::MemoryLimitExceeded,
            "Output Limit Exceeded" => SubmissionStatus::OutputLimitExceeded,
            "WA: Presentation Error" => SubmissionStatus::PresentationError,
            "Judge Not Available" => SubmissionStatus::JudgeNotAvailable,
            _ => SubmissionStatus::Other(s),
        }
    }
}

impl From<&str> for SubmissionStatus {
    fn from(s: &str) -> Self {
        SubmissionStatus::from(s.to_string())
    }
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a per-problem metadata file. Columns not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub submission_id: String,
    pub user_id: String,
    /// Unix timestamp.
    pub date: i64,
    pub status: SubmissionStatus,
    pub language: String,
    pub original_language: String,
    pub filename_ext: String,
}

impl Submission {
    /// Reads every submission of one problem from its metadata CSV.
    pub fn load_all(path: &Path) -> Result<Vec<Submission>, ServiceError> {
        artifact::read_csv(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_codenet_strings() {
        for s in ["Accepted", "Wrong Answer", "WA: Presentation Error", "Runtime Error"] {
            let status = SubmissionStatus::from(s);
            assert!(!matches!(status, SubmissionStatus::Other(_)));
            assert_eq!(status.to_string(), s);
        }
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status = SubmissionStatus::from("Query Limit Exceeded");
        assert_eq!(status, SubmissionStatus::Other("Query Limit Exceeded".into()));
        assert_eq!(String::from(status), "Query Limit Exceeded");
    }
}
