use serde::{Deserialize, Serialize};

use code_manager::manager::manager::WorkItem;

use crate::submission::SubmissionStatus;
use crate::submission_pair::SubmissionPair;

/// A pair together with the failure signature of its original submission.
///
/// Field order is the column order of `error_pairs.csv`. `error` holds the captured stderr
/// and `output` the captured stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub problem_id: String,
    pub original_id: String,
    pub changed_id: String,
    pub language: String,
    pub filename_ext: String,
    pub original_status: SubmissionStatus,
    pub returncode: i32,
    pub error_class: String,
    pub error_class_extra: String,
    pub error: String,
    pub output: String,
}

impl ErrorRecord {
    pub fn pair(&self) -> SubmissionPair {
        SubmissionPair {
            original_id: self.original_id.clone(),
            changed_id: self.changed_id.clone(),
            original_status: self.original_status.clone(),
            problem_id: self.problem_id.clone(),
            language: self.language.clone(),
            filename_ext: self.filename_ext.clone(),
        }
    }
}

impl WorkItem for ErrorRecord {
    fn key(&self) -> String {
        self.pair().key()
    }
}
