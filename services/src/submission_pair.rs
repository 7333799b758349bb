use serde::{Deserialize, Serialize};

use crate::submission::SubmissionStatus;

/// A not-accepted submission followed directly by an accepted one, same user and problem.
///
/// Field order is the column order of `generated_pairs.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPair {
    pub original_id: String,
    pub changed_id: String,
    pub original_status: SubmissionStatus,
    pub problem_id: String,
    pub language: String,
    pub filename_ext: String,
}

impl SubmissionPair {
    /// Identifies the pair in logs and progress output.
    pub fn key(&self) -> String {
        format!(
            "{}/{}/({}|{}).{}",
            self.problem_id, self.language, self.original_id, self.changed_id, self.filename_ext
        )
    }
}

impl code_manager::manager::manager::WorkItem for SubmissionPair {
    fn key(&self) -> String {
        SubmissionPair::key(self)
    }
}
