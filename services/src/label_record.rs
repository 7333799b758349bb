use marker::types::TokenLabels;
use serde::{Deserialize, Serialize};

use crate::error_record::ErrorRecord;

/// One entry of `generated_labels.json`: both token streams with labels, followed by every
/// field of the error record they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    #[serde(flatten)]
    pub labels: TokenLabels,
    #[serde(flatten)]
    pub error: ErrorRecord,
}
