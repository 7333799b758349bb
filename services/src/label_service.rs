use code_manager::manager::manager::WorkerPool;
use std::fs;
use tracing::info;
use util::paths;

use crate::artifact::{self, read_csv, should_skip, write_json};
use crate::error::ServiceError;
use crate::error_record::ErrorRecord;
use crate::label_record::LabelRecord;
use crate::stage::{collect_with_progress, StageOutcome, StageSummary};

pub const STAGE: &str = "Generate Labels";

pub struct LabelService;

impl LabelService {
    /// Reads one submission's source with line endings normalised to `\n`.
    fn read_source(record: &ErrorRecord, submission_id: &str) -> Result<String, ServiceError> {
        let path = paths::submission_path(
            &record.problem_id,
            &record.language,
            submission_id,
            &record.filename_ext,
        );
        let text = fs::read_to_string(&path).map_err(|e| ServiceError::io(&path, e))?;
        Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
    }

    /// Tokenizes the original and changed sources of `record` and labels every token.
    pub fn label(record: ErrorRecord) -> Result<LabelRecord, ServiceError> {
        let original = Self::read_source(&record, &record.original_id)?;
        let changed = Self::read_source(&record, &record.changed_id)?;
        let labels = marker::diff_sources(&record.language, &original, &changed)?;
        Ok(LabelRecord {
            labels,
            error: record,
        })
    }

    /// Labels every error record and writes `generated_labels.json` as one JSON array, in
    /// completion order.
    pub async fn run(pool: &WorkerPool, force: bool) -> Result<StageOutcome, ServiceError> {
        let out = paths::generated_labels_path();
        if should_skip(&out, force) {
            info!("Labels already generated. skipping...");
            return Ok(StageOutcome::Skipped);
        }

        let errors_path = paths::error_pairs_path();
        artifact::require(STAGE, &errors_path)?;
        let records: Vec<ErrorRecord> = read_csv(&errors_path)?;
        let total = records.len();

        let outcomes = pool.run_blocking(records, Self::label);
        let (labels, failed) = collect_with_progress(STAGE, total, outcomes).await;

        write_json(&out, &labels)?;
        info!(records = labels.len(), "wrote {}", out.display());

        Ok(StageOutcome::Completed(StageSummary {
            processed: labels.len(),
            failed,
            written: labels.len(),
        }))
    }
}
