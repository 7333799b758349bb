use code_manager::manager::manager::WorkerPool;
use code_runner::execution_config::ExecutionConfig;
use std::sync::Arc;
use tracing::{debug, info};
use util::paths;

use crate::artifact::{self, read_csv, should_skip, write_csv};
use crate::error::ServiceError;
use crate::error_record::ErrorRecord;
use crate::problem::ProblemTable;
use crate::stage::{collect_with_progress, StageOutcome, StageSummary};
use crate::submission_pair::SubmissionPair;

pub const STAGE: &str = "Generate Error";

pub struct ErrorDescriptionService;

impl ErrorDescriptionService {
    /// Re-runs the original submission of `pair` against the problem's input fixture and
    /// classifies what it printed.
    ///
    /// A crash, non-zero exit or timeout still yields a record. Missing files, an unsupported
    /// language or an interpreter that cannot be started are errors.
    pub async fn describe(
        pair: SubmissionPair,
        time_limit_ms: f64,
        config: &ExecutionConfig,
    ) -> Result<ErrorRecord, ServiceError> {
        let source = paths::submission_path(
            &pair.problem_id,
            &pair.language,
            &pair.original_id,
            &pair.filename_ext,
        );
        tokio::fs::metadata(&source)
            .await
            .map_err(|e| ServiceError::io(&source, e))?;

        let input_path = paths::input_fixture_path(&pair.problem_id);
        let input = tokio::fs::read_to_string(&input_path)
            .await
            .map_err(|e| ServiceError::io(&input_path, e))?;

        let limit = config.timeout_for(time_limit_ms)?;
        let result = code_runner::execute(&pair.language, &source, Some(&input), limit, config).await?;
        let class = code_runner::classify(&pair.language, &result.stderr, result.exit_status);
        debug!(
            pair = %pair.key(),
            returncode = result.exit_status,
            timed_out = result.timed_out(),
            "executed original submission"
        );

        Ok(ErrorRecord {
            problem_id: pair.problem_id,
            original_id: pair.original_id,
            changed_id: pair.changed_id,
            language: pair.language,
            filename_ext: pair.filename_ext,
            original_status: pair.original_status,
            returncode: result.exit_status,
            error_class: class.error_class,
            error_class_extra: class.error_class_extra,
            error: result.stderr,
            output: result.stdout,
        })
    }

    /// Executes every pair's original submission and writes `error_pairs.csv` in completion
    /// order.
    pub async fn run(pool: &WorkerPool, force: bool) -> Result<StageOutcome, ServiceError> {
        let out = paths::error_pairs_path();
        if should_skip(&out, force) {
            info!("Error Descriptions already generated. skipping...");
            return Ok(StageOutcome::Skipped);
        }

        let pairs_path = paths::generated_pairs_path();
        let problems_path = paths::problem_list_clean_path();
        artifact::require(STAGE, &pairs_path)?;
        artifact::require(STAGE, &problems_path)?;

        let pairs: Vec<SubmissionPair> = read_csv(&pairs_path)?;
        let problems = Arc::new(ProblemTable::load(&problems_path)?);
        let config = Arc::new(ExecutionConfig::from_app_config());
        let total = pairs.len();

        let outcomes = pool.run_async(pairs, move |pair: SubmissionPair| {
            let problems = Arc::clone(&problems);
            let config = Arc::clone(&config);
            async move {
                let time_limit = problems.time_limit(&pair.problem_id)?;
                Self::describe(pair, time_limit, &config).await
            }
        });
        let (records, failed) = collect_with_progress(STAGE, total, outcomes).await;

        write_csv(&out, &records)?;
        info!(records = records.len(), "wrote {}", out.display());

        Ok(StageOutcome::Completed(StageSummary {
            processed: records.len(),
            failed,
            written: records.len(),
        }))
    }
}
