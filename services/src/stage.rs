use code_manager::manager::manager::{collect_ok, TaskOutcome};
use futures::stream::BoxStream;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use tracing::info;

/// Counts reported by a stage that ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSummary {
    /// Work items that produced a result.
    pub processed: usize,
    /// Work items dropped because their worker failed.
    pub failed: usize,
    /// Records in the written artifact.
    pub written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The artifact already existed and recomputation was not forced.
    Skipped,
    Completed(StageSummary),
}

impl StageOutcome {
    pub fn summary(&self) -> Option<StageSummary> {
        match self {
            StageOutcome::Skipped => None,
            StageOutcome::Completed(summary) => Some(*summary),
        }
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Skipped => write!(f, "skipped"),
            StageOutcome::Completed(s) => write!(
                f,
                "{} processed, {} failed, {} records written",
                s.processed, s.failed, s.written
            ),
        }
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})") {
        pb.set_style(style);
    }
    pb
}

/// Drains a worker-pool stream behind a progress bar and returns the surviving results
/// together with the number of failed items.
pub async fn collect_with_progress<T>(
    stage: &'static str,
    total: usize,
    outcomes: BoxStream<'static, TaskOutcome<T>>,
) -> (Vec<T>, usize) {
    let pb = progress_bar(total);
    pb.set_message(format!("[{stage}]"));

    let (results, failed) = collect_ok(outcomes, |outcome| {
        pb.set_message(format!("[{stage}] Processing {}", outcome.key));
        pb.inc(1);
    })
    .await;

    pb.finish_and_clear();
    info!(stage, succeeded = results.len(), failed, "stage items finished");
    (results, failed)
}
