use code_manager::manager::manager::WorkerPool;
use std::collections::{BTreeMap, HashMap};
use tracing::info;
use util::languages::{is_supported_language, is_supported_original_language};
use util::paths;

use crate::artifact::{self, should_skip, write_csv};
use crate::error::ServiceError;
use crate::problem::ProblemTable;
use crate::stage::{collect_with_progress, StageOutcome, StageSummary};
use crate::submission::{Submission, SubmissionStatus};
use crate::submission_pair::SubmissionPair;

pub const STAGE: &str = "Generate Pairs";

pub struct PairService;

impl PairService {
    /// Submissions that take part in pair discovery.
    fn qualifies(submission: &Submission) -> bool {
        !matches!(
            submission.status,
            SubmissionStatus::CompileError | SubmissionStatus::WrongAnswer
        ) && is_supported_language(&submission.language)
            && is_supported_original_language(&submission.original_language)
    }

    /// Pairs for one problem.
    ///
    /// Submissions are grouped by language, then by user. Each user's history is sorted by
    /// date (ties keep input order) and every adjacent not-accepted -> accepted step becomes a
    /// pair. All pairs of a language take `filename_ext` from that language's first
    /// qualifying submission.
    pub fn generate_pairs(problem_id: &str, submissions: Vec<Submission>) -> Vec<SubmissionPair> {
        let mut by_language: BTreeMap<String, Vec<Submission>> = BTreeMap::new();
        for submission in submissions.into_iter().filter(Self::qualifies) {
            by_language
                .entry(submission.language.clone())
                .or_default()
                .push(submission);
        }

        let mut pairs = Vec::new();
        for (language, group) in by_language {
            let Some(filename_ext) = group.first().map(|s| s.filename_ext.clone()) else {
                continue;
            };

            let mut user_order: Vec<String> = Vec::new();
            let mut by_user: HashMap<String, Vec<Submission>> = HashMap::new();
            for submission in group {
                if !by_user.contains_key(&submission.user_id) {
                    user_order.push(submission.user_id.clone());
                }
                by_user
                    .entry(submission.user_id.clone())
                    .or_default()
                    .push(submission);
            }

            for user_id in user_order {
                let Some(mut history) = by_user.remove(&user_id) else {
                    continue;
                };
                if history.len() < 2 {
                    continue;
                }
                history.sort_by_key(|s| s.date);

                for window in history.windows(2) {
                    let (original, changed) = (&window[0], &window[1]);
                    if original.status.is_accepted() || !changed.status.is_accepted() {
                        continue;
                    }
                    pairs.push(SubmissionPair {
                        original_id: original.submission_id.clone(),
                        changed_id: changed.submission_id.clone(),
                        original_status: original.status.clone(),
                        problem_id: problem_id.to_string(),
                        language: language.clone(),
                        filename_ext: filename_ext.clone(),
                    });
                }
            }
        }

        pairs
    }

    /// Loads the metadata of `problem_id` and generates its pairs.
    pub fn pairs_for_problem(problem_id: &str) -> Result<Vec<SubmissionPair>, ServiceError> {
        let submissions = Submission::load_all(&paths::problem_metadata_path(problem_id))?;
        Ok(Self::generate_pairs(problem_id, submissions))
    }

    /// Runs pair discovery over every problem of the cleaned list and writes
    /// `generated_pairs.csv`, sorted by `original_id`.
    pub async fn run(pool: &WorkerPool, force: bool) -> Result<StageOutcome, ServiceError> {
        let out = paths::generated_pairs_path();
        if should_skip(&out, force) {
            info!("Pairs already generated. skipping...");
            return Ok(StageOutcome::Skipped);
        }

        let problems_path = paths::problem_list_clean_path();
        artifact::require(STAGE, &problems_path)?;
        let problem_ids = ProblemTable::load(&problems_path)?.ids();
        let total = problem_ids.len();

        let outcomes = pool.run_blocking(problem_ids, |problem_id: String| Self::pairs_for_problem(&problem_id));
        let (batches, failed) = collect_with_progress(STAGE, total, outcomes).await;
        let processed = batches.len();

        let mut pairs: Vec<SubmissionPair> = batches.into_iter().flatten().collect();
        pairs.sort_by(|a, b| a.original_id.cmp(&b.original_id));
        write_csv(&out, &pairs)?;
        info!(pairs = pairs.len(), "wrote {}", out.display());

        Ok(StageOutcome::Completed(StageSummary {
            processed,
            failed,
            written: pairs.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: &str, user: &str, date: i64, status: &str) -> Submission {
        Submission {
            submission_id: id.into(),
            user_id: user.into(),
            date,
            status: status.into(),
            language: "Python".into(),
            original_language: "Python (3.8.2)".into(),
            filename_ext: "py".into(),
        }
    }

    fn ids(pairs: &[SubmissionPair]) -> Vec<(&str, &str)> {
        pairs
            .iter()
            .map(|p| (p.original_id.as_str(), p.changed_id.as_str()))
            .collect()
    }

    #[test]
    fn only_adjacent_transitions_are_paired() {
        let subs = vec![
            sub("s1", "u1", 1, "Runtime Error"),
            sub("s2", "u1", 2, "Time Limit Exceeded"),
            sub("s3", "u1", 3, "Runtime Error"),
            sub("s4", "u1", 4, "Accepted"),
        ];
        let pairs = PairService::generate_pairs("p00001", subs);
        assert_eq!(ids(&pairs), vec![("s3", "s4")]);
        assert_eq!(pairs[0].original_status, SubmissionStatus::RuntimeError);
        assert_eq!(pairs[0].problem_id, "p00001");
    }

    #[test]
    fn histories_are_sorted_by_date() {
        let subs = vec![
            sub("s9", "u1", 30, "Accepted"),
            sub("s8", "u1", 10, "Runtime Error"),
            sub("s7", "u1", 20, "Accepted"),
        ];
        let pairs = PairService::generate_pairs("p1", subs);
        assert_eq!(ids(&pairs), vec![("s8", "s7")]);
    }

    #[test]
    fn pair_count_matches_transition_count() {
        let statuses = [
            "Runtime Error",
            "Accepted",
            "Runtime Error",
            "Accepted",
            "Accepted",
            "Memory Limit Exceeded",
            "Accepted",
        ];
        let subs: Vec<Submission> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| sub(&format!("s{i}"), "u1", i as i64, s))
            .collect();
        assert_eq!(PairService::generate_pairs("p1", subs).len(), 3);
    }

    #[test]
    fn users_are_never_mixed() {
        let subs = vec![
            sub("s1", "u1", 1, "Runtime Error"),
            sub("s2", "u2", 2, "Accepted"),
            sub("s3", "u2", 3, "Runtime Error"),
            sub("s4", "u1", 4, "Accepted"),
        ];
        let pairs = PairService::generate_pairs("p1", subs);
        assert_eq!(ids(&pairs), vec![("s1", "s4")]);
    }

    #[test]
    fn single_submission_yields_nothing() {
        let pairs = PairService::generate_pairs("p1", vec![sub("s1", "u1", 1, "Runtime Error")]);
        assert!(pairs.is_empty());
        assert!(PairService::generate_pairs("p1", Vec::new()).is_empty());
    }

    #[test]
    fn filtered_statuses_and_languages_are_dropped() {
        let mut java = sub("s3", "u1", 3, "Accepted");
        java.language = "Java".into();
        let mut pypy = sub("s4", "u1", 4, "Accepted");
        pypy.original_language = "PyPy3 (7.3.0)".into();
        let subs = vec![
            sub("s1", "u1", 1, "Runtime Error"),
            // Wrong answers are removed before pairing, so s1 and s5 become adjacent.
            sub("s2", "u1", 2, "Wrong Answer"),
            java,
            pypy,
            sub("s5", "u1", 5, "Accepted"),
            sub("s6", "u1", 6, "Compile Error"),
        ];
        let pairs = PairService::generate_pairs("p1", subs);
        assert_eq!(ids(&pairs), vec![("s1", "s5")]);
    }

    #[test]
    fn extension_comes_from_first_submission_of_language() {
        let mut first = sub("s1", "u2", 1, "Accepted");
        first.filename_ext = "py3".into();
        let subs = vec![
            first,
            sub("s2", "u1", 2, "Runtime Error"),
            sub("s3", "u1", 3, "Accepted"),
        ];
        let pairs = PairService::generate_pairs("p1", subs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].filename_ext, "py3");
    }
}
