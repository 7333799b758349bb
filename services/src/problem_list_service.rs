use csv::StringRecord;
use tracing::info;
use util::paths;

use crate::artifact::{self, read_records, should_skip, write_records};
use crate::error::ServiceError;
use crate::stage::{StageOutcome, StageSummary};

pub const STAGE: &str = "Clean";

/// Columns whose missing values are filled with the column median.
const MEDIAN_FILLED: &[&str] = &["time_limit", "memory_limit"];

pub struct ProblemListService;

impl ProblemListService {
    /// Writes `problem_list_clean.csv`: missing limits filled with the column median, problems
    /// without an input fixture dropped, every other column passed through unchanged.
    pub fn clean(force: bool) -> Result<StageOutcome, ServiceError> {
        let out = paths::problem_list_clean_path();
        if should_skip(&out, force) {
            info!("Dataset was already cleaned. skipping...");
            return Ok(StageOutcome::Skipped);
        }

        let src = paths::problem_list_path();
        artifact::require(STAGE, &src)?;
        info!("Cleaning {}", src.display());

        let (headers, mut records) = read_records(&src)?;
        let id_col = headers
            .iter()
            .position(|h| h == "id")
            .ok_or_else(|| ServiceError::InvalidRecord(format!("{} has no 'id' column", src.display())))?;

        for name in MEDIAN_FILLED {
            if let Some(col) = headers.iter().position(|h| h == *name) {
                fill_with_median(&mut records, col);
            }
        }

        let total = records.len();
        let kept: Vec<StringRecord> = records
            .into_iter()
            .filter(|r| r.get(id_col).is_some_and(|id| paths::input_fixture_path(id).exists()))
            .collect();

        write_records(&out, &headers, &kept)?;
        info!(kept = kept.len(), dropped = total - kept.len(), "problem list cleaned");

        Ok(StageOutcome::Completed(StageSummary {
            processed: total,
            failed: 0,
            written: kept.len(),
        }))
    }
}

fn limit_value(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Median of `values`; the mean of the two middle values for an even count.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn fill_with_median(records: &mut [StringRecord], col: usize) {
    let mut present: Vec<f64> = records.iter().filter_map(|r| r.get(col).and_then(limit_value)).collect();
    let Some(fill) = median(&mut present) else {
        return;
    };
    let fill = fill.to_string();

    for record in records.iter_mut() {
        if record.get(col).and_then(limit_value).is_some() {
            continue;
        }
        let fields: Vec<String> = record
            .iter()
            .enumerate()
            .map(|(i, f)| if i == col { fill.clone() } else { f.to_string() })
            .collect();
        *record = StringRecord::from(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_odd_and_even_counts() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn missing_values_are_filled() {
        let mut records = vec![
            StringRecord::from(vec!["p1", "1000"]),
            StringRecord::from(vec!["p2", ""]),
            StringRecord::from(vec!["p3", "3000"]),
            StringRecord::from(vec!["p4", "NaN"]),
        ];
        fill_with_median(&mut records, 1);
        let values: Vec<&str> = records.iter().map(|r| r.get(1).unwrap()).collect();
        assert_eq!(values, vec!["1000", "2000", "3000", "2000"]);
        assert_eq!(records[1].get(0), Some("p2"));
    }

    #[test]
    fn column_without_values_is_left_alone() {
        let mut records = vec![StringRecord::from(vec!["p1", ""])];
        fill_with_median(&mut records, 1);
        assert_eq!(records[0].get(1), Some(""));
    }
}
