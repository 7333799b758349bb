use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::artifact;
use crate::error::ServiceError;

/// One row of the problem list. Limits are in milliseconds and kilobytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub time_limit: Option<f64>,
    pub memory_limit: Option<f64>,
}

/// The cleaned problem list, in file order, indexed by problem id.
#[derive(Debug, Default)]
pub struct ProblemTable {
    problems: Vec<Problem>,
    index: HashMap<String, usize>,
}

impl ProblemTable {
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        Ok(Self::from_problems(artifact::read_csv(path)?))
    }

    pub fn from_problems(problems: Vec<Problem>) -> Self {
        let mut index = HashMap::with_capacity(problems.len());
        for (i, problem) in problems.iter().enumerate() {
            index.entry(problem.id.clone()).or_insert(i);
        }
        Self { problems, index }
    }

    pub fn get(&self, problem_id: &str) -> Option<&Problem> {
        self.index.get(problem_id).map(|&i| &self.problems[i])
    }

    /// Distinct problem ids in file order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<(usize, &String)> = self.index.iter().map(|(id, &i)| (i, id)).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Time limit of `problem_id` in milliseconds.
    pub fn time_limit(&self, problem_id: &str) -> Result<f64, ServiceError> {
        let problem = self
            .get(problem_id)
            .ok_or_else(|| ServiceError::UnknownProblem(problem_id.to_string()))?;
        problem
            .time_limit
            .ok_or_else(|| ServiceError::InvalidRecord(format!("problem {problem_id} has no time limit")))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
