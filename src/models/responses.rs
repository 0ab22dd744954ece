use serde::{Deserialize, Serialize};

use crate::core::{DistanceMetric, MatchReport};
use crate::models::domain::MatchResult;

/// Printable outcome of one matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub metric: DistanceMetric,
    pub unit: String,
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    pub comparisons: usize,
}

impl MatchResponse {
    pub fn new(metric: DistanceMetric, report: MatchReport) -> Self {
        Self {
            metric,
            unit: metric.unit().to_string(),
            total_results: report.matches.len(),
            comparisons: report.comparisons,
            matches: report.matches,
        }
    }
}
