use std::sync::Arc;

use crate::core::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::models::{DecimalPoint, MatchResult, PointSet};

/// Nearest-candidate lookup over a fixed candidate set
///
/// The matcher only needs the winning index and its distance, so a spatial
/// index can stand in for [`BruteForce`] without changing match output.
pub trait NeighborSearch {
    /// Index and distance of the closest candidate, or `None` if there are none
    fn nearest(&self, query: &DecimalPoint) -> Option<(usize, f64)>;

    /// Number of candidates searched per query
    fn candidate_count(&self) -> usize;
}

/// Linear scan over every candidate
#[derive(Debug, Clone, Copy)]
pub struct BruteForce<'a> {
    candidates: &'a [DecimalPoint],
    metric: DistanceMetric,
}

impl<'a> BruteForce<'a> {
    pub fn new(candidates: &'a [DecimalPoint], metric: DistanceMetric) -> Self {
        Self { candidates, metric }
    }
}

impl NeighborSearch for BruteForce<'_> {
    #[inline]
    fn nearest(&self, query: &DecimalPoint) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;

        for (index, candidate) in self.candidates.iter().enumerate() {
            let distance = self.metric.distance(query, candidate);
            // Strict `<` keeps the lowest index on ties
            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((index, distance));
            }
        }

        best
    }

    fn candidate_count(&self) -> usize {
        self.candidates.len()
    }
}

/// Result of the matching process
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    /// One entry per point of set A, in set A order
    pub matches: Vec<MatchResult>,
    /// Number of distance evaluations performed
    pub comparisons: usize,
}

/// Nearest-neighbor matcher between two point sets
///
/// # Pipeline Stages
/// 1. Short-circuit on an empty set
/// 2. Convert DMS sets to decimal degrees and validate every point
/// 3. Scan set B for each point of set A
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    metric: DistanceMetric,
}

impl Matcher {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    pub fn euclidean() -> Self {
        Self::new(DistanceMetric::Euclidean)
    }

    pub fn haversine() -> Self {
        Self::new(DistanceMetric::Haversine)
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Find the closest point of `points_b` for every point of `points_a`
    ///
    /// Either set being empty yields an empty report rather than an error.
    /// Any invalid point aborts the whole call before scanning starts.
    pub fn find_closest(&self, points_a: &PointSet, points_b: &PointSet) -> Result<MatchReport> {
        if points_a.is_empty() || points_b.is_empty() {
            return Ok(MatchReport::default());
        }

        let points_a = self.prepare(points_a)?;
        let points_b = self.prepare(points_b)?;

        let search = BruteForce::new(&points_b, self.metric);
        Ok(self.match_with(&points_a, &search))
    }

    /// Match already-decimal points, validating them for this metric first
    pub fn match_decimal(
        &self,
        points_a: &[DecimalPoint],
        points_b: &[DecimalPoint],
    ) -> Result<Vec<MatchResult>> {
        if points_a.is_empty() || points_b.is_empty() {
            return Ok(Vec::new());
        }

        self.validate(points_a)?;
        self.validate(points_b)?;

        let search = BruteForce::new(points_b, self.metric);
        Ok(self.match_with(points_a, &search).matches)
    }

    /// Match `points_a` against any candidate search
    ///
    /// Points are not validated here.
    pub fn match_with<S: NeighborSearch>(&self, points_a: &[DecimalPoint], search: &S) -> MatchReport {
        let matches = scan(points_a, 0, search);
        MatchReport {
            comparisons: matches.len() * search.candidate_count(),
            matches,
        }
    }

    /// Same result as [`Matcher::find_closest`], with set A split across blocking tasks
    ///
    /// Set A is cut into `workers` contiguous chunks; chunk results are joined
    /// in chunk order so output matches the sequential scan exactly.
    pub async fn find_closest_concurrent(
        &self,
        points_a: &PointSet,
        points_b: &PointSet,
        workers: usize,
    ) -> Result<MatchReport> {
        if points_a.is_empty() || points_b.is_empty() {
            return Ok(MatchReport::default());
        }

        let points_a: Arc<[DecimalPoint]> = self.prepare(points_a)?.into();
        let points_b: Arc<[DecimalPoint]> = self.prepare(points_b)?.into();

        let workers = workers.clamp(1, points_a.len());
        let chunk_len = points_a.len().div_ceil(workers);
        let metric = self.metric;

        let mut handles = Vec::with_capacity(workers);
        for start in (0..points_a.len()).step_by(chunk_len) {
            let end = (start + chunk_len).min(points_a.len());
            let points_a = Arc::clone(&points_a);
            let points_b = Arc::clone(&points_b);

            handles.push(tokio::task::spawn_blocking(move || {
                let search = BruteForce::new(&points_b, metric);
                scan(&points_a[start..end], start, &search)
            }));
        }

        tracing::trace!(
            "Matching {} points against {} candidates across {} tasks",
            points_a.len(),
            points_b.len(),
            handles.len()
        );

        let mut matches = Vec::with_capacity(points_a.len());
        for handle in handles {
            let chunk = handle.await.map_err(|e| Error::Worker(e.to_string()))?;
            matches.extend(chunk);
        }

        Ok(MatchReport {
            comparisons: matches.len() * points_b.len(),
            matches,
        })
    }

    fn prepare(&self, points: &PointSet) -> Result<Vec<DecimalPoint>> {
        let points = points.to_decimal()?;
        self.validate(&points)?;
        Ok(points)
    }

    fn validate(&self, points: &[DecimalPoint]) -> Result<()> {
        points.iter().try_for_each(|point| self.metric.check(point))
    }
}

fn scan<S: NeighborSearch>(points: &[DecimalPoint], offset: usize, search: &S) -> Vec<MatchResult> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            search.nearest(point).map(|(index_b, distance)| MatchResult {
                index_a: offset + i,
                index_b,
                distance,
            })
        })
        .collect()
}

/// Brute-force closest-point matching between two sets
///
/// `use_haversine` selects great-circle kilometers over planar distance.
pub fn find_closest_points(
    points_a: &PointSet,
    points_b: &PointSet,
    use_haversine: bool,
) -> Result<Vec<MatchResult>> {
    Matcher::new(DistanceMetric::from_haversine_flag(use_haversine))
        .find_closest(points_a, points_b)
        .map(|report| report.matches)
}
