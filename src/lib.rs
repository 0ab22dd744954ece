//! Closest Points - nearest-neighbor matching between two point sets
//!
//! This library pairs every point of one set with the closest point of another,
//! using planar or great-circle (haversine) distance. Points may be given in
//! decimal degrees or as degrees/minutes/seconds with a cardinal direction.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    decimal_to_degrees, degrees_to_decimal, find_closest_points, haversine_distance, DistanceMetric, Matcher,
};
pub use error::{Error, Result};
pub use models::{DecimalPoint, Direction, DmsAngle, DmsPoint, InputFormat, MatchResult, PointSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let decimal = degrees_to_decimal(42.0, 21.0, 36.0, Direction::N);
        assert!((decimal - 42.36).abs() < 1e-9);
        assert!(haversine_distance(0.0, 0.0, 0.0, 1.0) > 111.0);
    }
}
