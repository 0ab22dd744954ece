// Core algorithm exports
pub mod convert;
pub mod distance;
pub mod matcher;

pub use convert::{decimal_to_degrees, decimal_to_dms, degrees_to_decimal, dms_point_to_decimal, dms_to_decimal};
pub use distance::{euclidean_distance, haversine_distance, DistanceMetric, EARTH_RADIUS_KM};
pub use matcher::{find_closest_points, BruteForce, MatchReport, Matcher, NeighborSearch};
