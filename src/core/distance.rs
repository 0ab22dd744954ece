use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::DecimalPoint;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Great-circle distance on a sphere of radius [`EARTH_RADIUS_KM`]
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Planar distance treating latitude and longitude as plain x/y values
#[inline]
pub fn euclidean_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = lat1 - lat2;
    let delta_lon = lon1 - lon2;
    (delta_lat * delta_lat + delta_lon * delta_lon).sqrt()
}

/// Distance function used to compare candidate points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Unit-less planar distance
    #[default]
    Euclidean,
    /// Great-circle distance in kilometers
    Haversine,
}

impl DistanceMetric {
    pub fn from_haversine_flag(use_haversine: bool) -> Self {
        if use_haversine {
            DistanceMetric::Haversine
        } else {
            DistanceMetric::Euclidean
        }
    }

    #[inline]
    pub fn distance(self, a: &DecimalPoint, b: &DecimalPoint) -> f64 {
        match self {
            DistanceMetric::Euclidean => {
                euclidean_distance(a.latitude, a.longitude, b.latitude, b.longitude)
            }
            DistanceMetric::Haversine => {
                haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
            }
        }
    }

    /// Whether inputs must be real latitude/longitude pairs
    pub fn requires_geographic(self) -> bool {
        matches!(self, DistanceMetric::Haversine)
    }

    /// Validate a point for use with this metric
    pub fn check(self, point: &DecimalPoint) -> Result<()> {
        if self.requires_geographic() {
            point.ensure_geographic()
        } else {
            point.ensure_finite()
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "",
            DistanceMetric::Haversine => "km",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Euclidean => f.write_str("euclidean"),
            DistanceMetric::Haversine => f.write_str("haversine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "planar" => Ok(DistanceMetric::Euclidean),
            "haversine" | "great-circle" => Ok(DistanceMetric::Haversine),
            other => Err(Error::invalid_input(format!("unknown distance metric '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_haversine_identical_points() {
        assert_eq!(haversine_distance(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
    }

    #[test]
    fn test_haversine_antipodal_points() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        assert!((distance - half_circumference).abs() < 1e-6);

        let distance = haversine_distance(90.0, 0.0, -90.0, 0.0);
        assert!((distance - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_wraps_longitude() {
        let distance = haversine_distance(10.0, 180.0, 10.0, -180.0);
        assert!(distance < 1e-6, "got {}", distance);
    }

    #[test]
    fn test_haversine_agrees_with_geo() {
        let boston = DecimalPoint::new(42.3601, -71.0589);
        let new_york = DecimalPoint::new(40.7128, -74.0060);

        let ours = DistanceMetric::Haversine.distance(&boston, &new_york);
        let geo_km = geo::Point::from(boston).haversine_distance(&geo::Point::from(new_york)) / 1000.0;

        // geo uses a slightly larger mean radius
        assert!((ours - geo_km).abs() / geo_km < 1e-3, "{} vs {}", ours, geo_km);
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(0.0, 0.0, 1.0, 0.0), 1.0);
        assert_eq!(euclidean_distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert!((euclidean_distance(0.0, 0.0, 1.0, 1.0) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_metrics_symmetric_and_non_negative() {
        let points = [
            DecimalPoint::new(0.0, 0.0),
            DecimalPoint::new(-33.8688, 151.2093),
            DecimalPoint::new(64.1466, -21.9426),
            DecimalPoint::new(-89.9, 179.9),
        ];

        for metric in [DistanceMetric::Euclidean, DistanceMetric::Haversine] {
            for a in &points {
                for b in &points {
                    let ab = metric.distance(a, b);
                    let ba = metric.distance(b, a);
                    assert!(ab >= 0.0);
                    assert!((ab - ba).abs() < 1e-6, "{metric} not symmetric for {a:?} {b:?}");
                }
                assert_eq!(metric.distance(a, a), 0.0);
            }
        }
    }

    #[test]
    fn test_metric_parsing_and_flag() {
        assert_eq!("Haversine".parse::<DistanceMetric>().unwrap(), DistanceMetric::Haversine);
        assert_eq!(DistanceMetric::from_haversine_flag(false), DistanceMetric::Euclidean);
        assert!("manhattan".parse::<DistanceMetric>().is_err());
    }

    #[test]
    fn test_metric_check() {
        let planar = DecimalPoint::new(250.0, -400.0);
        assert!(DistanceMetric::Euclidean.check(&planar).is_ok());
        assert!(DistanceMetric::Haversine.check(&planar).is_err());
    }
}
