// Unit tests for Closest Points

use closest_points::core::{
    convert::{decimal_to_degrees, degrees_to_decimal},
    distance::haversine_distance,
    find_closest_points,
};
use closest_points::models::{DecimalPoint, Direction, DmsAngle, DmsPoint, PointSet};
use closest_points::Error;

fn decimal_set(points: &[(f64, f64)]) -> PointSet {
    PointSet::Decimal(
        points
            .iter()
            .map(|&(lat, lon)| DecimalPoint::new(lat, lon))
            .collect(),
    )
}

fn dms_point(fields: [&str; 8]) -> DmsPoint {
    DmsPoint::from_fields(&fields).unwrap()
}

#[test]
fn test_euclidean_matching() {
    let points1 = decimal_set(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    let points2 = decimal_set(&[(1.0, 0.0), (2.0, 1.0), (3.0, 2.0)]);

    let result = find_closest_points(&points1, &points2, false).unwrap();

    assert_eq!(result.len(), 3);
    for (i, m) in result.iter().enumerate() {
        assert_eq!(m.index_a, i);
        assert!((m.distance - 1.0).abs() < 1e-5);
    }

    // (1,1) and (2,2) are each 1.0 from two candidates; the earlier one wins
    let indices: Vec<usize> = result.iter().map(|m| m.index_b).collect();
    assert_eq!(indices, vec![0, 0, 1]);
}

#[test]
fn test_haversine_boston_new_york() {
    let points1 = decimal_set(&[(42.3601, -71.0589)]);
    let points2 = decimal_set(&[(40.7128, -74.0060)]);

    let result = find_closest_points(&points1, &points2, true).unwrap();

    assert!((result[0].distance - 306.0).abs() < 10.0, "got {}", result[0].distance);
}

#[test]
fn test_degrees_format_matching() {
    let points1 = PointSet::Degrees(vec![dms_point(["42", "21", "36", "N", "71", "3", "32", "W"])]);
    let points2 = PointSet::Degrees(vec![dms_point(["40", "42", "46", "N", "74", "0", "22", "W"])]);

    let result = find_closest_points(&points1, &points2, true).unwrap();

    assert_eq!(result.len(), 1);
    assert!((result[0].distance - 306.0).abs() < 10.0, "got {}", result[0].distance);
}

#[test]
fn test_single_point() {
    let result = find_closest_points(&decimal_set(&[(0.0, 0.0)]), &decimal_set(&[(1.0, 1.0)]), false).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].index_a, 0);
    assert_eq!(result[0].index_b, 0);
    assert!((result[0].distance - 2f64.sqrt()).abs() < 1e-5);
}

#[test]
fn test_empty_inputs() {
    let empty = decimal_set(&[]);
    let one = decimal_set(&[(1.0, 1.0)]);

    assert!(find_closest_points(&empty, &empty, false).unwrap().is_empty());
    assert!(find_closest_points(&one, &empty, false).unwrap().is_empty());
    assert!(find_closest_points(&empty, &one, false).unwrap().is_empty());
}

#[test]
fn test_degrees_conversion() {
    let decimal = degrees_to_decimal(42.0, 21.0, 36.0, Direction::N);
    assert!((decimal - 42.36).abs() < 0.01);

    let decimal = degrees_to_decimal(71.0, 3.0, 32.0, Direction::W);
    assert!((decimal - -71.059).abs() < 0.001);

    let angle = decimal_to_degrees(42.36);
    assert_eq!((angle.degrees, angle.minutes, angle.direction), (42.0, 21.0, Direction::N));
    assert_eq!(angle.seconds.round(), 36.0);

    let angle = decimal_to_degrees(-71.059);
    assert_eq!((angle.degrees, angle.minutes, angle.direction), (71.0, 3.0, Direction::S));
    assert_eq!(angle.seconds.round(), 32.0);
}

#[test]
fn test_round_trip_within_a_second() {
    for value in [-89.999, -45.5, -0.0001, 0.0, 12.3456, 42.36, 179.9999] {
        let DmsAngle {
            degrees,
            minutes,
            seconds,
            direction,
        } = decimal_to_degrees(value);
        let back = degrees_to_decimal(degrees, minutes, seconds, direction);
        assert!((back - value).abs() < 1e-3, "{} -> {}", value, back);
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let distance = haversine_distance(40.7580, -73.9855, 40.6782, -73.9442);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_malformed_dms_record() {
    let result = DmsPoint::from_fields(&["42", "21", "36", "N", "71", "3", "32"]);
    assert!(matches!(result, Err(Error::MalformedPointFormat { expected: 8, found: 7 })));
}

#[test]
fn test_out_of_range_dms_latitude() {
    let points1 = PointSet::Degrees(vec![dms_point(["95", "0", "0", "S", "10", "0", "0", "E"])]);
    let points2 = decimal_set(&[(0.0, 0.0)]);

    let result = find_closest_points(&points1, &points2, false);
    assert!(matches!(result, Err(Error::InvalidCoordinate { .. })));
}
