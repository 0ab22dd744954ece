use crate::error::{Error, Result};
use crate::models::{Axis, DecimalPoint, Direction, DmsAngle, DmsPoint};

const MINUTES_PER_DEGREE: f64 = 60.0;
const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Convert degrees, minutes and seconds to signed decimal degrees
///
/// `S` and `W` negate the result; the magnitude fields are taken as given.
#[inline]
pub fn degrees_to_decimal(degrees: f64, minutes: f64, seconds: f64, direction: Direction) -> f64 {
    let decimal = degrees + minutes / MINUTES_PER_DEGREE + seconds / SECONDS_PER_DEGREE;
    if direction.is_negative() {
        -decimal
    } else {
        decimal
    }
}

/// Split signed decimal degrees into whole degrees, whole minutes and seconds
///
/// The direction is always `N` or `S`, even when the value is a longitude.
/// Use [`decimal_to_dms`] to get `E`/`W` for longitudes.
pub fn decimal_to_degrees(decimal: f64) -> DmsAngle {
    let direction = if decimal >= 0.0 {
        Direction::N
    } else {
        Direction::S
    };
    split_magnitude(decimal.abs(), direction)
}

/// Like [`decimal_to_degrees`], but picks the direction letter for `axis`
pub fn decimal_to_dms(decimal: f64, axis: Axis) -> DmsAngle {
    split_magnitude(decimal.abs(), Direction::for_sign(decimal, axis))
}

fn split_magnitude(magnitude: f64, direction: Direction) -> DmsAngle {
    let degrees = magnitude.trunc();
    let minutes_decimal = (magnitude - degrees) * MINUTES_PER_DEGREE;
    let minutes = minutes_decimal.trunc();
    let seconds = (minutes_decimal - minutes) * MINUTES_PER_DEGREE;

    DmsAngle::new(degrees, minutes, seconds, direction)
}

/// Validate a DMS angle and convert it to decimal degrees on `axis`
pub fn dms_to_decimal(angle: &DmsAngle, axis: Axis) -> Result<f64> {
    angle.ensure_well_formed()?;

    let decimal = degrees_to_decimal(angle.degrees, angle.minutes, angle.seconds, angle.direction);
    if decimal.abs() > axis.limit() {
        return Err(Error::InvalidCoordinate {
            axis,
            value: decimal,
        });
    }

    Ok(decimal)
}

/// Convert both axes of a DMS point, failing on the first bad field
pub fn dms_point_to_decimal(point: &DmsPoint) -> Result<DecimalPoint> {
    Ok(DecimalPoint::new(
        dms_to_decimal(&point.latitude, Axis::Latitude)?,
        dms_to_decimal(&point.longitude, Axis::Longitude)?,
    ))
}
