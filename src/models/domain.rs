use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::core::convert::dms_point_to_decimal;
use crate::error::{Error, Result};

/// Which angular axis a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest absolute value, in decimal degrees, valid on this axis
    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lat" | "latitude" => Ok(Axis::Latitude),
            "lon" | "lng" | "longitude" => Ok(Axis::Longitude),
            other => Err(Error::invalid_input(format!("unknown axis '{other}'"))),
        }
    }
}

/// Cardinal direction attached to a DMS angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    /// South and west flip the sign of the decimal value
    #[inline]
    pub fn is_negative(self) -> bool {
        matches!(self, Direction::S | Direction::W)
    }

    /// The axis this letter naturally describes
    pub fn axis(self) -> Axis {
        match self {
            Direction::N | Direction::S => Axis::Latitude,
            Direction::E | Direction::W => Axis::Longitude,
        }
    }

    /// Direction letter for a signed decimal value on the given axis
    pub fn for_sign(decimal: f64, axis: Axis) -> Self {
        match (axis, decimal >= 0.0) {
            (Axis::Latitude, true) => Direction::N,
            (Axis::Latitude, false) => Direction::S,
            (Axis::Longitude, true) => Direction::E,
            (Axis::Longitude, false) => Direction::W,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        };
        f.write_str(letter)
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Direction::N),
            "S" | "SOUTH" => Ok(Direction::S),
            "E" | "EAST" => Ok(Direction::E),
            "W" | "WEST" => Ok(Direction::W),
            _ => Err(Error::invalid_input(format!("unknown direction '{}'", s.trim()))),
        }
    }
}

/// Representation used by a point set's records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Decimal,
    Degrees,
}

impl InputFormat {
    /// Number of whitespace or CSV fields making up one point
    pub fn field_count(self) -> usize {
        match self {
            InputFormat::Decimal => 2,
            InputFormat::Degrees => 8,
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Decimal => f.write_str("decimal"),
            InputFormat::Degrees => f.write_str("degrees"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" => Ok(InputFormat::Decimal),
            "degrees" | "dms" => Ok(InputFormat::Degrees),
            other => Err(Error::invalid_input(format!("unknown input format '{other}'"))),
        }
    }
}

/// Point in signed decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct DecimalPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl DecimalPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse a `lat lon` record
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != InputFormat::Decimal.field_count() {
            return Err(Error::MalformedPointFormat {
                expected: InputFormat::Decimal.field_count(),
                found: fields.len(),
            });
        }

        Ok(Self {
            latitude: parse_number(fields[0].as_ref(), "latitude")?,
            longitude: parse_number(fields[1].as_ref(), "longitude")?,
        })
    }

    /// Reject NaN and infinite components
    pub fn ensure_finite(&self) -> Result<()> {
        for (axis, value) in [
            (Axis::Latitude, self.latitude),
            (Axis::Longitude, self.longitude),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid_input(format!("{axis} is not a finite number")));
            }
        }
        Ok(())
    }

    /// Reject values that cannot be a position on the globe
    pub fn ensure_geographic(&self) -> Result<()> {
        self.ensure_finite()?;

        let Err(errors) = self.validate() else {
            return Ok(());
        };

        if errors.field_errors().contains_key("latitude") {
            Err(Error::InvalidCoordinate {
                axis: Axis::Latitude,
                value: self.latitude,
            })
        } else {
            Err(Error::InvalidCoordinate {
                axis: Axis::Longitude,
                value: self.longitude,
            })
        }
    }
}

impl From<geo::Point<f64>> for DecimalPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<DecimalPoint> for geo::Point<f64> {
    fn from(point: DecimalPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

/// Single angle as degrees, minutes and seconds with a cardinal direction
///
/// The magnitude fields are never negative; the sign lives in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct DmsAngle {
    #[validate(range(min = 0.0))]
    pub degrees: f64,
    #[validate(range(min = 0.0, exclusive_max = 60.0))]
    pub minutes: f64,
    #[validate(range(min = 0.0, exclusive_max = 60.0))]
    pub seconds: f64,
    pub direction: Direction,
}

impl DmsAngle {
    pub fn new(degrees: f64, minutes: f64, seconds: f64, direction: Direction) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
            direction,
        }
    }

    /// Check the magnitude fields are finite, non-negative and minutes/seconds below 60
    pub fn ensure_well_formed(&self) -> Result<()> {
        for (name, value) in [
            ("degrees", self.degrees),
            ("minutes", self.minutes),
            ("seconds", self.seconds),
        ] {
            if !value.is_finite() {
                return Err(Error::invalid_input(format!("{name} is not a finite number")));
            }
        }

        self.validate().map_err(|errors| {
            Error::invalid_input(format!("DMS angle {self} out of range: {errors}"))
        })
    }

    fn from_fields(fields: &[&str], axis: Axis) -> Result<Self> {
        Ok(Self {
            degrees: parse_number(fields[0], &format!("{axis} degrees"))?,
            minutes: parse_number(fields[1], &format!("{axis} minutes"))?,
            seconds: parse_number(fields[2], &format!("{axis} seconds"))?,
            direction: fields[3].parse()?,
        })
    }
}

impl fmt::Display for DmsAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{}′{:.2}″{}",
            self.degrees, self.minutes, self.seconds, self.direction
        )
    }
}

/// Point with one DMS angle per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DmsPoint {
    pub latitude: DmsAngle,
    pub longitude: DmsAngle,
}

impl DmsPoint {
    pub fn new(latitude: DmsAngle, longitude: DmsAngle) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse `latDeg latMin latSec latDir lonDeg lonMin lonSec lonDir`
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != InputFormat::Degrees.field_count() {
            return Err(Error::MalformedPointFormat {
                expected: InputFormat::Degrees.field_count(),
                found: fields.len(),
            });
        }

        let fields: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
        Ok(Self {
            latitude: DmsAngle::from_fields(&fields[..4], Axis::Latitude)?,
            longitude: DmsAngle::from_fields(&fields[4..], Axis::Longitude)?,
        })
    }
}

/// Ordered points in one representation; result indices refer to positions here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "points", rename_all = "lowercase")]
pub enum PointSet {
    Decimal(Vec<DecimalPoint>),
    Degrees(Vec<DmsPoint>),
}

impl PointSet {
    pub fn empty(format: InputFormat) -> Self {
        match format {
            InputFormat::Decimal => PointSet::Decimal(Vec::new()),
            InputFormat::Degrees => PointSet::Degrees(Vec::new()),
        }
    }

    pub fn format(&self) -> InputFormat {
        match self {
            PointSet::Decimal(_) => InputFormat::Decimal,
            PointSet::Degrees(_) => InputFormat::Degrees,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PointSet::Decimal(points) => points.len(),
            PointSet::Degrees(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decimal-degree view of the set, in the same order
    ///
    /// DMS points are validated and converted; the first bad point aborts the
    /// whole conversion. Decimal points are passed through untouched.
    pub fn to_decimal(&self) -> Result<Vec<DecimalPoint>> {
        match self {
            PointSet::Decimal(points) => Ok(points.clone()),
            PointSet::Degrees(points) => points.iter().map(dms_point_to_decimal).collect(),
        }
    }
}

impl From<Vec<DecimalPoint>> for PointSet {
    fn from(points: Vec<DecimalPoint>) -> Self {
        PointSet::Decimal(points)
    }
}

impl From<Vec<DmsPoint>> for PointSet {
    fn from(points: Vec<DmsPoint>) -> Self {
        PointSet::Degrees(points)
    }
}

/// Closest candidate in set B for one point of set A
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "indexA")]
    pub index_a: usize,
    #[serde(rename = "indexB")]
    pub index_b: usize,
    pub distance: f64,
}

fn parse_number(field: &str, name: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_input(format!("{name} '{}' is not a number", field.trim())))
}
