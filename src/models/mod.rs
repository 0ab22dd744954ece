// Model exports
pub mod domain;
pub mod responses;

pub use domain::{Axis, DecimalPoint, Direction, DmsAngle, DmsPoint, InputFormat, MatchResult, PointSet};
pub use responses::MatchResponse;
