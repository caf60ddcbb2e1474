//! Error type for construction and world-management failures.
//!
//! Stepping the simulation never fails; these errors only surface when building bodies or
//! constraints from invalid input, or when addressing something that is not in the world.

use thiserror::Error;

use crate::common::{BodyId, ConstraintId};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("a polygon needs at least {min} vertices, got {got}")]
    TooFewVertices { got: usize, min: usize },

    #[error("polygon area is zero or not finite ({area})")]
    DegenerateArea { area: f64 },

    #[error("invalid vertex path near token {position}: `{token}`")]
    InvalidPath { token: String, position: usize },

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("a constraint needs at least one body")]
    UnanchoredConstraint,

    #[error("{0} is not in the world")]
    UnknownBody(BodyId),

    #[error("{0} is not in the world")]
    UnknownConstraint(ConstraintId),
}

/// Check that `value` is strictly positive and finite.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonPositive { name, value })
    }
}

/// Check that `value` lies within `[min, max]`.
pub(crate) fn in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(Error::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
