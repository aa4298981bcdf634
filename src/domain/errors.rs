use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Input field of a proximity query, named the way clients send it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryField {
    #[serde(rename = "latitude")]
    Latitude,
    #[serde(rename = "longitude")]
    Longitude,
    #[serde(rename = "radiusKm")]
    RadiusKm,
}

impl QueryField {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryField::Latitude => "latitude",
            QueryField::Longitude => "longitude",
            QueryField::RadiusKm => "radiusKm",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The bound a rejected value violated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    /// Inclusive on both ends.
    Range { min: f64, max: f64 },
    /// Value must be strictly greater than the bound.
    GreaterThan { min: f64 },
    /// Value must be less than or equal to the bound.
    AtMost { max: f64 },
}

impl Constraint {
    pub const fn code(&self) -> &'static str {
        match self {
            Constraint::Range { .. } => "range",
            Constraint::GreaterThan { .. } => "min",
            Constraint::AtMost { .. } => "max",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Range { min, max } => write!(f, "must be between {min} and {max}"),
            Constraint::GreaterThan { min } => write!(f, "must be greater than {min}"),
            Constraint::AtMost { max } => write!(f, "must be at most {max}"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("{field} {constraint}, got {value}")]
pub struct ValidationError {
    pub field: QueryField,
    pub value: f64,
    pub constraint: Constraint,
}

impl ValidationError {
    pub const fn new(field: QueryField, value: f64, constraint: Constraint) -> Self {
        Self {
            field,
            value,
            constraint,
        }
    }

    /// Client-facing message without the rejected value.
    pub fn public_message(&self) -> String {
        format!("{} {}", self.field, self.constraint)
    }
}
