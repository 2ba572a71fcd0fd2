#![warn(missing_docs)]

//! Error types for the route interpolation library.

use core::fmt;

/// Errors that can occur during path interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// Error for an invalid sampling step unit.
    /// This variant is returned when the step unit is zero, negative, or
    /// non-finite.
    InvalidStepUnit(&'static str),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidStepUnit(msg) => write!(f, "Invalid step unit: {}", msg),
        }
    }
}

impl core::error::Error for PathError {}
