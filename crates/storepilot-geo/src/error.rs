#![warn(missing_docs)]

//! Error types for the store-grid geometry library.
//!
//! This module defines error types that can occur while constructing grid
//! and geofence primitives.

use core::fmt;

/// Errors that can occur when building geometry primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Error for an invalid geographic bounding box.
    /// This variant is returned when a minimum bound exceeds its maximum.
    InvalidBounds(&'static str),
    /// Error for invalid grid dimensions.
    /// This variant is returned when a grid width or height is not positive.
    InvalidGridSize(&'static str),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidBounds(msg) => write!(f, "Invalid geo bounds: {}", msg),
            GeoError::InvalidGridSize(msg) => write!(f, "Invalid grid size: {}", msg),
        }
    }
}

impl core::error::Error for GeoError {}
