#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for store-grid geometry and geolocation mapping."]
#![doc = ""]
#![doc = "This crate provides the logical grid primitives used by the in-store"]
#![doc = "navigation engine and the pure transform that projects raw GPS fixes"]
#![doc = "into store-grid coordinates."]

use core::fmt;
use libm::sqrt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::GeoError;

/// A 2-D point `(x, y)` in the logical store grid.
///
/// The grid is a fixed logical coordinate space (observed 20×20) whose unit
/// is independent of physical scale. `y` grows downward, matching the floor
/// map's top-left origin.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPoint {
    /// Horizontal grid coordinate.
    pub x: f64,
    /// Vertical grid coordinate (grows toward the south wall).
    pub y: f64,
}

impl GridPoint {
    /// Construct a new grid point.
    ///
    /// # Arguments
    ///
    /// * `x`: Horizontal grid coordinate.
    /// * `y`: Vertical grid coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        GridPoint { x, y }
    }

    /// Euclidean distance to another grid point, in grid units.
    pub fn distance_to(&self, other: GridPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        sqrt(dx * dx + dy * dy)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2})", self.x, self.y)
    }
}

/// Logical dimensions of the store grid.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSize {
    /// Grid width in grid units.
    width: f64,
    /// Grid height in grid units.
    height: f64,
}

impl GridSize {
    /// Construct a grid size.
    ///
    /// # Arguments
    ///
    /// * `width`: Grid width in grid units.
    /// * `height`: Grid height in grid units.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeoError::InvalidGridSize)` if either dimension is not
    /// positive.
    pub const fn new(width: f64, height: f64) -> Result<Self, GeoError> {
        if width <= 0.0 {
            return Err(GeoError::InvalidGridSize("width must be positive"));
        }
        if height <= 0.0 {
            return Err(GeoError::InvalidGridSize("height must be positive"));
        }
        Ok(GridSize { width, height })
    }

    /// Returns the grid width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the grid height.
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangular geographic bounding box around the store (its geofence).
///
/// `lat_max` is the north edge and maps to the top of the grid; `lon_min`
/// is the west edge and maps to the left.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Southern latitude bound (degrees).
    lat_min: f64,
    /// Northern latitude bound (degrees).
    lat_max: f64,
    /// Western longitude bound (degrees).
    lon_min: f64,
    /// Eastern longitude bound (degrees).
    lon_max: f64,
}

impl GeoBounds {
    /// Construct a geographic bounding box.
    ///
    /// A degenerate box (zero latitude or longitude extent) is valid; the
    /// mapping falls back to the grid midline on the collapsed axis.
    ///
    /// # Arguments
    ///
    /// * `lat_min`: Southern latitude bound in degrees.
    /// * `lat_max`: Northern latitude bound in degrees.
    /// * `lon_min`: Western longitude bound in degrees.
    /// * `lon_max`: Eastern longitude bound in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeoError::InvalidBounds)` if a minimum bound exceeds its
    /// maximum.
    pub const fn new(
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Result<Self, GeoError> {
        if lat_min > lat_max {
            return Err(GeoError::InvalidBounds("lat_min must not exceed lat_max"));
        }
        if lon_min > lon_max {
            return Err(GeoError::InvalidBounds("lon_min must not exceed lon_max"));
        }
        Ok(GeoBounds {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// Returns the southern latitude bound.
    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    /// Returns the northern latitude bound.
    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    /// Returns the western longitude bound.
    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    /// Returns the eastern longitude bound.
    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    /// Latitude extent of the box in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude extent of the box in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }
}

/// A single geolocation reading at a point in time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoFix {
    /// Construct a new fix.
    ///
    /// # Arguments
    ///
    /// * `latitude`: Latitude in degrees.
    /// * `longitude`: Longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoFix {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(lat: {:.6}, lon: {:.6})", self.latitude, self.longitude)
    }
}

/// Projects a raw geolocation fix into the logical store grid.
///
/// Fixes outside the geofence are clamped to the nearest edge rather than
/// rejected, so the result always lies within `[0, width] × [0, height]`.
/// Latitude decreases toward the bottom of the map, so the vertical fraction
/// is inverted relative to the raw sign. A degenerate box maps the collapsed
/// axis to the grid midline instead of dividing by zero.
///
/// Pure and idempotent: the same fix, bounds, and grid always produce the
/// same point.
///
/// # Arguments
///
/// * `fix`: The raw geolocation reading.
/// * `bounds`: The store's geographic bounding box.
/// * `grid`: The logical grid dimensions.
///
/// # Returns
///
/// The fix projected into grid coordinates.
pub fn map_to_grid(fix: GeoFix, bounds: GeoBounds, grid: GridSize) -> GridPoint {
    let lat = fix.latitude.clamp(bounds.lat_min(), bounds.lat_max());
    let lon = fix.longitude.clamp(bounds.lon_min(), bounds.lon_max());

    let fx = if bounds.lon_span() == 0.0 {
        0.5
    } else {
        (lon - bounds.lon_min()) / bounds.lon_span()
    };
    let fy = if bounds.lat_span() == 0.0 {
        0.5
    } else {
        (lat - bounds.lat_max()) / (bounds.lat_min() - bounds.lat_max())
    };

    GridPoint {
        x: fx * grid.width(),
        y: fy * grid.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    fn store_bounds() -> GeoBounds {
        GeoBounds::new(37.4215, 37.4225, -122.0850, -122.0830).unwrap()
    }

    fn store_grid() -> GridSize {
        GridSize::new(20.0, 20.0).unwrap()
    }

    #[test]
    fn test_distance() {
        let a = GridPoint::new(0.0, 0.0);
        let b = GridPoint::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < EPSILON);
        assert!((b.distance_to(a) - 5.0).abs() < EPSILON);
        assert!((a.distance_to(a) - 0.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounds_constructor_invalid() {
        let result = GeoBounds::new(37.5, 37.4, -122.0, -121.0);
        assert!(matches!(
            result,
            Err(GeoError::InvalidBounds("lat_min must not exceed lat_max"))
        ));
        let result = GeoBounds::new(37.4, 37.5, -121.0, -122.0);
        assert!(matches!(
            result,
            Err(GeoError::InvalidBounds("lon_min must not exceed lon_max"))
        ));
    }

    #[test]
    fn test_grid_size_constructor_invalid() {
        assert!(matches!(
            GridSize::new(0.0, 20.0),
            Err(GeoError::InvalidGridSize("width must be positive"))
        ));
        assert!(matches!(
            GridSize::new(20.0, -1.0),
            Err(GeoError::InvalidGridSize("height must be positive"))
        ));
    }

    #[test]
    fn test_map_center_fix() {
        // lat 37.4220 is halfway between 37.4215 and 37.4225 => fy = 0.5
        // lon -122.0840 is halfway between -122.0850 and -122.0830 => fx = 0.5
        let fix = GeoFix::new(37.4220, -122.0840);
        let p = map_to_grid(fix, store_bounds(), store_grid());
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!((p.y - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_map_corners() {
        // North-west corner maps to the grid origin.
        let nw = map_to_grid(GeoFix::new(37.4225, -122.0850), store_bounds(), store_grid());
        assert!((nw.x - 0.0).abs() < EPSILON);
        assert!((nw.y - 0.0).abs() < EPSILON);

        // South-east corner maps to (width, height).
        let se = map_to_grid(GeoFix::new(37.4215, -122.0830), store_bounds(), store_grid());
        assert!((se.x - 20.0).abs() < EPSILON);
        assert!((se.y - 20.0).abs() < EPSILON);
    }

    #[test]
    fn test_map_inside_stays_inside() {
        let fix = GeoFix::new(37.42173, -122.08437);
        let p = map_to_grid(fix, store_bounds(), store_grid());
        assert!(p.x > 0.0 && p.x < 20.0);
        assert!(p.y > 0.0 && p.y < 20.0);
    }

    #[test]
    fn test_map_clamps_outside_fixes() {
        // Far north of the geofence: clamps to the top edge, never extrapolates.
        let north = map_to_grid(GeoFix::new(38.0, -122.0840), store_bounds(), store_grid());
        assert!((north.y - 0.0).abs() < EPSILON);
        assert!((north.x - 10.0).abs() < EPSILON);

        // Far west: clamps to the left edge.
        let west = map_to_grid(GeoFix::new(37.4220, -123.0), store_bounds(), store_grid());
        assert!((west.x - 0.0).abs() < EPSILON);

        // Both axes out of range: clamps to the corner.
        let corner = map_to_grid(GeoFix::new(0.0, 0.0), store_bounds(), store_grid());
        assert!((corner.x - 20.0).abs() < EPSILON); // lon 0 > lon_max => east edge
        assert!((corner.y - 20.0).abs() < EPSILON); // lat 0 < lat_min => south edge
    }

    #[test]
    fn test_map_degenerate_bounds_fall_back_to_midline() {
        // Zero longitude extent: fx falls back to 0.5 instead of dividing by zero.
        let bounds = GeoBounds::new(37.4215, 37.4225, -122.0840, -122.0840).unwrap();
        let p = map_to_grid(GeoFix::new(37.4225, -122.0840), bounds, store_grid());
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!((p.y - 0.0).abs() < EPSILON);

        // Fully degenerate box: both axes at the midline.
        let point_bounds = GeoBounds::new(37.4220, 37.4220, -122.0840, -122.0840).unwrap();
        let p = map_to_grid(GeoFix::new(1.0, 2.0), point_bounds, store_grid());
        assert!((p.x - 10.0).abs() < EPSILON);
        assert!((p.y - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_map_is_deterministic() {
        let fix = GeoFix::new(37.42162, -122.08333);
        let a = map_to_grid(fix, store_bounds(), store_grid());
        let b = map_to_grid(fix, store_bounds(), store_grid());
        assert_eq!(a, b);
    }
}
