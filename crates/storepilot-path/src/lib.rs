#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for interpolating store navigation routes."]
#![doc = ""]
#![doc = "This crate turns an ordered sequence of waypoint grid points into a"]
#![doc = "dense, fully materialized path with bounded spacing between"]
#![doc = "consecutive samples."]

extern crate alloc;

use alloc::vec::Vec;
use libm::round;

use storepilot_geo::GridPoint;

pub mod error;
pub use error::PathError;

/// Default maximum spacing between consecutive path samples, in grid units.
///
/// The animation driver relies on this bound for smooth, frame-rate
/// independent motion regardless of how far apart the waypoints are.
pub const DEFAULT_STEP_UNIT: f64 = 0.2;

/// Interpolates straight segments through `waypoints` into a dense path.
///
/// The first waypoint is emitted once before any segment processing, so a
/// non-empty input always yields a path starting exactly at `waypoints[0]`.
/// Each segment `(start, end)` is split into `max(1, round(d / step_unit))`
/// samples at evenly spaced parameters, where `d` is the segment length;
/// zero-length segments are skipped entirely.
///
/// The result is deterministic and fully materialized: the renderer needs
/// the whole path up front to draw the route line, and the animation driver
/// needs indexed, repeatable access.
///
/// # Arguments
///
/// * `waypoints`: Ordered waypoints; the first element is the starting
///   position, the rest are route section centers in visit order.
/// * `step_unit`: Maximum spacing between consecutive samples in grid units
///   (see [`DEFAULT_STEP_UNIT`]).
///
/// # Errors
///
/// Returns `Err(PathError::InvalidStepUnit)` if `step_unit` is zero,
/// negative, or non-finite.
///
/// # Returns
///
/// The interpolated path. Empty input yields an empty path.
pub fn interpolate(waypoints: &[GridPoint], step_unit: f64) -> Result<Vec<GridPoint>, PathError> {
    if !step_unit.is_finite() || step_unit <= 0.0 {
        return Err(PathError::InvalidStepUnit("must be positive and finite"));
    }

    let mut path = Vec::new();
    let Some(first) = waypoints.first() else {
        return Ok(path);
    };
    path.push(*first);

    for pair in waypoints.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start == end {
            continue;
        }

        let distance = start.distance_to(end);
        let steps = round(distance / step_unit).max(1.0) as usize;
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        for j in 1..=steps {
            let t = j as f64 / steps as f64;
            path.push(GridPoint::new(start.x + dx * t, start.y + dy * t));
        }
    }

    Ok(path)
}

/// Total length of a path, as the sum of consecutive sample distances.
pub fn path_length(path: &[GridPoint]) -> f64 {
    path.windows(2).map(|p| p[0].distance_to(p[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_empty_input_yields_empty_path() {
        let path = interpolate(&[], DEFAULT_STEP_UNIT).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_single_waypoint_yields_start_only() {
        let start = GridPoint::new(11.5, 18.0);
        let path = interpolate(&[start], DEFAULT_STEP_UNIT).unwrap();
        assert_eq!(path, alloc::vec![start]);
    }

    #[test]
    fn test_invalid_step_unit() {
        let wp = [GridPoint::new(0.0, 0.0), GridPoint::new(1.0, 0.0)];
        assert!(matches!(
            interpolate(&wp, 0.0),
            Err(PathError::InvalidStepUnit("must be positive and finite"))
        ));
        assert!(matches!(
            interpolate(&wp, -0.2),
            Err(PathError::InvalidStepUnit(_))
        ));
        assert!(matches!(
            interpolate(&wp, f64::NAN),
            Err(PathError::InvalidStepUnit(_))
        ));
    }

    #[test]
    fn test_endpoints_are_exact() {
        let a = GridPoint::new(2.0, 3.0);
        let b = GridPoint::new(7.0, 1.0);
        let path = interpolate(&[a, b], DEFAULT_STEP_UNIT).unwrap();
        let first = path.first().unwrap();
        let last = path.last().unwrap();
        assert_eq!(*first, a);
        assert!((last.x - b.x).abs() < EPSILON);
        assert!((last.y - b.y).abs() < EPSILON);
    }

    #[test]
    fn test_sample_spacing_is_bounded() {
        let wp = [
            GridPoint::new(11.5, 18.0),
            GridPoint::new(11.0, 9.5),
            GridPoint::new(4.5, 5.5),
            GridPoint::new(19.0, 18.0),
        ];
        let path = interpolate(&wp, DEFAULT_STEP_UNIT).unwrap();
        // Rounding down the step count can stretch samples slightly past the
        // step unit, by at most half a step's worth over a segment.
        let slack = DEFAULT_STEP_UNIT * 0.5;
        for pair in path.windows(2) {
            assert!(pair[0].distance_to(pair[1]) <= DEFAULT_STEP_UNIT + slack);
        }
    }

    #[test]
    fn test_zero_length_segment_is_skipped() {
        let a = GridPoint::new(5.0, 5.0);
        let b = GridPoint::new(6.0, 5.0);
        let with_dup = interpolate(&[a, a, b], DEFAULT_STEP_UNIT).unwrap();
        let without = interpolate(&[a, b], DEFAULT_STEP_UNIT).unwrap();
        assert_eq!(with_dup, without);

        // A single repeated waypoint emits nothing beyond the start.
        let degenerate = interpolate(&[a, a], DEFAULT_STEP_UNIT).unwrap();
        assert_eq!(degenerate, alloc::vec![a]);
    }

    #[test]
    fn test_idempotence() {
        let wp = [
            GridPoint::new(11.5, 18.0),
            GridPoint::new(11.0, 9.5),
            GridPoint::new(16.0, 10.0),
        ];
        let a = interpolate(&wp, DEFAULT_STEP_UNIT).unwrap();
        let b = interpolate(&wp, DEFAULT_STEP_UNIT).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_entrance_to_dairy_scenario() {
        // Entrance (11.5, 18) to the dairy section center (11, 9.5):
        // d = sqrt(0.25 + 72.25) = sqrt(72.5) ~= 8.5147
        // steps = round(8.5147 / 0.2) = 43
        let entrance = GridPoint::new(11.5, 18.0);
        let dairy = GridPoint::new(11.0, 9.5);
        let path = interpolate(&[entrance, dairy], DEFAULT_STEP_UNIT).unwrap();

        assert_eq!(path.len(), 44); // start point + 43 samples
        assert_eq!(path[0], entrance);
        let last = path.last().unwrap();
        assert!((last.x - 11.0).abs() < EPSILON);
        assert!((last.y - 9.5).abs() < EPSILON);

        // Distance to the target shrinks monotonically along the path.
        let mut previous = f64::INFINITY;
        for p in &path {
            let d = p.distance_to(dairy);
            assert!(d < previous + EPSILON);
            previous = d;
        }
    }

    #[test]
    fn test_short_segment_still_emits_one_sample() {
        // Segment shorter than the step unit: steps = max(1, round(0.05/0.2)) = 1,
        // so the endpoint is still emitted.
        let a = GridPoint::new(0.0, 0.0);
        let b = GridPoint::new(0.05, 0.0);
        let path = interpolate(&[a, b], DEFAULT_STEP_UNIT).unwrap();
        assert_eq!(path.len(), 2);
        assert!((path[1].x - 0.05).abs() < EPSILON);
    }

    #[test]
    fn test_path_length() {
        let path = [
            GridPoint::new(0.0, 0.0),
            GridPoint::new(3.0, 4.0),
            GridPoint::new(3.0, 6.0),
        ];
        // 5.0 + 2.0
        assert!((path_length(&path) - 7.0).abs() < EPSILON);
        assert!((path_length(&[]) - 0.0).abs() < EPSILON);
    }
}
