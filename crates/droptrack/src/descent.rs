//! Frictionless descent time along a sampled track.
//!
//! A bead released at rest at the first point keeps the speed given by
//! energy conservation, `v = √(2 g Δh)`. On each straight segment the
//! acceleration is constant, so the segment takes `2ℓ / (v₀ + v₁)`. Corner
//! losses are ignored, which makes this an optimistic pre-screen for the full
//! contact simulation rather than a replacement for it.

use crate::error::{TrackError, TrackResult};
use crate::point::Point;

/// Standard gravity in mm/s², the unit system of the track model.
pub const GRAVITY: f64 = 9800.0;

/// Time for a bead released at `points[0]` to reach the last point.
///
/// # Errors
///
/// - [`TrackError::TooFewKnots`] for fewer than two points
/// - [`TrackError::DegenerateProfile`] for a non-positive gravity
/// - [`TrackError::Stalled`] when a point rises above the release height or
///   a segment starts and ends at zero speed
///
/// # Example
///
/// ```rust
/// use droptrack::{descent_time, Cycloid, GRAVITY};
///
/// let cycloid = Cycloid::through_depth(100.0);
/// let sampled = descent_time(&cycloid.sample(4000), GRAVITY).unwrap();
/// let exact = cycloid.descent_time(GRAVITY);
///
/// assert!((sampled - exact).abs() / exact < 1e-3);
/// ```
pub fn descent_time(points: &[Point], gravity: f64) -> TrackResult<f64> {
    if points.len() < 2 {
        return Err(TrackError::TooFewKnots(points.len()));
    }
    if !(gravity.is_finite() && gravity > 0.0) {
        return Err(TrackError::DegenerateProfile(format!(
            "gravity must be positive, got {gravity}"
        )));
    }

    let top = points[0].y;
    let speed = |p: Point, segment: usize| -> TrackResult<f64> {
        let drop = top - p.y;
        if drop < 0.0 {
            return Err(TrackError::Stalled { segment });
        }
        Ok((2.0 * gravity * drop).sqrt())
    };

    let mut total = 0.0;
    for (segment, w) in points.windows(2).enumerate() {
        let length = w[0].distance(w[1]);
        if length == 0.0 {
            continue;
        }
        let v0 = speed(w[0], segment)?;
        let v1 = speed(w[1], segment)?;
        if v0 + v1 == 0.0 {
            return Err(TrackError::Stalled { segment });
        }
        total += 2.0 * length / (v0 + v1);
    }
    Ok(total)
}
