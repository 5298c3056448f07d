//! The reference cycloid track.
//!
//! A cycloid traced by a circle of radius `R` rolling under the X axis is the
//! brachistochrone between its cusp and its lowest point:
//!
//! ```text
//! x(θ) = R (θ - sin θ)
//! y(θ) = -R (1 - cos θ)          θ ∈ [0, π]
//! ```
//!
//! With `R = depth / 2` it ends at `(π R, -depth)`, the same end point as the
//! parametric track with the default span.

use core::f64::consts::PI;

use crate::point::{linspace, Point};

/// Default number of samples along the cycloid.
pub const DEFAULT_CYCLOID_SAMPLES: usize = 20;

/// Half-arch of a cycloid from the cusp to the lowest point.
///
/// # Example
///
/// ```rust
/// use droptrack::Cycloid;
///
/// let cycloid = Cycloid::through_depth(100.0);
/// let bottom = cycloid.point_at(std::f64::consts::PI);
///
/// assert_eq!(bottom.y, -100.0);
/// assert!((bottom.x - 50.0 * std::f64::consts::PI).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycloid {
    radius: f64,
}

impl Cycloid {
    /// Creates a cycloid generated by a circle of the given radius.
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Creates the cycloid whose lowest point lies `depth` below the cusp.
    pub fn through_depth(depth: f64) -> Self {
        Self::new(depth / 2.0)
    }

    /// Rolling-circle radius.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Horizontal distance from the cusp to the lowest point.
    pub fn span(&self) -> f64 {
        PI * self.radius
    }

    /// Vertical distance from the cusp to the lowest point.
    pub fn depth(&self) -> f64 {
        2.0 * self.radius
    }

    /// Point at roll angle `theta`.
    pub fn point_at(&self, theta: f64) -> Point {
        Point::new(
            self.radius * (theta - theta.sin()),
            self.radius * (theta.cos() - 1.0),
        )
    }

    /// `count` points at evenly spaced roll angles over `[0, π]`.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        linspace(0.0, PI, count)
            .into_iter()
            .map(|theta| self.point_at(theta))
            .collect()
    }

    /// Closed-form time for a frictionless bead released at the cusp to
    /// reach the lowest point, `π √(R / g)`.
    pub fn descent_time(&self, gravity: f64) -> f64 {
        PI * (self.radius / gravity).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cusp_at_origin() {
        let cycloid = Cycloid::through_depth(100.0);
        assert_eq!(cycloid.point_at(0.0), Point::origin());
    }

    #[test]
    fn test_bottom_matches_track_depth() {
        let cycloid = Cycloid::through_depth(100.0);
        let bottom = cycloid.point_at(PI);

        assert_eq!(bottom.y, -100.0);
        assert!((bottom.x - 50.0 * PI).abs() < 1e-9);
        assert_eq!(cycloid.depth(), 100.0);
        assert!((cycloid.span() - 50.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_sample_is_monotone() {
        let points = Cycloid::new(50.0).sample(DEFAULT_CYCLOID_SAMPLES);

        assert_eq!(points.len(), DEFAULT_CYCLOID_SAMPLES);
        for w in points.windows(2) {
            assert!(w[1].x > w[0].x);
            assert!(w[1].y < w[0].y);
        }
    }

    #[test]
    fn test_descent_time_closed_form() {
        let cycloid = Cycloid::new(50.0);
        let t = cycloid.descent_time(9800.0);
        assert!((t - PI * (50.0_f64 / 9800.0).sqrt()).abs() < 1e-15);
    }
}
