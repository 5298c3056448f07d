//! Shape-preserving piecewise cubic Hermite interpolation.
//!
//! Knot derivatives follow Fritsch and Carlson: interior derivatives are the
//! weighted harmonic mean of the neighbouring secant slopes, or zero where
//! the data turns. End derivatives use the one-sided three-point estimate,
//! limited so the end segments cannot overshoot either. The result is C¹,
//! passes through every knot and is monotone wherever the data is.
//!
//! # Example
//!
//! ```rust
//! use droptrack::MonotoneCubic;
//!
//! let spline = MonotoneCubic::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, -1.0, -1.0, -4.0]).unwrap();
//!
//! // Exact at the knots
//! assert_eq!(spline.evaluate(1.0), -1.0);
//!
//! // Flat data stays flat between the knots
//! assert_eq!(spline.evaluate(1.5), -1.0);
//! ```

use crate::error::{TrackError, TrackResult};
use crate::point::{linspace, Point};

/// A monotone cubic Hermite interpolant through a set of knots.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubic {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl MonotoneCubic {
    /// Fits the interpolant through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// - [`TrackError::LengthMismatch`] when the arrays differ in length
    /// - [`TrackError::TooFewKnots`] for fewer than two knots
    /// - [`TrackError::NonIncreasingKnots`] unless `xs` is finite and
    ///   strictly increasing
    pub fn new(xs: &[f64], ys: &[f64]) -> TrackResult<Self> {
        if xs.len() != ys.len() {
            return Err(TrackError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if xs.len() < 2 {
            return Err(TrackError::TooFewKnots(xs.len()));
        }
        for (index, &x) in xs.iter().enumerate() {
            let increasing = index == 0 || x > xs[index - 1];
            if !x.is_finite() || !increasing {
                return Err(TrackError::NonIncreasingKnots { index, x });
            }
        }

        let slopes = knot_slopes(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
        })
    }

    /// Fits the interpolant through a sequence of points ordered by X.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MonotoneCubic::new`].
    pub fn from_points(points: &[Point]) -> TrackResult<Self> {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        Self::new(&xs, &ys)
    }

    /// Knot positions.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Knot values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Derivatives assigned to each knot.
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// X range covered by the knots.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluates the interpolant at `x`.
    ///
    /// Values outside the knot range extend the first or last cubic piece.
    pub fn evaluate(&self, x: f64) -> f64 {
        let k = self.segment(x);
        let h = self.xs[k + 1] - self.xs[k];
        let t = (x - self.xs[k]) / h;
        let u = 1.0 - t;

        let h00 = (1.0 + 2.0 * t) * u * u;
        let h10 = t * u * u;
        let h01 = t * t * (3.0 - 2.0 * t);
        let h11 = t * t * (t - 1.0);

        h00 * self.ys[k]
            + h10 * h * self.slopes[k]
            + h01 * self.ys[k + 1]
            + h11 * h * self.slopes[k + 1]
    }

    /// First derivative of the interpolant at `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        let k = self.segment(x);
        let h = self.xs[k + 1] - self.xs[k];
        let t = (x - self.xs[k]) / h;

        let d00 = 6.0 * t * t - 6.0 * t;
        let d10 = 3.0 * t * t - 4.0 * t + 1.0;
        let d01 = -d00;
        let d11 = 3.0 * t * t - 2.0 * t;

        (d00 * self.ys[k] + d01 * self.ys[k + 1]) / h
            + d10 * self.slopes[k]
            + d11 * self.slopes[k + 1]
    }

    /// Evaluates the interpolant at `count` evenly spaced X values spanning
    /// the knot range, both ends included.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        let (start, end) = self.domain();
        linspace(start, end, count)
            .into_iter()
            .map(|x| Point::new(x, self.evaluate(x)))
            .collect()
    }

    fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        // First knot strictly greater than x, minus one.
        self.xs.partition_point(|&k| k <= x).saturating_sub(1).min(last)
    }
}

fn knot_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let m: Vec<f64> = (0..n - 1).map(|k| (ys[k + 1] - ys[k]) / h[k]).collect();

    if n == 2 {
        return vec![m[0], m[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if m[k - 1] * m[k] > 0.0 {
            let w1 = 2.0 * h[k] + h[k - 1];
            let w2 = h[k] + 2.0 * h[k - 1];
            d[k] = (w1 + w2) / (w1 / m[k - 1] + w2 / m[k]);
        }
    }
    d[0] = end_slope(h[0], h[1], m[0], m[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);
    d
}

/// One-sided three-point derivative for an end knot.
///
/// `h0`/`m0` belong to the end segment, `h1`/`m1` to its neighbour.
fn end_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_passes_through_knots() {
        let xs = [0.0, 1.0, 2.5, 4.0, 5.0];
        let ys = [3.0, 2.0, 2.0, -1.0, -7.0];
        let spline = MonotoneCubic::new(&xs, &ys).unwrap();

        for (x, y) in xs.iter().zip(ys) {
            assert_eq!(spline.evaluate(*x), y, "knot at x={x}");
        }
    }

    #[test]
    fn test_two_knots_is_linear() {
        let spline = MonotoneCubic::new(&[0.0, 2.0], &[0.0, -4.0]).unwrap();

        assert!(approx_eq(spline.evaluate(0.5), -1.0));
        assert!(approx_eq(spline.evaluate(1.0), -2.0));
        assert!(approx_eq(spline.derivative(1.3), -2.0));
    }

    #[test]
    fn test_linear_data_reproduced() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, -2.0, -4.0, -6.0, -8.0];
        let spline = MonotoneCubic::new(&xs, &ys).unwrap();

        for p in spline.sample(41) {
            assert!(approx_eq(p.y, -2.0 * p.x), "at x={}: {}", p.x, p.y);
        }
    }

    #[test]
    fn test_turning_point_has_zero_slope() {
        let spline = MonotoneCubic::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(spline.slopes()[1], 0.0);

        // No overshoot above the local maximum
        for p in spline.sample(101) {
            assert!(p.y <= 1.0 + TOLERANCE, "overshoot at x={}: {}", p.x, p.y);
        }
    }

    #[test]
    fn test_step_data_does_not_ring() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 0.0, -10.0, -10.0, -10.0];
        let spline = MonotoneCubic::new(&xs, &ys).unwrap();

        for p in spline.sample(201) {
            assert!(p.y <= TOLERANCE && p.y >= -10.0 - TOLERANCE, "x={} y={}", p.x, p.y);
        }
    }

    #[test]
    fn test_end_slope_limited() {
        // Steep first segment followed by a reversal forces the 3*m0 limit
        let d = end_slope(1.0, 1.0, 1.0, -10.0);
        assert_eq!(d, 3.0);

        // Sign flip zeroes the slope
        let d = end_slope(1.0, 1.0, 1.0, 5.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_extrapolates_with_end_pieces() {
        let spline = MonotoneCubic::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(approx_eq(spline.evaluate(-1.0), -1.0));
        assert!(approx_eq(spline.evaluate(2.0), 2.0));
    }

    #[test]
    fn test_sample_covers_domain() {
        let spline = MonotoneCubic::new(&[1.0, 2.0, 4.0], &[5.0, 3.0, 0.0]).unwrap();
        let samples = spline.sample(10);

        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0], Point::new(1.0, 5.0));
        assert_eq!(samples[9], Point::new(4.0, 0.0));
    }

    #[test]
    fn test_rejects_bad_knots() {
        assert_eq!(
            MonotoneCubic::new(&[0.0], &[1.0]),
            Err(TrackError::TooFewKnots(1))
        );
        assert_eq!(
            MonotoneCubic::new(&[0.0, 1.0], &[1.0]),
            Err(TrackError::LengthMismatch { xs: 2, ys: 1 })
        );
        assert_eq!(
            MonotoneCubic::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(TrackError::NonIncreasingKnots { index: 2, x: 1.0 })
        );
        assert!(MonotoneCubic::new(&[0.0, f64::NAN], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_derivative_matches_knot_slopes() {
        let xs = [0.0, 1.0, 3.0, 4.0];
        let ys = [0.0, -1.0, -5.0, -6.0];
        let spline = MonotoneCubic::new(&xs, &ys).unwrap();

        for (x, d) in xs.iter().zip(spline.slopes()) {
            assert!(approx_eq(spline.derivative(*x), *d), "x={x}");
        }
    }
}
