//! Shape parameters and the control points they generate.
//!
//! The track is described by seven control points spaced evenly in X. The
//! first two heights are fixed, and each of the five shape parameters decides
//! how far the next point continues the previous step:
//!
//! ```text
//! Y0 = 0
//! Y1 = initial offset
//! Y(i+2) = Y(i+1) + (Y(i+1) - Y(i)) * s(i)      i = 0..4
//! ```
//!
//! `s = 0` repeats the previous height, `s = 1` extrapolates the previous
//! step in full. The raw heights are then rescaled so the deepest point lands
//! exactly at `-depth`.

use core::f64::consts::PI;

use crate::error::{TrackError, TrackResult};
use crate::pchip::MonotoneCubic;
use crate::point::{linspace, Point};

/// Number of shape parameters.
pub const SHAPE_PARAMS: usize = 5;

/// Number of control points (two fixed, one per shape parameter).
pub const CONTROL_POINTS: usize = SHAPE_PARAMS + 2;

/// Default horizontal span of the track, 50π.
pub const DEFAULT_SPAN: f64 = 50.0 * PI;

/// Default vertical drop of the track.
pub const DEFAULT_DEPTH: f64 = 100.0;

/// Default raw height of the second control point.
pub const DEFAULT_INITIAL_OFFSET: f64 = 0.1;

/// Default number of samples taken from the fitted curve.
pub const DEFAULT_SAMPLES: usize = 50;

/// The five shape parameters `s1..s5`.
///
/// # Example
///
/// ```rust
/// use droptrack::{ShapeParams, TrackError};
///
/// let params = ShapeParams::new([0.2, 0.326, 0.579, 0.8, 0.674]).unwrap();
/// assert_eq!(params.values()[2], 0.579);
///
/// let err = ShapeParams::new([0.2, 1.5, 0.5, 0.5, 0.5]).unwrap_err();
/// assert_eq!(err, TrackError::ParameterOutOfDomain { index: 1, value: 1.5 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams([f64; SHAPE_PARAMS]);

impl ShapeParams {
    /// Creates shape parameters, rejecting values outside `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::ParameterOutOfDomain`] for the first value that
    /// is not finite or lies outside `[0, 1]`.
    pub fn new(values: [f64; SHAPE_PARAMS]) -> TrackResult<Self> {
        for (index, &value) in values.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrackError::ParameterOutOfDomain { index, value });
            }
        }
        Ok(Self(values))
    }

    /// Creates shape parameters without any domain check.
    ///
    /// Values outside `[0, 1]` are kept as given. The resulting curve may
    /// rise, overshoot the depth or fold back on itself.
    pub const fn new_unchecked(values: [f64; SHAPE_PARAMS]) -> Self {
        Self(values)
    }

    /// Creates shape parameters from a slice of exactly five values.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::DegenerateProfile`] for a wrong count, otherwise
    /// the same errors as [`ShapeParams::new`].
    pub fn from_slice(values: &[f64]) -> TrackResult<Self> {
        let values: [f64; SHAPE_PARAMS] = values.try_into().map_err(|_| {
            TrackError::DegenerateProfile(format!(
                "expected {SHAPE_PARAMS} shape parameters, got {}",
                values.len()
            ))
        })?;
        Self::new(values)
    }

    /// The raw parameter values.
    pub const fn values(&self) -> [f64; SHAPE_PARAMS] {
        self.0
    }

    /// Whether every value lies in `[0, 1]`.
    pub fn is_in_domain(&self) -> bool {
        self.0.iter().all(|v| (0.0..=1.0).contains(v))
    }

    /// Unscaled control-point heights for the given second-point offset.
    pub fn raw_heights(&self, initial_offset: f64) -> [f64; CONTROL_POINTS] {
        let mut y = [0.0; CONTROL_POINTS];
        y[1] = initial_offset;
        for (i, s) in self.0.iter().enumerate() {
            y[i + 2] = y[i + 1] + (y[i + 1] - y[i]) * s;
        }
        y
    }
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self([0.2, 0.326, 0.579, 0.8, 0.674])
    }
}

/// Overall track dimensions.
///
/// # Example
///
/// ```rust
/// use droptrack::{ShapeParams, TrackShape};
///
/// let shape = TrackShape::default();
/// let control = shape.control_points(&ShapeParams::default()).unwrap();
///
/// assert_eq!(control.points()[0].y, 0.0);
/// assert_eq!(control.points()[6].y, -100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackShape {
    span: f64,
    depth: f64,
    initial_offset: f64,
}

impl TrackShape {
    /// Creates a track shape with the given span and depth.
    pub const fn new(span: f64, depth: f64) -> Self {
        Self {
            span,
            depth,
            initial_offset: DEFAULT_INITIAL_OFFSET,
        }
    }

    /// Sets the raw height of the second control point.
    pub const fn with_initial_offset(mut self, offset: f64) -> Self {
        self.initial_offset = offset;
        self
    }

    /// Horizontal span.
    pub const fn span(&self) -> f64 {
        self.span
    }

    /// Vertical drop.
    pub const fn depth(&self) -> f64 {
        self.depth
    }

    /// Raw height of the second control point.
    pub const fn initial_offset(&self) -> f64 {
        self.initial_offset
    }

    /// Builds the seven control points for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::DegenerateProfile`] when the span, depth or
    /// initial offset is not a positive finite number, or when the raw heights
    /// are not finite and cannot be rescaled. A non-positive offset cannot
    /// start a descending pair, so the track would never reach `-depth`.
    pub fn control_points(&self, params: &ShapeParams) -> TrackResult<ControlPoints> {
        if !(self.span.is_finite() && self.span > 0.0) {
            return Err(TrackError::DegenerateProfile(format!(
                "span must be positive, got {}",
                self.span
            )));
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(TrackError::DegenerateProfile(format!(
                "depth must be positive, got {}",
                self.depth
            )));
        }

        if !(self.initial_offset.is_finite() && self.initial_offset > 0.0) {
            return Err(TrackError::DegenerateProfile(format!(
                "initial offset must be positive, got {}",
                self.initial_offset
            )));
        }

        let raw = params.raw_heights(self.initial_offset);
        let peak = raw.iter().fold(0.0_f64, |acc, y| acc.max(y.abs()));
        if !(peak.is_finite() && peak > 0.0) {
            return Err(TrackError::DegenerateProfile(format!(
                "raw heights cannot be rescaled (max |y| = {peak})"
            )));
        }

        let xs = linspace(0.0, self.span, CONTROL_POINTS);
        let mut points = [Point::origin(); CONTROL_POINTS];
        for (i, point) in points.iter_mut().enumerate() {
            // Divide first so the deepest point lands on -depth exactly; the
            // subtraction keeps the start at +0.0 rather than -0.0.
            *point = Point::new(xs[i], 0.0 - self.depth * (raw[i] / peak));
        }
        Ok(ControlPoints { points })
    }
}

impl Default for TrackShape {
    fn default() -> Self {
        Self::new(DEFAULT_SPAN, DEFAULT_DEPTH)
    }
}

/// The rescaled control points of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoints {
    points: [Point; CONTROL_POINTS],
}

impl ControlPoints {
    /// The control points, ordered by X.
    pub const fn points(&self) -> &[Point; CONTROL_POINTS] {
        &self.points
    }

    /// Control-point heights.
    pub fn heights(&self) -> [f64; CONTROL_POINTS] {
        self.points.map(|p| p.y)
    }

    /// Whether the heights never increase from one point to the next.
    pub fn is_monotone(&self) -> bool {
        self.points.windows(2).all(|w| w[1].y <= w[0].y)
    }

    /// Fits the shape-preserving interpolant through the control points.
    ///
    /// # Errors
    ///
    /// Propagates [`MonotoneCubic::from_points`] failures, which only occur
    /// for a degenerate span.
    pub fn interpolant(&self) -> TrackResult<MonotoneCubic> {
        MonotoneCubic::from_points(&self.points)
    }

    /// Samples the fitted curve at `count` evenly spaced X values.
    ///
    /// # Errors
    ///
    /// Same as [`ControlPoints::interpolant`].
    pub fn sample(&self, count: usize) -> TrackResult<Vec<Point>> {
        Ok(self.interpolant()?.sample(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_default_params_match_reference_run() {
        assert_eq!(
            ShapeParams::default().values(),
            [0.2, 0.326, 0.579, 0.8, 0.674]
        );
    }

    #[test]
    fn test_raw_heights_recurrence() {
        let params = ShapeParams::new([1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let raw = params.raw_heights(0.1);
        for (i, y) in raw.iter().enumerate() {
            assert!(approx_eq(*y, 0.1 * i as f64), "y{i} = {y}");
        }

        let params = ShapeParams::new([0.0; SHAPE_PARAMS]).unwrap();
        assert_eq!(params.raw_heights(0.1), [0.0, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_full_extrapolation_is_a_straight_line() {
        let control = TrackShape::default()
            .control_points(&ShapeParams::new([1.0; SHAPE_PARAMS]).unwrap())
            .unwrap();
        for p in control.points() {
            let expected = -DEFAULT_DEPTH * p.x / DEFAULT_SPAN;
            assert!(approx_eq(p.y, expected), "({}, {})", p.x, p.y);
        }
    }

    #[test]
    fn test_zero_params_drop_immediately() {
        let control = TrackShape::default()
            .control_points(&ShapeParams::new([0.0; SHAPE_PARAMS]).unwrap())
            .unwrap();
        assert_eq!(control.heights()[0], 0.0);
        for y in &control.heights()[1..] {
            assert!(approx_eq(*y, -100.0));
        }
    }

    #[test]
    fn test_endpoints_pinned() {
        let shape = TrackShape::new(10.0, 4.0);
        let control = shape.control_points(&ShapeParams::default()).unwrap();
        let points = control.points();

        assert_eq!(points[0], Point::origin());
        assert_eq!(points[6].x, 10.0);
        assert!(approx_eq(points[6].y, -4.0));
        assert!(control.is_monotone());
    }

    #[test]
    fn test_x_uniformly_spaced() {
        let control = TrackShape::default()
            .control_points(&ShapeParams::default())
            .unwrap();
        let step = DEFAULT_SPAN / 6.0;
        for (i, p) in control.points().iter().enumerate() {
            assert!(approx_eq(p.x, step * i as f64));
        }
    }

    #[test]
    fn test_out_of_domain_rejected() {
        assert_eq!(
            ShapeParams::new([0.5, 0.5, 0.5, 0.5, -0.1]),
            Err(TrackError::ParameterOutOfDomain {
                index: 4,
                value: -0.1
            })
        );
        assert!(ShapeParams::new([f64::NAN, 0.5, 0.5, 0.5, 0.5]).is_err());
    }

    #[test]
    fn test_unchecked_keeps_values() {
        let params = ShapeParams::new_unchecked([1.5, 0.5, 0.5, 0.5, 0.5]);
        assert!(!params.is_in_domain());
        assert_eq!(params.values()[0], 1.5);
    }

    #[test]
    fn test_from_slice_requires_five() {
        assert!(ShapeParams::from_slice(&[0.1, 0.2, 0.3]).is_err());
        assert!(ShapeParams::from_slice(&[0.1, 0.2, 0.3, 0.4, 0.5]).is_ok());
    }

    #[test]
    fn test_degenerate_shapes_rejected() {
        let params = ShapeParams::default();
        assert!(matches!(
            TrackShape::new(0.0, 100.0).control_points(&params),
            Err(TrackError::DegenerateProfile(_))
        ));
        assert!(matches!(
            TrackShape::new(10.0, -1.0).control_points(&params),
            Err(TrackError::DegenerateProfile(_))
        ));
        assert!(matches!(
            TrackShape::default()
                .with_initial_offset(0.0)
                .control_points(&params),
            Err(TrackError::DegenerateProfile(_))
        ));
        match TrackShape::default()
            .with_initial_offset(-0.1)
            .control_points(&params)
        {
            Err(TrackError::DegenerateProfile(msg)) => assert!(msg.contains("initial offset")),
            other => panic!("negative offset accepted: {other:?}"),
        }
        assert!(matches!(
            TrackShape::default()
                .with_initial_offset(f64::NAN)
                .control_points(&params),
            Err(TrackError::DegenerateProfile(_))
        ));
    }

    #[test]
    fn test_sample_count_and_ends() {
        let control = TrackShape::default()
            .control_points(&ShapeParams::default())
            .unwrap();
        let curve = control.sample(DEFAULT_SAMPLES).unwrap();

        assert_eq!(curve.len(), DEFAULT_SAMPLES);
        assert_eq!(curve[0], Point::origin());
        assert_eq!(curve[DEFAULT_SAMPLES - 1].x, DEFAULT_SPAN);
        assert!(approx_eq(curve[DEFAULT_SAMPLES - 1].y, -100.0));
    }
}
