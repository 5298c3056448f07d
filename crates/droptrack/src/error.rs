//! Error types for curve construction.

use thiserror::Error;

/// Errors produced while building or evaluating a track curve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// A shape parameter fell outside `[0, 1]` or was not finite.
    #[error("shape parameter s{} = {value} is outside [0, 1]", .index + 1)]
    ParameterOutOfDomain {
        /// Zero-based position in the parameter vector.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// The control points cannot be rescaled to the requested depth.
    #[error("degenerate profile: {0}")]
    DegenerateProfile(String),

    /// An interpolant needs at least two knots.
    #[error("need at least 2 knots, got {0}")]
    TooFewKnots(usize),

    /// Knot X values must be finite and strictly increasing.
    #[error("knot x values must be strictly increasing (knot {index}: {x})")]
    NonIncreasingKnots {
        /// Index of the first offending knot.
        index: usize,
        /// Its X value.
        x: f64,
    },

    /// Knot X and Y arrays differ in length.
    #[error("knot length mismatch: {xs} x values, {ys} y values")]
    LengthMismatch {
        /// Number of X values.
        xs: usize,
        /// Number of Y values.
        ys: usize,
    },

    /// A released particle cannot reach the end of the polyline.
    #[error("particle stalls on segment {segment}")]
    Stalled {
        /// Zero-based segment index where motion stops.
        segment: usize,
    },
}

/// Result alias for curve operations.
pub type TrackResult<T> = Result<T, TrackError>;
