#![forbid(unsafe_code)]
// Allow these clippy lints for numeric code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

//! # Droptrack
//!
//! Parametric curves for a gravity-driven ball-drop track.
//!
//! Droptrack provides:
//! - **ShapeParams / TrackShape**: five blend parameters mapped to seven
//!   control points that descend from `(0, 0)` to `(span, -depth)`
//! - **MonotoneCubic**: a shape-preserving cubic Hermite interpolant that
//!   never overshoots the control points
//! - **Cycloid**: the brachistochrone reference track
//! - **OutlineLayout**: the closed sketch outline a CAE host extrudes into
//!   a track part
//! - **descent_time**: a frictionless descent-time estimate along any
//!   sampled curve
//!
//! ## Track Example
//!
//! ```rust
//! use droptrack::{ShapeParams, TrackShape, DEFAULT_SAMPLES};
//!
//! let params = ShapeParams::new([0.2, 0.326, 0.579, 0.8, 0.674]).unwrap();
//! let control = TrackShape::default().control_points(&params).unwrap();
//!
//! // Control points descend monotonically to the track depth
//! assert!(control.is_monotone());
//!
//! // Dense samples for geometry construction
//! let curve = control.sample(DEFAULT_SAMPLES).unwrap();
//! assert_eq!(curve.len(), 50);
//! ```
//!
//! ## Cycloid Example
//!
//! ```rust
//! use droptrack::{Cycloid, GRAVITY};
//!
//! let cycloid = Cycloid::through_depth(100.0);
//! let points = cycloid.sample(20);
//!
//! // Closed-form descent time of the brachistochrone
//! let t = cycloid.descent_time(GRAVITY);
//! assert!(t > 0.22 && t < 0.23);
//! # let _ = points;
//! ```

mod cycloid;
mod descent;
mod error;
mod outline;
mod pchip;
mod point;
mod profile;

pub use cycloid::{Cycloid, DEFAULT_CYCLOID_SAMPLES};
pub use descent::{descent_time, GRAVITY};
pub use error::{TrackError, TrackResult};
pub use outline::{OutlineLayout, TrackOutline, DEFAULT_GUIDE, DEFAULT_LIP, DEFAULT_THICKNESS};
pub use pchip::MonotoneCubic;
pub use point::{linspace, Point};
pub use profile::{
    ControlPoints, ShapeParams, TrackShape, CONTROL_POINTS, DEFAULT_DEPTH, DEFAULT_INITIAL_OFFSET,
    DEFAULT_SAMPLES, DEFAULT_SPAN, SHAPE_PARAMS,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cycloid::Cycloid;
    pub use crate::descent::{descent_time, GRAVITY};
    pub use crate::outline::{OutlineLayout, TrackOutline};
    pub use crate::pchip::MonotoneCubic;
    pub use crate::point::Point;
    pub use crate::profile::{ControlPoints, ShapeParams, TrackShape};
}
