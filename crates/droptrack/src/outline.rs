//! Closed sketch outline handed to the host for a track part.
//!
//! The host sketches a spline through a short vertical guide followed by the
//! sampled drop curve, offsets it by the shell thickness, and closes the exit
//! with a three-line cap:
//!
//! ```text
//!   guide
//!     |
//!     \__ curve __
//!                 \____ (end) ──── (end + lip)
//!                                       │
//!                (end - t) ──── (end + lip - t)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};
use crate::point::Point;

/// Default guide points above the start of the curve.
pub const DEFAULT_GUIDE: [Point; 5] = [
    Point::new(0.0, 20.0),
    Point::new(0.0, 15.0),
    Point::new(0.0, 10.0),
    Point::new(0.0, 5.0),
    Point::new(0.0, 2.5),
];

/// Default shell offset between the running surface and its back face.
pub const DEFAULT_THICKNESS: f64 = 10.1;

/// Default horizontal length of the exit lip.
pub const DEFAULT_LIP: f64 = 5.0;

/// How a sampled curve is dressed up into a closed outline.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLayout {
    guide: Vec<Point>,
    thickness: f64,
    lip: f64,
}

impl OutlineLayout {
    /// Creates a layout with the default guide, thickness and lip.
    pub fn new() -> Self {
        Self {
            guide: DEFAULT_GUIDE.to_vec(),
            thickness: DEFAULT_THICKNESS,
            lip: DEFAULT_LIP,
        }
    }

    /// Replaces the guide points.
    pub fn guide(mut self, guide: impl Into<Vec<Point>>) -> Self {
        self.guide = guide.into();
        self
    }

    /// Sets the shell thickness.
    pub fn thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Sets the exit lip length.
    pub fn lip(mut self, lip: f64) -> Self {
        self.lip = lip;
        self
    }

    /// Builds the outline around `curve`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::DegenerateProfile`] for an empty curve or a
    /// non-positive thickness or lip.
    pub fn build(&self, curve: &[Point]) -> TrackResult<TrackOutline> {
        let Some(&end) = curve.last() else {
            return Err(TrackError::DegenerateProfile(
                "cannot outline an empty curve".to_string(),
            ));
        };
        if !(self.thickness > 0.0 && self.lip > 0.0) {
            return Err(TrackError::DegenerateProfile(format!(
                "thickness ({}) and lip ({}) must be positive",
                self.thickness, self.lip
            )));
        }

        let mut spline = Vec::with_capacity(self.guide.len() + curve.len());
        spline.extend_from_slice(&self.guide);
        spline.extend_from_slice(curve);

        let lip_end = Point::new(end.x + self.lip, end.y);
        let end_cap = [
            end,
            lip_end,
            Point::new(lip_end.x, end.y - self.thickness),
            Point::new(end.x, end.y - self.thickness),
        ];

        Ok(TrackOutline {
            spline,
            thickness: self.thickness,
            end_cap,
        })
    }
}

impl Default for OutlineLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Sketch data for one track part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackOutline {
    /// Spline points: guide first, then the drop curve.
    pub spline: Vec<Point>,
    /// Offset applied to the spline to form the back face.
    pub thickness: f64,
    /// Exit cap polyline from the curve end around to the back face.
    pub end_cap: [Point; 4],
}
