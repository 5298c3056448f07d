#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Droptime
//!
//! Reduces a time-history report to a single drop time.
//!
//! A CAE post-processor exports the ball's displacement history as a text
//! report. Droptime parses that report, finds the row where the displacement
//! peaks and writes the corresponding time with fixed decimal places.
//!
//! ## Example
//!
//! ```rust
//! use droptime::{reduce_report, PeakMode};
//!
//! let report = "\n        X        U1_History\n\n\
//!               0.0  0.0\n\
//!               0.1  5.0\n\
//!               0.2 12.0\n\
//!               0.3  8.0\n";
//!
//! let drop = reduce_report(report, PeakMode::Signed).unwrap();
//! assert_eq!(drop.time, 0.2);
//! assert_eq!(drop.format(4), "0.2000");
//! ```
//!
//! ## Errors
//!
//! Every failure is a named [`ReportError`]: a missing file, a truncated
//! header, a malformed row (with its line number) or a report without data.

mod error;
mod reduce;
mod report;

pub use error::{ReportError, ReportResult};
pub use reduce::{
    find_drop_time, reduce_report, DropTime, ParsePeakModeError, PeakMode, DEFAULT_DECIMALS,
};
pub use report::{Sample, TimeSeries, HEADER_LINES};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::reduce::{find_drop_time, reduce_report, DropTime, PeakMode};
    pub use crate::report::{Sample, TimeSeries};
    pub use crate::{ReportError, ReportResult};
}
