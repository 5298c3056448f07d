//! Peak search over a displacement history.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ReportError, ReportResult};
use crate::report::TimeSeries;

/// Decimal places used when writing a drop time.
pub const DEFAULT_DECIMALS: usize = 8;

/// How rows are compared when searching for the peak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PeakMode {
    /// Largest signed value.
    #[default]
    Signed,
    /// Largest absolute value.
    Magnitude,
}

impl PeakMode {
    /// Returns the string representation of the mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Signed => "signed",
            Self::Magnitude => "magnitude",
        }
    }

    fn key(self, value: f64) -> f64 {
        match self {
            Self::Signed => value,
            Self::Magnitude => value.abs(),
        }
    }
}

impl fmt::Display for PeakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown peak mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid peak mode: {0:?} (expected \"signed\" or \"magnitude\")")]
pub struct ParsePeakModeError(String);

impl FromStr for PeakMode {
    type Err = ParsePeakModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signed" => Ok(Self::Signed),
            "magnitude" | "abs" => Ok(Self::Magnitude),
            _ => Err(ParsePeakModeError(s.to_string())),
        }
    }
}

/// The selected peak row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DropTime {
    /// Time of the peak.
    pub time: f64,
    /// Displacement at the peak.
    pub displacement: f64,
    /// Zero-based row index of the peak.
    pub row: usize,
}

impl DropTime {
    /// Formats the time with a fixed number of decimal places.
    ///
    /// ```rust
    /// use droptime::DropTime;
    ///
    /// let drop = DropTime { time: 0.2, displacement: 12.0, row: 2 };
    /// assert_eq!(drop.format(3), "0.200");
    /// ```
    pub fn format(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self.time)
    }

    /// Writes the formatted time to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>, decimals: usize) -> ReportResult<()> {
        let path = path.as_ref();
        fs::write(path, self.format(decimals)).map_err(|e| ReportError::io(path, e))?;
        info!(path = %path.display(), time = self.time, "wrote drop time");
        Ok(())
    }
}

impl fmt::Display for DropTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.time),
            None => write!(f, "{}", self.time),
        }
    }
}

/// Finds the row with the largest displacement.
///
/// Ties go to the earliest row. Rows whose displacement is NaN never win;
/// `row` still counts them.
///
/// # Errors
///
/// Returns [`ReportError::NoDataRows`] for an empty series or one where every
/// displacement is NaN.
///
/// # Example
///
/// ```rust
/// use droptime::{find_drop_time, PeakMode, TimeSeries};
///
/// let mut series = TimeSeries::new();
/// series.push(0.0, 0.0);
/// series.push(0.1, 5.0);
/// series.push(0.2, 12.0);
/// series.push(0.3, 8.0);
///
/// let drop = find_drop_time(&series, PeakMode::Signed).unwrap();
/// assert_eq!(drop.time, 0.2);
/// assert_eq!(drop.to_string(), "0.2");
/// ```
pub fn find_drop_time(series: &TimeSeries, mode: PeakMode) -> ReportResult<DropTime> {
    let mut samples = series
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.value.is_nan());
    let Some((first_row, first)) = samples.next() else {
        return Err(ReportError::NoDataRows);
    };

    let mut best = DropTime {
        time: first.time,
        displacement: first.value,
        row: first_row,
    };
    for (row, s) in samples {
        if mode.key(s.value) > mode.key(best.displacement) {
            best = DropTime {
                time: s.time,
                displacement: s.value,
                row,
            };
        }
    }

    debug!(row = best.row, time = best.time, %mode, "selected peak");
    Ok(best)
}

/// Parses report text and finds its drop time.
///
/// # Errors
///
/// Any error of [`TimeSeries::parse`] or [`find_drop_time`].
pub fn reduce_report(text: &str, mode: PeakMode) -> ReportResult<DropTime> {
    find_drop_time(&TimeSeries::parse(text)?, mode)
}
