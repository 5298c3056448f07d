//! Fixed-format time-history reports.
//!
//! A report starts with three header lines (title, column labels, spacer),
//! followed by one `time value` row per line. The data block ends at the
//! first blank line or at end of input; anything after that blank line is
//! another block and is ignored.
//!
//! ```text
//!
//!                  X                 U1_History
//!
//!                  0                          0
//!                0.1                          5
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// Number of header lines preceding the data rows.
pub const HEADER_LINES: usize = 3;

/// One `(time, value)` row of a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Simulation time.
    pub time: f64,
    /// Tracked quantity at that time.
    pub value: f64,
}

impl Sample {
    /// Creates a sample.
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// An ordered series of report rows.
///
/// # Example
///
/// ```rust
/// use droptime::TimeSeries;
///
/// let report = "\n X  U1\n\n 0.0 0.0\n 0.1 5.0\n";
/// let series: TimeSeries = report.parse().unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.samples()[1].value, 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a series from existing samples.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Appends a row.
    pub fn push(&mut self, time: f64, value: f64) {
        self.samples.push(Sample::new(time, value));
    }

    /// All rows in order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Parses report text.
    ///
    /// # Errors
    ///
    /// - [`ReportError::TruncatedHeader`] if fewer than three lines exist
    /// - [`ReportError::MalformedRow`] for a data line with fewer than two
    ///   tokens or a token that is not a finite number
    /// - [`ReportError::NoDataRows`] if the data block is empty
    pub fn parse(text: &str) -> ReportResult<Self> {
        let mut lines = text.lines();
        for found in 0..HEADER_LINES {
            if lines.next().is_none() {
                return Err(ReportError::TruncatedHeader {
                    expected: HEADER_LINES,
                    found,
                });
            }
        }

        let mut series = Self::new();
        for (offset, raw) in lines.enumerate() {
            let line = HEADER_LINES + offset + 1;
            let mut tokens = raw.split_whitespace();
            let Some(time) = tokens.next() else {
                break;
            };
            let value = tokens.next().ok_or_else(|| ReportError::MalformedRow {
                line,
                reason: "expected a time and a value".to_string(),
            })?;
            series.push(parse_number(time, line)?, parse_number(value, line)?);
        }

        if series.is_empty() {
            return Err(ReportError::NoDataRows);
        }
        debug!(rows = series.len(), "parsed report");
        Ok(series)
    }

    /// Reads and parses a report file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be read, otherwise the
    /// errors of [`TimeSeries::parse`].
    pub fn read(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::parse(&text)
    }

    /// Renders the series in report format with `label` as the value column.
    pub fn to_report(&self, label: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>19} {:>26}", "X", label);
        let _ = writeln!(out);
        for s in &self.samples {
            let _ = writeln!(out, "{:>19} {:>26}", s.time, s.value);
        }
        out
    }

    /// Writes the series to `path` in report format.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>, label: &str) -> ReportResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_report(label)).map_err(|e| ReportError::io(path, e))
    }
}

impl FromStr for TimeSeries {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_number(token: &str, line: usize) -> ReportResult<f64> {
    let value: f64 = token.parse().map_err(|_| ReportError::MalformedRow {
        line,
        reason: format!("invalid number {token:?}"),
    })?;
    if !value.is_finite() {
        return Err(ReportError::MalformedRow {
            line,
            reason: format!("non-finite number {token:?}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\n              X               U1_History\n\n";

    #[test]
    fn test_parses_rows_after_header() {
        let text = format!("{HEADER}            0.                0.\n       0.001      1.25E-03\n");
        let series = TimeSeries::parse(&text).unwrap();

        assert_eq!(
            series.samples(),
            &[Sample::new(0.0, 0.0), Sample::new(0.001, 0.00125)]
        );
    }

    #[test]
    fn test_stops_at_blank_line() {
        let text = format!("{HEADER}0.0 1.0\n0.1 2.0\n\n0.2 99.0\n");
        let series = TimeSeries::parse(&text).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_whitespace_only_line_ends_block() {
        let text = format!("{HEADER}0.0 1.0\n   \t \nnot a row\n");
        let series = TimeSeries::parse(&text).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let text = format!("{HEADER}0.5 2.0 7.0 9.0\n");
        let series = TimeSeries::parse(&text).unwrap();
        assert_eq!(series.samples(), &[Sample::new(0.5, 2.0)]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "\r\n X U1\r\n\r\n0.0 1.0\r\n0.1 3.0\r\n";
        let series = TimeSeries::parse(text).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_truncated_header() {
        let err = TimeSeries::parse("title\nlabels\n").unwrap_err();
        assert!(matches!(
            err,
            ReportError::TruncatedHeader {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let err = TimeSeries::parse(HEADER).unwrap_err();
        assert!(matches!(err, ReportError::NoDataRows));

        let err = TimeSeries::parse(&format!("{HEADER}\n0.1 1.0\n")).unwrap_err();
        assert!(matches!(err, ReportError::NoDataRows));
    }

    #[test]
    fn test_single_token_row_is_malformed() {
        let err = TimeSeries::parse(&format!("{HEADER}0.0 1.0\n0.1\n")).unwrap_err();
        match err {
            ReportError::MalformedRow { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_row_is_malformed() {
        let err = TimeSeries::parse(&format!("{HEADER}0.0 abc\n")).unwrap_err();
        match err {
            ReportError::MalformedRow { line, reason } => {
                assert_eq!(line, 4);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_row_is_malformed() {
        let err = TimeSeries::parse(&format!("{HEADER}0.0 NaN\n")).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { line: 4, .. }));
    }

    #[test]
    fn test_to_report_parses_back() {
        let mut series = TimeSeries::new();
        series.push(0.0, 0.0);
        series.push(0.1, 5.0);
        series.push(0.2, 12.5);

        let text = series.to_report("U1_History");
        assert!(text.lines().nth(1).unwrap().contains("U1_History"));
        assert_eq!(TimeSeries::parse(&text).unwrap(), series);
    }
}
