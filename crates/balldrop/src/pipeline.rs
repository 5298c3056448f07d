//! Workflow steps.
//!
//! Each step takes the run configuration explicitly. Pre-processing turns the
//! shape parameters into track geometry and a [`ModelPlan`]; post-processing
//! asks the host for the history report and the animation, then reduces the
//! report to a drop time.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use droptime::{find_drop_time, DropTime, TimeSeries};
use droptrack::{descent_time, ControlPoints, Point, TrackOutline};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::host::{AnimationRequest, HistoryExport, Host};
use crate::model::ModelPlan;

/// Geometry produced by pre-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackGeometry {
    /// The seven control points.
    pub control: ControlPoints,
    /// Sampled spline track curve.
    pub curve: Vec<Point>,
    /// Sampled reference cycloid.
    pub cycloid: Vec<Point>,
    /// Sketch outline of the spline track.
    pub track_outline: TrackOutline,
    /// Sketch outline of the cycloid track.
    pub cycloid_outline: TrackOutline,
}

/// Frictionless descent times for both tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentEstimate {
    /// Along the sampled spline track; `None` if the bead stalls.
    pub track: Option<f64>,
    /// Along the sampled cycloid.
    pub cycloid: f64,
    /// Closed-form brachistochrone time.
    pub cycloid_exact: f64,
}

/// Samples the spline track curve.
///
/// # Errors
///
/// Fails for out-of-domain shape parameters (unless allowed) or a degenerate
/// track shape.
pub fn track_curve(config: &RunConfig) -> Result<(ControlPoints, Vec<Point>)> {
    let params = config.shape_params()?;
    let control = config.track_shape().control_points(&params)?;
    if !control.is_monotone() {
        warn!(heights = ?control.heights(), "control points are not monotone");
    }
    let curve = control.sample(config.track.samples)?;
    debug!(samples = curve.len(), "sampled track curve");
    Ok((control, curve))
}

/// Samples the reference cycloid.
pub fn cycloid_curve(config: &RunConfig) -> Vec<Point> {
    config.cycloid().sample(config.cycloid.samples)
}

/// Builds curves and outlines for both tracks.
///
/// # Errors
///
/// Propagates curve and outline errors.
pub fn build_geometry(config: &RunConfig) -> Result<TrackGeometry> {
    let (control, curve) = track_curve(config)?;
    let cycloid = cycloid_curve(config);

    let layout = config.outline_layout();
    let track_outline = layout.build(&curve)?;
    let cycloid_outline = layout.build(&cycloid)?;

    Ok(TrackGeometry {
        control,
        curve,
        cycloid,
        track_outline,
        cycloid_outline,
    })
}

/// Estimates descent times along both sampled tracks.
///
/// # Errors
///
/// Fails if the cycloid samples cannot be timed. A stalling spline track is
/// reported as `None` instead.
pub fn estimate_descent(geometry: &TrackGeometry, config: &RunConfig) -> Result<DescentEstimate> {
    let gravity = config.gravity();
    let track = match descent_time(&geometry.curve, gravity) {
        Ok(t) => Some(t),
        Err(err) => {
            warn!(error = %err, "no descent estimate for track");
            None
        }
    };
    let cycloid = descent_time(&geometry.cycloid, gravity)?;
    let cycloid_exact = config.cycloid().descent_time(gravity);
    Ok(DescentEstimate {
        track,
        cycloid,
        cycloid_exact,
    })
}

/// Builds the geometry and hands the model plan to `host`.
///
/// # Errors
///
/// Propagates geometry and host errors.
pub fn pre_process<H: Host>(config: &RunConfig, host: &mut H) -> Result<TrackGeometry> {
    info!(run = config.run, shape = ?config.shape, "pre-processing");
    let geometry = build_geometry(config)?;

    let estimate = estimate_descent(&geometry, config)?;
    info!(
        track = ?estimate.track,
        cycloid = estimate.cycloid,
        cycloid_exact = estimate.cycloid_exact,
        "frictionless descent estimate (s)"
    );

    let plan = ModelPlan::new(
        config,
        geometry.track_outline.clone(),
        geometry.cycloid_outline.clone(),
    );
    host.build_model(&plan)?;
    Ok(geometry)
}

/// Requests the history report and animation, then reduces the report if
/// the host has already written it.
///
/// # Errors
///
/// Propagates host errors and errors reducing an existing report.
pub fn post_process<H: Host>(
    config: &RunConfig,
    host: &mut H,
    reduce: bool,
) -> Result<Option<DropTime>> {
    info!(run = config.run, "post-processing");
    host.export_history(&HistoryExport::from_config(config))?;
    host.render_animation(&AnimationRequest::from_config(config))?;

    if !reduce {
        return Ok(None);
    }
    let report = config.report_path();
    if !report.exists() {
        info!(report = %report.display(), "report not written yet; skipping reduction");
        return Ok(None);
    }
    reduce_drop_time(config, &report).map(Some)
}

/// Reduces `report` to a drop time and writes the drop-time file.
///
/// # Errors
///
/// Fails if the report cannot be read or parsed, or the drop-time file
/// cannot be written.
pub fn reduce_drop_time(config: &RunConfig, report: &Path) -> Result<DropTime> {
    let series = TimeSeries::read(report)?;
    let drop = find_drop_time(&series, config.reduce.peak)?;
    info!(
        time = drop.time,
        displacement = drop.displacement,
        row = drop.row,
        "drop time"
    );

    let path = config.drop_time_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    drop.write(&path, config.output.decimals)?;
    Ok(drop)
}

/// Renders points as `x,y` CSV with a header row.
pub fn points_csv(points: &[Point]) -> String {
    let mut out = String::from("x,y\n");
    for p in points {
        let _ = writeln!(out, "{},{}", p.x, p.y);
    }
    out
}

/// Writes points as CSV to `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_csv(path: &Path, points: &[Point]) -> Result<()> {
    fs::write(path, points_csv(points)).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), points = points.len(), "wrote curve");
    Ok(())
}
