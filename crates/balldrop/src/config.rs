//! Run configuration for the ball-drop workflow.
//!
//! [`RunConfig`] is the single source of truth for one run: shape
//! parameters, track dimensions, the host model settings and the output
//! locations. Every field has a documented default, so a config file only
//! needs the values it changes.
//!
//! # Examples
//!
//! ```rust
//! use balldrop::RunConfig;
//!
//! let config = RunConfig::from_toml(
//!     r#"
//!     run = 7
//!     shape = [0.5, 0.5, 0.5, 0.5, 0.5]
//!
//!     [track]
//!     samples = 80
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.run, 7);
//! assert_eq!(config.track.samples, 80);
//! assert_eq!(config.track.depth, 100.0);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use droptime::PeakMode;
use droptrack::{
    Cycloid, OutlineLayout, Point, ShapeParams, TrackResult, TrackShape, DEFAULT_CYCLOID_SAMPLES,
    DEFAULT_DEPTH, DEFAULT_GUIDE, DEFAULT_INITIAL_OFFSET, DEFAULT_LIP, DEFAULT_SAMPLES,
    DEFAULT_SPAN, DEFAULT_THICKNESS, SHAPE_PARAMS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Largest decimal count that still carries information for an `f64`.
pub const MAX_DECIMALS: usize = 17;

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for [`RunConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Runtime configuration for one ball-drop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Run index used to name output artifacts.
    pub run: u32,

    /// Shape parameters `s1..s5`.
    pub shape: [f64; SHAPE_PARAMS],

    /// Accept shape parameters outside `[0, 1]` instead of failing.
    pub allow_out_of_domain: bool,

    /// Track geometry.
    pub track: TrackConfig,

    /// Reference cycloid.
    pub cycloid: CycloidConfig,

    /// Ball part and start positions.
    pub ball: BallConfig,

    /// Ball material.
    pub material: MaterialConfig,

    /// Mesh seeds.
    pub mesh: MeshConfig,

    /// Explicit dynamics step.
    pub step: StepConfig,

    /// Solver job.
    pub job: JobConfig,

    /// Output locations.
    pub output: OutputConfig,

    /// Drop-time reduction.
    pub reduce: ReduceConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run: 103,
            shape: ShapeParams::default().values(),
            allow_out_of_domain: false,
            track: TrackConfig::default(),
            cycloid: CycloidConfig::default(),
            ball: BallConfig::default(),
            material: MaterialConfig::default(),
            mesh: MeshConfig::default(),
            step: StepConfig::default(),
            job: JobConfig::default(),
            output: OutputConfig::default(),
            reduce: ReduceConfig::default(),
        }
    }
}

/// Track geometry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// Horizontal span (default 50π).
    pub span: f64,
    /// Vertical drop (default 100).
    pub depth: f64,
    /// Raw height of the second control point (default 0.1).
    pub initial_offset: f64,
    /// Samples taken from the fitted curve (default 50).
    pub samples: usize,
    /// Vertical guide points sketched above the curve start.
    pub guide: Vec<[f64; 2]>,
    /// Shell thickness (default 10.1).
    pub thickness: f64,
    /// Exit lip length (default 5).
    pub lip: f64,
    /// Extrusion depth of the track shells (default 20).
    pub extrude_depth: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            span: DEFAULT_SPAN,
            depth: DEFAULT_DEPTH,
            initial_offset: DEFAULT_INITIAL_OFFSET,
            samples: DEFAULT_SAMPLES,
            guide: DEFAULT_GUIDE.iter().map(|p| p.to_array()).collect(),
            thickness: DEFAULT_THICKNESS,
            lip: DEFAULT_LIP,
            extrude_depth: 20.0,
        }
    }
}

/// Reference cycloid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycloidConfig {
    /// Samples along the cycloid (default 20).
    pub samples: usize,
    /// Z offset of the cycloid track instance (default -50).
    pub z_offset: f64,
}

impl Default for CycloidConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_CYCLOID_SAMPLES,
            z_offset: -50.0,
        }
    }
}

/// Ball part settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BallConfig {
    /// Ball radius (default 5).
    pub radius: f64,
    /// Start translation of the ball on the spline track.
    pub start: [f64; 3],
    /// Start translation of the ball on the cycloid track.
    pub cycloid_start: [f64; 3],
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            start: [-5.0, 5.0, 10.0],
            cycloid_start: [-5.0, 5.0, -40.0],
        }
    }
}

/// Ball material, in tonne/mm/s units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialConfig {
    /// Material name.
    pub name: String,
    /// Density (default 7.85e-9).
    pub density: f64,
    /// Young's modulus (default 200000).
    pub youngs_modulus: f64,
    /// Poisson's ratio (default 0.3).
    pub poisson_ratio: f64,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            name: "Steel".to_string(),
            density: 7.85e-9,
            youngs_modulus: 200_000.0,
            poisson_ratio: 0.3,
        }
    }
}

/// Mesh seed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Global seed size on the ball (default 1.1).
    pub ball_seed: f64,
    /// Edge seed size on the tracks (default 5).
    pub track_seed: f64,
    /// Curvature deviation factor (default 0.1).
    pub deviation_factor: f64,
    /// Minimum size factor (default 0.1).
    pub min_size_factor: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            ball_seed: 1.1,
            track_seed: 5.0,
            deviation_factor: 0.1,
            min_size_factor: 0.1,
        }
    }
}

/// Explicit dynamics step settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Step name (default `Drop`).
    pub name: String,
    /// Step duration in seconds (default 0.3).
    pub period: f64,
    /// Fixed time increment (default 5e-5).
    pub increment: f64,
    /// Gravity along Y in mm/s² (default -9800).
    pub gravity: f64,
    /// Field output intervals (default 50).
    pub field_intervals: u32,
    /// History output frequency in increments (default 1).
    pub history_frequency: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            name: "Drop".to_string(),
            period: 0.3,
            increment: 5e-5,
            gravity: -9800.0,
            field_intervals: 50,
            history_frequency: 1,
        }
    }
}

/// Solver job settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Job name; the input file and result archive are named after it.
    pub name: String,
    /// CPUs requested for the solve.
    pub cpus: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: "Ball_Drop".to_string(),
            cpus: 1,
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory all relative paths are resolved against.
    pub dir: PathBuf,
    /// Displacement history report (default `U1.rpt`).
    pub report: PathBuf,
    /// Animation directory (default `Video`).
    pub video_dir: PathBuf,
    /// Drop time file (default `Drop_Time.txt`).
    pub drop_time: PathBuf,
    /// Decimal places written for the drop time (default 8).
    pub decimals: usize,
    /// Significant digits requested in the exported report (default 9).
    pub report_digits: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            report: PathBuf::from("U1.rpt"),
            video_dir: PathBuf::from("Video"),
            drop_time: PathBuf::from("Drop_Time.txt"),
            decimals: droptime::DEFAULT_DECIMALS,
            report_digits: 9,
        }
    }
}

/// Drop-time reduction settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReduceConfig {
    /// How the peak row is chosen.
    pub peak: PeakMode,
}

impl RunConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the errors of [`RunConfig::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if rendering fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that every size, count and path setting is usable.
    ///
    /// Shape parameters are not checked here; see [`RunConfig::shape_params`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("track.span", self.track.span),
            ("track.depth", self.track.depth),
            ("track.thickness", self.track.thickness),
            ("track.lip", self.track.lip),
            ("track.extrude_depth", self.track.extrude_depth),
            ("ball.radius", self.ball.radius),
            ("material.density", self.material.density),
            ("material.youngs_modulus", self.material.youngs_modulus),
            ("mesh.ball_seed", self.mesh.ball_seed),
            ("mesh.track_seed", self.mesh.track_seed),
            ("step.period", self.step.period),
            ("step.increment", self.step.increment),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{key} must be positive, got {value}"
                )));
            }
        }
        if !(self.track.initial_offset.is_finite() && self.track.initial_offset > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "track.initial_offset must be positive, got {}",
                self.track.initial_offset
            )));
        }
        if self.step.history_frequency == 0 {
            return Err(ConfigError::Invalid(
                "step.history_frequency must be at least 1".to_string(),
            ));
        }
        if self.track.samples < 2 {
            return Err(ConfigError::Invalid(format!(
                "track.samples must be at least 2, got {}",
                self.track.samples
            )));
        }
        if self.cycloid.samples < 2 {
            return Err(ConfigError::Invalid(format!(
                "cycloid.samples must be at least 2, got {}",
                self.cycloid.samples
            )));
        }
        if !(0.0..0.5).contains(&self.material.poisson_ratio) {
            return Err(ConfigError::Invalid(format!(
                "material.poisson_ratio must be in [0, 0.5), got {}",
                self.material.poisson_ratio
            )));
        }
        if self.step.increment > self.step.period {
            return Err(ConfigError::Invalid(
                "step.increment must not exceed step.period".to_string(),
            ));
        }
        if self.output.decimals > MAX_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "output.decimals must be at most {MAX_DECIMALS}, got {}",
                self.output.decimals
            )));
        }
        if self.job.name.trim().is_empty() {
            return Err(ConfigError::Invalid("job.name must not be empty".to_string()));
        }
        Ok(())
    }

    /// The configured shape parameters.
    ///
    /// # Errors
    ///
    /// Fails with `ParameterOutOfDomain` for values outside `[0, 1]` unless
    /// `allow_out_of_domain` is set, in which case the values are used as
    /// given and a warning is logged.
    pub fn shape_params(&self) -> TrackResult<ShapeParams> {
        if self.allow_out_of_domain {
            let params = ShapeParams::new_unchecked(self.shape);
            if !params.is_in_domain() {
                warn!(shape = ?self.shape, "shape parameters outside [0, 1]; curve may not descend monotonically");
            }
            return Ok(params);
        }
        ShapeParams::new(self.shape)
    }

    /// Track dimensions.
    pub fn track_shape(&self) -> TrackShape {
        TrackShape::new(self.track.span, self.track.depth)
            .with_initial_offset(self.track.initial_offset)
    }

    /// Outline layout shared by both track parts.
    pub fn outline_layout(&self) -> OutlineLayout {
        let guide: Vec<Point> = self.track.guide.iter().copied().map(Point::from).collect();
        OutlineLayout::new()
            .guide(guide)
            .thickness(self.track.thickness)
            .lip(self.track.lip)
    }

    /// The reference cycloid ending at the track depth.
    pub fn cycloid(&self) -> Cycloid {
        Cycloid::through_depth(self.track.depth)
    }

    /// Gravity magnitude used for descent estimates.
    pub fn gravity(&self) -> f64 {
        self.step.gravity.abs()
    }

    /// Resolves `path` against the output directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.output.dir.join(path)
    }

    /// Path of the displacement history report.
    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.output.report)
    }

    /// Path of the drop time file.
    pub fn drop_time_path(&self) -> PathBuf {
        self.resolve(&self.output.drop_time)
    }

    /// Animation path without extension, `Video/Run_<run>`.
    pub fn video_path(&self) -> PathBuf {
        self.resolve(self.output.video_dir.join(format!("Run_{}", self.run)))
    }

    /// Result archive written by the solver.
    pub fn result_archive(&self) -> String {
        format!("{}.odb", self.job.name)
    }

    /// Solver input file.
    pub fn input_file(&self) -> String {
        format!("{}.inp", self.job.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = RunConfig::default();
        assert_eq!(config.run, 103);
        assert_eq!(config.shape, [0.2, 0.326, 0.579, 0.8, 0.674]);
        assert_eq!(config.track.samples, 50);
        assert_eq!(config.track.guide.len(), 5);
        assert_eq!(config.cycloid.samples, 20);
        assert_eq!(config.job.name, "Ball_Drop");
        assert_eq!(config.reduce.peak, PeakMode::Signed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_partial_toml_keeps_defaults() {
        let config = RunConfig::from_toml("[step]\nperiod = 0.5\n").unwrap();
        assert_eq!(config.step.period, 0.5);
        assert_eq!(config.step.increment, 5e-5);
        assert_eq!(config.run, 103);
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let err = RunConfig::from_toml("[track]\nwidth = 3.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_peak_mode_from_toml() {
        let config = RunConfig::from_toml("[reduce]\npeak = \"magnitude\"\n").unwrap();
        assert_eq!(config.reduce.peak, PeakMode::Magnitude);
    }

    #[test]
    fn config_toml_round_trip() {
        let mut config = RunConfig::default();
        config.run = 5;
        config.output.dir = PathBuf::from("runs/5");
        let text = config.to_toml().unwrap();
        assert_eq!(RunConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn config_validate_names_key() {
        let mut config = RunConfig::default();
        config.mesh.track_seed = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mesh.track_seed"));

        let mut config = RunConfig::default();
        config.track.samples = 1;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.output.decimals = 30;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.step.increment = 1.0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.track.initial_offset = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("track.initial_offset"));

        let mut config = RunConfig::default();
        config.step.history_frequency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_shape_params_checked_by_default() {
        let mut config = RunConfig::default();
        config.shape = [0.5, 0.5, 1.2, 0.5, 0.5];
        assert!(config.shape_params().is_err());

        config.allow_out_of_domain = true;
        let params = config.shape_params().unwrap();
        assert_eq!(params.values()[2], 1.2);
    }

    #[test]
    fn config_paths() {
        let mut config = RunConfig::default();
        config.output.dir = PathBuf::from("out");

        assert_eq!(config.report_path(), PathBuf::from("out/U1.rpt"));
        assert_eq!(config.drop_time_path(), PathBuf::from("out/Drop_Time.txt"));
        assert_eq!(config.video_path(), PathBuf::from("out/Video/Run_103"));
        assert_eq!(config.result_archive(), "Ball_Drop.odb");
        assert_eq!(config.input_file(), "Ball_Drop.inp");
    }

    #[test]
    fn config_load_missing_file() {
        let err = RunConfig::load("/nonexistent/balldrop.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
