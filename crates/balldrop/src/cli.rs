//! Command-line interface for `balldrop`.
//!
//! # Examples
//!
//! ```bash
//! # Print the sampled track curve for the default shape
//! balldrop curve
//!
//! # Write the model plan for run 12 with a custom shape
//! balldrop --run 12 --shape 0.1,0.3,0.5,0.7,0.9 pre --out-dir runs/12
//!
//! # Reduce an exported report
//! balldrop drop-time runs/12/U1.rpt
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use droptime::PeakMode;

use crate::config::{ConfigError, RunConfig};

/// Ball-drop track workflow.
///
/// Generates a monotone drop track from five shape parameters, hands the
/// model to the CAE host and reduces the exported displacement history to a
/// drop time.
#[derive(Parser, Debug, Clone)]
#[command(name = "balldrop", author, version, about)]
pub struct Cli {
    /// TOML run configuration
    #[arg(long, short = 'c', global = true, env = "BALLDROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run index used to name output artifacts
    #[arg(long, short = 'r', global = true)]
    pub run: Option<u32>,

    /// Five comma-separated shape parameters in [0, 1]
    #[arg(
        long,
        short = 's',
        global = true,
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    pub shape: Option<Vec<f64>>,

    /// Accept shape parameters outside [0, 1]
    #[arg(long, global = true)]
    pub allow_out_of_domain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Workflow step to run
    #[command(subcommand)]
    pub command: Command,
}

/// Workflow steps.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sample the track curve
    Curve(CurveArgs),

    /// Sample the reference cycloid
    Cycloid(CycloidArgs),

    /// Build geometry and write the model plan
    Pre(OutDirArgs),

    /// Request report export and animation, then reduce the report
    Post(PostArgs),

    /// Reduce a history report to a drop time
    DropTime(DropTimeArgs),
}

/// Arguments for `curve`.
#[derive(Args, Debug, Clone)]
pub struct CurveArgs {
    /// Number of samples along the curve
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Print the seven control points instead of the sampled curve
    #[arg(long)]
    pub control: bool,

    /// Write CSV to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for `cycloid`.
#[derive(Args, Debug, Clone)]
pub struct CycloidArgs {
    /// Number of samples along the cycloid
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Write CSV to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Output directory override shared by host steps.
#[derive(Args, Debug, Clone)]
pub struct OutDirArgs {
    /// Directory for manifests and outputs
    #[arg(long, short = 'd')]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for `post`.
#[derive(Args, Debug, Clone)]
pub struct PostArgs {
    /// Output directory
    #[command(flatten)]
    pub out: OutDirArgs,

    /// Only write the requests; do not reduce an existing report
    #[arg(long)]
    pub skip_reduce: bool,
}

/// Arguments for `drop-time`.
#[derive(Args, Debug, Clone)]
pub struct DropTimeArgs {
    /// Report to reduce (defaults to the configured report)
    pub report: Option<PathBuf>,

    /// Drop time file to write (defaults to the configured file)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Decimal places in the drop time file
    #[arg(long)]
    pub decimals: Option<usize>,

    /// Peak selection: signed or magnitude
    #[arg(long)]
    pub peak: Option<PeakMode>,
}

/// Log level selected by `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warnings and errors only.
    Warn,
    /// Step boundaries.
    Info,
    /// Per-item detail.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log level from the `-v` count.
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Loads the config file (or defaults) and applies flag overrides.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be loaded, `--shape` does not have exactly
    /// five values, or the result does not validate.
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut RunConfig) -> Result<(), ConfigError> {
        if let Some(run) = self.run {
            config.run = run;
        }
        if let Some(shape) = &self.shape {
            config.shape = shape.as_slice().try_into().map_err(|_| {
                ConfigError::Invalid(format!(
                    "--shape needs 5 values, got {}",
                    shape.len()
                ))
            })?;
        }
        if self.allow_out_of_domain {
            config.allow_out_of_domain = true;
        }

        match &self.command {
            Command::Curve(args) => {
                if let Some(n) = args.samples {
                    config.track.samples = n;
                }
            }
            Command::Cycloid(args) => {
                if let Some(n) = args.samples {
                    config.cycloid.samples = n;
                }
            }
            Command::Pre(out) | Command::Post(PostArgs { out, .. }) => {
                if let Some(dir) = &out.out_dir {
                    config.output.dir.clone_from(dir);
                }
            }
            Command::DropTime(args) => {
                if let Some(decimals) = args.decimals {
                    config.output.decimals = decimals;
                }
                if let Some(peak) = args.peak {
                    config.reduce.peak = peak;
                }
            }
        }
        Ok(())
    }
}
