//! The seam between the workflow and the CAE host application.
//!
//! Everything the host does (building geometry, meshing, solving, exporting
//! the history report and rendering the animation) is reached through the
//! [`Host`] trait. The workflow never talks to a host session directly, so
//! the numeric steps stay testable without one.
//!
//! [`ManifestHost`] is the shipped adapter: it writes each request as JSON
//! into the output directory for the host-side driver to replay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::model::{ball_center_set, ModelPlan, HISTORY_VARIABLE};

/// File name of the model manifest.
pub const MODEL_MANIFEST: &str = "model.json";

/// File name of the post-processing manifest.
pub const POST_MANIFEST: &str = "post.json";

/// Errors raised by a host adapter.
#[derive(Error, Debug)]
pub enum HostError {
    /// A manifest could not be written.
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A request could not be serialized.
    #[error("cannot encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The host refused the request.
    #[error("host rejected {request}: {reason}")]
    Rejected {
        /// Request kind.
        request: String,
        /// Reason given by the host.
        reason: String,
    },
}

/// Request to export the ball-center displacement history as a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryExport {
    /// Result archive to read.
    pub archive: String,
    /// Step the history belongs to.
    pub step: String,
    /// Exported variable.
    pub variable: String,
    /// Node set the variable is taken from.
    pub region: String,
    /// Significant digits in the report.
    pub digits: u32,
    /// Report file to write.
    pub report: PathBuf,
}

impl HistoryExport {
    /// The export request for `config`.
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            archive: config.result_archive(),
            step: config.step.name.clone(),
            variable: HISTORY_VARIABLE.to_string(),
            region: ball_center_set(1),
            digits: config.output.report_digits,
            report: config.report_path(),
        }
    }
}

/// Request to render a time-history animation of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    /// Result archive to read.
    pub archive: String,
    /// Animation path without extension.
    pub output: PathBuf,
}

impl AnimationRequest {
    /// The animation request for `config`.
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            archive: config.result_archive(),
            output: config.video_path(),
        }
    }
}

/// A CAE host able to build and post-process the drop model.
pub trait Host {
    /// Builds, meshes and submits the model described by `plan`.
    fn build_model(&mut self, plan: &ModelPlan) -> Result<(), HostError>;

    /// Exports the displacement history report.
    fn export_history(&mut self, request: &HistoryExport) -> Result<(), HostError>;

    /// Renders the run animation.
    fn render_animation(&mut self, request: &AnimationRequest) -> Result<(), HostError>;
}

/// Post-processing requests collected by [`ManifestHost`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostManifest {
    /// History export, if requested.
    pub history: Option<HistoryExport>,
    /// Animation, if requested.
    pub animation: Option<AnimationRequest>,
}

/// Host adapter that writes requests as JSON manifests.
#[derive(Debug, Clone)]
pub struct ManifestHost {
    dir: PathBuf,
    post: PostManifest,
}

impl ManifestHost {
    /// Creates an adapter writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            post: PostManifest::default(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the model manifest.
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_MANIFEST)
    }

    /// Path of the post-processing manifest.
    pub fn post_path(&self) -> PathBuf {
        self.dir.join(POST_MANIFEST)
    }

    /// Requests collected so far.
    pub fn post(&self) -> &PostManifest {
        &self.post
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), HostError> {
        let io_err = |source| HostError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).map_err(io_err)?;
        debug!(path = %path.display(), "wrote manifest");
        Ok(())
    }
}

impl Host for ManifestHost {
    fn build_model(&mut self, plan: &ModelPlan) -> Result<(), HostError> {
        let path = self.model_path();
        self.write_json(&path, plan)?;
        info!(path = %path.display(), job = %plan.job.name, "model plan written");
        Ok(())
    }

    fn export_history(&mut self, request: &HistoryExport) -> Result<(), HostError> {
        self.post.history = Some(request.clone());
        self.write_json(&self.post_path(), &self.post)?;
        info!(report = %request.report.display(), "history export requested");
        Ok(())
    }

    fn render_animation(&mut self, request: &AnimationRequest) -> Result<(), HostError> {
        self.post.animation = Some(request.clone());
        self.write_json(&self.post_path(), &self.post)?;
        info!(output = %request.output.display(), "animation requested");
        Ok(())
    }
}
