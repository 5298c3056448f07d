#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

//! # Balldrop
//!
//! Drives the ball-drop track workflow.
//!
//! A run turns five shape parameters into a monotone drop track, builds a
//! model with that track next to a reference cycloid, and after the solve
//! reduces the ball's displacement history to the time it reaches the end
//! of the track.
//!
//! The CAE host is reached only through the [`Host`] trait. The shipped
//! [`ManifestHost`] writes requests as JSON for a host-side driver.
//!
//! ## Example
//!
//! ```rust,no_run
//! use balldrop::{pipeline, ManifestHost, RunConfig};
//!
//! let config = RunConfig::default();
//! let mut host = ManifestHost::new("runs/103");
//!
//! let geometry = pipeline::pre_process(&config, &mut host)?;
//! println!("{} curve points", geometry.curve.len());
//! # Ok::<(), balldrop::Error>(())
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod host;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use config::{ConfigError, RunConfig};
pub use error::{Error, Result};
pub use host::{AnimationRequest, HistoryExport, Host, HostError, ManifestHost};
pub use model::ModelPlan;
pub use pipeline::{DescentEstimate, TrackGeometry};
