//! Data models for the thickness sweep.
//!
//! - [`SweepConfig`]: paths, commands and report settings loaded from `sweep.yaml`
//! - [`Thickness`]: absorber thickness in whole micrometers
//! - [`Measurement`] / [`SweepPoint`]: what one successful simulator run produced
//! - [`SweepResults`]: the recorded points, in sweep order, with the optimum and trend queries
//!
//! All of them are plain serde values. Only the sweep loop writes to [`SweepResults`].

pub mod config;
pub mod sweep;

pub use config::{BuildConfig, HeaderConfig, ReportConfig, SimulatorConfig, SweepConfig};
pub use sweep::{Measurement, SweepPoint, SweepResults, Thickness, Trend, detection_efficiency};
