// csisweep - CsI thickness sweep for the OpNovice2 Geant4 simulation
//
// This is the library crate containing the sweep pipeline and reporting.
// The binary crate (main.rs) provides the command-line entry point.

pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{Measurement, SweepConfig, SweepPoint, SweepResults, Thickness};
pub use report::{ReportGenerator, SweepSummary};
pub use services::{CommandDriver, HeaderPatcher, OutputParser, SweepRunner, thickness_sweep};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
