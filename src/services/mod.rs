//! Services module - the sweep pipeline.
//!
//! Each sweep point goes through the same steps, strictly in order:
//!
//! 1. [`thickness`]: the thickness values (50 to 1000 μm in 50 μm steps)
//! 2. [`patcher`]: rewrite the half-length constant in `DetectorConstruction.hh`
//! 3. [`simulation`]: rebuild with CMake, then run the simulator on the macro
//! 4. [`output_parser`]: scrape photon counts and the electron estimate
//! 5. [`sweep`]: record the point, or log why it was dropped and move on
//!
//! # Failure handling
//!
//! A failed build, a process that cannot be started (or times out when a timeout is
//! configured) and output missing one of the labels all drop the current point
//! only. Errors reading or writing the header abort the sweep.
//!
//! # Usage Example
//!
//! ```ignore
//! use csisweep::services::{CommandDriver, HeaderPatcher, SweepRunner, thickness_sweep};
//!
//! let driver = CommandDriver::from_config(&config, &manager);
//! let patcher = HeaderPatcher::new(&config.header);
//! let runner = SweepRunner::new(driver, patcher, manager.resolve(&config.header.path));
//!
//! let results = runner.run(thickness_sweep()).await?;
//! ```

pub mod output_parser;
pub mod patcher;
pub mod simulation;
pub mod sweep;
pub mod thickness;

pub use output_parser::{OutputParser, ParseError};
pub use patcher::{HeaderPatcher, PatchOutcome};
pub use simulation::{CommandDriver, ProcessOutput, ProcessSpec, SimulationDriver, SimulationError};
pub use sweep::{PointFailure, SweepRunner};
pub use thickness::thickness_sweep;
