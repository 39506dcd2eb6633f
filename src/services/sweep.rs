use crate::metrics::SweepMetrics;
use crate::models::{SweepPoint, SweepResults, Thickness};
use crate::services::output_parser::{OutputParser, ParseError};
use crate::services::patcher::{HeaderPatcher, PatchOutcome};
use crate::services::simulation::{SimulationDriver, SimulationError};
use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Why a sweep point was dropped
#[derive(Error, Debug)]
pub enum PointFailure {
    #[error("Compilation failed (exit code {exit_code:?})")]
    BuildFailed { exit_code: Option<i32> },

    #[error("Build step did not complete: {0}")]
    BuildError(#[source] SimulationError),

    #[error("Simulation did not complete: {0}")]
    RunError(#[source] SimulationError),

    #[error("Could not parse output: {0}")]
    Parse(#[from] ParseError),
}

/// Runs patch, build, run and parse for every thickness, strictly in that order
///
/// Build, spawn and parse problems drop the point and the sweep moves on.
/// Header I/O errors abort the sweep.
pub struct SweepRunner<D> {
    driver: D,
    patcher: HeaderPatcher,
    parser: OutputParser,
    header_path: Utf8PathBuf,
    metrics: SweepMetrics,
}

impl<D: SimulationDriver> SweepRunner<D> {
    pub fn new(driver: D, patcher: HeaderPatcher, header_path: impl AsRef<Utf8Path>) -> Self {
        Self {
            driver,
            patcher,
            parser: OutputParser::new(),
            header_path: header_path.as_ref().to_path_buf(),
            metrics: SweepMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Sweep over `thicknesses`, returning the points that succeeded in sweep order.
    pub async fn run<I>(&self, thicknesses: I) -> Result<SweepResults>
    where
        I: IntoIterator<Item = Thickness>,
    {
        let mut results = SweepResults::new();

        tracing::info!("Starting {} thickness sweep...", self.patcher.material());

        for thickness in thicknesses {
            match self.run_point(thickness).await? {
                Ok(point) => results.push(point),
                Err(failure) => {
                    tracing::error!("  ERROR: {} for {}", failure, thickness);
                }
            }
        }

        tracing::info!(
            "Sweep complete: {} of {} points recorded",
            results.len(),
            self.metrics.points_attempted()
        );

        Ok(results)
    }

    /// One sweep point. The outer error is fatal, the inner one drops the point.
    pub async fn run_point(
        &self,
        thickness: Thickness,
    ) -> Result<std::result::Result<SweepPoint, PointFailure>> {
        self.metrics.record_attempt();

        tracing::info!(
            "Running simulation for thickness = {} ({} mm)",
            thickness,
            thickness.millimeters()
        );

        if self.patcher.patch_file(&self.header_path, thickness)? == PatchOutcome::NoMatch {
            self.metrics.record_patch_miss();
        }

        tracing::info!("  Recompiling...");
        let build = match self.driver.build().await {
            Ok(output) => output,
            Err(e) => {
                self.metrics.record_build_failure();
                return Ok(Err(PointFailure::BuildError(e)));
            }
        };
        self.metrics.record_build_time(build.duration);

        if !build.success() {
            self.metrics.record_build_failure();
            tracing::debug!("Build output:\n{}", build.combined());
            return Ok(Err(PointFailure::BuildFailed {
                exit_code: build.exit_code,
            }));
        }

        tracing::info!("  Running simulation...");
        let run = match self.driver.run().await {
            Ok(output) => output,
            Err(e) => {
                self.metrics.record_run_failure();
                return Ok(Err(PointFailure::RunError(e)));
            }
        };
        self.metrics.record_run_time(run.duration);

        if !run.success() {
            tracing::warn!(
                "  Simulator exited with code {:?}; parsing output anyway",
                run.exit_code
            );
        }

        let measurement = match self.parser.parse(&run.combined()) {
            Ok(m) => m,
            Err(e) => {
                self.metrics.record_parse_failure();
                return Ok(Err(e.into()));
            }
        };

        self.metrics.record_point();
        tracing::info!(
            "  ✓ Created: {}, Detected: {}, Electrons: {:.1}, Eff: {:.1}%",
            measurement.photons_created,
            measurement.photons_detected,
            measurement.electrons,
            measurement.detection_efficiency
        );

        Ok(Ok(SweepPoint {
            thickness,
            measurement,
        }))
    }
}
