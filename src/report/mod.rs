//! Report generation for a finished sweep.
//!
//! - [`figure`]: the 2×2 PNG (photons created, photoelectrons, efficiency, photons
//!   detected) with the optimum marked on the photoelectron chart
//! - [`summary`]: the closing console block
//! - [`display`]: best-effort opening of the figure in an image viewer
//! - [`export`]: optional YAML dump of the recorded points
//!
//! Nothing here may fail on an empty result set. A figure that cannot be rendered
//! is reported back to the caller after the summary has been built.

pub mod display;
pub mod export;
pub mod figure;
pub mod summary;

pub use figure::{PlotError, render_figure};
pub use summary::SweepSummary;

use crate::models::{ReportConfig, SweepResults};
use camino::Utf8PathBuf;

/// What [`ReportGenerator::generate`] produced
#[derive(Debug)]
pub struct Report {
    pub summary: SweepSummary,

    /// Figure path when rendering succeeded
    pub figure: Option<Utf8PathBuf>,

    pub figure_error: Option<PlotError>,
}

/// Turns sweep results into the figure, the optional results file and the summary
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    material: String,
    figure_path: Utf8PathBuf,
    results_path: Option<Utf8PathBuf>,
    display_figure: bool,
}

impl ReportGenerator {
    /// Paths must already be resolved against the project directory
    pub fn new(material: impl Into<String>, config: &ReportConfig) -> Self {
        Self {
            material: material.into(),
            figure_path: config.figure.clone(),
            results_path: config.results_file.clone(),
            display_figure: config.display_figure,
        }
    }

    pub fn figure_path(&self) -> &Utf8PathBuf {
        &self.figure_path
    }

    pub async fn generate(&self, results: &SweepResults) -> Report {
        if let Some(path) = &self.results_path {
            if let Err(e) = export::export_results(results, path) {
                tracing::error!("{:#}", e);
            }
        }

        tracing::info!("Generating plots...");
        let (figure, figure_error) =
            match render_figure(results, &self.material, &self.figure_path) {
                Ok(()) => (Some(self.figure_path.clone()), None),
                Err(e) => {
                    tracing::error!("{}", e);
                    (None, Some(e))
                }
            };

        if let Some(path) = &figure {
            if self.display_figure {
                display::try_open_figure(path).await;
            }
        }

        Report {
            summary: SweepSummary::from_results(results, &self.material),
            figure,
            figure_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn generator(dir: &TempDir, results_file: bool) -> ReportGenerator {
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        let config = ReportConfig {
            figure: root.join("figure.png"),
            display_figure: false,
            results_file: results_file.then(|| root.join("results.yaml")),
        };
        ReportGenerator::new("CsI", &config)
    }

    #[tokio::test]
    async fn test_generate_empty_results_completes() {
        let dir = TempDir::new().unwrap();
        let report = generator(&dir, false).generate(&SweepResults::new()).await;

        assert!(!report.summary.has_data());
        assert_eq!(report.summary.recorded, 0);
        // rendering either worked or was reported, never both
        assert_ne!(report.figure.is_some(), report.figure_error.is_some());
    }

    #[tokio::test]
    async fn test_generate_exports_results() {
        let dir = TempDir::new().unwrap();
        generator(&dir, true).generate(&SweepResults::new()).await;

        assert!(dir.path().join("results.yaml").exists());
    }
}
