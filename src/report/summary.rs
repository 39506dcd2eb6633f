use crate::models::{SweepPoint, SweepResults, Trend};
use std::fmt;

const RULE: &str = "============================================================";

/// Closing summary of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub material: String,
    pub recorded: usize,
    pub optimal: Option<SweepPoint>,
    pub trend: Option<Trend>,
}

impl SweepSummary {
    pub fn from_results(results: &SweepResults, material: &str) -> Self {
        Self {
            material: material.to_string(),
            recorded: results.len(),
            optimal: results.optimal().copied(),
            trend: results.trend(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.optimal.is_some()
    }
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "{}", RULE)?;

        let Some(best) = self.optimal else {
            return writeln!(f, "No sweep points were recorded; no optimal thickness to report.");
        };

        writeln!(f, "Points recorded: {}", self.recorded)?;
        writeln!(f, "Optimal Thickness: {}", best.thickness)?;
        writeln!(
            f,
            "Maximum Photoelectrons: {:.1}",
            best.measurement.electrons
        )?;
        writeln!(
            f,
            "Detection Efficiency at Optimal: {:.1}%",
            best.measurement.detection_efficiency
        )?;

        match self.trend {
            Some(Trend::PeakFound) => writeln!(
                f,
                "\n✓ Peak detected - light collection degrades with excessive thickness"
            ),
            Some(Trend::NoClearPeak) => writeln!(
                f,
                "\n⚠ No clear peak yet - consider extending the sweep to thicker {}",
                self.material
            ),
            None => Ok(()),
        }
    }
}
