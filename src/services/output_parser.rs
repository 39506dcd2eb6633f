use crate::models::Measurement;
use regex::Regex;
use thiserror::Error;

pub const CREATED_LABEL: &str = "Total scintillation photons created:";
pub const DETECTED_LABEL: &str = "Photons detected at PD (global):";
pub const ELECTRONS_LABEL: &str = "Estimated electrons:";

/// Errors that can occur while scraping simulator output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("'{0}' not found in simulator output")]
    MissingField(&'static str),

    #[error("Invalid value '{value}' after '{label}'")]
    InvalidNumber { label: &'static str, value: String },
}

/// Scrapes the run summary printed by the OpNovice2 RunAction
///
/// # Fields
///
/// The patterns are compiled once at construction time:
///
/// - `created_pattern`: `Total scintillation photons created:\s*(\d+)`
/// - `detected_pattern`: `Photons detected at PD \(global\):\s*(\d+)`
/// - `electrons_pattern`: `Estimated electrons:\s*((?:\d+\.?\d*|\.\d+)(?:\.\d+)*(?:[eE][+-]?\d+)?)`
///
/// Dots after the first are only taken into the electron value when a digit
/// follows, so a sentence-ending period is left out while `1.2.3` is still
/// captured whole (and rejected).
///
/// Each pattern is searched independently over the whole text and the first
/// occurrence wins. Label order does not matter.
pub struct OutputParser {
    created_pattern: Regex,
    detected_pattern: Regex,
    electrons_pattern: Regex,
}

impl OutputParser {
    pub fn new() -> Self {
        Self {
            created_pattern: Regex::new(r"Total scintillation photons created:\s*(\d+)")
                .expect("Invalid created-photons regex"),
            detected_pattern: Regex::new(r"Photons detected at PD \(global\):\s*(\d+)")
                .expect("Invalid detected-photons regex"),
            electrons_pattern: Regex::new(
                r"Estimated electrons:\s*((?:\d+\.?\d*|\.\d+)(?:\.\d+)*(?:[eE][+-]?\d+)?)",
            )
            .expect("Invalid electrons regex"),
        }
    }

    /// Parse captured output (stdout followed by stderr).
    ///
    /// All three values must be present; otherwise the whole run is rejected.
    pub fn parse(&self, output: &str) -> Result<Measurement, ParseError> {
        let created = capture(&self.created_pattern, output, CREATED_LABEL)?;
        let detected = capture(&self.detected_pattern, output, DETECTED_LABEL)?;
        let electrons = capture(&self.electrons_pattern, output, ELECTRONS_LABEL)?;

        let measurement = Measurement::new(
            parse_number(created, CREATED_LABEL)?,
            parse_number(detected, DETECTED_LABEL)?,
            parse_number(electrons, ELECTRONS_LABEL)?,
        );

        tracing::debug!(
            "Parsed output - created: {}, detected: {}, electrons: {}",
            measurement.photons_created,
            measurement.photons_detected,
            measurement.electrons
        );

        Ok(measurement)
    }
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}

fn capture<'a>(pattern: &Regex, output: &'a str, label: &'static str) -> Result<&'a str, ParseError> {
    pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingField(label))
}

fn parse_number<T: std::str::FromStr>(value: &str, label: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        label,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_SUMMARY: &str = "\
=== CsI SCINTILLATION SUMMARY ===
Total scintillation photons created: 48211
Total photons that escaped CsI:     30112
Photons exiting CsI +Z face:        14020
Photons detected at PD (global):      9034
Estimated electrons: 6323.8
====================================
";

    #[test]
    fn test_parse_run_summary() {
        let m = OutputParser::new().parse(RUN_SUMMARY).unwrap();
        assert_eq!(m.photons_created, 48211);
        assert_eq!(m.photons_detected, 9034);
        assert_eq!(m.electrons, 6323.8);
        assert!((m.detection_efficiency - 9034.0 * 100.0 / 48211.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_inline_text() {
        let text = "...Total scintillation photons created: 1000...Photons detected at PD (global): 200...Estimated electrons: 150.5...";
        let m = OutputParser::new().parse(text).unwrap();

        assert_eq!(m.photons_created, 1000);
        assert_eq!(m.photons_detected, 200);
        assert_eq!(m.electrons, 150.5);
        assert_eq!(m.detection_efficiency, 20.0);
    }

    #[test]
    fn test_parse_any_order() {
        let text = "Estimated electrons: 12\nnoise\nPhotons detected at PD (global): 4\nTotal scintillation photons created: 16\n";
        let m = OutputParser::new().parse(text).unwrap();
        assert_eq!(m.photons_created, 16);
        assert_eq!(m.photons_detected, 4);
        assert_eq!(m.electrons, 12.0);
        assert_eq!(m.detection_efficiency, 25.0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Total scintillation photons created: 10\nTotal scintillation photons created: 99\nPhotons detected at PD (global): 1\nEstimated electrons: 0.8\n";
        let m = OutputParser::new().parse(text).unwrap();
        assert_eq!(m.photons_created, 10);
    }

    #[test]
    fn test_missing_label_rejects_whole_run() {
        let parser = OutputParser::new();

        let no_created = RUN_SUMMARY.replace("Total scintillation photons created", "Total photons");
        assert_eq!(parser.parse(&no_created), Err(ParseError::MissingField(CREATED_LABEL)));

        let no_detected = RUN_SUMMARY.replace("(global)", "(local)");
        assert_eq!(parser.parse(&no_detected), Err(ParseError::MissingField(DETECTED_LABEL)));

        let no_electrons = RUN_SUMMARY.replace("Estimated electrons", "Electrons");
        assert_eq!(parser.parse(&no_electrons), Err(ParseError::MissingField(ELECTRONS_LABEL)));
    }

    #[test]
    fn test_zero_created() {
        let text = "Total scintillation photons created: 0\nPhotons detected at PD (global): 0\nEstimated electrons: 0\n";
        let m = OutputParser::new().parse(text).unwrap();
        assert_eq!(m.detection_efficiency, 0.0);
    }

    #[test]
    fn test_scientific_electrons() {
        let text = "Total scintillation photons created: 5000000\nPhotons detected at PD (global): 2000000\nEstimated electrons: 1.2e+06\n";
        let m = OutputParser::new().parse(text).unwrap();
        assert_eq!(m.electrons, 1.2e6);
    }

    #[test]
    fn test_trailing_period_after_electrons() {
        let text = "Total scintillation photons created: 40\nPhotons detected at PD (global): 10\nEstimated electrons: 7.5.\n";
        let m = OutputParser::new().parse(text).unwrap();
        assert_eq!(m.electrons, 7.5);
        assert_eq!(m.detection_efficiency, 25.0);

        let text = "Total scintillation photons created: 40\nPhotons detected at PD (global): 10\nEstimated electrons: 1.2e+06.\n";
        assert_eq!(OutputParser::new().parse(text).unwrap().electrons, 1.2e6);
    }

    #[test]
    fn test_malformed_electrons() {
        let text = "Total scintillation photons created: 5\nPhotons detected at PD (global): 2\nEstimated electrons: 1.2.3\n";
        let err = OutputParser::new().parse(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                label: ELECTRONS_LABEL,
                value: "1.2.3".to_string()
            }
        );
    }

    #[test]
    fn test_empty_output() {
        assert!(OutputParser::new().parse("").is_err());
    }
}
