use crate::models::{HeaderConfig, Thickness};
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;

/// What happened to the header during a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The thickness line was rewritten (1-based line number)
    Replaced { line: usize },

    /// No line carried both tokens; the file was written back unchanged
    NoMatch,
}

/// Rewrites the absorber half-length constant in the detector header
///
/// The target is the first line containing both `"<field_name> ="` and the unit
/// token. It is replaced with
///
/// ```text
///   G4double fTank_z = 0.075000 *CLHEP::mm;  // 150 um thick CsI
/// ```
///
/// keeping the original line terminator. Every other line is copied byte for byte.
#[derive(Debug, Clone)]
pub struct HeaderPatcher {
    field_type: String,
    field_name: String,
    unit: String,
    material: String,
    assignment_token: String,
}

impl HeaderPatcher {
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            field_type: config.field_type.clone(),
            field_name: config.field_name.clone(),
            unit: config.unit.clone(),
            material: config.material.clone(),
            assignment_token: format!("{} =", config.field_name),
        }
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Render the thickness line, without a line terminator
    pub fn format_line(&self, thickness: Thickness) -> String {
        let declaration = if self.field_type.is_empty() {
            self.field_name.clone()
        } else {
            format!("{} {}", self.field_type, self.field_name)
        };

        format!(
            "  {} = {:.6} *{};  // {} um thick {}",
            declaration,
            thickness.half_length_mm(),
            self.unit,
            thickness.micrometers(),
            self.material
        )
    }

    pub fn is_target_line(&self, line: &str) -> bool {
        line.contains(&self.assignment_token) && line.contains(&self.unit)
    }

    /// Patch header text in memory
    pub fn patch_str(&self, contents: &str, thickness: Thickness) -> (String, PatchOutcome) {
        let mut patched = String::with_capacity(contents.len() + 64);
        let mut outcome = PatchOutcome::NoMatch;

        for (idx, line) in contents.split_inclusive('\n').enumerate() {
            if outcome == PatchOutcome::NoMatch && self.is_target_line(line) {
                let body_len = line.trim_end_matches(['\r', '\n']).len();
                patched.push_str(&self.format_line(thickness));
                patched.push_str(&line[body_len..]);
                outcome = PatchOutcome::Replaced { line: idx + 1 };
            } else {
                patched.push_str(line);
            }
        }

        (patched, outcome)
    }

    /// Read the whole header, patch it, and write the whole file back.
    ///
    /// The write happens even when nothing matched.
    pub fn patch_file(&self, path: &Utf8Path, thickness: Thickness) -> Result<PatchOutcome> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read detector header: {}", path))?;

        let (patched, outcome) = self.patch_str(&contents, thickness);

        fs::write(path, patched)
            .with_context(|| format!("Failed to write detector header: {}", path))?;

        match outcome {
            PatchOutcome::Replaced { line } => tracing::debug!(
                "Set {} to {:.6} {} at {}:{}",
                self.field_name,
                thickness.half_length_mm(),
                self.unit,
                path,
                line
            ),
            PatchOutcome::NoMatch => tracing::warn!(
                "No line with '{}' and '{}' in {}; build will use the previous thickness",
                self.assignment_token,
                self.unit,
                path
            ),
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
#ifndef DetectorConstruction_h
#define DetectorConstruction_h 1

class DetectorConstruction
{
  private:
    G4double fExpHall_x = 1.0 *CLHEP::m;
  G4double fTank_z = 0.250000 *CLHEP::mm;  // 500 um thick CsI
    G4double fPD_z = 0.05 *CLHEP::mm;
};
#endif
";

    fn patcher() -> HeaderPatcher {
        HeaderPatcher::new(&HeaderConfig::default())
    }

    #[test]
    fn test_format_line() {
        let line = patcher().format_line(Thickness::from_micrometers(150));
        assert_eq!(
            line,
            "  G4double fTank_z = 0.075000 *CLHEP::mm;  // 150 um thick CsI"
        );
    }

    #[test]
    fn test_format_line_without_type() {
        let config = HeaderConfig {
            field_type: String::new(),
            ..HeaderConfig::default()
        };
        let line = HeaderPatcher::new(&config).format_line(Thickness::from_micrometers(1000));
        assert_eq!(line, "  fTank_z = 0.500000 *CLHEP::mm;  // 1000 um thick CsI");
    }

    #[test]
    fn test_target_line_needs_both_tokens() {
        let p = patcher();
        assert!(p.is_target_line("  G4double fTank_z = 0.1 *CLHEP::mm;"));
        assert!(!p.is_target_line("  G4double fTank_z = 0.1 *CLHEP::m;"));
        assert!(!p.is_target_line("  G4double fTank_x = 0.1 *CLHEP::mm;"));
        assert!(!p.is_target_line("  // fTank_z in CLHEP::mm"));
    }

    #[test]
    fn test_patch_replaces_only_target() {
        let (patched, outcome) = patcher().patch_str(HEADER, Thickness::from_micrometers(50));

        assert_eq!(outcome, PatchOutcome::Replaced { line: 8 });
        let lines: Vec<&str> = patched.lines().collect();
        assert_eq!(
            lines[7],
            "  G4double fTank_z = 0.025000 *CLHEP::mm;  // 50 um thick CsI"
        );

        for (before, after) in HEADER.lines().zip(patched.lines()).filter(|(b, _)| !b.contains("fTank_z")) {
            assert_eq!(before, after);
        }
        assert_eq!(HEADER.lines().count(), patched.lines().count());
    }

    #[test]
    fn test_patch_only_first_match() {
        let contents = "  G4double fTank_z = 1 *CLHEP::mm;\n  G4double fTank_z = 2 *CLHEP::mm;\n";
        let (patched, outcome) = patcher().patch_str(contents, Thickness::from_micrometers(100));

        assert_eq!(outcome, PatchOutcome::Replaced { line: 1 });
        assert!(patched.ends_with("  G4double fTank_z = 2 *CLHEP::mm;\n"));
    }

    #[test]
    fn test_patch_keeps_crlf() {
        let contents = "// header\r\n  G4double fTank_z = 1 *CLHEP::mm;\r\n};\r\n";
        let (patched, _) = patcher().patch_str(contents, Thickness::from_micrometers(200));

        assert_eq!(
            patched,
            "// header\r\n  G4double fTank_z = 0.100000 *CLHEP::mm;  // 200 um thick CsI\r\n};\r\n"
        );
    }

    #[test]
    fn test_patch_last_line_without_newline() {
        let contents = "x\n  G4double fTank_z = 1 *CLHEP::mm;";
        let (patched, _) = patcher().patch_str(contents, Thickness::from_micrometers(300));
        assert_eq!(
            patched,
            "x\n  G4double fTank_z = 0.150000 *CLHEP::mm;  // 300 um thick CsI"
        );
    }

    #[test]
    fn test_patch_no_match_is_identity() {
        let contents = "int main() {}\n  G4double fPD_z = 1 *CLHEP::mm;\n";
        let (patched, outcome) = patcher().patch_str(contents, Thickness::from_micrometers(50));

        assert_eq!(outcome, PatchOutcome::NoMatch);
        assert_eq!(patched, contents);
    }

    #[test]
    fn test_patch_file_rewrites_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = camino::Utf8PathBuf::try_from(dir.path().join("DetectorConstruction.hh")).unwrap();
        fs::write(&path, HEADER).unwrap();

        let outcome = patcher()
            .patch_file(&path, Thickness::from_micrometers(750))
            .unwrap();

        assert_eq!(outcome, PatchOutcome::Replaced { line: 8 });
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("  G4double fTank_z = 0.375000 *CLHEP::mm;  // 750 um thick CsI\n"));
    }

    #[test]
    fn test_patch_file_missing_header_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = camino::Utf8PathBuf::try_from(dir.path().join("missing.hh")).unwrap();

        let err = patcher()
            .patch_file(&path, Thickness::from_micrometers(50))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read detector header"));
    }
}
