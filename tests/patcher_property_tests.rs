//! Property tests for HeaderPatcher
//!
//! These tests verify, for every thickness in the sweep:
//! - The target line encodes half the thickness in mm with exactly six decimals
//! - Every other line is byte-identical to the input
//! - Patching twice gives the same file as patching once

use csisweep::models::{HeaderConfig, Thickness};
use csisweep::services::{HeaderPatcher, PatchOutcome, thickness_sweep};
use proptest::prelude::*;

const TARGET_LINE: &str = "  G4double fTank_z = 0.250000 *CLHEP::mm;  // 500 um thick CsI\n";

fn patcher() -> HeaderPatcher {
    HeaderPatcher::new(&HeaderConfig::default())
}

fn sweep_thickness() -> impl Strategy<Value = Thickness> {
    (1u32..=20).prop_map(|i| Thickness::from_micrometers(i * 50))
}

/// Lines that never carry the `fTank_z =` token
fn other_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ a-zA-Z0-9_;(){}*/:#.=-]{0,60}",
        Just("    G4double fPD_z = 0.05 *CLHEP::mm;".to_string()),
        Just("  // fTank_z is set by the sweep".to_string()),
        Just(String::new()),
    ]
    .prop_filter("must not be a target line", |line| !line.contains("fTank_z ="))
}

fn header(before: &[String], after: &[String]) -> String {
    let mut text = String::new();
    for line in before {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(TARGET_LINE);
    for line in after {
        text.push_str(line);
        text.push('\n');
    }
    text
}

#[test]
fn test_every_sweep_thickness_formats_six_decimals() {
    let p = patcher();
    for thickness in thickness_sweep() {
        let (patched, outcome) = p.patch_str(TARGET_LINE, thickness);

        let expected = format!(
            "  G4double fTank_z = {:.6} *CLHEP::mm;  // {} um thick CsI\n",
            f64::from(thickness.micrometers()) / 2000.0,
            thickness.micrometers()
        );
        assert_eq!(patched, expected);
        assert_eq!(outcome, PatchOutcome::Replaced { line: 1 });
    }
}

#[test]
fn test_known_half_lengths() {
    let p = patcher();
    for (um, half) in [(50, "0.025000"), (150, "0.075000"), (350, "0.175000"), (1000, "0.500000")] {
        let line = p.format_line(Thickness::from_micrometers(um));
        assert!(line.contains(&format!("= {} *CLHEP::mm;", half)), "{}", line);
    }
}

proptest! {
    #[test]
    fn prop_other_lines_untouched(
        before in prop::collection::vec(other_line(), 0..8),
        after in prop::collection::vec(other_line(), 0..8),
        thickness in sweep_thickness(),
    ) {
        let input = header(&before, &after);
        let (patched, outcome) = patcher().patch_str(&input, thickness);

        prop_assert_eq!(outcome, PatchOutcome::Replaced { line: before.len() + 1 });

        let input_lines: Vec<&str> = input.split_inclusive('\n').collect();
        let patched_lines: Vec<&str> = patched.split_inclusive('\n').collect();
        prop_assert_eq!(input_lines.len(), patched_lines.len());

        for (idx, (a, b)) in input_lines.iter().zip(&patched_lines).enumerate() {
            if idx == before.len() {
                prop_assert_eq!(*b, format!("{}\n", patcher().format_line(thickness)));
            } else {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn prop_patch_is_idempotent(
        before in prop::collection::vec(other_line(), 0..8),
        after in prop::collection::vec(other_line(), 0..8),
        thickness in sweep_thickness(),
    ) {
        let input = header(&before, &after);
        let p = patcher();

        let (once, _) = p.patch_str(&input, thickness);
        let (twice, _) = p.patch_str(&once, thickness);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_no_target_means_identity(
        lines in prop::collection::vec(other_line(), 0..12),
        thickness in sweep_thickness(),
    ) {
        let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
        let (patched, outcome) = patcher().patch_str(&input, thickness);

        prop_assert_eq!(outcome, PatchOutcome::NoMatch);
        prop_assert_eq!(patched, input);
    }
}
