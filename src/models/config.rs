use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Sweep configuration from `sweep.yaml`
///
/// Every section falls back to the OpNovice2 project layout when a key is missing,
/// so an empty file (or no file at all) describes the stock setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub header: HeaderConfig,
    pub build: BuildConfig,
    pub simulator: SimulatorConfig,
    pub report: ReportConfig,

    /// Per-process timeout in seconds. Unset means wait forever.
    pub process_timeout_secs: Option<u64>,
}

/// Location and shape of the thickness line in the detector header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub path: Utf8PathBuf,

    /// C++ type written in front of the field (may be empty)
    pub field_type: String,

    /// Field holding the absorber half-length
    pub field_name: String,

    /// Unit token that must appear on the target line
    pub unit: String,

    /// Material named in the trailing comment
    pub material: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from("include/DetectorConstruction.hh"),
            field_type: "G4double".to_string(),
            field_name: "fTank_z".to_string(),
            unit: "CLHEP::mm".to_string(),
            material: "CsI".to_string(),
        }
    }
}

/// Build command run after every header change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "cmake".to_string(),
            args: vec![
                "--build".to_string(),
                "build".to_string(),
                "--config".to_string(),
                "Release".to_string(),
            ],
        }
    }
}

/// Simulator executable and the macro it is driven with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub executable: Utf8PathBuf,
    pub macro_file: Utf8PathBuf,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let executable = if cfg!(target_os = "windows") {
            "build/Release/OpNovice2.exe"
        } else {
            "build/OpNovice2"
        };

        Self {
            executable: Utf8PathBuf::from(executable),
            macro_file: Utf8PathBuf::from("run.mac"),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// PNG written after the sweep
    pub figure: Utf8PathBuf,

    /// Try to open the figure in the desktop image viewer
    pub display_figure: bool,

    /// Optional YAML dump of the recorded points
    pub results_file: Option<Utf8PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            figure: Utf8PathBuf::from("csi_thickness_optimization.png"),
            display_figure: true,
            results_file: None,
        }
    }
}
