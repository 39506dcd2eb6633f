use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Sweep the CsI absorber thickness of the OpNovice2 simulation and find the photoelectron optimum."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Geant4 project directory (holds include/, build/ and run.mac)
    #[arg(short = 'C', long, global = true, value_name = "DIR", default_value = ".")]
    pub project_dir: Utf8PathBuf,

    /// Sweep configuration file, relative to the project directory
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory for rotating log files, relative to the project directory
    #[arg(long, global = true, value_name = "DIR", default_value = "logs")]
    pub log_dir: Utf8PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch, rebuild and run the simulator for every thickness, then report.
    Run(RunArgs),
    /// Re-render the figure and summary from a saved results file.
    Report(ReportArgs),
    /// Write the default sweep configuration file.
    InitConfig(InitConfigArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Do not try to open the figure in an image viewer
    #[arg(long)]
    pub no_display: bool,

    /// Override the figure path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Also save the recorded points as YAML
    #[arg(long, value_name = "PATH")]
    pub results: Option<Utf8PathBuf>,

    /// Kill the build or the simulator after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Results file written by `run --results`
    #[arg(value_name = "RESULTS")]
    pub results: Utf8PathBuf,

    /// Do not try to open the figure in an image viewer
    #[arg(long)]
    pub no_display: bool,

    /// Override the figure path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

/// Arguments for the `init-config` subcommand.
#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "csisweep",
            "-v",
            "-C",
            "/work/OpNovice2",
            "run",
            "--no-display",
            "--results",
            "sweep.yaml",
            "--timeout",
            "3600",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.project_dir, "/work/OpNovice2");
        match cli.command {
            Commands::Run(args) => {
                assert!(args.no_display);
                assert_eq!(args.results.as_deref(), Some(Utf8Path::new("sweep.yaml")));
                assert_eq!(args.timeout, Some(3600));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["csisweep", "-q", "-v", "run"]).is_err());
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::try_parse_from(["csisweep", "report", "results.yaml", "-o", "re.png"]).unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.results, "results.yaml");
                assert_eq!(args.output.as_deref(), Some(Utf8Path::new("re.png")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
