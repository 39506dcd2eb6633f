//! csisweep - CsI thickness sweep for the OpNovice2 Geant4 simulation
//!
//! Main entry point for the command-line tool.
//!
//! # Execution Flow (`run`)
//!
//! 1. Initialize logging → `<project>/logs/csisweep.<date>` plus console
//! 2. Load `sweep.yaml` (defaults when missing, `CSISWEEP__*` overrides)
//! 3. For 50, 100, ..., 1000 μm: patch the header, rebuild, run, parse
//! 4. Render the figure, optionally save results, print the summary
//!
//! Everything runs on a current-thread tokio runtime; each external process is
//! awaited to completion before the next step starts.

use anyhow::{Context, Result, bail};
use clap::Parser;
use csisweep::cli::{Cli, Commands, InitConfigArgs, ReportArgs, RunArgs};
use csisweep::models::SweepConfig;
use csisweep::report::export::load_results;
use csisweep::report::{Report, ReportGenerator};
use csisweep::{
    APP_NAME, CommandDriver, ConfigManager, HeaderPatcher, SweepRunner, VERSION, thickness_sweep,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = config_manager(&cli)?;

    let _guard = csisweep::logging::setup_logging(
        &manager.resolve(&cli.log_dir),
        APP_NAME,
        csisweep::logging::level_directive(cli.verbose, cli.quiet),
        true,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    match cli.command {
        Commands::Run(args) => runtime.block_on(run_sweep(&manager, args)),
        Commands::Report(args) => runtime.block_on(rerender(&manager, args)),
        Commands::InitConfig(args) => init_config(&manager, args),
    }
}

fn config_manager(cli: &Cli) -> Result<ConfigManager> {
    let manager = ConfigManager::new(&cli.project_dir)?;
    Ok(match &cli.config {
        Some(path) => manager.with_config_path(path),
        None => manager,
    })
}

/// Load the config and resolve every path against the project directory
fn load_config(manager: &ConfigManager) -> Result<SweepConfig> {
    let mut config = manager.load()?;
    config.header.path = manager.resolve(&config.header.path);
    config.report.figure = manager.resolve(&config.report.figure);
    config.report.results_file = config.report.results_file.map(|p| manager.resolve(&p));
    Ok(config)
}

async fn run_sweep(manager: &ConfigManager, args: RunArgs) -> Result<()> {
    let mut config = load_config(manager)?;

    if let Some(output) = args.output {
        config.report.figure = manager.resolve(&output);
    }
    if let Some(results) = args.results {
        config.report.results_file = Some(manager.resolve(&results));
    }
    if args.timeout.is_some() {
        config.process_timeout_secs = args.timeout;
    }
    if args.no_display {
        config.report.display_figure = false;
    }

    let driver = CommandDriver::from_config(&config, manager);
    tracing::info!(
        "Build: {} | Run: {}",
        driver.build_spec().command_line(),
        driver.simulate_spec().command_line()
    );

    let runner = SweepRunner::new(
        driver,
        HeaderPatcher::new(&config.header),
        &config.header.path,
    );

    let results = runner.run(thickness_sweep()).await?;
    runner.metrics().log_summary();

    let generator = ReportGenerator::new(config.header.material.as_str(), &config.report);
    finish(generator.generate(&results).await)
}

async fn rerender(manager: &ConfigManager, args: ReportArgs) -> Result<()> {
    let mut config = load_config(manager)?;

    if let Some(output) = args.output {
        config.report.figure = manager.resolve(&output);
    }
    if args.no_display {
        config.report.display_figure = false;
    }
    // never overwrite the file we are reading from
    config.report.results_file = None;

    let results = load_results(&manager.resolve(&args.results))?;
    tracing::info!("Loaded {} sweep points", results.len());

    let generator = ReportGenerator::new(config.header.material.as_str(), &config.report);
    finish(generator.generate(&results).await)
}

/// Print the summary block; a figure that failed to render fails the command
fn finish(report: Report) -> Result<()> {
    println!();
    print!("{}", report.summary);

    match report.figure_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn init_config(manager: &ConfigManager, args: InitConfigArgs) -> Result<()> {
    if manager.config_path().exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            manager.config_path()
        );
    }

    manager.save(&SweepConfig::default())?;
    println!("Wrote {}", manager.config_path());
    Ok(())
}
