use crate::config::ConfigManager;
use crate::models::SweepConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Captured result of one external process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Errors that keep a process from producing any output
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {duration:?}")]
    Timeout { program: String, duration: Duration },
}

/// Rebuilds and runs the simulator
///
/// Implementations must run each step to completion before returning.
#[allow(async_fn_in_trait)]
pub trait SimulationDriver {
    async fn build(&self) -> Result<ProcessOutput, SimulationError>;

    async fn run(&self) -> Result<ProcessOutput, SimulationError>;
}

/// Program, arguments and working directory of one external step
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Utf8PathBuf,
}

impl ProcessSpec {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// [`SimulationDriver`] backed by real processes via `tokio::process`
///
/// Both steps inherit the parent environment and run in the project directory.
#[derive(Debug, Clone)]
pub struct CommandDriver {
    build: ProcessSpec,
    simulate: ProcessSpec,
    timeout: Option<Duration>,
}

impl CommandDriver {
    pub fn new(build: ProcessSpec, simulate: ProcessSpec, timeout: Option<Duration>) -> Self {
        Self {
            build,
            simulate,
            timeout,
        }
    }

    /// Build the driver from the sweep configuration
    pub fn from_config(config: &SweepConfig, manager: &ConfigManager) -> Self {
        let working_dir = manager.project_dir().to_path_buf();

        let build = ProcessSpec {
            program: config.build.program.clone(),
            args: config.build.args.clone(),
            working_dir: working_dir.clone(),
        };

        let simulate = ProcessSpec {
            program: manager.resolve(&config.simulator.executable).into_string(),
            args: vec![config.simulator.macro_file.to_string()],
            working_dir,
        };

        Self::new(
            build,
            simulate,
            config.process_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn build_spec(&self) -> &ProcessSpec {
        &self.build
    }

    pub fn simulate_spec(&self) -> &ProcessSpec {
        &self.simulate
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl SimulationDriver for CommandDriver {
    async fn build(&self) -> Result<ProcessOutput, SimulationError> {
        execute(&self.build, self.timeout).await
    }

    async fn run(&self) -> Result<ProcessOutput, SimulationError> {
        execute(&self.simulate, self.timeout).await
    }
}

/// Run a process to completion, capturing stdout and stderr as text
pub async fn execute(
    spec: &ProcessSpec,
    timeout_duration: Option<Duration>,
) -> Result<ProcessOutput, SimulationError> {
    tracing::debug!("Executing: {} (in {})", spec.command_line(), spec.working_dir);

    let start = Instant::now();

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(working_dir(&spec.working_dir))
        .kill_on_drop(true);

    let pending = cmd.output();

    let result = match timeout_duration {
        Some(limit) => timeout(limit, pending).await.map_err(|_| {
            tracing::warn!("{} timed out after {:?}", spec.program, limit);
            SimulationError::Timeout {
                program: spec.program.clone(),
                duration: limit,
            }
        })?,
        None => pending.await,
    };

    let output = result.map_err(|source| SimulationError::Spawn {
        program: spec.program.clone(),
        source,
    })?;

    let duration = start.elapsed();
    let exit_code = output.status.code();

    tracing::debug!(
        "{} completed in {:.2}s with exit code {:?}",
        spec.program,
        duration.as_secs_f32(),
        exit_code
    );

    Ok(ProcessOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration,
    })
}

fn working_dir(dir: &Utf8Path) -> &Utf8Path {
    if dir.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        dir
    }
}
