use crate::models::SweepConfig;
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Default configuration file name, looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "sweep.yaml";

/// Prefix for environment overrides, e.g. `CSISWEEP__REPORT__DISPLAY_FIGURE=false`
pub const ENV_PREFIX: &str = "CSISWEEP";

/// Configuration manager for the sweep settings.
///
/// Owns the project directory (the Geant4 source tree the sweep runs in) and the
/// location of `sweep.yaml`. Relative paths from the configuration are resolved
/// against the project directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    project_dir: Utf8PathBuf,
    config_path: Utf8PathBuf,

    /// Overrides read instead of the process environment when set
    env_vars: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at `project_dir`.
    ///
    /// # Errors
    /// Fails if the project directory does not exist.
    pub fn new<P: AsRef<Utf8Path>>(project_dir: P) -> Result<Self> {
        let project_dir = project_dir.as_ref().to_path_buf();

        if !project_dir.is_dir() {
            bail!("Project directory not found: {}", project_dir);
        }

        Ok(Self {
            config_path: project_dir.join(CONFIG_FILE_NAME),
            project_dir,
            env_vars: None,
        })
    }

    /// Use a configuration file other than `<project>/sweep.yaml`.
    pub fn with_config_path<P: AsRef<Utf8Path>>(mut self, config_path: P) -> Self {
        self.config_path = self.resolve(config_path.as_ref());
        self
    }

    /// Take `CSISWEEP__*` overrides from `vars` instead of the process environment.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn environment(&self) -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("build.args")
            .source(self.env_vars.clone())
    }

    /// Load the sweep configuration.
    ///
    /// Layers, lowest priority first: built-in defaults, the YAML file (optional),
    /// `CSISWEEP__SECTION__KEY` environment variables. `CSISWEEP__BUILD__ARGS` is
    /// split on spaces.
    pub fn load(&self) -> Result<SweepConfig> {
        let file_exists = self.config_path.exists();
        if !file_exists {
            tracing::warn!(
                "Sweep config file not found at {}, using defaults",
                self.config_path
            );
        }

        let layered = config::Config::builder()
            .add_source(
                config::File::new(self.config_path.as_str(), config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(self.environment())
            .build()
            .with_context(|| format!("Failed to read sweep config: {}", self.config_path))?;

        let config: SweepConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse sweep config: {}", self.config_path))?;

        if file_exists {
            tracing::info!("Loaded sweep config from {}", self.config_path);
        }
        Ok(config)
    }

    /// Save the sweep configuration as YAML.
    pub fn save(&self, config: &SweepConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize sweep config to YAML")?;

        fs::write(&self.config_path, yaml_string)
            .with_context(|| format!("Failed to write sweep config: {}", self.config_path))?;

        tracing::info!("Saved sweep config to {}", self.config_path);
        Ok(())
    }

    /// Resolve a configured path against the project directory.
    pub fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    pub fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }
}
