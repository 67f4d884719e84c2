//! Explorer configuration.
//!
//! Lives in `$XDG_CONFIG_HOME/edge-explorer/config.toml` unless a path is
//! given. A missing default file means built-in defaults; a missing explicit
//! file is an error. Everything is validated once at load, then handed to the
//! core as immutable settings.

use explorer_shared::catalog::{CatalogFile, PerturbationCatalog};
use explorer_shared::error::{CatalogError, RangeError};
use explorer_shared::extractor::{IdeaExtractor, DEFAULT_MARKERS};
use explorer_shared::settings::{GauntletSettings, StageBudgets};
use explorer_shared::ExplorerSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR: &str = "edge-explorer";
const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid range in [gauntlet]: {0}")]
    Range(#[from] RangeError),

    #[error("invalid perturbation catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Model endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-call deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-r1".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    180 // 3 minutes, reasoning models are slow
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Case-insensitive keywords that introduce the idea in a response
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
}

fn default_markers() -> Vec<String> {
    DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            markers: default_markers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Also dump the full run record as JSON
    #[serde(default)]
    pub write_json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("local_outputs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            write_json: false,
        }
    }
}

/// Git publishing of the synthesis commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_push")]
    pub push: bool,
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from("..")
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_push() -> bool {
    true
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repo_dir: default_repo_dir(),
            branch: default_branch(),
            push: default_push(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Optional TOML file replacing the built-in perturbation catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub budgets: StageBudgets,

    #[serde(default)]
    pub gauntlet: GauntletSettings,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl ExplorerConfig {
    /// `$XDG_CONFIG_HOME/edge-explorer/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gauntlet.validate()?;
        if let Some(stage) = self.budgets.first_zero() {
            return Err(ConfigError::Invalid(format!(
                "budgets.{} must be greater than 0",
                stage
            )));
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "model.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.model.endpoint.trim().is_empty() || self.model.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "model.endpoint and model.model must be set".to_string(),
            ));
        }
        if self.extractor.markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "extractor.markers needs at least one non-blank keyword".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings handed to the core.
    pub fn explorer_settings(&self) -> ExplorerSettings {
        ExplorerSettings {
            budgets: self.budgets,
            gauntlet: self.gauntlet,
            timeout_secs: self.model.timeout_secs,
            extractor: IdeaExtractor::new(self.extractor.markers.clone()),
        }
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<PerturbationCatalog, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                let file: CatalogFile =
                    toml::from_str(&content).map_err(|source| ConfigError::Parse {
                        path: path.clone(),
                        source,
                    })?;
                PerturbationCatalog::from_file(file)?
            }
            None => PerturbationCatalog::builtin(),
        };
        self.check_catalog_fits(&catalog)?;
        Ok(catalog)
    }

    /// Perturbation ranges must not ask for more categories than exist.
    fn check_catalog_fits(&self, catalog: &PerturbationCatalog) -> Result<(), ConfigError> {
        let widest = self
            .gauntlet
            .initial_perturbations
            .max
            .max(self.gauntlet.reflection_perturbations.max);
        if widest > catalog.len() {
            return Err(ConfigError::Invalid(format!(
                "perturbation ranges go up to {} but the catalog has {} categories",
                widest,
                catalog.len()
            )));
        }
        Ok(())
    }

    /// API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.model.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config, refusing to overwrite an existing file.
    pub fn save_new(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Invalid(format!(
                "{} already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.to_toml()?).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
