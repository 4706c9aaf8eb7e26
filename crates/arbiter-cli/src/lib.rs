use std::{
    fs,
    path::{Path, PathBuf},
};

use arbiter_core::{Declaration, EvaluatorConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct CliConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse toml at {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to parse declarations at {path}: {source}")]
    ParseDeclarations {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: impl AsRef<Path>) -> Result<CliConfig, CliError> {
    let path = path.as_ref();
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Config from `path` if given, defaults otherwise, then the command-line override.
pub fn resolve_config(
    path: Option<&Path>,
    max_attempts: Option<u32>,
) -> Result<EvaluatorConfig, CliError> {
    let mut config = match path {
        Some(path) => load_config(path)?.evaluator,
        None => EvaluatorConfig::default(),
    };
    if let Some(max_attempts) = max_attempts {
        config.max_attempts = max_attempts;
    }
    Ok(config)
}

/// Declarations are a JSON array, as produced by the scanner.
pub fn load_declarations(path: impl AsRef<Path>) -> Result<Vec<Declaration>, CliError> {
    let path = path.as_ref();
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseDeclarations {
        path: path.to_path_buf(),
        source,
    })
}

/// `RUST_LOG` wins; otherwise `filter`, otherwise [`DEFAULT_LOG_FILTER`].
pub fn init_logging(filter: Option<&str>) -> eyre::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter.unwrap_or(DEFAULT_LOG_FILTER))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialize logger: {e}"))
}
