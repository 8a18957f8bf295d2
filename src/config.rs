//! Runtime configuration
//!
//! Resolves the unit vocabulary and diagnostics settings from the
//! environment. Vocabulary problems are fatal and surface before any
//! record is processed.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::Engine;
use crate::measure::{Vocabulary, VocabularyConfig, VocabularyError};

/// Path to a JSON vocabulary file; the built-in tables are used when unset
pub const VOCABULARY_PATH_ENV: &str = "BARTINDR_VOCABULARY_PATH";
/// `1`, `true` or `yes` turns on verbose unit-resolution logging
pub const VERBOSE_ENV: &str = "BARTINDR_VERBOSE";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read vocabulary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vocabulary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inconsistent vocabulary: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub vocabulary_path: Option<PathBuf>,
    pub verbose: bool,
}

impl EngineConfig {
    /// Read settings from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vocabulary_path = lookup(VOCABULARY_PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let verbose = match lookup(VERBOSE_ENV) {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                name: VERBOSE_ENV,
                value,
            })?,
        };

        Ok(Self {
            vocabulary_path,
            verbose,
        })
    }

    /// Load and validate the vocabulary this configuration points at
    pub fn load_vocabulary(&self) -> ConfigResult<Vocabulary> {
        match &self.vocabulary_path {
            Some(path) => load_vocabulary_file(path),
            None => Ok(Vocabulary::standard()),
        }
    }

    /// Human-readable origin of the vocabulary
    pub fn vocabulary_source(&self) -> String {
        match &self.vocabulary_path {
            Some(path) => path.display().to_string(),
            None => "built-in".to_string(),
        }
    }

    /// Build a ready engine, failing fast on a bad vocabulary
    pub fn build_engine(&self) -> ConfigResult<Engine> {
        let vocab = self.load_vocabulary()?;
        Ok(Engine::new(vocab).with_verbose(self.verbose))
    }
}

/// Read a JSON vocabulary file and validate it
pub fn load_vocabulary_file<P: AsRef<Path>>(path: P) -> ConfigResult<Vocabulary> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: VocabularyConfig = serde_json::from_str(&text)?;
    let vocab = Vocabulary::from_config(&config)?;
    tracing::info!("Loaded unit vocabulary from {}", path.display());
    Ok(vocab)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
