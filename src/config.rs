//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else `config.toml` in the platform config
//!    directory)
//! 3. Environment variables prefixed `TEXTMATCH_` (e.g. `TEXTMATCH_THREADS=4`)
//! 4. Command-line flags, applied by the caller
//!
//! # Example
//!
//! ```toml
//! threads = 8
//! metric = "simhash"
//! safe_mode = true
//! dedup_threshold = 0.98
//! duplicates_dir = "Duplicates"
//! ```

use std::path::{Component, Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::DEFAULT_DEDUP_THRESHOLD;
use crate::similarity::Metric;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TEXTMATCH_";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value is out of range.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker threads for loading; `None` uses detected parallelism.
    pub threads: Option<usize>,
    /// Similarity metric.
    pub metric: Metric,
    /// Serialize calls into the PDF backend.
    pub safe_mode: bool,
    /// Tokenize raw bytes only, without format extraction.
    pub raw_only: bool,
    /// Minimum score for `--dedup` when no value is given.
    pub dedup_threshold: f64,
    /// Name of the directory duplicates are moved into, under the root.
    pub duplicates_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: None,
            metric: Metric::Tfidf,
            safe_mode: false,
            raw_only: false,
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            duplicates_dir: "Duplicates".to_string(),
        }
    }
}

impl Config {
    /// Build the figment stack: defaults, optional file, environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        let path = file.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(path) = path {
            log::debug!("Configuration file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate the configuration.
    ///
    /// A missing file is not an error; a malformed one is.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a layer fails to parse or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(file).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "textmatch", "textmatch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero threads, a threshold outside
    /// [0, 1] or a duplicates directory that is not a single plain name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid {
                field: "threads",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.dedup_threshold) {
            return Err(ConfigError::Invalid {
                field: "dedup_threshold",
                message: format!("{} is outside [0, 1]", self.dedup_threshold),
            });
        }
        let mut components = Path::new(&self.duplicates_dir).components();
        let single_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_name {
            return Err(ConfigError::Invalid {
                field: "duplicates_dir",
                message: format!("'{}' must be a single directory name", self.duplicates_dir),
            });
        }
        Ok(())
    }
}
