//! Configuration management for relnotes.
//!
//! Parses `relnotes.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [repo]
//! name = "firebase/firebase-ios-sdk"   # optional, defaults to the git remote
//! remote = "origin"
//!
//! [products]
//! "Firestore/CHANGELOG.md" = "{{firestore}}"
//! "Firebase/Core/CHANGELOG.md" = false
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `repo.name` and `repo.remote` support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "relnotes.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the local repository (`owner/repo`).
    pub repo: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Repository configuration.
    pub repo: RepoConfig,
    /// Heading to use per changelog, keyed by changelog path.
    pub products: BTreeMap<String, ProductHeading>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Repository configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Local GitHub repository as `owner/repo`. Looked up from git when unset.
    pub name: Option<String>,
    /// Git remote whose URL names the repository.
    pub remote: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            name: None,
            remote: "origin".to_owned(),
        }
    }
}

/// Release notes heading for one product's changelog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawProductHeading")]
pub enum ProductHeading {
    /// Replace the section heading with this token, e.g. `{{firestore}}`.
    Token(String),
    /// Drop the section heading.
    Suppressed,
}

/// Product heading as written in TOML: a token string or `false`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductHeading {
    Token(String),
    Flag(bool),
}

impl TryFrom<RawProductHeading> for ProductHeading {
    type Error = String;

    fn try_from(raw: RawProductHeading) -> Result<Self, Self::Error> {
        match raw {
            RawProductHeading::Token(token) if token.trim().is_empty() => {
                Err("product heading token cannot be empty".to_owned())
            }
            RawProductHeading::Token(token) => Ok(Self::Token(token)),
            RawProductHeading::Flag(false) => Ok(Self::Suppressed),
            RawProductHeading::Flag(true) => Err(
                "product heading must be a token string, or false to suppress the heading"
                    .to_owned(),
            ),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`repo.name`").
        field: String,
        /// Error message (e.g., "${`RELNOTES_REPO`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a repository to be written as `owner/repo`.
fn require_repo_slug(value: &str, field: &str) -> Result<(), ConfigError> {
    let valid = value
        .split_once('/')
        .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'));
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must have the form owner/repo, got '{value}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `relnotes.toml` in the current directory and
    /// its parents, falling back to defaults when none exists.
    ///
    /// CLI settings are applied after loading and take precedence over config
    /// file values. The result is validated after they are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(repo) = &settings.repo {
            self.repo.name = Some(repo.clone());
        }
    }

    /// Heading configured for a changelog.
    ///
    /// A `[products]` key applies when `changelog` ends with the key's path
    /// components, so `Firestore/CHANGELOG.md` matches
    /// `./Firestore/CHANGELOG.md` and `/src/sdk/Firestore/CHANGELOG.md`. When
    /// several keys apply, the one with the most components wins.
    #[must_use]
    pub fn product_for(&self, changelog: &Path) -> Option<&ProductHeading> {
        self.products
            .iter()
            .filter(|(key, _)| changelog.ends_with(Path::new(key.as_str())))
            .max_by_key(|(key, _)| Path::new(key.as_str()).components().count())
            .map(|(_, heading)| heading)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            products = config.products.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.repo.remote, "repo.remote")?;
        if let Some(name) = &self.repo.name {
            require_repo_slug(name, "repo.name")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref name) = self.repo.name {
            self.repo.name = Some(expand::expand_env(name, "repo.name")?);
        }
        self.repo.remote = expand::expand_env(&self.repo.remote, "repo.remote")?;
        Ok(())
    }
}
