//! Configuration loading for postfind.

use std::path::PathBuf;
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;
use tracing::debug;

use crate::excerpt::DEFAULT_MAX_LENGTH;
use crate::search::DEFAULT_SEARCH_LIMIT;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "POSTFIND_CONFIG";

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub excerpt: ExcerptConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the post corpus lives.
#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    /// Directory containing manifest.json.
    #[serde(default = "default_corpus_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExcerptConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

/// Interactive session settings.
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Delay before a typed query is searched, restarted on every keystroke.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_corpus_path() -> String {
    "./content".to_string()
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_debounce_ms() -> u64 {
    150
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl CorpusConfig {
    /// Corpus directory with `~` expanded.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        expand_tilde(&self.path)
    }
}

impl Config {
    /// Load config from `$POSTFIND_CONFIG` or ~/.config/postfind/config.toml,
    /// or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        Ok(Config::default())
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "postfind").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}
