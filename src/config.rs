//! Layered configuration.
//!
//! Sources, later ones winning:
//! - Default values
//! - `.docdex/settings.toml`, found by walking up from the current
//!   directory, or an explicit file passed with `--config`
//! - Environment variables
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCDEX_` and use double
//! underscores to separate nested levels:
//! - `DOCDEX_SEARCH__DEFAULT_LIMIT=50` sets `search.default_limit`
//! - `DOCDEX_INDEX__SOURCE=docs/_build/html/searchindex.js` sets `index.source`
//! - `DOCDEX_LOGGING__DEFAULT=debug` sets `logging.default`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::search::{DEFAULT_STOPWORDS, QueryConfig, ScorerWeights};

/// Directory holding settings and the persisted index.
pub const CONFIG_DIR: &str = ".docdex";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "DOCDEX_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory containing `.docdex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IndexConfig {
    /// Where the persisted index lives, relative to the workspace root
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    /// `searchindex.js` used when a command gets no `--source`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of hits shown when `--limit` is not given
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Words ignored for full-text search
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Edit distance for fuzzy lookup of short names (long names allow 2)
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_distance: u8,

    #[serde(default)]
    pub scorer: ScorerWeights,
}

/// Log levels: `default` applies everywhere, `modules` overrides per target
/// (`index`, `storage`, `search`, `cli`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub default: String,

    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 { 1 }
fn default_index_path() -> PathBuf { PathBuf::from(".docdex/index") }
fn default_limit() -> usize { 10 }
fn default_fuzzy_distance() -> u8 { 1 }
fn default_log_level() -> String { "warn".to_string() }
fn default_stopwords() -> Vec<String> {
    DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            index: IndexConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            source: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            stopwords: default_stopwords(),
            fuzzy_distance: default_fuzzy_distance(),
            scorer: ScorerWeights::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl SearchConfig {
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            stopwords: self.stopwords.clone(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let path = path.as_ref();
        Self::figment(path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = path
                        .parent()
                        .filter(|dir| dir.ends_with(CONFIG_DIR))
                        .and_then(Path::parent)
                        .map(Path::to_path_buf);
                }
                settings
            })
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nesting levels; single underscores
            // stay part of the field name.
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.docdex/settings.toml` from the current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Get the workspace root directory (where .docdex is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Persisted index directory, anchored at the workspace root when relative.
    pub fn index_dir(&self) -> PathBuf {
        self.resolve(&self.index.path)
    }

    /// Configured source file, anchored like [`Settings::index_dir`].
    pub fn index_source(&self) -> Option<PathBuf> {
        self.index.source.as_deref().map(|path| self.resolve(path))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = Path::new(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        // The workspace root is derived on load; keep the file relocatable.
        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
