//! Project configuration loaded from `.sift.toml`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::language::LanguageRegistry;

/// An extra language mapping declared in configuration.
///
/// Merged into the built-in registry at startup; a mapping that claims an
/// already-known extension overrides the built-in owner of that extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Language tag (e.g. `"Kotlin"`).
    pub tag: String,
    /// File extensions claimed by the tag, without leading dots.
    pub extensions: Vec<String>,
}

/// Project-level configuration.
///
/// All fields are optional and default to permissive values: rules in
/// `./rules`, no excludes, no size limit, gitignore honoured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory containing rule definition files.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,

    /// Glob patterns for paths excluded from scanning.
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Maximum file size in bytes. Files larger than this are skipped.
    #[serde(default)]
    pub max_file_size: Option<u64>,

    /// Honour `.gitignore` rules when walking the corpus.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Additional language mappings merged into the built-in registry.
    #[serde(default)]
    pub languages: Vec<LanguageConfig>,
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from(crate::RULES_DIRNAME)
}

const fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            exclude_paths: Vec::new(),
            max_file_size: None,
            respect_gitignore: true,
            languages: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a default configuration with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a `.sift.toml` file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: Box::new(source),
        })
    }

    /// Atomically writes this configuration to a `.sift.toml` file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        atomic_write(path, &content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialises this configuration to a pretty-printed TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::Serialize { source })
    }

    /// Builds the language registry for this configuration: the built-in
    /// mappings extended by the configured ones.
    #[must_use]
    pub fn language_registry(&self) -> LanguageRegistry {
        let mut registry = LanguageRegistry::builtin();

        for mapping in &self.languages {
            registry.register(&mapping.tag, &mapping.extensions);
        }

        registry
    }
}

/// Writes `content` to `path` atomically by writing to a temporary file
/// first, syncing to disk, then renaming into place.
fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;

    // Ensure data is persisted to disk before rename
    file.sync_all()?;

    // Drop file handle before rename (Windows compatibility)
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Errors that can occur when reading, parsing, serialising, or writing
/// a `.sift.toml` configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path to the config file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML or unexpected values.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path to the config file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML deserialization error.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// The in-memory configuration could not be serialised to TOML.
    #[error("failed to serialise config: {source}")]
    Serialize {
        /// The underlying TOML serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// The config file could not be written to disk.
    #[error("failed to write config '{path}': {source}")]
    Write {
        /// Path to the config file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
