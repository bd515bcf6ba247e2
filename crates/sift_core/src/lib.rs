//! Core secret scanning engine for sift.
//!
//! This crate matches declarative detection rules against a corpus of source
//! files. Each rule binds a target language, a library context label, and a
//! secret-matching regular expression; the engine reports every location in
//! the corpus where a rule's pattern matches.
//!
//! # Main Types
//!
//! - [`Scanner`] - Applies compiled rules to corpus files and streams detections
//! - [`RuleSet`] - Ordered collection of rules, partitioned by language
//! - [`CorpusIndex`] - Discovered files, classified by extension into languages
//! - [`Detection`] - A single reported match with its location and rule metadata
//! - [`Reporter`] - The sink contract detections are pushed to, one at a time
//! - [`Config`] - Project configuration loaded from `.sift.toml`
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`RuleError`] - Rule validation and pattern compilation failures
//! - [`RulesDirError`] - An unusable rules directory
//! - [`CorpusError`] - An unusable corpus root
//! - [`ConfigError`] - Configuration loading/parsing failures
//! - [`SiftError`] - Top-level error enum combining the above
//!
//! The CLI crate (`sift_cli`) uses `anyhow` for error propagation.
//!
//! A rule that fails to compile never aborts loading; it is excluded from
//! the active set with a diagnostic so the remaining rules stay usable.

/// User configuration loaded from `.sift.toml`.
pub mod config;
/// Corpus discovery and per-language partitioning.
pub mod corpus;
/// Types representing detected secrets and their locations.
pub mod detection;
/// Error types for rule compilation and the scanning pipeline.
pub mod error;
/// The open registry mapping file extensions to language tags.
pub mod language;
/// Common re-exports for internal use.
pub mod prelude;
/// Text file reading and binary content detection.
pub mod read;
/// The sink contract for surfacing detections.
pub mod reporter;
/// Rule definitions, validation, compilation, and directory loading.
pub mod rule;
/// The core matching engine that pairs rules with corpus files.
pub mod scanner;
#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{Config, ConfigError, LanguageConfig};
pub use corpus::{CorpusError, CorpusFile, CorpusIndex, CorpusOptions};
pub use detection::{Detection, Span};
pub use error::{RuleError, SiftError};
pub use language::LanguageRegistry;
pub use read::ReadError;
pub use reporter::{MemoryReporter, Reporter};
pub use rule::{LoadedRules, Rule, RuleDef, RuleSet, RulesDirError, SkipReason, SkippedRule, load_rules};
pub use scanner::{ScanStats, Scanner};

/// Default filename for sift configuration.
pub const CONFIG_FILENAME: &str = ".sift.toml";

/// Default directory name for rule definition files.
pub const RULES_DIRNAME: &str = "rules";
