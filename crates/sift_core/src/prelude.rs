//! Convenience re-exports of the most commonly used types.

pub use crate::config::{Config, ConfigError, LanguageConfig};
pub use crate::corpus::{CorpusError, CorpusFile, CorpusIndex, CorpusOptions};
pub use crate::detection::{Detection, Span};
pub use crate::error::{RuleError, SiftError};
pub use crate::language::LanguageRegistry;
pub use crate::read::ReadError;
pub use crate::reporter::{MemoryReporter, Reporter};
pub use crate::rule::{LoadedRules, Rule, RuleDef, RuleSet, RulesDirError, SkipReason, SkippedRule, load_rules};
pub use crate::scanner::{ScanStats, Scanner};
