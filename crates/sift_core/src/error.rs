use thiserror::Error;

/// Errors that can occur when validating or compiling a detection rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule's secret pattern failed to compile as a regular expression.
    #[error("invalid secret pattern in rule '{name}': {source}")]
    InvalidPattern {
        /// Name of the rule that failed (e.g. `"AWSKey"`).
        name: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A required field was absent or empty in the rule definition.
    #[error("rule '{name}' is missing required field '{field}'")]
    MissingField {
        /// Name of the offending rule; empty when `ruleName` itself is missing.
        name: String,
        /// The field that was absent or empty.
        field: &'static str,
    },
}

impl RuleError {
    /// Returns the name of the rule this error refers to, if one was present.
    #[must_use]
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::InvalidPattern { name, .. } | Self::MissingField { name, .. } => {
                if name.is_empty() { None } else { Some(name) }
            }
        }
    }
}

/// Top-level error type for the sift scanning pipeline.
///
/// Unifies errors from rule compilation, rule-directory loading, corpus
/// discovery, and configuration loading into a single type for callers that
/// orchestrate the full workflow.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A rule failed validation or compilation.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The rules directory could not be read.
    #[error(transparent)]
    Rules(#[from] crate::rule::RulesDirError),

    /// The corpus root could not be traversed.
    #[error(transparent)]
    Corpus(#[from] crate::corpus::CorpusError),

    /// Configuration could not be read, parsed, or written.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
