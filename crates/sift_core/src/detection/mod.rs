//! Types representing detected secrets.
//!
//! The central type is [`Detection`], which carries everything a reporting
//! sink needs: the rule that matched, the language partition, the file, the
//! offending substring, and its exact location.

mod span;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use span::Span;

/// A single reported match of a rule's pattern within a corpus file.
///
/// Detections are value objects: produced by the matching engine, handed to
/// the reporter once, and not retained by the engine afterwards.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Name of the rule that matched.
    pub rule_name: Arc<str>,
    /// Language partition the match came from.
    pub language: Arc<str>,
    /// Library context label carried from the rule. Diagnostic only.
    pub library: Box<str>,
    /// The file the match was found in.
    pub path: Box<Path>,
    /// The substring that satisfied the rule's pattern.
    pub matched_text: Box<str>,
    /// Line, column, and byte offsets of the match.
    pub span: Span,
}

impl Detection {
    /// Returns the 1-indexed line number of the match.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.span.line
    }

    /// Returns the 1-indexed column number of the match.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.span.column
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}]",
            self.path.display(),
            self.span.line,
            self.span.column,
            self.rule_name,
            self.language,
        )
    }
}
