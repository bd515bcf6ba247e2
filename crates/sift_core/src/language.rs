//! Language registry mapping file extensions to language tags.
//!
//! Rules and corpus files both carry a language tag; scanning dispatch is an
//! exact match between the two. The registry is open: new tags can be added
//! at runtime (e.g. from configuration) without touching matching logic.

use std::path::Path;
use std::sync::Arc;

/// Built-in language mappings, covering the mainstream scanning targets.
const BUILTIN_LANGUAGES: &[(&str, &[&str])] = &[
    ("Python", &["py", "pyw"]),
    ("Go", &["go"]),
    ("JavaScript", &["js", "mjs", "cjs"]),
    ("TypeScript", &["ts", "tsx"]),
    ("Ruby", &["rb"]),
    ("Java", &["java"]),
    ("Rust", &["rs"]),
    ("PHP", &["php"]),
    ("C#", &["cs"]),
    ("Shell", &["sh", "bash"]),
];

/// One registered language: a tag plus the file extensions it claims.
#[derive(Debug, Clone)]
pub struct LanguageMapping {
    /// Language tag as used by rules and corpus partitions (e.g. `"Python"`).
    pub tag: Arc<str>,
    /// File extensions (without the leading dot) mapped to this tag.
    pub extensions: Vec<Box<str>>,
}

/// Open registry of `{tag → file extensions}` mappings.
///
/// Extension lookup is case-insensitive. When two mappings claim the same
/// extension, the most recently registered one wins, so user configuration
/// can override built-ins.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    mappings: Vec<LanguageMapping>,
}

impl LanguageRegistry {
    /// Creates a registry containing the built-in language mappings.
    #[must_use]
    pub fn builtin() -> Self {
        let mappings = BUILTIN_LANGUAGES
            .iter()
            .map(|&(tag, extensions)| LanguageMapping {
                tag: Arc::from(tag),
                extensions: extensions.iter().map(|&e| e.into()).collect(),
            })
            .collect();

        Self { mappings }
    }

    /// Creates a registry with no mappings at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self { mappings: Vec::new() }
    }

    /// Registers a mapping from `tag` to `extensions`.
    ///
    /// The new mapping takes precedence over earlier registrations for any
    /// extension both claim. Registering an existing tag adds a second
    /// mapping for it rather than merging extension lists.
    pub fn register(&mut self, tag: &str, extensions: &[String]) {
        self.mappings.push(LanguageMapping {
            tag: Arc::from(tag),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase().into()).collect(),
        });
    }

    /// Returns the language tag for `path` based on its extension, or `None`
    /// if the extension is unmapped.
    ///
    /// An unmapped extension is expected, not exceptional; such files are
    /// simply outside the corpus.
    #[must_use]
    pub fn language_for(&self, path: &Path) -> Option<&Arc<str>> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        self.mappings
            .iter()
            .rev()
            .find(|m| m.extensions.iter().any(|e| e.as_ref() == extension))
            .map(|m| &m.tag)
    }

    /// Returns the extensions claimed by `tag`, from its most recent mapping.
    #[must_use]
    pub fn extensions_for(&self, tag: &str) -> Option<&[Box<str>]> {
        self.mappings
            .iter()
            .rev()
            .find(|m| m.tag.as_ref() == tag)
            .map(|m| m.extensions.as_slice())
    }

    /// Returns all registered mappings in registration order.
    #[must_use]
    pub fn mappings(&self) -> &[LanguageMapping] {
        &self.mappings
    }

    /// Returns the number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns `true` if the registry contains no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_python_and_go_extensions() {
        let registry = LanguageRegistry::builtin();

        assert_eq!(registry.language_for(Path::new("creds.py")).map(AsRef::as_ref), Some("Python"));
        assert_eq!(registry.language_for(Path::new("main.go")).map(AsRef::as_ref), Some("Go"));
    }

    #[test]
    fn builtin_covers_mainstream_languages() {
        let registry = LanguageRegistry::builtin();

        for (file, tag) in [
            ("app.js", "JavaScript"),
            ("app.ts", "TypeScript"),
            ("app.rb", "Ruby"),
            ("App.java", "Java"),
            ("main.rs", "Rust"),
            ("index.php", "PHP"),
            ("deploy.sh", "Shell"),
        ] {
            assert_eq!(registry.language_for(Path::new(file)).map(AsRef::as_ref), Some(tag));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = LanguageRegistry::builtin();

        assert_eq!(registry.language_for(Path::new("CREDS.PY")).map(AsRef::as_ref), Some("Python"));
    }

    #[test]
    fn unmapped_extension_returns_none() {
        let registry = LanguageRegistry::builtin();

        assert!(registry.language_for(Path::new("notes.txt")).is_none());
        assert!(registry.language_for(Path::new("data.xyz")).is_none());
    }

    #[test]
    fn file_without_extension_returns_none() {
        let registry = LanguageRegistry::builtin();

        assert!(registry.language_for(Path::new("Makefile")).is_none());
        assert!(registry.language_for(Path::new(".env")).is_none());
    }

    #[test]
    fn register_adds_new_language() {
        let mut registry = LanguageRegistry::builtin();
        registry.register("Kotlin", &["kt".to_string(), "kts".to_string()]);

        assert_eq!(registry.language_for(Path::new("Main.kt")).map(AsRef::as_ref), Some("Kotlin"));
        assert_eq!(
            registry.extensions_for("Kotlin").map(<[Box<str>]>::len),
            Some(2)
        );
    }

    #[test]
    fn later_registration_wins_for_contested_extension() {
        let mut registry = LanguageRegistry::builtin();
        registry.register("Cython", &["py".to_string()]);

        assert_eq!(registry.language_for(Path::new("fast.py")).map(AsRef::as_ref), Some("Cython"));
    }

    #[test]
    fn register_lowercases_extensions() {
        let mut registry = LanguageRegistry::empty();
        registry.register("Fortran", &["F90".to_string()]);

        assert_eq!(registry.language_for(Path::new("solver.f90")).map(AsRef::as_ref), Some("Fortran"));
    }

    #[test]
    fn empty_registry_maps_nothing() {
        let registry = LanguageRegistry::empty();

        assert!(registry.is_empty());
        assert!(registry.language_for(Path::new("creds.py")).is_none());
    }

    #[test]
    fn extensions_for_unknown_tag_returns_none() {
        let registry = LanguageRegistry::builtin();

        assert!(registry.extensions_for("COBOL").is_none());
    }

    #[test]
    fn default_is_builtin() {
        let registry = LanguageRegistry::default();

        assert_eq!(registry.len(), LanguageRegistry::builtin().len());
    }
}
