//! Loading rule definitions from a directory of TOML files.
//!
//! Each `*.toml` file under the rules directory holds one rule definition.
//! Files are processed in file-name order so that the resulting rule order -
//! and therefore scan output - is deterministic across platforms.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Rule, RuleDef};
use crate::error::RuleError;

/// Result of loading a rules directory.
///
/// A definition that fails to read, parse, validate, or compile is excluded
/// from `rules` and recorded in `skipped` instead; one bad definition never
/// blinds the scanner to the rest. Whether an empty `rules` list is fatal is
/// the caller's policy decision.
#[derive(Debug)]
pub struct LoadedRules {
    /// Rules that validated and compiled, in file-name order.
    pub rules: Vec<Rule>,
    /// Definitions that were rejected, with the reason each was skipped.
    pub skipped: Vec<SkippedRule>,
}

/// A rule definition that failed to load.
#[derive(Debug)]
pub struct SkippedRule {
    /// The definition file the rule came from.
    pub source: PathBuf,
    /// Why the rule was excluded from the active set.
    pub reason: SkipReason,
}

/// Why a rule definition was excluded from the active set.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// The definition file could not be read.
    #[error("failed to read rule file: {0}")]
    Read(#[source] std::io::Error),

    /// The definition file was not valid TOML of the rule shape.
    #[error("failed to parse rule file: {0}")]
    Parse(#[source] Box<toml::de::Error>),

    /// The definition was structurally valid but violated a rule invariant.
    #[error(transparent)]
    Invalid(#[from] RuleError),
}

/// Errors that make an entire rules directory unusable.
#[derive(Debug, Error)]
pub enum RulesDirError {
    /// The rules directory itself could not be read.
    #[error("failed to read rules directory '{path}': {source}")]
    Unreadable {
        /// The directory that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Loads and compiles every rule definition under `dir`.
///
/// Only the directory itself being unreadable is an error; individual
/// definitions that fail are returned as [`SkippedRule`] diagnostics
/// alongside the rules that loaded. Entries that are not `*.toml` files are
/// ignored entirely.
pub fn load_rules(dir: &Path) -> Result<LoadedRules, RulesDirError> {
    let entries = fs::read_dir(dir).map_err(|source| RulesDirError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_rule_file(path))
        .collect();
    paths.sort();

    let mut rules = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        match load_definition(&path) {
            Ok(rule) => rules.push(rule),
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %path.display(), %reason, "skipping rule definition");
                skipped.push(SkippedRule { source: path, reason });
            }
        }
    }

    Ok(LoadedRules { rules, skipped })
}

fn is_rule_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn load_definition(path: &Path) -> Result<Rule, SkipReason> {
    let text = fs::read_to_string(path).map_err(SkipReason::Read)?;
    let def: RuleDef = toml::from_str(&text).map_err(|e| SkipReason::Parse(Box::new(e)))?;
    Rule::compile(&def).map_err(SkipReason::Invalid)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_rule(dir: &TempDir, file: &str, name: &str, language: &str, pattern: &str) {
        let body = format!(
            "ruleName = \"{name}\"\nlanguage = \"{language}\"\nlibrary = \"lib\"\nexample = \"sample\"\nsecretPattern = '{pattern}'\n"
        );
        fs::write(dir.path().join(file), body).unwrap();
    }

    #[test]
    fn load_rules_compiles_valid_definitions() {
        let dir = TempDir::new().unwrap();
        write_rule(&dir, "aws.toml", "AWSKey", "Python", "AKIA[0-9A-Z]{16}");

        let loaded = load_rules(dir.path()).unwrap();

        assert_eq!(loaded.rules.len(), 1);
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.rules[0].name.as_ref(), "AWSKey");
    }

    #[test]
    fn load_rules_orders_by_file_name() {
        let dir = TempDir::new().unwrap();
        write_rule(&dir, "20-second.toml", "Second", "Go", "b+");
        write_rule(&dir, "10-first.toml", "First", "Python", "a+");
        write_rule(&dir, "30-third.toml", "Third", "Python", "c+");

        let loaded = load_rules(dir.path()).unwrap();

        let names: Vec<_> = loaded.rules.iter().map(|r| r.name.as_ref()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn invalid_regex_skips_only_that_rule() {
        let dir = TempDir::new().unwrap();
        write_rule(&dir, "bad.toml", "Broken", "Python", "(");
        write_rule(&dir, "good.toml", "Valid", "Python", "x+");

        let loaded = load_rules(dir.path()).unwrap();

        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.rules[0].name.as_ref(), "Valid");
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].source.ends_with("bad.toml"));
        assert!(matches!(
            loaded.skipped[0].reason,
            SkipReason::Invalid(RuleError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn unparseable_file_skips_only_that_rule() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("garbage.toml"), "not [valid toml").unwrap();
        write_rule(&dir, "good.toml", "Valid", "Go", "y+");

        let loaded = load_rules(dir.path()).unwrap();

        assert_eq!(loaded.rules.len(), 1);
        assert!(matches!(loaded.skipped[0].reason, SkipReason::Parse(_)));
    }

    #[test]
    fn missing_required_field_skips_rule_with_diagnostic() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("incomplete.toml"),
            "ruleName = \"NoPattern\"\nlanguage = \"Python\"\n",
        )
        .unwrap();

        let loaded = load_rules(dir.path()).unwrap();

        assert!(loaded.rules.is_empty());
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].reason.to_string().contains("secretPattern"));
    }

    #[test]
    fn non_toml_entries_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "# rules").unwrap();
        fs::write(dir.path().join("notes.yaml"), "ruleName: Ignored").unwrap();
        write_rule(&dir, "real.toml", "Real", "Python", "z+");

        let loaded = load_rules(dir.path()).unwrap();

        assert_eq!(loaded.rules.len(), 1);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn subdirectories_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.toml")).unwrap();
        write_rule(&dir, "real.toml", "Real", "Go", "w+");

        let loaded = load_rules(dir.path()).unwrap();

        assert_eq!(loaded.rules.len(), 1);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn empty_directory_loads_zero_rules_without_error() {
        let dir = TempDir::new().unwrap();

        let loaded = load_rules(dir.path()).unwrap();

        assert!(loaded.rules.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = load_rules(Path::new("/nonexistent/rules/dir")).unwrap_err();

        let RulesDirError::Unreadable { path, .. } = err;
        assert_eq!(path, Path::new("/nonexistent/rules/dir"));
    }

    #[test]
    fn example_field_matches_its_own_pattern() {
        // The example field documents what the pattern is expected to catch;
        // a rule whose example does not match its pattern is a broken fixture.
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("aws.toml"),
            "ruleName = \"AWSKey\"\nlanguage = \"Python\"\nlibrary = \"boto3\"\nexample = \"AKIA1234567890ABCDEF\"\nsecretPattern = 'AKIA[0-9A-Z]{16}'\n",
        )
        .unwrap();

        let loaded = load_rules(dir.path()).unwrap();
        let rule = &loaded.rules[0];

        assert!(rule.regex.is_match(&rule.example));
    }
}
