//! Rule definitions and the compiled rule set.

mod loader;

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;

pub use loader::{LoadedRules, RulesDirError, SkipReason, SkippedRule, load_rules};

use crate::error::RuleError;

/// The on-disk shape of one rule definition.
///
/// Field names follow the definition-file format (`ruleName`,
/// `secretPattern`, ...). All fields default to empty so that validation -
/// not deserialization - decides which omissions are fatal to the rule,
/// producing diagnostics that name the rule and field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDef {
    /// Identifying label, unique within a rule set by convention.
    #[serde(default)]
    pub rule_name: String,
    /// Language tag the rule applies to (e.g. `"Python"`).
    #[serde(default)]
    pub language: String,
    /// Library or API the rule targets. Descriptive only.
    #[serde(default)]
    pub library: String,
    /// A sample string expected to match the pattern. Descriptive only.
    #[serde(default)]
    pub example: String,
    /// Regular expression describing the secret's textual shape.
    #[serde(default)]
    pub secret_pattern: String,
}

/// A compiled detection rule ready for scanning.
///
/// Construction via [`Rule::compile`] is the only validation point: a `Rule`
/// exists only if its pattern compiled and its required fields were present.
/// Rules are immutable after compilation and safely shared across scan
/// threads.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Identifying label copied into every detection this rule produces.
    pub name: Arc<str>,
    /// Language tag; scanning dispatch is an exact match on this value.
    pub language: Arc<str>,
    /// Library context label, carried through to detections for diagnostics.
    pub library: Box<str>,
    /// Sample matching string. Never evaluated at scan time.
    pub example: Box<str>,
    /// The compiled secret pattern.
    pub regex: Regex,
}

impl Rule {
    /// Validates `def` and compiles its pattern into a usable rule.
    ///
    /// Returns [`RuleError::MissingField`] when `ruleName`, `language`, or
    /// `secretPattern` is absent or blank, and [`RuleError::InvalidPattern`]
    /// when the pattern is not a valid regular expression. A failing
    /// definition never reaches matching.
    pub fn compile(def: &RuleDef) -> Result<Self, RuleError> {
        for (field, value) in [
            ("ruleName", &def.rule_name),
            ("language", &def.language),
            ("secretPattern", &def.secret_pattern),
        ] {
            if value.trim().is_empty() {
                return Err(RuleError::MissingField {
                    name: def.rule_name.clone(),
                    field,
                });
            }
        }

        let regex = Regex::new(&def.secret_pattern).map_err(|source| RuleError::InvalidPattern {
            name: def.rule_name.clone(),
            source,
        })?;

        Ok(Self {
            name: def.rule_name.as_str().into(),
            language: def.language.as_str().into(),
            library: def.library.as_str().into(),
            example: def.example.as_str().into(),
            regex,
        })
    }

    /// Returns the pattern source text this rule was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.language)
    }
}

/// Ordered collection of compiled rules, partitioned by language.
///
/// Rule order is the load order; it is insignificant to matching but
/// preserved so that scans and their logs are deterministic. Partitions
/// group rule indices by language tag in first-appearance order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    partitions: Vec<(Arc<str>, Vec<usize>)>,
}

impl RuleSet {
    /// Creates a rule set from compiled rules, building language partitions.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut partitions: Vec<(Arc<str>, Vec<usize>)> = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            match partitions.iter_mut().find(|(tag, _)| *tag == rule.language) {
                Some((_, indices)) => indices.push(idx),
                None => partitions.push((Arc::clone(&rule.language), vec![idx])),
            }
        }

        Self { rules, partitions }
    }

    /// Returns all rules in load order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns an iterator over the rules in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Looks up a rule by name. With duplicate names, the first wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name.as_ref() == name)
    }

    /// Returns the language tags present in this set, in first-appearance order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|(tag, _)| tag.as_ref())
    }

    /// Returns an iterator over the rules whose language is `language`,
    /// in load order.
    pub fn rules_for<'a>(&'a self, language: &str) -> impl Iterator<Item = &'a Rule> {
        let indices = self
            .partitions
            .iter()
            .find(|(tag, _)| tag.as_ref() == language)
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or_default();

        indices.iter().map(|&idx| &self.rules[idx])
    }

    /// Returns the total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_rule;

    fn def(name: &str, language: &str, pattern: &str) -> RuleDef {
        RuleDef {
            rule_name: name.to_string(),
            language: language.to_string(),
            library: "test-lib".to_string(),
            example: String::new(),
            secret_pattern: pattern.to_string(),
        }
    }

    #[test]
    fn compile_accepts_valid_definition() {
        let rule = Rule::compile(&def("AWSKey", "Python", "AKIA[0-9A-Z]{16}")).unwrap();

        assert_eq!(rule.name.as_ref(), "AWSKey");
        assert_eq!(rule.language.as_ref(), "Python");
        assert_eq!(rule.library.as_ref(), "test-lib");
        assert_eq!(rule.pattern(), "AKIA[0-9A-Z]{16}");
    }

    #[test]
    fn compile_rejects_invalid_regex() {
        let err = Rule::compile(&def("Broken", "Python", "(")).unwrap_err();

        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn compile_rejects_empty_pattern() {
        let err = Rule::compile(&def("NoPattern", "Python", "")).unwrap_err();

        assert!(matches!(
            err,
            RuleError::MissingField {
                field: "secretPattern",
                ..
            }
        ));
    }

    #[test]
    fn compile_rejects_empty_language() {
        let err = Rule::compile(&def("NoLanguage", "", "x+")).unwrap_err();

        assert!(matches!(err, RuleError::MissingField { field: "language", .. }));
    }

    #[test]
    fn compile_rejects_blank_name() {
        let err = Rule::compile(&def("   ", "Python", "x+")).unwrap_err();

        assert!(matches!(err, RuleError::MissingField { field: "ruleName", .. }));
    }

    #[test]
    fn compile_allows_empty_library_and_example() {
        let mut definition = def("Bare", "Go", "token_[a-z]+");
        definition.library = String::new();
        definition.example = String::new();

        let rule = Rule::compile(&definition).unwrap();

        assert!(rule.library.is_empty());
        assert!(rule.example.is_empty());
    }

    #[test]
    fn ruledef_deserializes_camel_case_fields() {
        let definition: RuleDef = toml::from_str(
            r#"
            ruleName = "AWSKey"
            language = "Python"
            library = "boto3"
            example = "AKIA1234567890ABCDEF"
            secretPattern = "AKIA[0-9A-Z]{16}"
            "#,
        )
        .unwrap();

        assert_eq!(definition.rule_name, "AWSKey");
        assert_eq!(definition.secret_pattern, "AKIA[0-9A-Z]{16}");
    }

    #[test]
    fn ruledef_missing_fields_default_to_empty() {
        let definition: RuleDef = toml::from_str(r#"language = "Go""#).unwrap();

        assert!(definition.rule_name.is_empty());
        assert!(definition.secret_pattern.is_empty());
    }

    #[test]
    fn rule_set_preserves_load_order() {
        let rules = vec![
            make_rule("first", "Python", "a"),
            make_rule("second", "Go", "b"),
            make_rule("third", "Python", "c"),
        ];
        let set = RuleSet::new(rules);

        let names: Vec<_> = set.iter().map(|r| r.name.as_ref()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn rule_set_partitions_by_language_in_first_appearance_order() {
        let rules = vec![
            make_rule("py1", "Python", "a"),
            make_rule("go1", "Go", "b"),
            make_rule("py2", "Python", "c"),
        ];
        let set = RuleSet::new(rules);

        let languages: Vec<_> = set.languages().collect();
        assert_eq!(languages, ["Python", "Go"]);

        let python_rules: Vec<_> = set.rules_for("Python").map(|r| r.name.as_ref()).collect();
        assert_eq!(python_rules, ["py1", "py2"]);
    }

    #[test]
    fn rules_for_unknown_language_is_empty() {
        let set = RuleSet::new(vec![make_rule("py", "Python", "a")]);

        assert_eq!(set.rules_for("Haskell").count(), 0);
    }

    #[test]
    fn get_finds_rule_by_name() {
        let set = RuleSet::new(vec![make_rule("py", "Python", "a")]);

        assert!(set.get("py").is_some());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn duplicate_names_are_both_kept() {
        let rules = vec![make_rule("dup", "Python", "a"), make_rule("dup", "Go", "b")];
        let set = RuleSet::new(rules);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("dup").unwrap().language.as_ref(), "Python");
    }

    #[test]
    fn empty_rule_set_reports_empty() {
        let set = RuleSet::new(vec![]);

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.languages().count(), 0);
    }

    #[test]
    fn display_shows_name_and_language() {
        let rule = make_rule("AWSKey", "Python", "x");

        assert_eq!(format!("{rule}"), "AWSKey [Python]");
    }
}
