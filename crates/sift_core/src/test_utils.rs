//! Test utilities for `sift_core` (compiled only during testing).

use std::path::Path;

use regex::Regex;

use crate::detection::{Detection, Span};
use crate::rule::Rule;

pub fn make_rule(name: &str, language: &str, pattern: &str) -> Rule {
    Rule {
        name: name.into(),
        language: language.into(),
        library: "test-lib".into(),
        example: String::new().into(),
        regex: Regex::new(pattern).unwrap(),
    }
}

pub fn make_detection(rule_name: &str, matched_text: &str) -> Detection {
    Detection {
        rule_name: rule_name.into(),
        language: "Python".into(),
        library: "test-lib".into(),
        path: Path::new("test.py").into(),
        matched_text: matched_text.into(),
        span: Span::new(1, 1, 0, matched_text.len()),
    }
}
