//! Detection reporters for terminal and machine-readable output.
//!
//! Both reporters stream: each detection is written as it arrives from the
//! engine, so large scans surface results incrementally and an interrupted
//! run has already reported everything it found.

use std::io::Write;

use serde::Serialize;
use sift_core::prelude::*;

use crate::ui::{colors, indicators};

/// Streams detections as styled, human-readable lines.
pub struct TextReporter<'a> {
    writer: &'a mut dyn Write,
    plain: bool,
}

impl std::fmt::Debug for TextReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextReporter").field("plain", &self.plain).finish_non_exhaustive()
    }
}

impl<'a> TextReporter<'a> {
    /// Creates a text reporter. With `plain` set, no styling is applied -
    /// used when writing to a file instead of a terminal.
    pub fn new(writer: &'a mut dyn Write, plain: bool) -> Self {
        Self { writer, plain }
    }

    fn format_line(&self, detection: &Detection) -> String {
        let location = format!(
            "{}:{}:{}",
            detection.path.display(),
            detection.span.line,
            detection.span.column
        );

        let context = if detection.library.is_empty() {
            format!("{} · {}", detection.rule_name, detection.language)
        } else {
            format!("{} · {} · {}", detection.rule_name, detection.language, detection.library)
        };

        if self.plain {
            return format!("{location}  {context}  {}", detection.matched_text);
        }

        format!(
            "{} {}  {}  {}",
            colors::error().apply_to(indicators::ERROR),
            colors::emphasis().apply_to(location),
            colors::accent().apply_to(context),
            colors::secondary().apply_to(&detection.matched_text),
        )
    }
}

impl Reporter for TextReporter<'_> {
    fn report(&mut self, detection: &Detection) {
        let line = self.format_line(detection);
        // A dead sink is not worth failing the scan for.
        let _ = writeln!(self.writer, "{line}");
    }
}

/// Streams detections as JSON Lines: one object per detection.
pub struct JsonLinesReporter<'a> {
    writer: &'a mut dyn Write,
}

impl std::fmt::Debug for JsonLinesReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesReporter").finish_non_exhaustive()
    }
}

impl<'a> JsonLinesReporter<'a> {
    /// Creates a JSON Lines reporter over `writer`.
    pub fn new(writer: &'a mut dyn Write) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
struct JsonDetection<'a> {
    rule_name: &'a str,
    language: &'a str,
    library: &'a str,
    path: String,
    line: u32,
    column: u32,
    byte_start: usize,
    byte_end: usize,
    matched_text: &'a str,
}

impl<'a> JsonDetection<'a> {
    fn from_detection(d: &'a Detection) -> Self {
        Self {
            rule_name: &d.rule_name,
            language: &d.language,
            library: &d.library,
            path: d.path.display().to_string(),
            line: d.span.line,
            column: d.span.column,
            byte_start: d.span.byte_start,
            byte_end: d.span.byte_end,
            matched_text: &d.matched_text,
        }
    }
}

impl Reporter for JsonLinesReporter<'_> {
    fn report(&mut self, detection: &Detection) {
        let record = JsonDetection::from_detection(detection);
        if serde_json::to_writer(&mut *self.writer, &record).is_ok() {
            let _ = writeln!(self.writer);
        }
    }
}
