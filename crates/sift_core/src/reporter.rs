//! The sink contract for surfacing detections.
//!
//! The engine calls [`Reporter::report`] once per detection rather than
//! returning a batch, so large corpora surface results incrementally and a
//! killed process has already reported its prior findings. The reporter is
//! an explicit dependency of the engine entry points; tests substitute
//! [`MemoryReporter`] and assert on the collected detections directly.

use crate::detection::Detection;

/// Sink for detections emitted by the matching engine.
///
/// Calls arrive from a single thread, in a stable order: rule order, then
/// file order, then match offset within the file. Implementations may
/// stream, buffer, or filter as they see fit.
pub trait Reporter {
    /// Receives one detection.
    fn report(&mut self, detection: &Detection);
}

/// Reporter that collects detections in memory.
///
/// Used by tests and by library consumers that want the full result set
/// rather than a stream.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    detections: Vec<Detection>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the detections collected so far, in emission order.
    #[must_use]
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Consumes the reporter and returns the collected detections.
    #[must_use]
    pub fn into_detections(self) -> Vec<Detection> {
        self.detections
    }

    /// Returns the number of detections collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Returns `true` if nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, detection: &Detection) {
        self.detections.push(detection.clone());
    }
}
