//! Progress reporting seam
//!
//! Conversions run off the caller's interactive thread; milestones flow
//! through a single-method sink so any front end (console, GUI log panel,
//! test capture) can observe them.

/// Receives one human-readable line per pipeline milestone.
///
/// Invoked synchronously, possibly from a worker thread.
pub trait ProgressSink {
    fn log(&self, message: &str);
}

impl<F: Fn(&str)> ProgressSink for F {
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Sink that drops every message.
pub struct Discard;

impl ProgressSink for Discard {
    fn log(&self, _message: &str) {}
}
