//! Recording screen.

use std::sync::{Mutex, PoisonError};

use murmur_app::Screen;

/// One call observed by [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOutput {
    /// `show(line)`.
    Line(String),
    /// `bell()`.
    Bell,
}

/// [`Screen`] that keeps everything shown, in call order.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    output: Mutex<Vec<ScreenOutput>>,
}

impl RecordingDisplay {
    /// Create an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, in order.
    pub fn output(&self) -> Vec<ScreenOutput> {
        self.output.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Shown lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.output()
            .into_iter()
            .filter_map(|out| match out {
                ScreenOutput::Line(line) => Some(line),
                ScreenOutput::Bell => None,
            })
            .collect()
    }

    /// Most recent line, if any.
    pub fn last_line(&self) -> Option<String> {
        self.lines().pop()
    }

    /// Number of bell rings.
    pub fn bells(&self) -> usize {
        self.output().iter().filter(|out| matches!(out, ScreenOutput::Bell)).count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.output.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn record(&self, out: ScreenOutput) {
        self.output.lock().unwrap_or_else(PoisonError::into_inner).push(out);
    }
}

impl Screen for RecordingDisplay {
    fn show(&self, message: &str) {
        self.record(ScreenOutput::Line(message.to_string()));
    }

    fn bell(&self) {
        self.record(ScreenOutput::Bell);
    }
}
