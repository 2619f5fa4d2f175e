//! Operator input seam.

use std::future::Future;

/// Result of reading one line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// A submitted line, without its line terminator.
    Line(String),
    /// Input is exhausted (Ctrl-D, closed stdin).
    EndOfInput,
    /// The operator pressed the interrupt key (Ctrl-C).
    Interrupted,
}

/// Source of operator input lines.
///
/// End of input and interrupts are ordinary values, not errors; both end the
/// input loop gracefully. `Err` is reserved for a broken input device.
pub trait LineSource: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next line.
    fn read_line(&mut self) -> impl Future<Output = Result<InputLine, Self::Error>> + Send;
}
