//! Terminal output seam.

/// Serialized terminal output.
///
/// Implementations must be callable from the input loop and the dispatcher
/// task at the same time without interleaving partial writes. `show` erases
/// the current input line, prints the message on its own line, then redraws
/// the prompt and whatever the operator has typed so far.
///
/// Output failures are the implementation's problem: a broken terminal must
/// not take the session down, so neither method returns an error.
pub trait Screen: Send + Sync {
    /// Print one message above the input line.
    fn show(&self, message: &str);

    /// Ring the terminal bell.
    fn bell(&self);
}
