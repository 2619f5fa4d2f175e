//! Scripted operator input.

use std::{collections::VecDeque, convert::Infallible};

use murmur_app::{InputLine, LineSource};

/// [`LineSource`] that replays a fixed script, then reports end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<InputLine>,
}

impl ScriptedInput {
    /// Script of submitted lines.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { script: lines.into_iter().map(|line| InputLine::Line(line.into())).collect() }
    }

    /// Append an arbitrary input result.
    #[must_use]
    pub fn then(mut self, input: InputLine) -> Self {
        self.script.push_back(input);
        self
    }

    /// Number of inputs not yet read.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl LineSource for ScriptedInput {
    type Error = Infallible;

    async fn read_line(&mut self) -> Result<InputLine, Self::Error> {
        Ok(self.script.pop_front().unwrap_or(InputLine::EndOfInput))
    }
}
