//! Input state and key handling for the line editor.
//!
//! This module owns the text being typed (buffer, cursor, history) and turns
//! key events into [`LineEdit`] results. It knows nothing about the terminal;
//! [`crate::TerminalDisplay`] draws the state after every key.

/// Maximum number of submitted lines kept for Up/Down recall.
const HISTORY_LIMIT: usize = 500;

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow: previous history entry.
    Up,
    /// Down arrow: next history entry.
    Down,
    /// Home key or Ctrl-A.
    Home,
    /// End key or Ctrl-E.
    End,
    /// Ctrl-C.
    Interrupt,
    /// Ctrl-D.
    EndOfInput,
}

/// Outcome of one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Still editing.
    Pending,
    /// Enter was pressed; the buffer is now empty.
    Submitted(String),
    /// Ctrl-D on an empty line.
    EndOfInput,
    /// Ctrl-C.
    Interrupted,
}

/// Line editor state.
///
/// The cursor counts characters, not bytes, so multi-byte input edits
/// correctly.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position, in characters.
    cursor: usize,
    /// Submitted lines, oldest first.
    history: Vec<String>,
    /// Position while browsing history; `None` when editing a fresh line.
    recall: Option<usize>,
    /// Line being typed before history browsing started.
    draft: String,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.byte_offset(self.cursor)]
    }

    /// Handle a key input event.
    ///
    /// Control characters are ignored; they would move the terminal cursor
    /// away from the editing position.
    pub fn handle_key(&mut self, key: KeyInput) -> LineEdit {
        match key {
            KeyInput::Char(c) if c.is_control() => {},
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    self.remove_at_cursor();
                }
            },
            KeyInput::Delete => self.remove_at_cursor(),
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Up => self.recall_previous(),
            KeyInput::Down => self.recall_next(),
            KeyInput::Enter => return LineEdit::Submitted(self.submit()),
            KeyInput::Interrupt => {
                self.clear();
                return LineEdit::Interrupted;
            },
            KeyInput::EndOfInput => {
                if self.buffer.is_empty() {
                    return LineEdit::EndOfInput;
                }
                self.remove_at_cursor();
            },
        }
        LineEdit::Pending
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(at, _)| at)
    }

    fn remove_at_cursor(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.recall = None;
        self.draft.clear();
    }

    fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.clear();

        if !line.trim().is_empty() && self.history.last() != Some(&line) {
            if self.history.len() == HISTORY_LIMIT {
                self.history.remove(0);
            }
            self.history.push(line.clone());
        }
        line
    }

    fn recall_previous(&mut self) {
        let index = match self.recall {
            None if self.history.is_empty() => return,
            None => {
                self.draft = std::mem::take(&mut self.buffer);
                self.history.len() - 1
            },
            Some(0) => return,
            Some(index) => index - 1,
        };
        self.recall = Some(index);
        self.load(self.history[index].clone());
    }

    fn recall_next(&mut self) {
        let Some(index) = self.recall else {
            return;
        };
        if index + 1 < self.history.len() {
            self.recall = Some(index + 1);
            self.load(self.history[index + 1].clone());
        } else {
            self.recall = None;
            let draft = std::mem::take(&mut self.draft);
            self.load(draft);
        }
    }

    fn load(&mut self, line: String) {
        self.buffer = line;
        self.cursor = self.len();
    }
}
