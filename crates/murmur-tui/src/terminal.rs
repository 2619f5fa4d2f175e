//! Terminal display and line source.
//!
//! [`TerminalDisplay`] is the single owner of terminal output. The input loop
//! and the dispatcher task both write through it, and one mutex around the
//! writer and the [`InputState`] keeps their output from interleaving: every
//! `show` erases the input line, prints the message, then redraws the prompt
//! with whatever the operator has typed so far.
//!
//! [`TerminalLines`] reads crossterm key events and feeds them to the display
//! until a line is submitted.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crossterm::{
    cursor::MoveToColumn,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use murmur_app::{InputLine, LineSource, Screen, Session};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::input::{InputState, KeyInput, LineEdit};

/// Terminal errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

struct Inner<W> {
    out: W,
    input: InputState,
}

/// Serialized terminal output that preserves the line being typed.
pub struct TerminalDisplay<W: Write + Send> {
    session: Arc<Session>,
    inner: Mutex<Inner<W>>,
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Create a display writing to `out`. The prompt comes from `session`.
    pub fn new(session: Arc<Session>, out: W) -> Self {
        Self { session, inner: Mutex::new(Inner { out, input: InputState::new() }) }
    }

    /// Apply one key to the line editor and redraw the input line.
    ///
    /// A submitted line stays on screen above a fresh prompt.
    pub fn edit(&self, key: KeyInput) -> LineEdit {
        let mut inner = self.lock();
        let edit = inner.input.handle_key(key);

        let drawn = match &edit {
            LineEdit::Pending => self.draw_input(&mut inner),
            LineEdit::Submitted(_) => Self::finish_line(&mut inner.out),
            LineEdit::EndOfInput | LineEdit::Interrupted => {
                let cleared = self.draw_input(&mut inner);
                cleared.and_then(|()| Self::finish_line(&mut inner.out))
            },
        };
        if let Err(e) = drawn {
            tracing::warn!("terminal write failed: {e}");
        }

        edit
    }

    /// Redraw the prompt and the pending input, e.g. after a mode change.
    pub fn redraw_prompt(&self) {
        let mut inner = self.lock();
        if let Err(e) = self.draw_input(&mut inner) {
            tracing::warn!("terminal write failed: {e}");
        }
    }

    /// Text typed but not yet submitted.
    pub fn pending_input(&self) -> String {
        self.lock().input.buffer().to_string()
    }

    /// Run `f` on the underlying writer.
    pub fn with_output<T>(&self, f: impl FnOnce(&W) -> T) -> T {
        f(&self.lock().out)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Erase the current line and draw prompt plus buffer, cursor in place.
    ///
    /// The cursor column counts terminal cells, so wide characters take two.
    fn draw_input(&self, inner: &mut Inner<W>) -> io::Result<()> {
        let prompt = self.session.prompt();
        let column = prompt.width() + inner.input.before_cursor().width();

        queue!(
            inner.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(&prompt),
            Print(sanitize(inner.input.buffer())),
            MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
        )?;
        inner.out.flush()
    }

    fn finish_line(out: &mut W) -> io::Result<()> {
        queue!(out, Print("\r\n"))?;
        out.flush()
    }

    fn write_message(&self, inner: &mut Inner<W>, message: &str) -> io::Result<()> {
        queue!(
            inner.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(sanitize(message).replace('\n', "\r\n")),
            Print("\r\n"),
        )?;
        self.draw_input(inner)
    }
}

impl<W: Write + Send> Screen for TerminalDisplay<W> {
    fn show(&self, message: &str) {
        let mut inner = self.lock();
        if let Err(e) = self.write_message(&mut inner, message) {
            tracing::warn!("terminal write failed: {e}");
        }
    }

    fn bell(&self) {
        let mut inner = self.lock();
        let rung = inner.out.write_all(b"\x07").and_then(|()| inner.out.flush());
        if let Err(e) = rung {
            tracing::warn!("terminal write failed: {e}");
        }
    }
}

/// Replace control characters other than line breaks and tabs with `?`.
///
/// Remote text reaches the terminal verbatim otherwise, escape sequences
/// included.
pub fn sanitize(text: &str) -> String {
    text.chars().map(|c| if c.is_control() && c != '\n' && c != '\t' { '?' } else { c }).collect()
}

/// Convert a crossterm key event to editor input.
pub fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(KeyInput::Interrupt),
            KeyCode::Char('d') => Some(KeyInput::EndOfInput),
            KeyCode::Char('a') => Some(KeyInput::Home),
            KeyCode::Char('e') => Some(KeyInput::End),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Char(' ')),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Operator input from the terminal's key events.
pub struct TerminalLines<W: Write + Send> {
    display: Arc<TerminalDisplay<W>>,
    events: EventStream,
}

impl<W: Write + Send> TerminalLines<W> {
    /// Read keys into `display`'s line editor.
    pub fn new(display: Arc<TerminalDisplay<W>>) -> Self {
        Self { display, events: EventStream::new() }
    }
}

impl<W: Write + Send + 'static> LineSource for TerminalLines<W> {
    type Error = TerminalError;

    async fn read_line(&mut self) -> Result<InputLine, TerminalError> {
        self.display.redraw_prompt();

        loop {
            match self.events.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let Some(input) = convert_key(key) else {
                        continue;
                    };
                    match self.display.edit(input) {
                        LineEdit::Pending => {},
                        LineEdit::Submitted(line) => return Ok(InputLine::Line(line)),
                        LineEdit::EndOfInput => return Ok(InputLine::EndOfInput),
                        LineEdit::Interrupted => return Ok(InputLine::Interrupted),
                    }
                },
                Some(Ok(Event::Resize(..))) => self.display.redraw_prompt(),
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TerminalError::Io(e)),
                None => return Ok(InputLine::EndOfInput),
            }
        }
    }
}

/// Raw mode for as long as the guard lives.
#[derive(Debug)]
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Switch the terminal to raw mode.
    pub fn enable() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
