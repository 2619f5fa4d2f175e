//! Append-only activity log.
//!
//! Every logical event becomes one [`LogRecord`], rendered as one text line:
//!
//! ```text
//! MR 20240501T18:03:11Z 000 <alice> hello            visible message
//! QR 20240501T18:03:15Z 001 <alice> two\nlines       covert (stealth) message
//! MI 20240501T18:03:20Z 000 bob <bob@example.org> has joined
//! ```
//!
//! The three-digit field counts the line breaks embedded in the body, so a
//! reader can consume multi-line records. Records are flushed before
//! [`MessageLogger::append`] returns; the log is an audit trail and must
//! survive a crash.

use std::{
    fmt,
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
    sync::Mutex,
};

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};
use thiserror::Error;

use crate::Screen;

/// Timestamp layout; the zone suffix is appended separately.
const TIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Activity log errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// Writing or flushing the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A writer panicked while holding the sink.
    #[error("log sink poisoned")]
    Poisoned,
}

/// Kind of activity-log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// Visible room message (`M`).
    Message,
    /// Covert room message sent in stealth mode (`Q`).
    Covert,
    /// Informational record: presence, session state (`I`).
    Info,
}

impl LogKind {
    /// Single-letter code.
    pub fn code(self) -> char {
        match self {
            LogKind::Message => 'M',
            LogKind::Covert => 'Q',
            LogKind::Info => 'I',
        }
    }

    /// Leading field of the log line. Room messages carry an `R` after the
    /// code; informational records are always `MI`.
    fn prefix(self) -> String {
        match self {
            LogKind::Info => "MI".to_string(),
            kind => format!("{}R", kind.code()),
        }
    }
}

/// One activity-log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Record kind.
    pub kind: LogKind,
    /// When the event happened.
    pub timestamp: DateTime<FixedOffset>,
    /// Nickname that sent the message. `None` for informational records.
    pub actor: Option<String>,
    /// Message or status text.
    pub body: String,
}

impl LogRecord {
    /// Message record (`M` or `Q`) from `actor`.
    pub fn message(
        kind: LogKind,
        actor: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self { kind, timestamp, actor: Some(actor.into()), body: body.into() }
    }

    /// Informational record.
    pub fn info(body: impl Into<String>, timestamp: DateTime<FixedOffset>) -> Self {
        Self { kind: LogKind::Info, timestamp, actor: None, body: body.into() }
    }

    /// Number of line breaks embedded in the body.
    pub fn line_count(&self) -> usize {
        self.body.matches('\n').count()
    }

    /// Render the record as a log line, without the trailing line break.
    pub fn to_line(&self) -> String {
        let timestamp = format_timestamp(&self.timestamp);
        let lines = self.line_count();

        match (&self.kind, &self.actor) {
            (LogKind::Message | LogKind::Covert, Some(actor)) => {
                format!("{} {timestamp} {lines:03} <{actor}> {}", self.kind.prefix(), self.body)
            },
            _ => format!("{} {timestamp} {lines:03} {}", self.kind.prefix(), self.body),
        }
    }
}

/// Format a timestamp as `YYYYMMDDTHH:MM:SS` plus `Z` for UTC, or the zone
/// name otherwise.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let zone = if at.offset().fix().local_minus_utc() == 0 {
        "Z".to_string()
    } else {
        at.offset().to_string()
    };
    format!("{}{zone}", at.format(TIME_FORMAT))
}

/// Time source for log records.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SystemClock {
    /// Timestamps in UTC (`Z` suffix).
    #[default]
    Utc,
    /// Timestamps in the local zone.
    Local,
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self {
            SystemClock::Utc => Utc::now().fixed_offset(),
            SystemClock::Local => Local::now().fixed_offset(),
        }
    }
}

/// Append-only activity log.
///
/// Safe to share between the input loop and the dispatcher: each append takes
/// the sink lock for exactly one write and flush.
pub struct MessageLogger {
    sink: Mutex<Box<dyn Write + Send>>,
    clock: Box<dyn Clock>,
}

impl MessageLogger {
    /// Log into any writer.
    pub fn new(sink: impl Write + Send + 'static, clock: impl Clock + 'static) -> Self {
        Self { sink: Mutex::new(Box::new(sink)), clock: Box::new(clock) }
    }

    /// Open (or create) a log file for appending.
    pub fn open(path: &Path, clock: impl Clock + 'static) -> Result<Self, LogError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file, clock))
    }

    /// Current time from the logger's clock.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Append one record and flush it.
    pub fn append(&self, record: &LogRecord) -> Result<(), LogError> {
        let line = record.to_line();
        let mut sink = self.sink.lock().map_err(|_| LogError::Poisoned)?;
        writeln!(sink, "{line}")?;
        sink.flush()?;
        Ok(())
    }

    /// Append a message record stamped with the current time.
    pub fn message(&self, kind: LogKind, actor: &str, body: &str) -> Result<(), LogError> {
        self.append(&LogRecord::message(kind, actor, body, self.clock.now()))
    }

    /// Append an informational record stamped with the current time.
    pub fn info(&self, body: &str) -> Result<(), LogError> {
        self.append(&LogRecord::info(body, self.clock.now()))
    }

    /// Flush the sink.
    pub fn flush(&self) -> Result<(), LogError> {
        let mut sink = self.sink.lock().map_err(|_| LogError::Poisoned)?;
        sink.flush()?;
        Ok(())
    }
}

impl fmt::Debug for MessageLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageLogger").finish_non_exhaustive()
    }
}

/// Surface a failed append on the screen. Logging failure is never fatal.
pub(crate) fn report_failure(screen: &dyn Screen, result: Result<(), LogError>) {
    if let Err(e) = result {
        tracing::warn!("activity log append failed: {e}");
        screen.show(&format!("error while writing log: {e}"));
    }
}
