//! Command parsing for operator input.
//!
//! This module parses one input line into a structured [`Command`] value.
//! Parsing is pure; executing a command is [`crate::Controller`]'s job.

use crate::Mode;

/// Parsed command from one line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the command list, or the help entry for `topic`.
    Help {
        /// Command token (`/msg`) or topic name (`modes`).
        topic: Option<String>,
    },

    /// Quit the client.
    Quit,

    /// Switch the persistent transmission mode.
    SetMode {
        /// Target mode.
        mode: Mode,
    },

    /// Report key presence and the active mode.
    ShowStatus,

    /// Send a private message to one participant.
    PrivateSend {
        /// Recipient nickname.
        nick: String,
        /// Message text.
        text: String,
    },

    /// Encode text and display the result locally.
    EncodeOnly {
        /// Text to encode.
        text: String,
    },

    /// Decode text and display the result locally.
    DecodeOnly {
        /// Encoded body to decode.
        text: String,
    },

    /// Send one message in Gold mode without switching modes.
    SendEncryptedOnce {
        /// Message text.
        text: String,
    },

    /// Send one message in Stealth mode without switching modes.
    SendStealthOnce {
        /// Message text.
        text: String,
    },

    /// Send one message in Plain mode without switching modes.
    SendPlainOnce {
        /// Message text.
        text: String,
    },

    /// Encode locally, then send the ciphertext as a plain message.
    EncodeAndSendPlain {
        /// Text to encode.
        text: String,
    },

    /// Send text verbatim in the active mode, even if it starts with `/`.
    SendLiteral {
        /// Message text.
        text: String,
    },

    /// Send a third-person action (`/me waves`) in the active mode.
    SendAction {
        /// Action text without the `/me ` prefix.
        text: String,
    },

    /// Report whether the bell is enabled.
    ShowBell,

    /// Enable or disable the bell.
    SetBell {
        /// New bell setting.
        enabled: bool,
    },

    /// Known command with malformed arguments.
    SyntaxError {
        /// Command token.
        command: &'static str,
    },

    /// Unknown command.
    Unrecognized {
        /// The original input.
        input: String,
    },

    /// Message text in the active mode.
    SendPlainText {
        /// Message text.
        text: String,
    },
}

impl Command {
    /// Parse a line of operator input into a command.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for blank lines,
    /// which are not commands at all. Every other line maps to exactly one
    /// command: lines starting with `/` that match nothing are
    /// [`Command::Unrecognized`], anything else is
    /// [`Command::SendPlainText`].
    pub fn parse(input: &str) -> Option<Self> {
        parse(input)
    }
}

fn parse(input: &str) -> Option<Command> {
    let line = input.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line {
        "/help" => Command::Help { topic: None },
        "/quit" => Command::Quit,
        "/encrypt" | "/gold" => Command::SetMode { mode: Mode::Gold },
        "/plain" => Command::SetMode { mode: Mode::Plain },
        "/stealth" => Command::SetMode { mode: Mode::Stealth },
        "/status" => Command::ShowStatus,
        "/bell" => Command::ShowBell,
        _ => parse_with_argument(line),
    };

    Some(command)
}

/// Commands of the form `/token argument`.
fn parse_with_argument(line: &str) -> Command {
    let Some((token, rest)) = line.split_once(' ') else {
        return fallback(line);
    };
    let text = rest.trim().to_string();

    match token {
        "/help" => Command::Help { topic: Some(text) },
        "/msg" => parse_private(rest),
        "/enc" => Command::EncodeOnly { text },
        "/dec" => Command::DecodeOnly { text },
        "/e" => Command::SendEncryptedOnce { text },
        "/q" => Command::SendStealthOnce { text },
        "/p" => Command::SendPlainOnce { text },
        "/encr" => Command::EncodeAndSendPlain { text },
        "/say" => Command::SendLiteral { text },
        "/me" => Command::SendAction { text },
        "/bell" => match text.as_str() {
            "on" => Command::SetBell { enabled: true },
            "off" => Command::SetBell { enabled: false },
            _ => Command::SyntaxError { command: "/bell" },
        },
        _ => fallback(line),
    }
}

/// `/msg <nick> <text>`: the nick runs up to the first space.
fn parse_private(rest: &str) -> Command {
    match rest.split_once(' ') {
        Some((nick, text)) if !nick.is_empty() => {
            Command::PrivateSend { nick: nick.to_string(), text: text.trim().to_string() }
        },
        _ => Command::SyntaxError { command: "/msg" },
    }
}

fn fallback(line: &str) -> Command {
    if line.starts_with('/') {
        Command::Unrecognized { input: line.to_string() }
    } else {
        Command::SendPlainText { text: line.to_string() }
    }
}
