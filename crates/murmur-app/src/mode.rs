//! Transmission modes.
//!
//! The active [`Mode`] decides how an outgoing room message is transformed
//! and how it is logged. Encrypted modes are only reachable when a shared key
//! was configured at startup; see [`crate::Session::set_mode`].

use thiserror::Error;

use crate::LogKind;

/// How outgoing room messages are transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Sent as-is. Every room client can read it.
    Plain,
    /// Encoded before sending. Everyone sees that a message was sent, only
    /// key holders can read it.
    Gold,
    /// Encoded and marked so regular room clients silently drop it, while
    /// the room server still relays it to all participants.
    Stealth,
}

impl Mode {
    /// All modes, in prompt-glyph order.
    pub const ALL: [Mode; 3] = [Mode::Plain, Mode::Gold, Mode::Stealth];

    /// Mode active at startup.
    pub fn initial(key_configured: bool) -> Self {
        if key_configured { Mode::Gold } else { Mode::Plain }
    }

    /// Last character of the prompt.
    pub fn glyph(self) -> char {
        match self {
            Mode::Plain => '>',
            Mode::Gold => '#',
            Mode::Stealth => '$',
        }
    }

    /// Name used in status output.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Plain => "plaintext",
            Mode::Gold => "gold",
            Mode::Stealth => "stealth",
        }
    }

    /// Whether sending in this mode needs the shared key.
    pub fn requires_key(self) -> bool {
        !matches!(self, Mode::Plain)
    }

    /// Encode the payload before it goes on the wire.
    pub fn encrypts(self) -> bool {
        self.requires_key()
    }

    /// Mark the message so unmodified clients ignore it.
    pub fn is_stealth(self) -> bool {
        matches!(self, Mode::Stealth)
    }

    /// Activity-log kind for a message sent in this mode.
    pub fn log_kind(self) -> LogKind {
        if self.is_stealth() { LogKind::Covert } else { LogKind::Message }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            Mode::Plain => 0,
            Mode::Gold => 1,
            Mode::Stealth => 2,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Mode::Gold,
            2 => Mode::Stealth,
            _ => Mode::Plain,
        }
    }
}

/// Rejected mode transition or per-message override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    /// The mode encrypts but no key was configured at startup.
    #[error("no encryption key set")]
    NoKeyConfigured,
}
