//! Shared session state.
//!
//! A [`Session`] is read by both the input loop and the event dispatcher.
//! Only the input loop writes `mode` and `bell`; atomics give the dispatcher
//! a consistent single-field view without locking. A mode change racing an
//! inbound event only affects the next outgoing message, so no cross-field
//! consistency is needed.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::{Mode, ModeError};

/// Per-process chat session.
///
/// # Invariants
///
/// - `mode() ∈ {Gold, Stealth}` implies `key_configured()`
/// - `nickname` and `key_configured` never change after construction
#[derive(Debug)]
pub struct Session {
    nickname: String,
    key_configured: bool,
    mode: AtomicU8,
    bell: AtomicBool,
    connected: AtomicBool,
}

impl Session {
    /// Create a session. The initial mode is Gold with a key, Plain without.
    pub fn new(nickname: impl Into<String>, key_configured: bool, bell: bool) -> Self {
        Self {
            nickname: nickname.into(),
            key_configured,
            mode: AtomicU8::new(Mode::initial(key_configured).to_u8()),
            bell: AtomicBool::new(bell),
            connected: AtomicBool::new(false),
        }
    }

    /// Own nickname in the room.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Whether a shared key was configured at startup.
    pub fn key_configured(&self) -> bool {
        self.key_configured
    }

    /// Currently active transmission mode.
    pub fn mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }

    /// Switch the persistent transmission mode.
    ///
    /// Switching to Plain always succeeds. Encrypted modes are rejected
    /// without a key, leaving the current mode untouched.
    pub fn set_mode(&self, mode: Mode) -> Result<(), ModeError> {
        let mode = self.authorize(mode)?;
        self.mode.store(mode.to_u8(), Ordering::Release);
        Ok(())
    }

    /// Check that a single message may be sent in `mode`.
    ///
    /// Used for per-message overrides, which never touch the persistent mode.
    pub fn authorize(&self, mode: Mode) -> Result<Mode, ModeError> {
        if mode.requires_key() && !self.key_configured {
            return Err(ModeError::NoKeyConfigured);
        }
        Ok(mode)
    }

    /// Whether the terminal bell rings on inbound notifications.
    pub fn bell_enabled(&self) -> bool {
        self.bell.load(Ordering::Acquire)
    }

    /// Enable or disable the terminal bell.
    pub fn set_bell(&self, enabled: bool) {
        self.bell.store(enabled, Ordering::Release);
    }

    /// Whether the network session is connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Input prompt: `<nickname><glyph> `.
    pub fn prompt(&self) -> String {
        format!("{}{} ", self.nickname, self.mode().glyph())
    }

    /// One-line status summary for `/status`.
    pub fn status_line(&self) -> String {
        let key = if self.key_configured { "available" } else { "not available" };
        format!("key {key}, mode is {}", self.mode().name())
    }
}
