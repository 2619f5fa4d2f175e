//! Recording network session.
//!
//! [`RecordingSession`] stands in for the room transport. The controller owns
//! it; the test keeps the paired [`SessionProbe`], which shares the same
//! transcript, to inject inbound events and failures and to inspect what was
//! sent.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use murmur_app::{EventSender, InboundEvent, Mode, NetworkError, NetworkSession};
use murmur_codec::CodecError;

use crate::ManualClock;

/// A room message as handed to the network session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Message text before any encoding.
    pub text: String,
    /// Mode it was sent in.
    pub mode: Mode,
}

#[derive(Debug, Default)]
struct Transcript {
    connected: bool,
    connect_failure: Option<String>,
    send_failure: Option<String>,
    encode_failure: Option<String>,
    latency: Option<(ManualClock, TimeDelta)>,
    events: Option<EventSender>,
    queued: Vec<InboundEvent>,
    room_messages: Vec<SentMessage>,
    private_messages: Vec<(String, String)>,
    disconnects: usize,
}

fn lock(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    transcript.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`NetworkSession`] that records everything sent through it.
#[derive(Debug)]
pub struct RecordingSession {
    nick: String,
    transcript: Arc<Mutex<Transcript>>,
}

impl RecordingSession {
    /// Create a session for `nick` and the probe that observes it.
    pub fn new(nick: impl Into<String>) -> (Self, SessionProbe) {
        let transcript = Arc::new(Mutex::new(Transcript::default()));
        let probe = SessionProbe { transcript: Arc::clone(&transcript) };
        (Self { nick: nick.into(), transcript }, probe)
    }
}

impl NetworkSession for RecordingSession {
    fn nick(&self) -> &str {
        &self.nick
    }

    async fn connect(&mut self) -> Result<(), NetworkError> {
        let mut transcript = lock(&self.transcript);
        if let Some(reason) = &transcript.connect_failure {
            return Err(NetworkError::Connection(reason.clone()));
        }
        transcript.connected = true;
        Ok(())
    }

    fn start(&mut self, events: EventSender) {
        let mut transcript = lock(&self.transcript);
        for event in transcript.queued.drain(..) {
            let _ = events.send(event);
        }
        transcript.events = Some(events);
    }

    async fn send_room_message(&mut self, text: &str, mode: Mode) -> Result<(), NetworkError> {
        let mut transcript = lock(&self.transcript);
        if !transcript.connected {
            return Err(NetworkError::NotConnected);
        }
        if let Some(reason) = &transcript.send_failure {
            return Err(NetworkError::Send(reason.clone()));
        }
        if let Some(reason) = transcript.encode_failure.as_ref().filter(|_| mode.encrypts()) {
            return Err(CodecError::Entropy { reason: reason.clone() }.into());
        }
        if let Some((clock, by)) = &transcript.latency {
            clock.advance(*by);
        }
        transcript.room_messages.push(SentMessage { text: text.to_string(), mode });
        Ok(())
    }

    async fn send_private_message(&mut self, nick: &str, text: &str) -> Result<(), NetworkError> {
        let mut transcript = lock(&self.transcript);
        if !transcript.connected {
            return Err(NetworkError::NotConnected);
        }
        if let Some(reason) = &transcript.send_failure {
            return Err(NetworkError::Send(reason.clone()));
        }
        transcript.private_messages.push((nick.to_string(), text.to_string()));
        Ok(())
    }

    async fn disconnect(&mut self) {
        let mut transcript = lock(&self.transcript);
        transcript.connected = false;
        transcript.events = None;
        transcript.disconnects += 1;
        tracing::debug!(nick = %self.nick, "recording session disconnected");
    }
}

/// Test-side handle on a [`RecordingSession`].
#[derive(Debug, Clone)]
pub struct SessionProbe {
    transcript: Arc<Mutex<Transcript>>,
}

impl SessionProbe {
    /// Make the next `connect` fail with `reason`.
    pub fn fail_connect(&self, reason: impl Into<String>) {
        lock(&self.transcript).connect_failure = Some(reason.into());
    }

    /// Make every send fail with `reason`, or succeed again with `None`.
    pub fn fail_sends(&self, reason: Option<&str>) {
        lock(&self.transcript).send_failure = reason.map(str::to_string);
    }

    /// Make every encrypted room send fail in the codec with `reason`, or
    /// succeed again with `None`. Plain sends are unaffected.
    pub fn fail_encoding(&self, reason: Option<&str>) {
        lock(&self.transcript).encode_failure = reason.map(str::to_string);
    }

    /// Advance `clock` by `by` during every successful room send.
    pub fn delay_sends(&self, clock: ManualClock, by: TimeDelta) {
        lock(&self.transcript).latency = Some((clock, by));
    }

    /// Deliver an inbound event.
    ///
    /// Events delivered before `start` are queued and flushed in order when
    /// delivery begins. Events after `disconnect` are dropped; returns whether
    /// the event was accepted.
    pub fn deliver(&self, event: InboundEvent) -> bool {
        let mut transcript = lock(&self.transcript);
        match &transcript.events {
            Some(events) => events.send(event).is_ok(),
            None if transcript.disconnects == 0 => {
                transcript.queued.push(event);
                true
            },
            None => false,
        }
    }

    /// Room messages sent so far.
    pub fn room_messages(&self) -> Vec<SentMessage> {
        lock(&self.transcript).room_messages.clone()
    }

    /// Private messages sent so far, as `(nick, text)`.
    pub fn private_messages(&self) -> Vec<(String, String)> {
        lock(&self.transcript).private_messages.clone()
    }

    /// Whether the session is connected.
    pub fn is_connected(&self) -> bool {
        lock(&self.transcript).connected
    }

    /// Whether event delivery is running.
    pub fn is_delivering(&self) -> bool {
        lock(&self.transcript).events.is_some()
    }

    /// Number of `disconnect` calls.
    pub fn disconnects(&self) -> usize {
        lock(&self.transcript).disconnects
    }
}
