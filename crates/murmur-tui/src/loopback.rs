//! In-process loopback room.
//!
//! Stands in for a room server: no sockets, events flow straight into the
//! controller's channel. The room has two occupants, the operator and `echo`,
//! which repeats every room message back. Gold and stealth messages make the
//! full trip through the codec, so what `echo` repeats is what a peer holding
//! the same key would read.

use murmur_app::{EventSender, InboundEvent, Mode, NetworkError, NetworkSession};
use murmur_codec::{Codec, GoldCodec};

/// Nickname of the echoing occupant.
pub const ECHO_NICK: &str = "echo";

/// Address of the echoing occupant.
pub const ECHO_JID: &str = "echo@loopback";

/// Account domain that refuses connections.
pub const UNREACHABLE_DOMAIN: &str = "unreachable.invalid";

/// Single-process room with an echoing peer.
pub struct LoopbackSession {
    jid: String,
    nick: String,
    codec: Option<GoldCodec>,
    connected: bool,
    events: Option<EventSender>,
}

impl LoopbackSession {
    /// Session for `nick`, logged in as `jid`. Without a codec only plain
    /// messages can be sent.
    pub fn new(jid: impl Into<String>, nick: impl Into<String>, codec: Option<GoldCodec>) -> Self {
        Self { jid: jid.into(), nick: nick.into(), codec, connected: false, events: None }
    }

    fn deliver(&self, event: InboundEvent) {
        let Some(events) = &self.events else {
            return;
        };
        if events.send(event).is_err() {
            tracing::debug!("loopback event dropped, dispatcher gone");
        }
    }

    /// Encode and decode as sender and receiver would.
    fn round_trip(&self, text: &str, mode: Mode) -> Result<String, NetworkError> {
        if !mode.encrypts() {
            return Ok(text.to_string());
        }
        let Some(codec) = &self.codec else {
            return Err(NetworkError::Send("no encryption key set".into()));
        };

        let wire = codec.encode(text)?;
        tracing::trace!(%wire, stealth = mode.is_stealth(), "loopback wire body");
        Ok(codec.decode(&wire)?)
    }

    fn ensure_connected(&self) -> Result<(), NetworkError> {
        if self.connected { Ok(()) } else { Err(NetworkError::NotConnected) }
    }
}

impl NetworkSession for LoopbackSession {
    fn nick(&self) -> &str {
        &self.nick
    }

    async fn connect(&mut self) -> Result<(), NetworkError> {
        let domain = self.jid.split_once('@').map_or("", |(_, domain)| domain);
        if domain == UNREACHABLE_DOMAIN {
            return Err(NetworkError::Connection(format!("{domain}: host unreachable")));
        }

        self.connected = true;
        tracing::info!(jid = %self.jid, "loopback room joined");
        Ok(())
    }

    fn start(&mut self, events: EventSender) {
        self.events = Some(events);

        self.deliver(InboundEvent::SessionEstablished);
        self.deliver(InboundEvent::PresenceOnline {
            jid: self.jid.clone(),
            nick: self.nick.clone(),
            role: "participant".into(),
            affiliation: "member".into(),
        });
        self.deliver(InboundEvent::PresenceOnline {
            jid: ECHO_JID.into(),
            nick: ECHO_NICK.into(),
            role: "moderator".into(),
            affiliation: "owner".into(),
        });
    }

    async fn send_room_message(&mut self, text: &str, mode: Mode) -> Result<(), NetworkError> {
        self.ensure_connected()?;
        let text = self.round_trip(text, mode)?;
        let stealth = mode.is_stealth();

        let event = if text.contains(self.nick.as_str()) {
            InboundEvent::Mention { text, from_nick: ECHO_NICK.into(), stealth }
        } else {
            InboundEvent::RoomMessage { text, from_nick: ECHO_NICK.into(), stealth }
        };
        self.deliver(event);
        Ok(())
    }

    async fn send_private_message(&mut self, nick: &str, text: &str) -> Result<(), NetworkError> {
        self.ensure_connected()?;
        if nick != ECHO_NICK {
            return Err(NetworkError::Send(format!("no such occupant: {nick}")));
        }

        self.deliver(InboundEvent::PrivateMessage { text: text.into(), from_jid: ECHO_JID.into() });
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.connected = false;
        self.events = None;
        tracing::info!("loopback room left");
    }
}
