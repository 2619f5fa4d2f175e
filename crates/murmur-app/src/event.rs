//! Inbound notifications.
//!
//! This module defines [`InboundEvent`], everything the network session can
//! tell the front-end. Events arrive on an unbounded channel and are consumed
//! in order by a single [`crate::Dispatcher`] task.

use tokio::sync::mpsc;

/// Sending half handed to [`crate::NetworkSession::start`].
pub type EventSender = mpsc::UnboundedSender<InboundEvent>;

/// Receiving half consumed by [`crate::Dispatcher::run`].
pub type EventReceiver = mpsc::UnboundedReceiver<InboundEvent>;

/// Notifications delivered by the network session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Message to the whole room.
    RoomMessage {
        /// Decoded message text.
        text: String,
        /// Sender nickname.
        from_nick: String,
        /// Sent in stealth mode.
        stealth: bool,
    },

    /// Room message that mentions our nickname.
    Mention {
        /// Decoded message text.
        text: String,
        /// Sender nickname.
        from_nick: String,
        /// Sent in stealth mode.
        stealth: bool,
    },

    /// Direct message to us.
    PrivateMessage {
        /// Message text.
        text: String,
        /// Full address of the sender.
        from_jid: String,
    },

    /// Participant joined the room.
    PresenceOnline {
        /// Full address of the participant.
        jid: String,
        /// Nickname in the room.
        nick: String,
        /// Room role (moderator, participant, visitor).
        role: String,
        /// Room affiliation (owner, admin, member, none).
        affiliation: String,
    },

    /// Participant left the room.
    PresenceOffline {
        /// Full address of the participant.
        jid: String,
        /// Nickname in the room.
        nick: String,
    },

    /// We have joined the room.
    SessionEstablished,
}
