//! Network session seam.
//!
//! The [`NetworkSession`] trait decouples the controller from the room
//! protocol. Implementations own the wire format, keepalives and service
//! discovery; the controller only sends messages and consumes
//! [`crate::InboundEvent`]s.

use std::future::Future;

use murmur_codec::CodecError;
use thiserror::Error;

use crate::{EventSender, Mode};

/// Network session errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connecting or joining the room failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Operation needs an established session.
    #[error("not connected")]
    NotConnected,

    /// The message could not be sent.
    #[error("send failed: {0}")]
    Send(String),

    /// Encoding the message body failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Room transport used by the controller.
///
/// # Delivery
///
/// After [`start`](NetworkSession::start) the session delivers events on the
/// given channel from its own task, never requiring the input loop to poll.
/// Dropping the sender (at the latest in
/// [`disconnect`](NetworkSession::disconnect)) ends delivery.
pub trait NetworkSession: Send {
    /// Own nickname in the room.
    fn nick(&self) -> &str;

    /// Connect and join the room.
    fn connect(&mut self) -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Begin asynchronous event delivery.
    fn start(&mut self, events: EventSender);

    /// Send a room message.
    ///
    /// `Mode::Gold` encodes the text, `Mode::Stealth` encodes it and marks it
    /// so unmodified clients ignore it, `Mode::Plain` sends it unchanged.
    fn send_room_message(
        &mut self,
        text: &str,
        mode: Mode,
    ) -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Send a private message to one participant.
    fn send_private_message(
        &mut self,
        nick: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), NetworkError>> + Send;

    /// Leave the room and close the connection. Stops event delivery.
    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;
}
