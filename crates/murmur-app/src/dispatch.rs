//! Inbound event dispatch.
//!
//! The [`Dispatcher`] owns the receiving end of the event channel and runs on
//! its own task, so inbound messages appear while the input loop is parked on
//! the next line. For each event it rings the bell (if enabled), renders one
//! line through the [`Screen`] and appends at most one record to the activity
//! log. Log failures are shown on screen and never stop dispatch.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    EventReceiver, InboundEvent, LogKind, MessageLogger, Screen, Session, logger::report_failure,
};

/// Marker in front of everything received in stealth mode.
const STEALTH_PREFIX: &str = "$ ";

/// Renders and logs inbound events.
pub struct Dispatcher {
    session: Arc<Session>,
    screen: Arc<dyn Screen>,
    logger: Arc<MessageLogger>,
}

impl Dispatcher {
    /// Create a dispatcher sharing the controller's session, screen and log.
    pub fn new(session: Arc<Session>, screen: Arc<dyn Screen>, logger: Arc<MessageLogger>) -> Self {
        Self { session, screen, logger }
    }

    /// Handle one event.
    pub fn handle(&self, event: &InboundEvent) {
        tracing::debug!(?event, "dispatching inbound event");

        if rings_bell(event) && self.session.bell_enabled() {
            self.screen.bell();
        }

        if let Some(line) = render(event) {
            self.screen.show(&line);
        }

        self.log(event);
    }

    /// Consume events until every sender is dropped.
    pub async fn run(self, mut events: EventReceiver) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
        tracing::debug!("event channel closed, dispatcher stopping");
    }

    /// Run on a new tokio task.
    pub fn spawn(self, events: EventReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    fn log(&self, event: &InboundEvent) {
        let result = match event {
            InboundEvent::RoomMessage { text, from_nick, stealth } => {
                self.logger.message(kind_for(*stealth), from_nick, text)
            },
            InboundEvent::Mention { text, from_nick, stealth } => {
                let body = format!("{}: {text}", self.session.nickname());
                self.logger.message(kind_for(*stealth), from_nick, &body)
            },
            InboundEvent::PrivateMessage { .. } => return,
            InboundEvent::PresenceOnline { jid, nick, .. } => {
                self.logger.info(&format!("{nick} <{jid}> has joined"))
            },
            InboundEvent::PresenceOffline { nick, .. } => {
                self.logger.info(&format!("{nick} has left"))
            },
            InboundEvent::SessionEstablished => self
                .logger
                .info(&format!("You have joined as \"{}\"", self.session.nickname())),
        };

        report_failure(self.screen.as_ref(), result);
    }
}

/// Display line for an event, or `None` for events with no terminal output.
pub fn render(event: &InboundEvent) -> Option<String> {
    let line = match event {
        InboundEvent::RoomMessage { text, from_nick, stealth } => {
            let line = match text.strip_prefix("/me ") {
                Some(action) => format!("*** {from_nick} {action}"),
                None => format!("<{from_nick}> {text}"),
            };
            covert(line, *stealth)
        },
        InboundEvent::Mention { text, from_nick, stealth } => {
            covert(format!("<<<{from_nick}>>> {text}"), *stealth)
        },
        InboundEvent::PrivateMessage { text, from_jid } => format!("<PRIV#{from_jid}> {text}"),
        InboundEvent::PresenceOnline { jid, nick, role, .. } => {
            format!("*** online: {nick} ({jid}; {role})")
        },
        InboundEvent::PresenceOffline { nick, .. } => format!("*** offline: {nick}"),
        InboundEvent::SessionEstablished => return None,
    };
    Some(line)
}

fn covert(line: String, stealth: bool) -> String {
    if stealth { format!("{STEALTH_PREFIX}{line}") } else { line }
}

fn kind_for(stealth: bool) -> LogKind {
    if stealth { LogKind::Covert } else { LogKind::Message }
}

fn rings_bell(event: &InboundEvent) -> bool {
    matches!(
        event,
        InboundEvent::RoomMessage { .. }
            | InboundEvent::Mention { .. }
            | InboundEvent::PrivateMessage { .. }
    )
}
