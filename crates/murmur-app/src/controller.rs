//! Session controller: startup, the input loop, command execution, shutdown.
//!
//! The controller is the only writer of [`Session`] state. Inbound traffic
//! never passes through it: [`Controller::start`] hands the network session
//! the sending half of the event channel and spawns a [`Dispatcher`] on the
//! receiving half, so the input loop stays parked on
//! [`LineSource::read_line`] while messages arrive.

use std::{error::Error, sync::Arc, time::Duration};

use murmur_codec::{Codec, GoldCodec};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    Command, Dispatcher, InputLine, LineSource, LogRecord, MessageLogger, Mode, NetworkError,
    NetworkSession, Screen, Session, help, logger::report_failure,
};

/// How long shutdown waits for the dispatcher to drain queued events.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Shown when a key-only command runs without a key.
const NO_KEY: &str = "error: no key set";

/// Fatal controller errors.
///
/// Everything else (mode rejections, codec and send failures, log failures)
/// is reported on the screen and the session continues.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Initial connection failed; the input loop never starts.
    #[error("unable to connect: {0}")]
    Connect(#[source] NetworkError),

    /// The operator input device failed.
    #[error("input failed: {0}")]
    Input(#[source] Box<dyn Error + Send + Sync>),
}

/// Whether the input loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the input loop.
    Quit,
}

/// Why the input loop ended. All three are graceful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The operator typed `/quit`.
    Quit,
    /// Input was exhausted.
    EndOfInput,
    /// The operator pressed the interrupt key.
    Interrupted,
}

/// Composition root for one chat session.
///
/// Owns the network session and the optional codec, and shares the
/// [`Session`], [`Screen`] and [`MessageLogger`] with the [`Dispatcher`].
pub struct Controller<N, C = GoldCodec> {
    session: Arc<Session>,
    screen: Arc<dyn Screen>,
    logger: Arc<MessageLogger>,
    network: N,
    codec: Option<C>,
    dispatcher: Option<JoinHandle<()>>,
}

impl<N: NetworkSession, C: Codec> Controller<N, C> {
    /// Wire a controller together.
    ///
    /// `codec` is present exactly when a key was configured, which must agree
    /// with [`Session::key_configured`]. `network` must join under the
    /// session's nickname.
    pub fn new(
        session: Arc<Session>,
        network: N,
        codec: Option<C>,
        screen: Arc<dyn Screen>,
        logger: Arc<MessageLogger>,
    ) -> Self {
        debug_assert_eq!(session.key_configured(), codec.is_some());
        debug_assert_eq!(network.nick(), session.nickname());
        Self { session, screen, logger, network, codec, dispatcher: None }
    }

    /// Shared session state.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Network session, for inspection.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Connect, then start event delivery on a dispatcher task.
    ///
    /// Must run inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `ControllerError::Connect` if the network session cannot connect.
    pub async fn start(&mut self) -> Result<(), ControllerError> {
        self.network.connect().await.map_err(ControllerError::Connect)?;
        self.session.set_connected(true);

        let (events, inbound) = mpsc::unbounded_channel();
        let dispatcher =
            Dispatcher::new(Arc::clone(&self.session), Arc::clone(&self.screen), Arc::clone(&self.logger));
        self.dispatcher = Some(dispatcher.spawn(inbound));
        self.network.start(events);

        tracing::info!(
            nick = self.session.nickname(),
            mode = self.session.mode().name(),
            "session started"
        );
        Ok(())
    }

    /// Read and execute lines until quit, end of input or interrupt.
    ///
    /// # Errors
    ///
    /// - `ControllerError::Input` if the line source fails
    pub async fn run<L: LineSource>(&mut self, lines: &mut L) -> Result<ExitReason, ControllerError> {
        loop {
            let line = lines.read_line().await.map_err(|e| ControllerError::Input(Box::new(e)))?;

            match line {
                InputLine::Line(line) => {
                    if self.handle_line(&line).await == Flow::Quit {
                        return Ok(ExitReason::Quit);
                    }
                },
                InputLine::EndOfInput => return Ok(ExitReason::EndOfInput),
                InputLine::Interrupted => return Ok(ExitReason::Interrupted),
            }
        }
    }

    /// Parse and execute one input line. Blank lines are ignored.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Some(command) => self.execute(command).await,
            None => Flow::Continue,
        }
    }

    /// Execute one command.
    pub async fn execute(&mut self, command: Command) -> Flow {
        tracing::debug!(?command, "executing command");

        match command {
            Command::Help { topic: None } => self.show(&help::command_list()),
            Command::Help { topic: Some(topic) } => self.show(&help::lookup(&topic)),
            Command::Quit => return Flow::Quit,
            Command::SetMode { mode } => match self.session.set_mode(mode) {
                Ok(()) => tracing::debug!(mode = mode.name(), "mode changed"),
                Err(e) => self.show(&e.to_string()),
            },
            Command::ShowStatus => self.show(&self.session.status_line()),
            Command::PrivateSend { nick, text } => {
                if let Err(e) = self.network.send_private_message(&nick, &text).await {
                    tracing::warn!(%nick, "private message failed: {e}");
                    self.show(&format!("error: {e}"));
                }
            },
            Command::EncodeOnly { text } => self.encode_only(&text),
            Command::DecodeOnly { text } => self.decode_only(&text),
            Command::SendEncryptedOnce { text } => self.send_override(&text, Mode::Gold).await,
            Command::SendStealthOnce { text } => self.send_override(&text, Mode::Stealth).await,
            Command::SendPlainOnce { text } => self.send_override(&text, Mode::Plain).await,
            Command::EncodeAndSendPlain { text } => self.encode_and_send_plain(&text).await,
            Command::SendLiteral { text } | Command::SendPlainText { text } => {
                let mode = self.session.mode();
                self.transmit(&text, mode).await;
            },
            Command::SendAction { text } => {
                let mode = self.session.mode();
                self.transmit(&format!("/me {text}"), mode).await;
            },
            Command::ShowBell => self.show(if self.session.bell_enabled() {
                "bell is enabled"
            } else {
                "bell is disabled"
            }),
            Command::SetBell { enabled } => {
                self.session.set_bell(enabled);
                self.show(if enabled { "bell is now enabled" } else { "bell is now disabled" });
            },
            Command::SyntaxError { command } => {
                tracing::debug!(command, "malformed arguments");
                self.show("syntax error");
            },
            Command::Unrecognized { input } => {
                tracing::debug!(%input, "unknown command");
                self.show("unknown command");
            },
        }

        Flow::Continue
    }

    /// Disconnect, drain the dispatcher and flush the activity log.
    pub async fn shutdown(mut self) {
        self.network.disconnect().await;
        self.session.set_connected(false);

        if let Some(dispatcher) = self.dispatcher.take() {
            let abort = dispatcher.abort_handle();
            match tokio::time::timeout(DRAIN_TIMEOUT, dispatcher).await {
                Ok(Ok(())) => {},
                Ok(Err(e)) => tracing::error!("dispatcher task failed: {e}"),
                Err(_) => {
                    tracing::warn!("dispatcher did not drain in time, aborting");
                    abort.abort();
                },
            }
        }

        report_failure(self.screen.as_ref(), self.logger.flush());
        tracing::info!("session closed");
    }

    fn show(&self, message: &str) {
        self.screen.show(message);
    }

    fn encode_only(&self, text: &str) {
        let Some(codec) = &self.codec else {
            return self.show(NO_KEY);
        };
        match codec.encode(text) {
            Ok(encoded) => self.show(&encoded),
            Err(e) => self.show(&format!("exception: {e}")),
        }
    }

    fn decode_only(&self, text: &str) {
        let Some(codec) = &self.codec else {
            return self.show(NO_KEY);
        };
        match codec.decode(text) {
            Ok(plain) => self.show(&format!("'{plain}'")),
            Err(e) => self.show(&format!("exception: {e}")),
        }
    }

    /// One message in `mode`, leaving the persistent mode alone.
    async fn send_override(&mut self, text: &str, mode: Mode) {
        match self.session.authorize(mode) {
            Ok(mode) => {
                self.transmit(text, mode).await;
            },
            Err(_) => self.show(NO_KEY),
        }
    }

    async fn encode_and_send_plain(&mut self, text: &str) {
        let encoded = match &self.codec {
            None => return self.show(NO_KEY),
            Some(codec) => match codec.encode(text) {
                Ok(encoded) => encoded,
                Err(e) => return self.show(&format!("exception: {e}")),
            },
        };

        if self.transmit(&encoded, Mode::Plain).await {
            self.show(&format!("{}> {encoded}", self.session.nickname()));
        }
    }

    /// Send a room message and log it under our own nick.
    ///
    /// The record is stamped before sending, so it never carries a later time
    /// than a reply the network delivers while the send is in flight.
    ///
    /// Returns whether the message went out.
    async fn transmit(&mut self, text: &str, mode: Mode) -> bool {
        let sent_at = self.logger.now();

        match self.network.send_room_message(text, mode).await {
            Ok(()) => {},
            Err(NetworkError::Codec(e)) => {
                tracing::warn!(mode = mode.name(), "room message could not be encoded: {e}");
                self.show(&format!("exception: {e}"));
                return false;
            },
            Err(e) => {
                tracing::warn!(mode = mode.name(), "room message failed: {e}");
                self.show(&format!("error: {e}"));
                return false;
            },
        }

        let record = LogRecord::message(mode.log_kind(), self.session.nickname(), text, sent_at);
        let logged = self.logger.append(&record);
        report_failure(self.screen.as_ref(), logged);
        true
    }
}
