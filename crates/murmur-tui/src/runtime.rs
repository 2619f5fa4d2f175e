//! Process wiring.
//!
//! Builds the activity log, codec, session, display and network session from
//! [`StartupParams`], then runs the controller against the terminal until the
//! operator leaves.

use std::{
    io::{self, Stdout},
    sync::Arc,
};

use murmur_app::{
    Controller, ControllerError, ExitReason, LogError, MessageLogger, Screen, Session, SystemClock,
};
use murmur_codec::GoldCodec;
use thiserror::Error;

use crate::{
    config::StartupParams,
    loopback::LoopbackSession,
    terminal::{RawModeGuard, TerminalDisplay, TerminalError, TerminalLines},
};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The activity log could not be opened.
    #[error("cannot open activity log: {0}")]
    Log(#[from] LogError),

    /// Terminal setup failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] TerminalError),

    /// The controller failed to connect or lost its input.
    #[error(transparent)]
    Controller(#[from] ControllerError),
}

/// Run one interactive session on the process terminal.
pub async fn run(params: StartupParams) -> Result<ExitReason, RuntimeError> {
    let clock = if params.local_time { SystemClock::Local } else { SystemClock::Utc };
    let logger = Arc::new(MessageLogger::open(&params.logfile, clock)?);

    let codec = params.key.as_deref().map(|key| GoldCodec::new(key.as_bytes()));
    let session = Arc::new(Session::new(params.nick.clone(), codec.is_some(), params.bell));
    let display: Arc<TerminalDisplay<Stdout>> =
        Arc::new(TerminalDisplay::new(Arc::clone(&session), io::stdout()));
    let network = LoopbackSession::new(params.jid.clone(), params.nick.clone(), codec.clone());

    let screen: Arc<dyn Screen> = display.clone();
    let mut controller = Controller::new(session, network, codec, screen, logger);

    let raw_mode = RawModeGuard::enable()?;
    controller.start().await?;
    tracing::info!(?params, "interactive session running");

    let mut lines = TerminalLines::new(display);
    let outcome = controller.run(&mut lines).await;
    controller.shutdown().await;
    drop(raw_mode);

    Ok(outcome?)
}
