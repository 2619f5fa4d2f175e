//! Session controller for Murmur
//!
//! The I/O-free core of the chat front-end. Everything here is driven through
//! three seams so the same code runs against a real terminal and network or
//! against deterministic test doubles:
//!
//! - [`NetworkSession`]: room transport, delivering [`InboundEvent`]s on a
//!   channel
//! - [`Screen`]: serialized terminal output that preserves the operator's
//!   partial input line
//! - [`LineSource`]: operator input, one line at a time, with explicit
//!   end-of-input and interrupt signals
//!
//! # Components
//!
//! - [`Session`]: nickname, transmission [`Mode`], bell flag, key presence
//! - [`Command`]: parsed operator input line
//! - [`Dispatcher`]: renders and logs inbound events on its own task
//! - [`MessageLogger`]: append-only activity log
//! - [`Controller`]: composition root and input loop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod controller;
mod dispatch;
mod event;
pub mod help;
mod input;
mod logger;
mod mode;
mod network;
mod screen;
mod session;

pub use command::Command;
pub use controller::{Controller, ControllerError, ExitReason, Flow};
pub use dispatch::{Dispatcher, render};
pub use event::{EventReceiver, EventSender, InboundEvent};
pub use input::{InputLine, LineSource};
pub use logger::{
    Clock, LogError, LogKind, LogRecord, MessageLogger, SystemClock, format_timestamp,
};
pub use mode::{Mode, ModeError};
pub use network::{NetworkError, NetworkSession};
pub use screen::Screen;
pub use session::Session;
