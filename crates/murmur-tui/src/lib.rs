//! Terminal front-end for Murmur
//!
//! A thin shell over [`murmur_app::Controller`] that provides the terminal
//! and the room. All session logic lives in `murmur-app`; this crate handles
//! configuration, the raw-mode line editor and process wiring.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod input;
pub mod loopback;
pub mod runtime;
pub mod terminal;

pub use config::{ConfigError, FileConfig, Overrides, StartupParams};
pub use input::{InputState, KeyInput, LineEdit};
pub use loopback::LoopbackSession;
pub use runtime::RuntimeError;
pub use terminal::{TerminalDisplay, TerminalError, TerminalLines};
