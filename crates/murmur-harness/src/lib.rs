//! Deterministic test doubles for the murmur session controller.
//!
//! Each double implements one of the controller's seams and records what
//! passes through it, so tests drive a real [`murmur_app::Controller`] and
//! assert on observable output:
//!
//! - [`RecordingSession`]: [`murmur_app::NetworkSession`] that records sent
//!   messages; its [`SessionProbe`] injects inbound events and failures
//! - [`RecordingDisplay`]: [`murmur_app::Screen`] that records lines and bells
//! - [`SharedSink`] / [`FailingSink`]: activity-log sinks
//! - [`FixedClock`] / [`ManualClock`]: frozen or hand-advanced log timestamps
//! - [`ScriptedInput`]: [`murmur_app::LineSource`] replaying a script

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod display;
pub mod input;
pub mod network;
pub mod sink;

pub use clock::{FixedClock, ManualClock};
pub use display::{RecordingDisplay, ScreenOutput};
pub use input::ScriptedInput;
pub use network::{RecordingSession, SentMessage, SessionProbe};
pub use sink::{FailingSink, SharedSink};
