//! ch9329-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the bridge do? (for beginners)
//!
//! A CH9329 chip plugged into a *target* computer looks like an ordinary USB
//! keyboard and mouse to it.  The bridge runs on the *host* computer, which
//! is wired to the chip's serial side, and:
//!
//! 1. Opens the serial port at the chip's baud rate.
//! 2. Resolves each requested character or key through the layout table for
//!    the target's keyboard setting (US or JIS).
//! 3. Writes a press frame, waits for the chip to emit the USB report, then
//!    writes the matching release frame.
//! 4. Reports every state change and frame to a log sink so a UI can show
//!    what happened.

/// Application layer: the sequencer and its ports.
pub mod application;

/// Infrastructure layer: serial and mock transports, log sinks, config files.
pub mod infrastructure;

pub use application::events::{LogLevel, LogRecord, LogSink};
pub use application::sequencer::{
    ActionPhase, CommandSequencer, ConnectionState, Pacing, ReportKind, SessionError,
    SharedSequencer, TextReport,
};
pub use application::transport::{Transport, TransportError, TransportOpener};
