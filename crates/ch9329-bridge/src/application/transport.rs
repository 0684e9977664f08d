//! Transport port: the byte-stream duplex channel frames are written to.
//!
//! The application layer only needs two things from a channel: write one
//! complete frame, and close.  Bytes the chip sends back are never read.
//! Adapters (serial port, in-memory recorder) live in
//! `infrastructure::transport`.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`Transport`] or [`TransportOpener`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel could not be opened.
    #[error("failed to open {target}: {reason}")]
    Open { target: String, reason: String },

    /// A write was rejected.  The channel may still be usable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel is gone; no further writes can succeed.
    #[error("transport closed")]
    Closed,
}

/// An open duplex channel to the chip.
#[async_trait]
pub trait Transport: Send {
    /// Writes one complete frame.  Resolves once the bytes were handed to
    /// the channel.
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Closes the channel.  Closing an already-closed channel is a no-op.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Human-readable description for log records (e.g. `/dev/ttyUSB0 @ 9600`).
    fn describe(&self) -> String;
}

/// Opens a [`Transport`] on demand.
#[async_trait]
pub trait TransportOpener: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Transport>, TransportError>;

    fn describe(&self) -> String;
}
