//! In-memory transport that records every frame instead of writing it.
//!
//! # Why a mock transport?
//!
//! The real [`SerialTransport`](super::serial::SerialTransport) needs a
//! CH9329 on a serial port, and the only visible effect of a write is a key
//! press on another computer.  `MockTransport` keeps each frame in a shared
//! `Mutex<Vec<…>>` so tests (and the `--dry-run` CLI mode) can inspect
//! exactly what would have been sent, in order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let transport = MockTransport::new();
//! sequencer.attach(Box::new(transport.clone()));
//!
//! sequencer.send_text("A").await.unwrap();
//!
//! assert_eq!(transport.frames().len(), 2);
//! ```
//!
//! Clones share the same recording, so the test keeps one handle while the
//! sequencer owns another.
//!
//! # Failure injection
//!
//! `fail_on_write` makes the n-th write (zero-based) fail with an I/O error;
//! `close_on_write` makes the channel disappear from the n-th write onward.
//! Frames whose checksum does not verify are rejected as invalid data.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ch9329_core::protocol::checksum::verify;

use crate::application::transport::{Transport, TransportError, TransportOpener};

#[derive(Debug, Default)]
struct Recording {
    frames: Mutex<Vec<Vec<u8>>>,
    writes: AtomicUsize,
    closed: AtomicBool,
}

/// A recording [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    recording: Arc<Recording>,
    /// Zero-based write index that fails with [`TransportError::Io`].
    pub fail_on_write: Option<usize>,
    /// Zero-based write index from which every write reports
    /// [`TransportError::Closed`].
    pub close_on_write: Option<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame accepted so far, in write order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.recording
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of write attempts, including failed ones.
    pub fn write_attempts(&self) -> usize {
        self.recording.writes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.recording.closed.load(Ordering::SeqCst)
    }

    /// Forgets all recorded frames.
    pub fn clear(&self) {
        self.recording
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let index = self.recording.writes.fetch_add(1, Ordering::SeqCst);

        if self.is_closed() || self.close_on_write.is_some_and(|at| index >= at) {
            return Err(TransportError::Closed);
        }
        if self.fail_on_write == Some(index) {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "mock write failure",
            )));
        }
        if !verify(frame) {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "frame checksum does not verify",
            )));
        }

        self.recording
            .frames
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(frame.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.recording.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "mock transport".to_string()
    }
}

/// Hands out clones of one [`MockTransport`], or fails every open.
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    pub transport: MockTransport,
    /// When `true`, `open` returns [`TransportError::Open`].
    pub should_fail: bool,
}

impl MockOpener {
    pub fn new(transport: MockTransport) -> Self {
        Self {
            transport,
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            transport: MockTransport::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl TransportOpener for MockOpener {
    async fn open(&self) -> Result<Box<dyn Transport>, TransportError> {
        if self.should_fail {
            return Err(TransportError::Open {
                target: self.describe(),
                reason: "mock open failure".to_string(),
            });
        }
        Ok(Box::new(self.transport.clone()))
    }

    fn describe(&self) -> String {
        "mock transport".to_string()
    }
}
