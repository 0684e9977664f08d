//! Serial-port transport for a real CH9329.
//!
//! `serialport` exposes a blocking API, so every open and write runs on
//! tokio's blocking thread pool.  The port handle sits behind an
//! `Arc<Mutex<…>>` that each blocking write clones, so a cancelled write
//! never takes the handle with it.
//!
//! The chip answers some commands with status frames; those bytes are never
//! read.  The OS receive buffer simply fills and discards them.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serialport::SerialPort;
use tracing::{debug, info};

use crate::application::transport::{Transport, TransportError, TransportOpener};

/// Factory default baud rate of the CH9329.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// How long a single write may block before it is reported as failed.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Opens [`SerialTransport`]s for one port path and baud rate.
#[derive(Debug, Clone)]
pub struct SerialOpener {
    path: String,
    baud_rate: u32,
}

impl SerialOpener {
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
        }
    }
}

#[async_trait]
impl TransportOpener for SerialOpener {
    async fn open(&self) -> Result<Box<dyn Transport>, TransportError> {
        let path = self.path.clone();
        let baud_rate = self.baud_rate;
        let target = self.describe();

        let port = tokio::task::spawn_blocking(move || {
            serialport::new(&path, baud_rate)
                .timeout(WRITE_TIMEOUT)
                .open()
        })
        .await
        .map_err(|e| TransportError::Open {
            target: target.clone(),
            reason: e.to_string(),
        })?
        .map_err(|e| TransportError::Open {
            target: target.clone(),
            reason: e.to_string(),
        })?;

        info!("serial port opened: {target}");
        Ok(Box::new(SerialTransport::new(port, target)))
    }

    fn describe(&self) -> String {
        format!("{} @ {} baud", self.path, self.baud_rate)
    }
}

/// An open serial link to the chip.
pub struct SerialTransport {
    /// Shared with in-flight blocking writes; `None` once closed or unplugged.
    port: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
    name: String,
}

impl SerialTransport {
    /// Wraps an already-open port.
    pub fn new(port: Box<dyn SerialPort>, name: impl Into<String>) -> Self {
        Self {
            port: Arc::new(Mutex::new(Some(port))),
            name: name.into(),
        }
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let port = Arc::clone(&self.port);
        let name = self.name.clone();
        let bytes = frame.to_vec();

        // The blocking task keeps its own handle, so dropping this future
        // mid-write leaves the port in place for the next frame.
        let joined = tokio::task::spawn_blocking(move || {
            let mut guard = port.lock().unwrap_or_else(|e| e.into_inner());
            let result = match guard.as_mut() {
                Some(port) => port.write_all(&bytes).and_then(|()| port.flush()),
                None => return Err(TransportError::Closed),
            };
            match result {
                Ok(()) => Ok(()),
                Err(e) if is_disconnect(&e) => {
                    debug!("serial port {name} went away: {e}");
                    *guard = None;
                    Err(TransportError::Closed)
                }
                Err(e) => Err(TransportError::Io(e)),
            }
        })
        .await;

        joined.map_err(|e| TransportError::Io(io::Error::other(e.to_string())))?
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let port = Arc::clone(&self.port);
        let closed = tokio::task::spawn_blocking(move || {
            port.lock().unwrap_or_else(|e| e.into_inner()).take().is_some()
        })
        .await
        .map_err(|e| TransportError::Io(io::Error::other(e.to_string())))?;
        if closed {
            info!("serial port closed: {}", self.name);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Errors after which the device node is gone (USB adapter unplugged).
fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::NotFound
    )
}
