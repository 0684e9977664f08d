//! `LogSink` adapters.
//!
//! | adapter         | destination |
//! |-----------------|-------------|
//! | `TracingSink`   | the process's `tracing` subscriber |
//! | `ChannelSink`   | a tokio mpsc channel read by a UI task |
//! | `JsonLinesSink` | one JSON object per line on any `Write` (stdout by default) |
//! | `MemorySink`    | an in-memory `Vec`, for tests |

use std::io::{self, Write};
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::events::{LogLevel, LogRecord, LogSink};

/// Forwards records to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, record: LogRecord) {
        let message = record.message;
        match record.level {
            LogLevel::Debug => debug!(target: "ch9329", "{message}"),
            LogLevel::Info => info!(target: "ch9329", "{message}"),
            LogLevel::Success => info!(target: "ch9329", success = true, "{message}"),
            LogLevel::Warning => warn!(target: "ch9329", "{message}"),
            LogLevel::Error => error!(target: "ch9329", "{message}"),
        }
    }
}

/// Pushes records onto an unbounded channel.
///
/// Sending never blocks.  Records are dropped silently once the receiver is
/// gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelSink {
    fn record(&self, record: LogRecord) {
        let _ = self.tx.send(record);
    }
}

/// Writes each record as one JSON line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> LogSink for JsonLinesSink<W> {
    fn record(&self, record: LogRecord) {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let result = serde_json::to_writer(&mut *writer, &record)
            .map_err(io::Error::from)
            .and_then(|()| writer.write_all(b"\n"))
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            warn!("failed to write log record: {e}");
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of records at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.level == level)
            .count()
    }

    /// Messages at `level`, in arrival order.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn record(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }
}
