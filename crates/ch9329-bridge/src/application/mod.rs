//! Application layer: the command sequencer and the ports it depends on.
//!
//! - **`sequencer`** – Turns key and mouse intents into paced press/release
//!   frame pairs and owns the connection lifecycle.
//!
//! - **`transport`** – The `Transport` / `TransportOpener` traits the
//!   sequencer writes frames through.
//!
//! - **`events`** – `LogRecord` and the `LogSink` trait that collaborators
//!   implement to receive the user-facing log.
//!
//! Concrete adapters for the ports live in `crate::infrastructure`; nothing
//! in this layer imports them.

pub mod events;
pub mod sequencer;
pub mod transport;
