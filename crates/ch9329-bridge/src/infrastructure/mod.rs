//! Infrastructure layer for the bridge.
//!
//! Contains the adapters behind the application ports: serial and mock
//! transports, log sinks, and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `ch9329_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`transport`** – `SerialTransport` for a real chip and `MockTransport`
//!   for tests and `--dry-run`.
//!
//! - **`log_sink`** – Where the user-facing log goes: `tracing`, a channel,
//!   JSON lines on stdout, or memory.
//!
//! - **`storage`** – TOML configuration at the platform config path.

pub mod log_sink;
pub mod storage;
pub mod transport;
