//! Transport adapters.
//!
//! - **`serial`** – `SerialOpener` / `SerialTransport` on top of the
//!   `serialport` crate.
//! - **`mock`** – `MockOpener` / `MockTransport`, which record frames in
//!   memory for tests and dry runs.

pub mod mock;
pub mod serial;

pub use mock::{MockOpener, MockTransport};
pub use serial::{SerialOpener, SerialTransport, DEFAULT_BAUD_RATE};
