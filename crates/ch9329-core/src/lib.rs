//! # ch9329-core
//!
//! Protocol core for driving a CH9329 USB-HID bridge chip over a serial link.
//! It contains the frame builder, the checksum, the HID usage tables, and the
//! character → key stroke layout tables.
//!
//! This crate has zero dependencies on OS APIs, serial ports, async runtimes,
//! or UI frameworks.  Everything here is a pure function or an immutable value.
//!
//! # Architecture overview (for beginners)
//!
//! The CH9329 is a small chip with a UART on one side and a USB port on the
//! other.  The USB side enumerates as a keyboard and a mouse on the *target*
//! computer.  The UART side accepts short binary commands ("report these keys
//! as held", "move the mouse by (dx, dy)").  This crate produces those
//! commands:
//!
//! - **`protocol`** – How bytes travel over the serial link.  Every command is
//!   a frame `57 AB 00 <cmd> <len> <payload…> <checksum>`.
//!
//! - **`domain`** – The input vocabulary (`KeyIntent`, `ModifierMask`, mouse
//!   buttons and deltas) and the `LayoutTable` that decides which physical key
//!   produces a given character on a US or JIS target machine.
//!
//! - **`keymap`** – USB HID usage IDs plus the fixed special-key and media-key
//!   tables.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ch9329_core::LayoutTable` instead of `ch9329_core::domain::layout::LayoutTable`.
pub use domain::input::{
    KeyIntent, ModifierMask, MouseButton, MouseButtons, MouseDelta, ScreenSize, ScrollAmount,
};
pub use domain::layout::{KeyStroke, LayoutError, LayoutTable, TargetLayout};
pub use keymap::hid::HidKeyCode;
pub use keymap::media::MediaKey;
pub use keymap::special::SpecialKey;
pub use keymap::KeymapError;
pub use protocol::checksum::checksum;
pub use protocol::packet::{CommandCode, Packet, PacketError};
