//! CH9329 serial framing.
//!
//! ```text
//! [0x57][0xAB][addr:1][cmd:1][len:1][payload:len][checksum:1]
//! ```
//! `addr` is always `0x00` (the chip's default address).  The checksum is the
//! low byte of the sum of every preceding byte.

pub mod checksum;
pub mod packet;

pub use checksum::{checksum, verify};
pub use packet::{CommandCode, Packet, PacketError, FRAME_HEADER, MAX_PAYLOAD_LEN};
