//! Frame builders for every command the bridge sends.
//!
//! Each builder returns a complete [`Packet`]: header, address, command,
//! length, payload and a freshly computed checksum.  Nothing here performs
//! I/O; the bytes go to a transport unchanged.
//!
//! | cmd  | report          | payload |
//! |------|-----------------|---------|
//! | 0x02 | keyboard        | `modifier, 0x00, k1..k6` |
//! | 0x03 | media keys      | `0x02, b1, b2, b3` |
//! | 0x04 | absolute mouse  | `0x02, buttons, xLo, xHi, yLo, yHi, 0x00` |
//! | 0x05 | relative mouse  | `0x01, buttons, dx, dy, wheel` |

use std::fmt;

use thiserror::Error;

use crate::domain::input::{ModifierMask, MouseButtons, MouseDelta, ScreenSize, ScrollAmount};
use crate::domain::layout::KeyStroke;
use crate::keymap::hid::HidKeyCode;
use crate::keymap::media::MEDIA_REPORT_ID;
use crate::protocol::checksum::checksum;

/// First two bytes of every frame.
pub const FRAME_HEADER: [u8; 2] = [0x57, 0xAB];

/// Default chip address.
pub const DEVICE_ADDRESS: u8 = 0x00;

/// Largest payload the chip accepts in one frame.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Keys a single keyboard report can hold at once.
pub const MAX_KEYS_PER_REPORT: usize = 6;

/// Resolution of the absolute-mouse coordinate space on both axes.
pub const ABSOLUTE_RESOLUTION: u32 = 4096;

const RELATIVE_MOUSE_REPORT_ID: u8 = 0x01;
const ABSOLUTE_MOUSE_REPORT_ID: u8 = 0x02;

/// Errors raised when a frame cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("payload too long: {len} bytes (max {MAX_PAYLOAD_LEN})")]
    PayloadTooLong { len: usize },

    #[error("too many keys for one report: {count} (max {MAX_KEYS_PER_REPORT})")]
    TooManyKeys { count: usize },
}

/// Command byte of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandCode {
    Keyboard = 0x02,
    MediaKey = 0x03,
    MouseAbsolute = 0x04,
    MouseRelative = 0x05,
}

impl CommandCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(CommandCode::Keyboard),
            0x03 => Some(CommandCode::MediaKey),
            0x04 => Some(CommandCode::MouseAbsolute),
            0x05 => Some(CommandCode::MouseRelative),
            _ => None,
        }
    }
}

/// A complete, checksummed frame ready to be written to the serial link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8>,
}

// Offsets into `bytes`.
const CMD_OFFSET: usize = 3;
const LEN_OFFSET: usize = 4;
const PAYLOAD_OFFSET: usize = 5;

impl Packet {
    /// Frames an arbitrary payload under `command`.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::PayloadTooLong`] if `payload` exceeds
    /// [`MAX_PAYLOAD_LEN`].
    pub fn build(command: CommandCode, payload: &[u8]) -> Result<Self, PacketError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(PacketError::PayloadTooLong { len: payload.len() });
        }
        Ok(Self::frame(command, payload))
    }

    // Callers guarantee `payload.len() <= MAX_PAYLOAD_LEN`.
    fn frame(command: CommandCode, payload: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(PAYLOAD_OFFSET + payload.len() + 1);
        bytes.extend_from_slice(&FRAME_HEADER);
        bytes.push(DEVICE_ADDRESS);
        bytes.push(command.as_u8());
        bytes.push(payload.len() as u8);
        bytes.extend_from_slice(payload);
        bytes.push(checksum(&bytes));
        Self { bytes }
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Keyboard report holding `modifier` and up to six keys.
    ///
    /// Unused slots are zero; the payload is always eight bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::TooManyKeys`] for more than six codes.
    pub fn keyboard_report(
        modifier: ModifierMask,
        codes: &[HidKeyCode],
    ) -> Result<Self, PacketError> {
        if codes.len() > MAX_KEYS_PER_REPORT {
            return Err(PacketError::TooManyKeys { count: codes.len() });
        }
        let mut payload = [0u8; 8];
        payload[0] = modifier.bits();
        for (slot, code) in payload[2..].iter_mut().zip(codes) {
            *slot = code.as_u8();
        }
        Ok(Self::frame(CommandCode::Keyboard, &payload))
    }

    /// Keyboard report for one layout/special-key stroke.
    pub fn key_stroke(stroke: KeyStroke) -> Self {
        Self::raw_keyboard(stroke.modifier, stroke.code.as_u8())
    }

    /// Keyboard report from a raw usage byte, including values with no
    /// [`HidKeyCode`] variant.
    pub fn raw_keyboard(modifier: ModifierMask, code: u8) -> Self {
        let payload = [modifier.bits(), 0, code, 0, 0, 0, 0, 0];
        Self::frame(CommandCode::Keyboard, &payload)
    }

    /// All-zero keyboard report: no modifier, no key.
    pub fn keyboard_release() -> Self {
        Self::frame(CommandCode::Keyboard, &[0u8; 8])
    }

    // ── Media keys ────────────────────────────────────────────────────────────

    /// Media report carrying a full four-byte bitmask (report ID first).
    pub fn media_key_report(bitmask: [u8; 4]) -> Self {
        Self::frame(CommandCode::MediaKey, &bitmask)
    }

    /// Media report with every bit cleared.
    pub fn media_key_release() -> Self {
        Self::media_key_report([MEDIA_REPORT_ID, 0, 0, 0])
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    /// Relative mouse report.
    ///
    /// `dx`/`dy` are clamped to `[-128, 127]` and `wheel` to `[-127, 127]`
    /// before two's-complement encoding.
    pub fn mouse_relative(buttons: MouseButtons, dx: i32, dy: i32, wheel: i32) -> Self {
        let (dx, dy) = MouseDelta::new(dx, dy).to_bytes();
        let wheel = ScrollAmount::new(wheel).to_byte();
        let payload = [RELATIVE_MOUSE_REPORT_ID, buttons.bits(), dx, dy, wheel];
        Self::frame(CommandCode::MouseRelative, &payload)
    }

    /// Relative mouse report with no buttons and no motion.
    pub fn mouse_relative_release() -> Self {
        Self::mouse_relative(MouseButtons::NONE, 0, 0, 0)
    }

    /// Absolute mouse report for pixel position `(x, y)` on `screen`.
    ///
    /// Each axis is rescaled to `floor(4096 * coord / dimension)`, clamped
    /// to `0..=4095` and sent little-endian.
    pub fn mouse_absolute(buttons: MouseButtons, x: u32, y: u32, screen: ScreenSize) -> Self {
        let [x_lo, x_hi] = scale_absolute(x, screen.width).to_le_bytes();
        let [y_lo, y_hi] = scale_absolute(y, screen.height).to_le_bytes();
        let payload = [
            ABSOLUTE_MOUSE_REPORT_ID,
            buttons.bits(),
            x_lo,
            x_hi,
            y_lo,
            y_hi,
            0x00,
        ];
        Self::frame(CommandCode::MouseAbsolute, &payload)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The complete frame, checksum included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn command(&self) -> Option<CommandCode> {
        CommandCode::from_u8(self.bytes[CMD_OFFSET])
    }

    pub fn payload(&self) -> &[u8] {
        let len = usize::from(self.bytes[LEN_OFFSET]);
        &self.bytes[PAYLOAD_OFFSET..PAYLOAD_OFFSET + len]
    }

    /// The trailing checksum byte.
    pub fn checksum(&self) -> u8 {
        // Every frame ends with its checksum, so `bytes` is never empty.
        self.bytes.last().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Space-separated upper-case hex, e.g. `57 AB 00 02 08 …`.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

fn scale_absolute(coord: u32, dimension: u32) -> u16 {
    if dimension == 0 {
        return 0;
    }
    let scaled = u64::from(ABSOLUTE_RESOLUTION) * u64::from(coord) / u64::from(dimension);
    // Clamped to 4095, so the cast is lossless.
    scaled.min(u64::from(ABSOLUTE_RESOLUTION - 1)) as u16
}
