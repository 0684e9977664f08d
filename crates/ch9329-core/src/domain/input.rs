//! Input vocabulary: what a collaborator can ask the chip to do.
//!
//! Everything here is a small `Copy` value created per user action and
//! consumed immediately by the packet builder.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keymap::{KeyMapper, KeymapError, SpecialKey};

// ── Modifier mask ─────────────────────────────────────────────────────────────

/// Modifier bitmask: the first byte of every CH9329 keyboard report.
///
/// Bits 0–3 are the left-hand modifiers, bits 4–7 the right-hand ones.  The
/// chip's simple mode only ever needs the left-hand bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const LEFT_CTRL: ModifierMask = ModifierMask(1 << 0);
    pub const LEFT_SHIFT: ModifierMask = ModifierMask(1 << 1);
    pub const LEFT_ALT: ModifierMask = ModifierMask(1 << 2);
    pub const LEFT_META: ModifierMask = ModifierMask(1 << 3);
    pub const RIGHT_CTRL: ModifierMask = ModifierMask(1 << 4);
    pub const RIGHT_SHIFT: ModifierMask = ModifierMask(1 << 5);
    pub const RIGHT_ALT: ModifierMask = ModifierMask(1 << 6);
    pub const RIGHT_META: ModifierMask = ModifierMask(1 << 7);

    /// Wraps a raw modifier byte.  Every `u8` is a valid mask.
    pub const fn from_bits(bits: u8) -> Self {
        ModifierMask(bits)
    }

    /// The raw byte written into the report.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if either Shift is held.
    pub const fn shift(self) -> bool {
        self.0 & (Self::LEFT_SHIFT.0 | Self::RIGHT_SHIFT.0) != 0
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for ModifierMask {
    type Err = KeymapError;

    /// Parses `+`-separated modifier names such as `ctrl+alt` or `shift`.
    ///
    /// `none` and the empty string yield [`ModifierMask::NONE`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = ModifierMask::NONE;
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("none") {
                continue;
            }
            let key: SpecialKey = part.parse()?;
            match key.modifier() {
                Some(bit) => mask |= bit,
                None => return Err(KeymapError::UnsupportedSpecialKey(part.to_string())),
            }
        }
        Ok(mask)
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

/// A single mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0x01,
    Right = 0x02,
    Middle = 0x04,
}

impl MouseButton {
    pub fn bit(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MouseButton::Left => "LEFT",
            MouseButton::Right => "RIGHT",
            MouseButton::Middle => "MIDDLE",
        };
        f.write_str(name)
    }
}

impl FromStr for MouseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" | "L" => Ok(MouseButton::Left),
            "RIGHT" | "R" => Ok(MouseButton::Right),
            "MIDDLE" | "M" => Ok(MouseButton::Middle),
            _ => Err(format!("unknown mouse button: {s}")),
        }
    }
}

/// Set of mouse buttons held in one report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: MouseButtons = MouseButtons(0);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn with(self, button: MouseButton) -> Self {
        MouseButtons(self.0 | button.bit())
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        MouseButtons(button.bit())
    }
}

/// Relative pointer motion, clamped to what one report can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseDelta {
    pub dx: i8,
    pub dy: i8,
}

impl MouseDelta {
    /// Clamps each axis to `[-128, 127]`.
    pub fn new(dx: i32, dy: i32) -> Self {
        Self {
            dx: clamp_i8(dx, i8::MIN),
            dy: clamp_i8(dy, i8::MIN),
        }
    }

    /// The two wire bytes `(dx, dy)` in two's complement.
    pub fn to_bytes(self) -> (u8, u8) {
        (encode_signed(self.dx), encode_signed(self.dy))
    }
}

/// Wheel movement for one report.  Clamped to `[-127, 127]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollAmount(i8);

impl ScrollAmount {
    pub fn new(amount: i32) -> Self {
        ScrollAmount(clamp_i8(amount, -127))
    }

    pub fn get(self) -> i8 {
        self.0
    }

    pub fn to_byte(self) -> u8 {
        encode_signed(self.0)
    }
}

fn clamp_i8(value: i32, min: i8) -> i8 {
    // The clamp guarantees the cast is lossless.
    value.clamp(i32::from(min), i32::from(i8::MAX)) as i8
}

/// Two's-complement byte for a signed report field (`v < 0` → `256 + v`).
pub fn encode_signed(value: i8) -> u8 {
    value as u8
}

/// Inverse of [`encode_signed`].
pub fn decode_signed(byte: u8) -> i8 {
    byte as i8
}

/// Target screen dimensions in pixels, used to scale absolute positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

// ── Key intents ───────────────────────────────────────────────────────────────

/// One discrete keyboard action requested by a collaborator.
///
/// Names are kept as strings until the sequencer resolves them, so an unknown
/// name can be reported (and skipped) at the moment it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIntent {
    /// A printable character, resolved through the active layout table.
    Character(char),
    /// A named special key (`ENTER`, `F5`, `SHIFT`…).
    SpecialKey(String),
    /// A named multimedia key (`VOLUME_UP`, `MUTE`…).
    MediaKey(String),
    /// A report built directly from a modifier mask and usage byte.
    RawKeycode { modifier: ModifierMask, code: u8 },
}

impl KeyIntent {
    /// Builds an intent from a browser key event.
    ///
    /// Named keys (`Enter`, `ArrowUp`, `ShiftLeft`…) become special keys;
    /// otherwise a single-character `key` value is typed as that character.
    /// Returns `None` for events that produce neither (dead keys, `F13`…).
    ///
    /// `meta` is the event's `metaKey` flag.  Meta+Backspace (Command+Backspace
    /// on a Mac) becomes `DELETE`.
    pub fn from_dom_event(code: &str, key: Option<&str>, meta: bool) -> Option<KeyIntent> {
        if meta && key == Some("Backspace") {
            return Some(KeyIntent::SpecialKey(SpecialKey::Delete.name().to_string()));
        }
        if let Some(special) = KeyMapper::dom_code_to_special_key(code) {
            return Some(KeyIntent::SpecialKey(special.name().to_string()));
        }
        let key = key?;
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(KeyIntent::Character(ch)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bits_follow_report_layout() {
        assert_eq!(ModifierMask::LEFT_CTRL.bits(), 0x01);
        assert_eq!(ModifierMask::LEFT_SHIFT.bits(), 0x02);
        assert_eq!(ModifierMask::LEFT_ALT.bits(), 0x04);
        assert_eq!(ModifierMask::LEFT_META.bits(), 0x08);
        assert_eq!(ModifierMask::RIGHT_META.bits(), 0x80);
    }

    #[test]
    fn test_modifier_combo_parses() {
        // Act
        let mask: ModifierMask = "ctrl+alt".parse().unwrap();

        // Assert
        assert_eq!(mask.bits(), 0x05);
        assert!(mask.contains(ModifierMask::LEFT_CTRL));
        assert!(!mask.shift());
    }

    #[test]
    fn test_modifier_combo_rejects_non_modifier_key() {
        let result = "ctrl+enter".parse::<ModifierMask>();
        assert!(result.is_err());
    }

    #[test]
    fn test_none_parses_to_empty_mask() {
        assert!("none".parse::<ModifierMask>().unwrap().is_empty());
        assert!("".parse::<ModifierMask>().unwrap().is_empty());
    }

    #[test]
    fn test_mouse_delta_clamps_each_axis() {
        // Arrange / Act
        let delta = MouseDelta::new(200, -5);

        // Assert
        assert_eq!((delta.dx, delta.dy), (127, -5));
        assert_eq!(delta.to_bytes(), (0x7F, 0xFB));
    }

    #[test]
    fn test_mouse_delta_allows_minus_128() {
        assert_eq!(MouseDelta::new(-500, -128).to_bytes(), (0x80, 0x80));
    }

    #[test]
    fn test_scroll_clamps_to_symmetric_range() {
        assert_eq!(ScrollAmount::new(-500).get(), -127);
        assert_eq!(ScrollAmount::new(500).get(), 127);
        assert_eq!(ScrollAmount::new(-3).to_byte(), 0xFD);
    }

    #[test]
    fn test_signed_encoding_matches_twos_complement_for_every_value() {
        for dx in -128i32..=127 {
            let byte = encode_signed(dx as i8);
            let expected = if dx >= 0 { dx } else { 256 + dx };
            assert_eq!(i32::from(byte), expected, "encode({dx})");
            assert_eq!(i32::from(decode_signed(byte)), dx, "decode(0x{byte:02X})");
        }
    }

    #[test]
    fn test_mouse_buttons_combine() {
        let held = MouseButtons::from(MouseButton::Left).with(MouseButton::Middle);
        assert_eq!(held.bits(), 0x05);
        assert!(MouseButtons::NONE.is_empty());
    }

    #[test]
    fn test_mouse_button_parses_names() {
        assert_eq!("left".parse::<MouseButton>(), Ok(MouseButton::Left));
        assert_eq!("MIDDLE".parse::<MouseButton>(), Ok(MouseButton::Middle));
        assert!("side".parse::<MouseButton>().is_err());
    }

    #[test]
    fn test_dom_event_named_key_becomes_special_key() {
        let intent = KeyIntent::from_dom_event("Enter", Some("Enter"), false);
        assert_eq!(intent, Some(KeyIntent::SpecialKey("ENTER".to_string())));
    }

    #[test]
    fn test_dom_event_printable_key_becomes_character() {
        let intent = KeyIntent::from_dom_event("Digit2", Some("@"), false);
        assert_eq!(intent, Some(KeyIntent::Character('@')));
    }

    #[test]
    fn test_dom_event_without_usable_key_is_ignored() {
        assert_eq!(KeyIntent::from_dom_event("F13", Some("F13"), false), None);
        assert_eq!(KeyIntent::from_dom_event("KeyA", None, false), None);
    }

    #[test]
    fn test_dom_event_meta_backspace_is_delete() {
        assert_eq!(
            KeyIntent::from_dom_event("Backspace", Some("Backspace"), true),
            Some(KeyIntent::SpecialKey("DELETE".to_string()))
        );
        assert_eq!(
            KeyIntent::from_dom_event("Backspace", Some("Backspace"), false),
            Some(KeyIntent::SpecialKey("BACKSPACE".to_string()))
        );
    }
}
