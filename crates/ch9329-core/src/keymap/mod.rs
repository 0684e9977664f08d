//! Key tables for the CH9329 keyboard and media reports.
//!
//! The canonical representation is USB HID Usage IDs (page 0x07, Keyboard/Keypad).
//! Browser-side key identifiers (DOM `KeyboardEvent.code`) are translated to
//! named special keys at the collaborator boundary.

pub mod hid;
pub mod media;
pub mod special;

use thiserror::Error;

pub use hid::HidKeyCode;
pub use media::MediaKey;
pub use special::SpecialKey;

/// Errors raised when a key name has no entry in the static tables.
///
/// Both variants are recoverable: the caller logs a warning and skips the action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeymapError {
    /// The name is not in the special-key table.
    #[error("unsupported special key: {0}")]
    UnsupportedSpecialKey(String),

    /// The name is not in the media-key table.
    #[error("unsupported media key: {0}")]
    UnsupportedMediaKey(String),
}

/// Stateless translation helpers between collaborator key identifiers and
/// the tables in this module.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a DOM `KeyboardEvent.code` to a [`SpecialKey`].
    ///
    /// Left and right variants of a modifier collapse onto the same key
    /// because the chip's simple mode only reports left-hand modifiers.
    /// Returns `None` for codes that produce printable characters.
    pub fn dom_code_to_special_key(code: &str) -> Option<SpecialKey> {
        let key = match code {
            "Enter" | "NumpadEnter" => SpecialKey::Enter,
            "Tab" => SpecialKey::Tab,
            "Escape" => SpecialKey::Esc,
            "Backspace" => SpecialKey::Backspace,
            "Space" => SpecialKey::Space,
            "ShiftLeft" | "ShiftRight" => SpecialKey::Shift,
            "ControlLeft" | "ControlRight" => SpecialKey::Ctrl,
            "AltLeft" | "AltRight" => SpecialKey::Alt,
            "MetaLeft" | "MetaRight" => SpecialKey::Windows,
            "CapsLock" => SpecialKey::CapsLock,
            "PageUp" => SpecialKey::PageUp,
            "PageDown" => SpecialKey::PageDown,
            "Home" => SpecialKey::Home,
            "End" => SpecialKey::End,
            "Insert" => SpecialKey::Insert,
            "Delete" => SpecialKey::Delete,
            "ArrowUp" => SpecialKey::Up,
            "ArrowDown" => SpecialKey::Down,
            "ArrowLeft" => SpecialKey::Left,
            "ArrowRight" => SpecialKey::Right,
            "F1" => SpecialKey::F1,
            "F2" => SpecialKey::F2,
            "F3" => SpecialKey::F3,
            "F4" => SpecialKey::F4,
            "F5" => SpecialKey::F5,
            "F6" => SpecialKey::F6,
            "F7" => SpecialKey::F7,
            "F8" => SpecialKey::F8,
            "F9" => SpecialKey::F9,
            "F10" => SpecialKey::F10,
            "F11" => SpecialKey::F11,
            "F12" => SpecialKey::F12,
            _ => return None,
        };
        Some(key)
    }
}
