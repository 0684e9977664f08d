//! Named non-printing keys ("special keys") and their fixed usage codes.
//!
//! Unlike printable characters, these keys sit on the same physical position
//! on US and JIS boards, so one static table serves every target layout.

use std::fmt;
use std::str::FromStr;

use crate::domain::input::ModifierMask;
use crate::domain::layout::KeyStroke;
use crate::keymap::hid::HidKeyCode;
use crate::keymap::KeymapError;

/// A key addressed by name rather than by the character it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKey {
    Enter,
    Space,
    Backspace,
    Tab,
    Esc,
    /// 半角/全角 on a JIS target.
    ZenHan,
    CapsLock,
    Shift,
    Ctrl,
    Alt,
    Windows,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

impl SpecialKey {
    /// Every special key, in table order.
    pub const ALL: [SpecialKey; 33] = [
        SpecialKey::Enter,
        SpecialKey::Space,
        SpecialKey::Backspace,
        SpecialKey::Tab,
        SpecialKey::Esc,
        SpecialKey::ZenHan,
        SpecialKey::CapsLock,
        SpecialKey::Shift,
        SpecialKey::Ctrl,
        SpecialKey::Alt,
        SpecialKey::Windows,
        SpecialKey::PageUp,
        SpecialKey::PageDown,
        SpecialKey::Home,
        SpecialKey::End,
        SpecialKey::Insert,
        SpecialKey::Delete,
        SpecialKey::Up,
        SpecialKey::Down,
        SpecialKey::Left,
        SpecialKey::Right,
        SpecialKey::F1,
        SpecialKey::F2,
        SpecialKey::F3,
        SpecialKey::F4,
        SpecialKey::F5,
        SpecialKey::F6,
        SpecialKey::F7,
        SpecialKey::F8,
        SpecialKey::F9,
        SpecialKey::F10,
        SpecialKey::F11,
        SpecialKey::F12,
    ];

    /// Canonical upper-case name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SpecialKey::Enter => "ENTER",
            SpecialKey::Space => "SPACE",
            SpecialKey::Backspace => "BACKSPACE",
            SpecialKey::Tab => "TAB",
            SpecialKey::Esc => "ESC",
            SpecialKey::ZenHan => "ZENHAN",
            SpecialKey::CapsLock => "CAPS",
            SpecialKey::Shift => "SHIFT",
            SpecialKey::Ctrl => "CTRL",
            SpecialKey::Alt => "ALT",
            SpecialKey::Windows => "WINDOWS",
            SpecialKey::PageUp => "PAGEUP",
            SpecialKey::PageDown => "PAGEDOWN",
            SpecialKey::Home => "HOME",
            SpecialKey::End => "END",
            SpecialKey::Insert => "INSERT",
            SpecialKey::Delete => "DELETE",
            SpecialKey::Up => "UP",
            SpecialKey::Down => "DOWN",
            SpecialKey::Left => "LEFT",
            SpecialKey::Right => "RIGHT",
            SpecialKey::F1 => "F1",
            SpecialKey::F2 => "F2",
            SpecialKey::F3 => "F3",
            SpecialKey::F4 => "F4",
            SpecialKey::F5 => "F5",
            SpecialKey::F6 => "F6",
            SpecialKey::F7 => "F7",
            SpecialKey::F8 => "F8",
            SpecialKey::F9 => "F9",
            SpecialKey::F10 => "F10",
            SpecialKey::F11 => "F11",
            SpecialKey::F12 => "F12",
        }
    }

    /// The usage code the key occupies in the report.
    ///
    /// Modifier keys return their 0xE0-range usage here for reference; the
    /// report itself carries them through [`SpecialKey::stroke`] instead.
    pub fn usage(self) -> HidKeyCode {
        match self {
            SpecialKey::Enter => HidKeyCode::Enter,
            SpecialKey::Space => HidKeyCode::Space,
            SpecialKey::Backspace => HidKeyCode::Backspace,
            SpecialKey::Tab => HidKeyCode::Tab,
            SpecialKey::Esc => HidKeyCode::Escape,
            SpecialKey::ZenHan => HidKeyCode::Backquote,
            SpecialKey::CapsLock => HidKeyCode::CapsLock,
            SpecialKey::Shift => HidKeyCode::ShiftLeft,
            SpecialKey::Ctrl => HidKeyCode::ControlLeft,
            SpecialKey::Alt => HidKeyCode::AltLeft,
            SpecialKey::Windows => HidKeyCode::MetaLeft,
            SpecialKey::PageUp => HidKeyCode::PageUp,
            SpecialKey::PageDown => HidKeyCode::PageDown,
            SpecialKey::Home => HidKeyCode::Home,
            SpecialKey::End => HidKeyCode::End,
            SpecialKey::Insert => HidKeyCode::Insert,
            SpecialKey::Delete => HidKeyCode::Delete,
            SpecialKey::Up => HidKeyCode::ArrowUp,
            SpecialKey::Down => HidKeyCode::ArrowDown,
            SpecialKey::Left => HidKeyCode::ArrowLeft,
            SpecialKey::Right => HidKeyCode::ArrowRight,
            SpecialKey::F1 => HidKeyCode::F1,
            SpecialKey::F2 => HidKeyCode::F2,
            SpecialKey::F3 => HidKeyCode::F3,
            SpecialKey::F4 => HidKeyCode::F4,
            SpecialKey::F5 => HidKeyCode::F5,
            SpecialKey::F6 => HidKeyCode::F6,
            SpecialKey::F7 => HidKeyCode::F7,
            SpecialKey::F8 => HidKeyCode::F8,
            SpecialKey::F9 => HidKeyCode::F9,
            SpecialKey::F10 => HidKeyCode::F10,
            SpecialKey::F11 => HidKeyCode::F11,
            SpecialKey::F12 => HidKeyCode::F12,
        }
    }

    /// Returns the modifier bit for pure-modifier keys, `None` otherwise.
    pub fn modifier(self) -> Option<ModifierMask> {
        match self {
            SpecialKey::Shift => Some(ModifierMask::LEFT_SHIFT),
            SpecialKey::Ctrl => Some(ModifierMask::LEFT_CTRL),
            SpecialKey::Alt => Some(ModifierMask::LEFT_ALT),
            SpecialKey::Windows => Some(ModifierMask::LEFT_META),
            _ => None,
        }
    }

    /// The `(modifier, usage)` pair to put in a keyboard report.
    ///
    /// Pure-modifier keys set only the modifier byte and leave the key slot
    /// at usage 0; every other key is reported with no modifier.
    pub fn stroke(self) -> KeyStroke {
        match self.modifier() {
            Some(modifier) => KeyStroke::new(modifier, HidKeyCode::NoEvent),
            None => KeyStroke::plain(self.usage()),
        }
    }
}

impl fmt::Display for SpecialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpecialKey {
    type Err = KeymapError;

    /// Parses a key name case-insensitively.  A few common spellings
    /// (`ESCAPE`, `RETURN`, `META`, `ARROWUP`…) are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if let Some(key) = SpecialKey::ALL.iter().find(|k| k.name() == upper) {
            return Ok(*key);
        }
        let alias = match upper.as_str() {
            "RETURN" => SpecialKey::Enter,
            "ESCAPE" => SpecialKey::Esc,
            "CAPSLOCK" => SpecialKey::CapsLock,
            "CONTROL" => SpecialKey::Ctrl,
            "META" | "WIN" | "SUPER" | "CMD" => SpecialKey::Windows,
            "DEL" => SpecialKey::Delete,
            "INS" => SpecialKey::Insert,
            "ARROWUP" => SpecialKey::Up,
            "ARROWDOWN" => SpecialKey::Down,
            "ARROWLEFT" => SpecialKey::Left,
            "ARROWRIGHT" => SpecialKey::Right,
            _ => return Err(KeymapError::UnsupportedSpecialKey(s.to_string())),
        };
        Ok(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_parses_back_to_its_key() {
        for key in SpecialKey::ALL {
            assert_eq!(key.name().parse::<SpecialKey>(), Ok(key));
        }
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!("enter".parse::<SpecialKey>(), Ok(SpecialKey::Enter));
        assert_eq!("PageDown".parse::<SpecialKey>(), Ok(SpecialKey::PageDown));
        assert_eq!("escape".parse::<SpecialKey>(), Ok(SpecialKey::Esc));
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        // Act
        let result = "HYPER".parse::<SpecialKey>();

        // Assert
        assert_eq!(
            result,
            Err(KeymapError::UnsupportedSpecialKey("HYPER".to_string()))
        );
    }

    #[test]
    fn test_modifier_keys_report_only_the_modifier_byte() {
        let cases = [
            (SpecialKey::Ctrl, 0x01),
            (SpecialKey::Shift, 0x02),
            (SpecialKey::Alt, 0x04),
            (SpecialKey::Windows, 0x08),
        ];
        for (key, bits) in cases {
            let stroke = key.stroke();
            assert_eq!(stroke.modifier.bits(), bits, "{key}");
            assert_eq!(stroke.code, HidKeyCode::NoEvent, "{key}");
        }
    }

    #[test]
    fn test_regular_keys_use_fixed_usage_codes() {
        let cases = [
            (SpecialKey::Enter, 0x28),
            (SpecialKey::Esc, 0x29),
            (SpecialKey::Backspace, 0x2A),
            (SpecialKey::Tab, 0x2B),
            (SpecialKey::Space, 0x2C),
            (SpecialKey::ZenHan, 0x35),
            (SpecialKey::Insert, 0x49),
            (SpecialKey::Home, 0x4A),
            (SpecialKey::PageUp, 0x4B),
            (SpecialKey::Delete, 0x4C),
            (SpecialKey::End, 0x4D),
            (SpecialKey::PageDown, 0x4E),
            (SpecialKey::Right, 0x4F),
            (SpecialKey::Left, 0x50),
            (SpecialKey::Down, 0x51),
            (SpecialKey::Up, 0x52),
        ];
        for (key, usage) in cases {
            let stroke = key.stroke();
            assert!(stroke.modifier.is_empty(), "{key} must not carry a modifier");
            assert_eq!(stroke.code.as_u8(), usage, "{key}");
        }
    }
}
