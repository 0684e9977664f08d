//! Character → key stroke tables for the machine on the far side of the chip.
//!
//! The CH9329 only sends usage codes; the *target* computer turns them into
//! characters with its own layout setting.  To type `(` we therefore have to
//! know whether the target reads codes as a US board (Shift+9) or as a JIS
//! board (Shift+8).
//!
//! # What changes between layouts? (for beginners)
//!
//! Letters and digits live on the same keys everywhere, so they are computed.
//! Punctuation is not: JIS moves `@ ^ ~ [ ] { } : * + ' ( )` to different
//! keys and adds two keys US boards lack (`¥` on International3 and `_` on
//! International1).  Those differences live in two static tables below.
//!
//! A [`LayoutTable`] is an immutable value.  Switching layouts builds a new
//! table; nothing is ever patched in place.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::input::ModifierMask;
use crate::keymap::hid::HidKeyCode;

/// Errors raised by layout lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The character has no entry in the active table.
    #[error("unsupported character: {0:?}")]
    UnsupportedCharacter(char),
}

/// Keyboard layout the target machine interprets incoming codes with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetLayout {
    #[default]
    Us,
    Jis,
}

impl TargetLayout {
    /// Resolves a layout name.  Anything other than `jis`/`ja`/`jp`
    /// (case-insensitive) falls back to US.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "jis" | "ja" | "jp" => TargetLayout::Jis,
            _ => TargetLayout::Us,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetLayout::Us => "us",
            TargetLayout::Jis => "jis",
        }
    }
}

impl From<String> for TargetLayout {
    fn from(name: String) -> Self {
        TargetLayout::from_name(&name)
    }
}

impl From<TargetLayout> for String {
    fn from(layout: TargetLayout) -> Self {
        layout.name().to_string()
    }
}

impl fmt::Display for TargetLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One table entry: the modifier to hold and the key to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub modifier: ModifierMask,
    pub code: HidKeyCode,
}

impl KeyStroke {
    pub const fn new(modifier: ModifierMask, code: HidKeyCode) -> Self {
        Self { modifier, code }
    }

    /// A stroke with no modifier held.
    pub const fn plain(code: HidKeyCode) -> Self {
        Self::new(ModifierMask::NONE, code)
    }

    /// A stroke with Left Shift held.
    pub const fn shifted(code: HidKeyCode) -> Self {
        Self::new(ModifierMask::LEFT_SHIFT, code)
    }
}

// ── Static punctuation tables ─────────────────────────────────────────────────

const fn p(code: HidKeyCode) -> KeyStroke {
    KeyStroke::plain(code)
}

const fn s(code: HidKeyCode) -> KeyStroke {
    KeyStroke::shifted(code)
}

use HidKeyCode as K;

/// Layout-invariant whitespace.
const WHITESPACE: &[(char, KeyStroke)] = &[
    (' ', p(K::Space)),
    ('\n', p(K::Enter)),
    ('\t', p(K::Tab)),
];

/// Punctuation as a US-configured target reads it.
///
/// `"`/`@` and `&`/`^` share a stroke; the first entry of each pair wins
/// when decoding.
const US_PUNCTUATION: &[(char, KeyStroke)] = &[
    ('!', s(K::Digit1)),
    ('"', s(K::Digit2)),
    ('#', s(K::Digit3)),
    ('$', s(K::Digit4)),
    ('%', s(K::Digit5)),
    ('&', s(K::Digit6)),
    ('\'', s(K::Quote)),
    ('(', s(K::Digit9)),
    (')', s(K::Digit0)),
    ('*', s(K::Digit8)),
    ('+', s(K::Equal)),
    ('-', p(K::Minus)),
    ('=', p(K::Equal)),
    ('_', s(K::Minus)),
    ('~', s(K::Backquote)),
    ('`', p(K::Backquote)),
    ('@', s(K::Digit2)),
    ('^', s(K::Digit6)),
    ('[', p(K::BracketLeft)),
    ('{', s(K::BracketLeft)),
    (']', p(K::BracketRight)),
    ('}', s(K::BracketRight)),
    ('\\', p(K::Backslash)),
    ('|', s(K::Backslash)),
    (';', p(K::Semicolon)),
    (':', s(K::Semicolon)),
    (',', p(K::Comma)),
    ('<', s(K::Comma)),
    ('.', p(K::Period)),
    ('>', s(K::Period)),
    ('/', p(K::Slash)),
    ('?', s(K::Slash)),
];

/// Punctuation as a JIS-configured target reads it.
///
/// `\` and `¥` share International3; `\` wins when decoding.
const JIS_PUNCTUATION: &[(char, KeyStroke)] = &[
    ('!', s(K::Digit1)),
    ('"', s(K::Digit2)),
    ('#', s(K::Digit3)),
    ('$', s(K::Digit4)),
    ('%', s(K::Digit5)),
    ('&', s(K::Digit6)),
    ('\'', s(K::Digit7)),
    ('(', s(K::Digit8)),
    (')', s(K::Digit9)),
    ('=', s(K::Minus)),
    ('-', p(K::Minus)),
    ('~', s(K::Equal)),
    ('^', p(K::Equal)),
    ('@', p(K::BracketLeft)),
    ('`', s(K::BracketLeft)),
    ('[', p(K::BracketRight)),
    ('{', s(K::BracketRight)),
    (']', p(K::Backslash)),
    ('}', s(K::Backslash)),
    ('\\', p(K::International3)),
    ('|', s(K::International3)),
    ('¥', p(K::International3)),
    (';', p(K::Semicolon)),
    ('+', s(K::Semicolon)),
    (':', p(K::Quote)),
    ('*', s(K::Quote)),
    (',', p(K::Comma)),
    ('<', s(K::Comma)),
    ('.', p(K::Period)),
    ('>', s(K::Period)),
    ('/', p(K::Slash)),
    ('?', s(K::Slash)),
    ('_', s(K::International1)),
];

// ── Layout table ──────────────────────────────────────────────────────────────

/// Immutable character → [`KeyStroke`] mapping for one target layout.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    target: TargetLayout,
    forward: HashMap<char, KeyStroke>,
    reverse: HashMap<KeyStroke, char>,
}

impl LayoutTable {
    /// Builds the full table for `target`.  Total and deterministic.
    pub fn build(target: TargetLayout) -> Self {
        let mut table = Self {
            target,
            forward: HashMap::with_capacity(128),
            reverse: HashMap::with_capacity(128),
        };

        for ch in '0'..='9' {
            if let Some(code) = HidKeyCode::digit(ch) {
                table.insert(ch, KeyStroke::plain(code));
            }
        }
        for ch in 'a'..='z' {
            if let Some(code) = HidKeyCode::letter(ch) {
                table.insert(ch, KeyStroke::plain(code));
                table.insert(ch.to_ascii_uppercase(), KeyStroke::shifted(code));
            }
        }

        let punctuation = match target {
            TargetLayout::Us => US_PUNCTUATION,
            TargetLayout::Jis => JIS_PUNCTUATION,
        };
        for &(ch, stroke) in WHITESPACE.iter().chain(punctuation) {
            table.insert(ch, stroke);
        }

        debug!(layout = %target, entries = table.forward.len(), "layout table built");
        table
    }

    fn insert(&mut self, ch: char, stroke: KeyStroke) {
        self.forward.insert(ch, stroke);
        self.reverse.entry(stroke).or_insert(ch);
    }

    /// Returns the stroke that types `ch` on the target.
    pub fn lookup(&self, ch: char) -> Result<KeyStroke, LayoutError> {
        self.forward
            .get(&ch)
            .copied()
            .ok_or(LayoutError::UnsupportedCharacter(ch))
    }

    /// Returns the character the target produces for `stroke`, if any.
    ///
    /// When several characters share a stroke the one listed first in the
    /// table is returned.
    pub fn decode(&self, stroke: KeyStroke) -> Option<char> {
        self.reverse.get(&stroke).copied()
    }

    pub fn target(&self) -> TargetLayout {
        self.target
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Every character the table can type, in no particular order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.forward.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(table: &LayoutTable, ch: char) -> (u8, u8) {
        let s = table.lookup(ch).unwrap();
        (s.modifier.bits(), s.code.as_u8())
    }

    #[test]
    fn test_digits_and_letters_are_layout_invariant() {
        // Arrange
        let us = LayoutTable::build(TargetLayout::Us);
        let jis = LayoutTable::build(TargetLayout::Jis);

        // Assert
        for ch in ('0'..='9').chain('a'..='z').chain('A'..='Z') {
            assert_eq!(us.lookup(ch), jis.lookup(ch), "{ch}");
        }
        assert_eq!(stroke(&us, '0'), (0x00, 0x27));
        assert_eq!(stroke(&us, '1'), (0x00, 0x1E));
        assert_eq!(stroke(&us, '9'), (0x00, 0x26));
        assert_eq!(stroke(&us, 'a'), (0x00, 0x04));
        assert_eq!(stroke(&us, 'A'), (0x02, 0x04));
        assert_eq!(stroke(&us, 'Z'), (0x02, 0x1D));
    }

    #[test]
    fn test_parentheses_move_when_switching_to_jis() {
        let us = LayoutTable::build(TargetLayout::Us);
        let jis = LayoutTable::build(TargetLayout::Jis);

        assert_eq!(stroke(&us, '('), (0x02, 0x26));
        assert_eq!(stroke(&us, ')'), (0x02, 0x27));
        assert_eq!(stroke(&jis, '('), (0x02, 0x25));
        assert_eq!(stroke(&jis, ')'), (0x02, 0x26));
    }

    #[test]
    fn test_jis_only_keys() {
        let jis = LayoutTable::build(TargetLayout::Jis);

        assert_eq!(stroke(&jis, '\\'), (0x00, 0x89));
        assert_eq!(stroke(&jis, '|'), (0x02, 0x89));
        assert_eq!(stroke(&jis, '¥'), (0x00, 0x89));
        assert_eq!(stroke(&jis, '_'), (0x02, 0x87));
        assert_eq!(stroke(&jis, '@'), (0x00, 0x2F));
        assert_eq!(stroke(&jis, ':'), (0x00, 0x34));
    }

    #[test]
    fn test_us_punctuation_samples() {
        let us = LayoutTable::build(TargetLayout::Us);

        assert_eq!(stroke(&us, '\''), (0x02, 0x34));
        assert_eq!(stroke(&us, '_'), (0x02, 0x2D));
        assert_eq!(stroke(&us, '~'), (0x02, 0x35));
        assert_eq!(stroke(&us, '?'), (0x02, 0x38));
        assert!(us.lookup('¥').is_err());
    }

    #[test]
    fn test_whitespace_is_typable_on_both_layouts() {
        for target in [TargetLayout::Us, TargetLayout::Jis] {
            let table = LayoutTable::build(target);
            assert_eq!(stroke(&table, ' '), (0x00, 0x2C));
            assert_eq!(stroke(&table, '\n'), (0x00, 0x28));
            assert_eq!(stroke(&table, '\t'), (0x00, 0x2B));
        }
    }

    #[test]
    fn test_unknown_character_is_reported() {
        let us = LayoutTable::build(TargetLayout::Us);
        assert_eq!(
            us.lookup('é'),
            Err(LayoutError::UnsupportedCharacter('é'))
        );
    }

    #[test]
    fn test_decode_reverses_lookup_up_to_aliases() {
        for target in [TargetLayout::Us, TargetLayout::Jis] {
            let table = LayoutTable::build(target);
            for ch in table.chars() {
                // Arrange
                let encoded = table.lookup(ch).unwrap();

                // Act
                let decoded = table.decode(encoded).unwrap();

                // Assert
                assert_eq!(table.lookup(decoded).unwrap(), encoded, "{target}: {ch:?}");
            }
        }
    }

    #[test]
    fn test_decode_prefers_first_listed_alias() {
        let us = LayoutTable::build(TargetLayout::Us);
        let jis = LayoutTable::build(TargetLayout::Jis);

        assert_eq!(us.decode(us.lookup('@').unwrap()), Some('"'));
        assert_eq!(us.decode(us.lookup('^').unwrap()), Some('&'));
        assert_eq!(jis.decode(jis.lookup('¥').unwrap()), Some('\\'));
        assert_eq!(us.decode(us.lookup('(').unwrap()), Some('('));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let a = LayoutTable::build(TargetLayout::Jis);
        let b = LayoutTable::build(TargetLayout::Jis);
        assert_eq!(a.len(), b.len());
        for ch in a.chars() {
            assert_eq!(a.lookup(ch), b.lookup(ch));
        }
    }

    #[test]
    fn test_target_layout_from_name_defaults_to_us() {
        assert_eq!(TargetLayout::from_name("JIS"), TargetLayout::Jis);
        assert_eq!(TargetLayout::from_name("jp"), TargetLayout::Jis);
        assert_eq!(TargetLayout::from_name("us"), TargetLayout::Us);
        assert_eq!(TargetLayout::from_name("dvorak"), TargetLayout::Us);
        assert_eq!(TargetLayout::from_name(""), TargetLayout::Us);
    }

    #[test]
    fn test_target_layout_serde_uses_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            layout: TargetLayout,
        }

        let parsed: Wrapper = toml::from_str("layout = \"jis\"").unwrap();
        assert_eq!(parsed.layout, TargetLayout::Jis);

        let text = toml::to_string(&Wrapper { layout: TargetLayout::Us }).unwrap();
        assert_eq!(text.trim(), "layout = \"us\"");
    }
}
