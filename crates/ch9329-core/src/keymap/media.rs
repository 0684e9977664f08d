//! Multimedia keys carried by the CH9329 media report (command 0x03).
//!
//! The media payload is four bytes: report ID `0x02` followed by a 24-bit
//! bitmask, one bit per key:
//!
//! ```text
//! byte 1: EJECT  CD_STOP  PREV   NEXT    PLAY   MUTE    VOL-     VOL+
//! byte 2: REFRSH WWW_STOP FWD    BACK    HOME   FAVS    SEARCH   MAIL
//! byte 3: REWIND RECORD   MINIM  MY_PC   SCRSV  CALC    EXPLORER MEDIA
//!         bit7                                                   bit0
//! ```

use std::fmt;
use std::str::FromStr;

use crate::keymap::KeymapError;

/// Report ID the CH9329 expects for consumer-control keys.
pub const MEDIA_REPORT_ID: u8 = 0x02;

/// A multimedia key.
///
/// The discriminant is the key's bit position in the 24-bit mask
/// (0 = byte 1 bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MediaKey {
    VolumeUp = 0,
    VolumeDown = 1,
    Mute = 2,
    PlayPause = 3,
    NextTrack = 4,
    PrevTrack = 5,
    Stop = 6,
    Eject = 7,
    Mail = 8,
    Search = 9,
    Favorites = 10,
    BrowserHome = 11,
    BrowserBack = 12,
    BrowserForward = 13,
    BrowserStop = 14,
    Refresh = 15,
    MediaPlayer = 16,
    Explorer = 17,
    Calculator = 18,
    ScreenSaver = 19,
    MyComputer = 20,
    Minimize = 21,
    Record = 22,
    Rewind = 23,
}

impl MediaKey {
    /// Every media key, in bitmask order.
    pub const ALL: [MediaKey; 24] = [
        MediaKey::VolumeUp,
        MediaKey::VolumeDown,
        MediaKey::Mute,
        MediaKey::PlayPause,
        MediaKey::NextTrack,
        MediaKey::PrevTrack,
        MediaKey::Stop,
        MediaKey::Eject,
        MediaKey::Mail,
        MediaKey::Search,
        MediaKey::Favorites,
        MediaKey::BrowserHome,
        MediaKey::BrowserBack,
        MediaKey::BrowserForward,
        MediaKey::BrowserStop,
        MediaKey::Refresh,
        MediaKey::MediaPlayer,
        MediaKey::Explorer,
        MediaKey::Calculator,
        MediaKey::ScreenSaver,
        MediaKey::MyComputer,
        MediaKey::Minimize,
        MediaKey::Record,
        MediaKey::Rewind,
    ];

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            MediaKey::VolumeUp => "VOLUME_UP",
            MediaKey::VolumeDown => "VOLUME_DOWN",
            MediaKey::Mute => "MUTE",
            MediaKey::PlayPause => "PLAY_PAUSE",
            MediaKey::NextTrack => "NEXT_TRACK",
            MediaKey::PrevTrack => "PREV_TRACK",
            MediaKey::Stop => "STOP",
            MediaKey::Eject => "EJECT",
            MediaKey::Mail => "MAIL",
            MediaKey::Search => "SEARCH",
            MediaKey::Favorites => "FAVORITES",
            MediaKey::BrowserHome => "BROWSER_HOME",
            MediaKey::BrowserBack => "BROWSER_BACK",
            MediaKey::BrowserForward => "BROWSER_FORWARD",
            MediaKey::BrowserStop => "BROWSER_STOP",
            MediaKey::Refresh => "REFRESH",
            MediaKey::MediaPlayer => "MEDIA",
            MediaKey::Explorer => "EXPLORER",
            MediaKey::Calculator => "CALCULATOR",
            MediaKey::ScreenSaver => "SCREENSAVER",
            MediaKey::MyComputer => "MY_COMPUTER",
            MediaKey::Minimize => "MINIMIZE",
            MediaKey::Record => "RECORD",
            MediaKey::Rewind => "REWIND",
        }
    }

    /// Position of this key in the 24-bit mask (0 = byte 1 bit 0).
    fn bit_index(self) -> usize {
        self as usize
    }

    /// The full four-byte media payload with only this key held.
    pub fn report(self) -> [u8; 4] {
        let bit = self.bit_index();
        let mut payload = [MEDIA_REPORT_ID, 0x00, 0x00, 0x00];
        payload[1 + bit / 8] = 1 << (bit % 8);
        payload
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaKey {
    type Err = KeymapError;

    /// Case-insensitive; `-` and spaces are treated like `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        MediaKey::ALL
            .iter()
            .copied()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| KeymapError::UnsupportedMediaKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_up_is_first_bit_of_first_mask_byte() {
        assert_eq!(MediaKey::VolumeUp.report(), [0x02, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_mute_and_play_pause_bits() {
        assert_eq!(MediaKey::Mute.report(), [0x02, 0x04, 0x00, 0x00]);
        assert_eq!(MediaKey::PlayPause.report(), [0x02, 0x08, 0x00, 0x00]);
    }

    #[test]
    fn test_browser_and_system_keys_land_in_later_bytes() {
        assert_eq!(MediaKey::Mail.report(), [0x02, 0x00, 0x01, 0x00]);
        assert_eq!(MediaKey::Refresh.report(), [0x02, 0x00, 0x80, 0x00]);
        assert_eq!(MediaKey::Calculator.report(), [0x02, 0x00, 0x00, 0x04]);
        assert_eq!(MediaKey::Rewind.report(), [0x02, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_every_key_sets_exactly_one_bit() {
        for key in MediaKey::ALL {
            let report = key.report();
            let bits: u32 = report[1..].iter().map(|b| b.count_ones()).sum();
            assert_eq!(bits, 1, "{key} must set exactly one bit");
            assert_eq!(report[0], MEDIA_REPORT_ID);
        }
    }

    #[test]
    fn test_every_key_has_a_distinct_bit() {
        let mut seen = 0u32;
        for key in MediaKey::ALL {
            let report = key.report();
            let mask = u32::from_le_bytes([report[1], report[2], report[3], 0]);
            assert_eq!(seen & mask, 0, "{key} shares a bit with another key");
            seen |= mask;
        }
        assert_eq!(seen, 0x00FF_FFFF);
    }

    #[test]
    fn test_names_parse_with_loose_separators() {
        assert_eq!("volume-up".parse::<MediaKey>(), Ok(MediaKey::VolumeUp));
        assert_eq!("Play Pause".parse::<MediaKey>(), Ok(MediaKey::PlayPause));
        assert_eq!(
            "TURBO".parse::<MediaKey>(),
            Err(KeymapError::UnsupportedMediaKey("TURBO".to_string()))
        );
    }
}
