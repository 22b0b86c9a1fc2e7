//! HID keyboard page keycodes and the 5 bit modifier field used by action codes.

use heapless::Vec;

pub mod key_range {
    pub const NONE: u8 = 0x00;
    pub const TRANSPARENT: u8 = 0x01;

    pub const BASIC_MIN: u8 = 0x04;
    pub const BASIC_A: u8 = 0x04;
    pub const BASIC_1: u8 = 0x1e;
    pub const BASIC_0: u8 = 0x27;
    pub const BASIC_MAX: u8 = 0xdd;
    pub const MODIFIER_MIN: u8 = 0xe0;
    pub const MODIFIER_MAX: u8 = 0xe7;

    /// Largest usage id that fits the 10 bit usage field.
    pub const USAGE_MAX: u16 = 0x3ff;

    pub const fn is_modifier(kc: u8) -> bool {
        kc >= MODIFIER_MIN && kc <= MODIFIER_MAX
    }
}

pub const A: u8 = 0x04;
pub const B: u8 = 0x05;
pub const C: u8 = 0x06;
pub const D: u8 = 0x07;
pub const E: u8 = 0x08;
pub const J: u8 = 0x0d;
pub const K: u8 = 0x0e;
pub const Q: u8 = 0x14;
pub const S: u8 = 0x16;
pub const N1: u8 = 0x1e;
pub const ENTER: u8 = 0x28;
pub const ESCAPE: u8 = 0x29;
pub const BACKSPACE: u8 = 0x2a;
pub const TAB: u8 = 0x2b;
pub const SPACE: u8 = 0x2c;
pub const MINUS: u8 = 0x2d;
pub const EQUAL: u8 = 0x2e;
pub const SEMICOLON: u8 = 0x33;

pub const LEFT_CTRL: u8 = 0xe0;
pub const LEFT_SHIFT: u8 = 0xe1;
pub const LEFT_ALT: u8 = 0xe2;
pub const LEFT_GUI: u8 = 0xe3;
pub const RIGHT_CTRL: u8 = 0xe4;
pub const RIGHT_SHIFT: u8 = 0xe5;
pub const RIGHT_ALT: u8 = 0xe6;
pub const RIGHT_GUI: u8 = 0xe7;

/// Modifier bits as stored in bits 8-12 of key and mod-tap action codes.
///
/// ```text
///   bit 0 ||||+- Control
///   bit 1 |||+-- Shift
///   bit 2 ||+--- Alt
///   bit 3 |+---- Gui
///   bit 4 +----- Right hand
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mods(u8);

impl Mods {
    pub const NONE: Mods = Mods(0);
    pub const CTRL: Mods = Mods(0x01);
    pub const SHIFT: Mods = Mods(0x02);
    pub const ALT: Mods = Mods(0x04);
    pub const GUI: Mods = Mods(0x08);
    pub const RIGHT: Mods = Mods(0x10);

    pub const MASK: u8 = 0x1f;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn union(self, other: Mods) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Mods) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_right(self) -> bool {
        self.0 & Self::RIGHT.0 != 0
    }

    /// True when no ctrl, shift, alt or gui bit is set. The right hand flag alone selects nothing.
    pub const fn is_empty(self) -> bool {
        self.0 & 0x0f == 0
    }

    /// The mods that the modifier key `kc` (0xe0..=0xe7) stands for.
    pub const fn from_modifier_key(kc: u8) -> Option<Mods> {
        if !key_range::is_modifier(kc) {
            return None;
        }
        let i = kc - key_range::MODIFIER_MIN;
        if i < 4 {
            Some(Mods(1 << i))
        } else {
            Some(Mods(0x10 | (1 << (i - 4))))
        }
    }

    /// HID modifier keycodes to press for these mods. Right hand mods map to 0xe4..=0xe7.
    pub fn keycodes(self) -> Vec<u8, 4> {
        let base = if self.is_right() {
            key_range::MODIFIER_MIN + 4
        } else {
            key_range::MODIFIER_MIN
        };
        let mut codes = Vec::new();
        for i in 0..4 {
            if self.0 & (1 << i) != 0 {
                let _ = codes.push(base + i);
            }
        }
        codes
    }

    /// The modifier keycodes followed by `keycode`, ready for a press report.
    pub fn with_key(self, keycode: u8) -> Vec<u8, 5> {
        let mut codes = Vec::new();
        for kc in self.keycodes() {
            let _ = codes.push(kc);
        }
        if keycode != key_range::NONE {
            let _ = codes.push(keycode);
        }
        codes
    }
}

/// Unshifted keycode and shift flag typing ASCII `c` on a US layout.
pub const fn from_ascii(c: u8) -> Option<(bool, u8)> {
    Some(match c {
        b'a'..=b'z' => (false, A + (c - b'a')),
        b'A'..=b'Z' => (true, A + (c - b'A')),
        b'1'..=b'9' => (false, N1 + (c - b'1')),
        b'0' => (false, key_range::BASIC_0),
        b'\n' => (false, ENTER),
        0x1b => (false, ESCAPE),
        0x08 => (false, BACKSPACE),
        b'\t' => (false, TAB),
        b' ' => (false, SPACE),
        _ => {
            if let Some(kc) = shifted_digit(c) {
                return Some((true, kc));
            }
            let mut i = 0;
            while i < PUNCTUATION.len() {
                let (plain, shifted, kc) = PUNCTUATION[i];
                if c == plain {
                    return Some((false, kc));
                }
                if c == shifted {
                    return Some((true, kc));
                }
                i += 1;
            }
            return None;
        }
    })
}

const PUNCTUATION: [(u8, u8, u8); 11] = [
    (b'-', b'_', MINUS),
    (b'=', b'+', EQUAL),
    (b'[', b'{', 0x2f),
    (b']', b'}', 0x30),
    (b'\\', b'|', 0x31),
    (b';', b':', SEMICOLON),
    (b'\'', b'"', 0x34),
    (b'`', b'~', 0x35),
    (b',', b'<', 0x36),
    (b'.', b'>', 0x37),
    (b'/', b'?', 0x38),
];

const SHIFTED_DIGITS: [u8; 10] = *b"!@#$%^&*()";

const fn shifted_digit(c: u8) -> Option<u8> {
    let mut i = 0;
    while i < SHIFTED_DIGITS.len() {
        if SHIFTED_DIGITS[i] == c {
            return Some(N1 + i as u8);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
