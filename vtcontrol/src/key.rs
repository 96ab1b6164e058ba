//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


use enum_kinds::EnumKind;
use std::fmt;

/// A decoded keystroke.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumKind)]
#[enum_kind(KeyKind, derive(Hash))]
pub enum Key {
    /// Printable byte (or any byte at or above 0x80)
    Char(u8),
    /// C0 control byte with no dedicated key, e.g. Ctrl-C
    Control(u8),
    /// Cursor up
    Up,
    /// Cursor down
    Down,
    /// Cursor left
    Left,
    /// Cursor right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Insert
    Insert,
    /// Delete (DEL or `ESC [ 3 ~`)
    Delete,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Backspace (BS)
    Backspace,
    /// Horizontal tab
    Tab,
    /// Line feed
    LineFeed,
    /// Carriage return
    CarriageReturn,
    /// Break (`ESC [ P`)
    Break,
    /// Function key, 1 through 12
    Function(u8),
}

impl Key {
    /// Key for a single byte received in the `Ascii` state, if it is not NUL or ESC.
    pub fn from_byte(byte: u8) -> Option<Key> {
        match byte {
            0x00 | 0x1B => None,
            0x08 => Some(Key::Backspace),
            0x09 => Some(Key::Tab),
            0x0A => Some(Key::LineFeed),
            0x0D => Some(Key::CarriageReturn),
            0x7F => Some(Key::Delete),
            0x01..=0x1F => Some(Key::Control(byte)),
            _ => Some(Key::Char(byte)),
        }
    }

    /// Key selected by the numeric parameter of a `CSI <n> ~` sequence.
    pub fn from_tilde_code(code: u16) -> Option<Key> {
        match code {
            1 | 7 => Some(Key::Home),
            2 => Some(Key::Insert),
            3 => Some(Key::Delete),
            4 | 8 => Some(Key::End),
            5 => Some(Key::PageUp),
            6 => Some(Key::PageDown),
            11..=15 => Some(Key::Function((code - 10) as u8)),
            17..=21 => Some(Key::Function((code - 11) as u8)),
            23 | 24 => Some(Key::Function((code - 12) as u8)),
            _ => None,
        }
    }

    /// Cursor key for a CSI or SS3 final byte `A`..`D`.
    pub fn from_cursor_final(byte: u8) -> Option<Key> {
        match byte {
            b'A' => Some(Key::Up),
            b'B' => Some(Key::Down),
            b'C' => Some(Key::Right),
            b'D' => Some(Key::Left),
            _ => None,
        }
    }

    /// Whether this key carries a printable character.
    pub fn is_char(&self) -> bool {
        matches!(self, Key::Char(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(byte) if byte.is_ascii_graphic() || *byte == b' ' => {
                write!(f, "'{}'", *byte as char)
            }
            Key::Char(byte) => write!(f, "0x{byte:02X}"),
            Key::Control(byte) => write!(f, "Ctrl-{}", (byte + 0x40) as char),
            Key::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{:?}", KeyKind::from(other)),
        }
    }
}
