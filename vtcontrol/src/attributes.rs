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


use std::fmt;

bitflags::bitflags! {
    /// Text attributes combined into one SGR sequence.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AttributeFlags: u8 {
        /// SGR 1
        const BOLD = 0b0000_0001;
        /// SGR 4
        const UNDERLINE = 0b0000_0010;
        /// SGR 5
        const BLINK = 0b0000_0100;
        /// SGR 7
        const REVERSE = 0b0000_1000;
        /// SGR 8
        const INVISIBLE = 0b0001_0000;
    }
}

impl AttributeFlags {
    /// Emission order and SGR parameter of each flag.
    const SGR_CODES: [(AttributeFlags, u8); 5] = [
        (AttributeFlags::BOLD, 1),
        (AttributeFlags::UNDERLINE, 4),
        (AttributeFlags::BLINK, 5),
        (AttributeFlags::REVERSE, 7),
        (AttributeFlags::INVISIBLE, 8),
    ];

    /// SGR parameters for the set flags, in fixed order.
    pub fn sgr_codes(self) -> impl Iterator<Item = u8> {
        Self::SGR_CODES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, code)| code)
    }
}

/// One of the eight base ANSI colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// Black, index 0
    #[default]
    Black = 0,
    /// Red, index 1
    Red = 1,
    /// Green, index 2
    Green = 2,
    /// Yellow, index 3
    Yellow = 3,
    /// Blue, index 4
    Blue = 4,
    /// Magenta, index 5
    Magenta = 5,
    /// Cyan, index 6
    Cyan = 6,
    /// White, index 7
    White = 7,
}

impl Color {
    /// Colour for an index in `0..8`.
    pub fn from_index(index: u8) -> Option<Color> {
        match index {
            0 => Some(Color::Black),
            1 => Some(Color::Red),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            4 => Some(Color::Blue),
            5 => Some(Color::Magenta),
            6 => Some(Color::Cyan),
            7 => Some(Color::White),
            _ => None,
        }
    }

    /// Colour index in `0..8`.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// SGR parameter selecting this colour as foreground.
    pub fn foreground(self) -> u8 {
        30 + self.index()
    }

    /// SGR parameter selecting this colour as background.
    pub fn background(self) -> u8 {
        40 + self.index()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Formats `ESC [ <flags ;>* <fg> ; <bg> m`, with `0;` standing in for an empty flag set.
///
/// Output depends on the arguments alone.
pub fn format_sgr(foreground: Color, background: Color, flags: AttributeFlags) -> Vec<u8> {
    let mut sequence = String::with_capacity(24);
    sequence.push_str("\x1b[");
    if flags.is_empty() {
        sequence.push_str("0;");
    }
    for code in flags.sgr_codes() {
        sequence.push_str(&code.to_string());
        sequence.push(';');
    }
    sequence.push_str(&format!(
        "{};{}m",
        foreground.foreground(),
        background.background()
    ));
    sequence.into_bytes()
}

/// Colour capability of a screen mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Monochrome text
    Mono,
    /// Colour text
    Color,
}

/// Character set selected into GL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    /// Shift In, 0x0F
    G0,
    /// Shift Out, 0x0E
    G1,
}

impl CharacterSet {
    /// Locking-shift control byte that selects this set.
    pub fn shift_byte(self) -> u8 {
        match self {
            CharacterSet::G0 => 0x0F,
            CharacterSet::G1 => 0x0E,
        }
    }
}

/// ANSI.SYS screen mode number for a colour mode and geometry.
pub fn screen_mode(mode: ColorMode, cols: u16, rows: u16) -> Option<u8> {
    match (cols, rows, mode) {
        (40, 25, ColorMode::Mono) => Some(0),
        (40, 25, ColorMode::Color) => Some(1),
        (80, 25, ColorMode::Mono) => Some(2),
        (80, 25, ColorMode::Color) => Some(3),
        _ => None,
    }
}
