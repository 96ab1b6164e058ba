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


//! Negotiate About Window Size
//!

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

/// Window geometry carried by a NAWS sub-negotiation.
///
/// The four fields are the four payload bytes in wire order: the high and low halves of the
/// width followed by the high and low halves of the height. [`WindowGeometry::cols`] and
/// [`WindowGeometry::rows`] reassemble the big-endian halves.
///
/// # Example
/// ```
/// use termlink_negotiation::WindowGeometry;
///
/// let size = WindowGeometry::new(80, 24);
/// assert_eq!(size.max_cols, 80);
/// assert_eq!(size.rows(), 24);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WindowGeometry {
    /// High byte of the width
    pub min_cols: u8,
    /// Low byte of the width
    pub max_cols: u8,
    /// High byte of the height
    pub min_rows: u8,
    /// Low byte of the height
    pub max_rows: u8,
}

impl WindowGeometry {
    /// Creates a geometry from a width and height in characters.
    pub fn new(cols: u16, rows: u16) -> Self {
        let [min_cols, max_cols] = cols.to_be_bytes();
        let [min_rows, max_rows] = rows.to_be_bytes();
        WindowGeometry {
            min_cols,
            max_cols,
            min_rows,
            max_rows,
        }
    }

    /// Creates a geometry from the four payload bytes in wire order.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        WindowGeometry {
            min_cols: bytes[0],
            max_cols: bytes[1],
            min_rows: bytes[2],
            max_rows: bytes[3],
        }
    }

    /// Width in characters.
    pub fn cols(&self) -> u16 {
        BigEndian::read_u16(&[self.min_cols, self.max_cols])
    }

    /// Height in characters.
    pub fn rows(&self) -> u16 {
        BigEndian::read_u16(&[self.min_rows, self.max_rows])
    }

    /// The four payload bytes in wire order.
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.min_cols, self.max_cols, self.min_rows, self.max_rows]
    }

    /// Writes the width followed by the height as big-endian u16 values.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols())?;
        writer.write_u16::<BigEndian>(self.rows())?;
        Ok(4)
    }
}

impl Default for WindowGeometry {
    /// The traditional 80x24 terminal.
    fn default() -> Self {
        WindowGeometry::new(80, 24)
    }
}

impl std::fmt::Display for WindowGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols(), self.rows())
    }
}
