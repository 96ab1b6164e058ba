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


//! Wire constants for the telnet command framing.

/// Interpret As Command, the sentinel that introduces every in-band command.
pub const IAC: u8 = 255;
/// Request that the peer stop performing an option.
pub const DONT: u8 = 254;
/// Request that the peer start performing an option.
pub const DO: u8 = 253;
/// Refusal to perform an option.
pub const WONT: u8 = 252;
/// Agreement to perform an option.
pub const WILL: u8 = 251;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Go Ahead
pub const GA: u8 = 249;
/// Erase Line
pub const EL: u8 = 248;
/// Erase Character
pub const EC: u8 = 247;
/// Are You There
pub const AYT: u8 = 246;
/// Abort Output
pub const AO: u8 = 245;
/// Interrupt Process
pub const IP: u8 = 244;
/// Break
pub const BRK: u8 = 243;
/// Data Mark
pub const DM: u8 = 242;
/// No Operation
pub const NOP: u8 = 241;
/// Subnegotiation End
pub const SE: u8 = 240;
/// End of Record
pub const EOR: u8 = 239;

/// Largest sub-negotiation payload accepted for a single outbound frame.
pub const MAX_SUBNEGOTIATION_PAYLOAD: usize = 250;

/// Option codes from the IANA telnet option registry that this crate acts on.
pub mod option {
    /// Echo [RFC857](https://tools.ietf.org/html/rfc857)
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead [RFC858](https://tools.ietf.org/html/rfc858)
    pub const SGA: u8 = 3;
    /// Terminal Type [RFC1091](https://tools.ietf.org/html/rfc1091)
    pub const TTYPE: u8 = 24;
    /// Negotiate About Window Size [RFC1073](https://tools.ietf.org/html/rfc1073)
    pub const NAWS: u8 = 31;
}

/// Terminal type sub-negotiation payload kinds.
pub mod ttype {
    /// The payload carries the terminal name.
    pub const IS: u8 = 0;
    /// Request for the peer's terminal name.
    pub const SEND: u8 = 1;
}
