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


use crate::consts;

///
/// One of the four option negotiation verbs.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NegotiationCommand {
    /// Ask the peer to perform an option.
    Do,
    /// Ask the peer to stop performing an option.
    Dont,
    /// Offer to perform an option.
    Will,
    /// Refuse to perform an option.
    Wont,
}

impl NegotiationCommand {
    /// Wire byte for this verb.
    pub fn to_u8(self) -> u8 {
        match self {
            NegotiationCommand::Do => consts::DO,
            NegotiationCommand::Dont => consts::DONT,
            NegotiationCommand::Will => consts::WILL,
            NegotiationCommand::Wont => consts::WONT,
        }
    }

    /// Parses a verb byte, returning `None` for anything that is not DO/DONT/WILL/WONT.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            consts::DO => Some(NegotiationCommand::Do),
            consts::DONT => Some(NegotiationCommand::Dont),
            consts::WILL => Some(NegotiationCommand::Will),
            consts::WONT => Some(NegotiationCommand::Wont),
            _ => None,
        }
    }

    /// Whether this verb enables the option (DO or WILL).
    pub fn is_positive(self) -> bool {
        matches!(self, NegotiationCommand::Do | NegotiationCommand::Will)
    }
}

impl std::fmt::Display for NegotiationCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationCommand::Do => write!(f, "DO"),
            NegotiationCommand::Dont => write!(f, "DONT"),
            NegotiationCommand::Will => write!(f, "WILL"),
            NegotiationCommand::Wont => write!(f, "WONT"),
        }
    }
}

///
/// Payload kind byte that follows the option code in a sub-negotiation frame.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SubnegotiationKind {
    /// `IS`: the frame carries a value.
    Is,
    /// `SEND`: the frame requests a value.
    Send,
}

impl SubnegotiationKind {
    /// Wire byte for this kind.
    pub fn to_u8(self) -> u8 {
        match self {
            SubnegotiationKind::Is => consts::ttype::IS,
            SubnegotiationKind::Send => consts::ttype::SEND,
        }
    }
}
