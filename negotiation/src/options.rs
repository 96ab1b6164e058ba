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


use crate::NegotiationCommand;

///
/// Negotiation state of one option in one direction.
///
/// Every option starts `Unset`. The first DO/WILL or DONT/WONT observed (or emitted) for the
/// direction moves it to `On` or `Off`, after which it only flips between those two.
///
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OptionState {
    /// Nothing has been negotiated yet.
    #[default]
    Unset,
    /// A DO or WILL was exchanged.
    On,
    /// A DONT or WONT was exchanged.
    Off,
}

impl OptionState {
    /// State implied by a negotiation verb.
    pub fn from_command(command: NegotiationCommand) -> Self {
        if command.is_positive() {
            OptionState::On
        } else {
            OptionState::Off
        }
    }

    /// Whether the option is acknowledged on.
    pub fn is_on(self) -> bool {
        self == OptionState::On
    }

    /// Whether anything has been negotiated for this direction.
    pub fn is_set(self) -> bool {
        self != OptionState::Unset
    }
}

impl std::fmt::Display for OptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionState::Unset => write!(f, "Unset"),
            OptionState::On => write!(f, "On"),
            OptionState::Off => write!(f, "Off"),
        }
    }
}

/// Sent and received negotiation state of a single option.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OptionStatus {
    /// What we last told the peer about this option.
    pub sent: OptionState,
    /// What the peer last told us about this option.
    pub received: OptionState,
}

/// Per-connection option table with one [`OptionStatus`] per option code.
#[derive(Clone, Debug)]
pub struct OptionTable {
    entries: [OptionStatus; 256],
}

impl OptionTable {
    /// Creates a table with every option `Unset` in both directions.
    pub fn new() -> Self {
        OptionTable::default()
    }

    /// Returns the status of an option.
    pub fn get(&self, option: u8) -> OptionStatus {
        self.entries[usize::from(option)]
    }

    /// Returns what we last sent for an option.
    pub fn sent(&self, option: u8) -> OptionState {
        self.entries[usize::from(option)].sent
    }

    /// Returns what the peer last sent for an option.
    pub fn received(&self, option: u8) -> OptionState {
        self.entries[usize::from(option)].received
    }

    /// Records an outbound verb, returning the previous sent state.
    pub(crate) fn record_sent(&mut self, command: NegotiationCommand, option: u8) -> OptionState {
        let entry = &mut self.entries[usize::from(option)];
        std::mem::replace(&mut entry.sent, OptionState::from_command(command))
    }

    /// Records an inbound verb, returning the previous received state.
    pub(crate) fn record_received(
        &mut self,
        command: NegotiationCommand,
        option: u8,
    ) -> OptionState {
        let entry = &mut self.entries[usize::from(option)];
        std::mem::replace(&mut entry.received, OptionState::from_command(command))
    }

    /// Iterates over every option that has been negotiated in at least one direction.
    pub fn negotiated(&self) -> impl Iterator<Item = (u8, OptionStatus)> + '_ {
        (0..=u8::MAX)
            .map(|option| (option, self.get(option)))
            .filter(|(_, status)| status.sent.is_set() || status.received.is_set())
    }
}

impl Default for OptionTable {
    fn default() -> Self {
        OptionTable {
            entries: [OptionStatus::default(); 256],
        }
    }
}
