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


use crate::{NegotiationCommand, OptionTable, ProtocolError, SubnegotiationKind, WindowGeometry};

///
/// A response a listener asks the engine to send on its behalf.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    /// Send `IAC <command> <option>` and record it in the sent table.
    Negotiate(NegotiationCommand, u8),
    /// Send `IAC SB <option> <kind> <payload> IAC SE`.
    Subnegotiate {
        /// Option code
        option: u8,
        /// Payload kind
        kind: SubnegotiationKind,
        /// Payload bytes, unescaped
        payload: Vec<u8>,
    },
}

/// Observer of a [`crate::NegotiationEngine`].
///
/// Every method has a no-op default so implementors only handle the events they care about.
/// Callbacks run inline inside the engine call that produced them, in byte-stream order.
pub trait NegotiationListener {
    /// The connection was established.
    fn on_connect(&mut self) {}

    /// The connection was closed. Delivered at most once.
    fn on_close(&mut self) {}

    /// The transport failed underneath the engine.
    fn on_transport_error(&mut self, _error: &std::io::Error) {}

    /// A run of pass-through payload bytes.
    fn on_recv(&mut self, _data: &[u8]) {}

    /// A DO/DONT/WILL/WONT was received and the received table was updated.
    fn on_option_changed(&mut self, _command: NegotiationCommand, _option: u8) {}

    /// A DO/DONT/WILL/WONT arrived for a (command, option) pair with no built-in action.
    fn on_unmapped_option(
        &mut self,
        _command: NegotiationCommand,
        _option: u8,
        _options: &OptionTable,
    ) -> Option<Reply> {
        None
    }

    /// A complete sub-negotiation arrived for an option with no built-in grammar.
    fn on_unmapped_subnegotiation(&mut self, _option: u8, _payload: &[u8]) -> Option<Reply> {
        None
    }

    /// The peer reported its terminal name (already lower-cased).
    fn on_terminal_name(&mut self, _name: &str) {}

    /// The peer reported its window geometry.
    fn on_window_size(&mut self, _geometry: WindowGeometry) {}

    /// The framing state machine resynchronised after unexpected input.
    fn on_protocol_error(&mut self, _error: &ProtocolError) {}
}
