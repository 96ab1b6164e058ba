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


use termlink_negotiation::{
    NegotiationCommand, NegotiationEngine, NegotiationResult, OptionStatus, OptionTable,
    SubnegotiationKind, Transport,
};

/// Write access to a connection for the terminal control layer.
///
/// Borrows the connection's [`NegotiationEngine`] and transport for the duration of one
/// outbound command, so escape sequences go through the same writer as negotiation frames.
pub struct Outbound<'a> {
    negotiation: &'a mut NegotiationEngine,
    transport: &'a mut dyn Transport,
}

impl<'a> Outbound<'a> {
    /// Pairs an engine with the transport it writes through.
    pub fn new(negotiation: &'a mut NegotiationEngine, transport: &'a mut dyn Transport) -> Self {
        Outbound {
            negotiation,
            transport,
        }
    }

    /// Writes bytes without escaping.
    pub fn send_raw(&mut self, buf: &[u8]) -> NegotiationResult<()> {
        self.negotiation.send_raw(buf, &mut *self.transport)
    }

    /// Writes application text, doubling IAC bytes.
    pub fn send_data(&mut self, buf: &[u8]) -> NegotiationResult<()> {
        self.negotiation.send_data(buf, &mut *self.transport)
    }

    /// Writes one sub-negotiation frame.
    pub fn send_subnegotiation(
        &mut self,
        option: u8,
        kind: SubnegotiationKind,
        payload: &[u8],
    ) -> NegotiationResult<()> {
        self.negotiation
            .send_subnegotiation(option, kind, payload, &mut *self.transport)
    }

    /// Sends `IAC <command> <option>`.
    pub fn negotiate(&mut self, command: NegotiationCommand, option: u8) -> NegotiationResult<()> {
        self.negotiation.negotiate(command, option, &mut *self.transport)
    }

    /// Sends `IAC DO <option>`.
    pub fn set_do(&mut self, option: u8) -> NegotiationResult<()> {
        self.negotiation.set_do(option, &mut *self.transport)
    }

    /// Sends `IAC DONT <option>`.
    pub fn set_dont(&mut self, option: u8) -> NegotiationResult<()> {
        self.negotiation.set_dont(option, &mut *self.transport)
    }

    /// Sends `IAC WILL <option>`.
    pub fn set_will(&mut self, option: u8) -> NegotiationResult<()> {
        self.negotiation.set_will(option, &mut *self.transport)
    }

    /// Sends `IAC WONT <option>`.
    pub fn set_wont(&mut self, option: u8) -> NegotiationResult<()> {
        self.negotiation.set_wont(option, &mut *self.transport)
    }

    /// Terminal name the peer reported, lower-cased.
    pub fn terminal_name(&self) -> Option<&str> {
        self.negotiation.terminal_name()
    }

    /// Negotiated state of one option.
    pub fn option(&self, option: u8) -> OptionStatus {
        self.negotiation.option(option)
    }

    /// Full option table.
    pub fn options(&self) -> &OptionTable {
        self.negotiation.options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termlink_negotiation::consts::option::{ECHO, NAWS};
    use termlink_negotiation::consts::{IAC, WILL};

    #[test]
    fn test_writes_go_through_engine() {
        let mut engine = NegotiationEngine::default();
        let mut wire = Vec::new();
        {
            let mut out = Outbound::new(&mut engine, &mut wire);
            out.set_will(ECHO).unwrap();
            out.send_raw(b"\x1b[2J").unwrap();
            out.send_data(&[b'a', IAC]).unwrap();
            assert!(out.option(ECHO).sent.is_on());
            assert!(!out.option(NAWS).received.is_set());
            assert_eq!(out.terminal_name(), None);
        }
        assert_eq!(wire, vec![IAC, WILL, ECHO, 0x1b, b'[', b'2', b'J', b'a', IAC, IAC]);
    }
}
