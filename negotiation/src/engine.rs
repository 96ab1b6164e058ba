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


use crate::{
    NegotiationCommand, NegotiationConfig, NegotiationError, NegotiationListener,
    NegotiationResult, OptionStatus, OptionTable, ProtocolError, Reply, SubnegotiationKind,
    Transport, WindowGeometry, consts,
};
use bytes::{BufMut, BytesMut};
use tracing::{debug, trace, warn};

/// Telnet option negotiation engine.
///
/// `NegotiationEngine` splits a raw byte stream into pass-through payload, which is handed to
/// the listener in bulk, and in-band commands, which update the per-option state table, run
/// the built-in actions and surface everything else to the listener.
///
/// The engine owns no transport and no listener. Both are borrowed for the duration of each
/// call, so one engine per connection can be driven from whatever owns the socket.
///
/// # Example
/// ```
/// use termlink_negotiation::{NegotiationEngine, NegotiationListener};
///
/// struct Printer;
/// impl NegotiationListener for Printer {
///     fn on_recv(&mut self, data: &[u8]) {
///         println!("{}", String::from_utf8_lossy(data));
///     }
/// }
///
/// let mut engine = NegotiationEngine::default();
/// let mut wire = Vec::new();
/// engine.on_bytes(b"hello\xFF\xFD\x18", &mut Printer, &mut wire).unwrap();
/// assert_eq!(wire, vec![255, 251, 24]);
/// ```
#[derive(Clone, Debug)]
pub struct NegotiationEngine {
    config: NegotiationConfig,
    state: NegotiationState,
    options: OptionTable,
    buffer: Vec<u8>,
    window: [u8; 4],
    terminal_name: Option<String>,
    closed: bool,
}

impl NegotiationEngine {
    /// Creates an engine with the given configuration and every option unset.
    pub fn new(config: NegotiationConfig) -> Self {
        NegotiationEngine {
            config,
            state: NegotiationState::Idle,
            options: OptionTable::new(),
            buffer: Vec::new(),
            window: [0; 4],
            terminal_name: None,
            closed: false,
        }
    }

    /// Current parse state.
    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Full option table.
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Sent and received state of one option.
    pub fn option(&self, option: u8) -> OptionStatus {
        self.options.get(option)
    }

    /// Terminal name most recently reported by the peer, lower-cased.
    pub fn terminal_name(&self) -> Option<&str> {
        self.terminal_name.as_deref()
    }

    /// Whether [`NegotiationEngine::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Replaces the local window geometry, announcing it if NAWS is already agreed.
    pub fn set_window<T>(&mut self, window: WindowGeometry, transport: &mut T) -> NegotiationResult<()>
    where
        T: Transport + ?Sized,
    {
        self.config.window = window;
        if self.options.sent(consts::option::NAWS).is_on() {
            self.send_window_size(transport)?;
        }
        Ok(())
    }

    // #### Lifecycle ##########################################################

    /// Delivers the connect notification.
    pub fn connect<L>(&mut self, listener: &mut L)
    where
        L: NegotiationListener + ?Sized,
    {
        debug!("connection opened");
        listener.on_connect();
    }

    /// Delivers the close notification once; later input is ignored.
    pub fn close<L>(&mut self, listener: &mut L)
    where
        L: NegotiationListener + ?Sized,
    {
        if !self.closed {
            debug!("connection closed");
            self.closed = true;
            listener.on_close();
        }
    }

    /// Reports a transport failure to the listener.
    pub fn transport_error<L>(&mut self, listener: &mut L, error: &std::io::Error)
    where
        L: NegotiationListener + ?Sized,
    {
        tracing::error!(%error, "transport failure");
        listener.on_transport_error(error);
    }

    // #### Inbound ############################################################

    /// Consumes a buffer of raw bytes from the transport.
    ///
    /// Runs of payload between commands are delivered to [`NegotiationListener::on_recv`] as
    /// one slice each. Partial commands persist across calls. The only error is a failed
    /// auto-response write.
    pub fn on_bytes<L, T>(&mut self, buf: &[u8], listener: &mut L, transport: &mut T) -> NegotiationResult<()>
    where
        L: NegotiationListener + ?Sized,
        T: Transport + ?Sized,
    {
        if self.closed {
            debug!(len = buf.len(), "dropping input after close");
            return Ok(());
        }
        let mut rest = buf;
        while !rest.is_empty() {
            if self.state == NegotiationState::Idle {
                match rest.iter().position(|&byte| byte == consts::IAC) {
                    None => {
                        listener.on_recv(rest);
                        return Ok(());
                    }
                    Some(index) => {
                        if index > 0 {
                            listener.on_recv(&rest[..index]);
                        }
                        self.state = NegotiationState::SawIac;
                        rest = &rest[index + 1..];
                    }
                }
            } else {
                let byte = rest[0];
                rest = &rest[1..];
                self.step(byte, listener, transport)?;
            }
        }
        Ok(())
    }

    fn step<L, T>(&mut self, byte: u8, listener: &mut L, transport: &mut T) -> NegotiationResult<()>
    where
        L: NegotiationListener + ?Sized,
        T: Transport + ?Sized,
    {
        trace!(state = self.state.name(), byte, "negotiation byte");
        match self.state {
            NegotiationState::Idle => {
                if byte == consts::IAC {
                    self.state = NegotiationState::SawIac;
                } else {
                    listener.on_recv(&[byte]);
                }
            }
            NegotiationState::SawIac => self.step_command(byte, listener),
            NegotiationState::AwaitOptionFor(command) => {
                self.state = NegotiationState::Idle;
                self.handle_option(command, byte, listener, transport)?;
            }
            NegotiationState::InSubnegotiation => {
                self.buffer.clear();
                self.state = match byte {
                    consts::option::TTYPE => NegotiationState::InSubnegotiationTermType,
                    consts::option::NAWS => NegotiationState::InSubnegotiationWindowSize {
                        received: 0,
                        iac: false,
                    },
                    option => NegotiationState::InSubnegotiationUnmapped { option, iac: false },
                };
            }
            NegotiationState::InSubnegotiationTermType => match byte {
                consts::ttype::IS => {
                    self.state = NegotiationState::InSubnegotiationTermTypeIs { iac: false };
                }
                consts::ttype::SEND => {
                    self.state = NegotiationState::AwaitSubnegotiationEnd { iac: false };
                    self.send_terminal_name(transport)?;
                }
                _ => self.desync_subnegotiation(byte, listener),
            },
            NegotiationState::InSubnegotiationTermTypeIs { iac: false } => {
                if byte == consts::IAC {
                    self.state = NegotiationState::InSubnegotiationTermTypeIs { iac: true };
                } else {
                    self.buffer.push(byte);
                }
            }
            NegotiationState::InSubnegotiationTermTypeIs { iac: true } => match byte {
                consts::SE => {
                    self.state = NegotiationState::Idle;
                    let name = String::from_utf8_lossy(&self.buffer).to_ascii_lowercase();
                    self.buffer.clear();
                    debug!(terminal = %name, "peer terminal type");
                    listener.on_terminal_name(&name);
                    self.terminal_name = Some(name);
                }
                consts::IAC => {
                    self.buffer.push(consts::IAC);
                    self.state = NegotiationState::InSubnegotiationTermTypeIs { iac: false };
                }
                _ => self.desync_subnegotiation(byte, listener),
            },
            NegotiationState::InSubnegotiationWindowSize { received, iac: false } => {
                if byte == consts::IAC {
                    self.state = NegotiationState::InSubnegotiationWindowSize { received, iac: true };
                } else if received < 4 {
                    self.push_window_byte(received, byte);
                } else {
                    self.desync_subnegotiation(byte, listener);
                }
            }
            NegotiationState::InSubnegotiationWindowSize { received, iac: true } => match byte {
                consts::IAC if received < 4 => self.push_window_byte(received, consts::IAC),
                consts::SE if received == 4 => {
                    self.state = NegotiationState::Idle;
                    let geometry = WindowGeometry::from_bytes(self.window);
                    debug!(%geometry, "peer window size");
                    listener.on_window_size(geometry);
                }
                consts::SE => {
                    self.state = NegotiationState::Idle;
                    self.report(
                        listener,
                        ProtocolError::TruncatedSubnegotiation {
                            option: consts::option::NAWS,
                            received: usize::from(received),
                            expected: 4,
                        },
                    );
                }
                _ => self.desync_subnegotiation(byte, listener),
            },
            NegotiationState::InSubnegotiationUnmapped { option, iac: false } => {
                if byte == consts::IAC {
                    self.state = NegotiationState::InSubnegotiationUnmapped { option, iac: true };
                } else {
                    self.buffer.push(byte);
                }
            }
            NegotiationState::InSubnegotiationUnmapped { option, iac: true } => match byte {
                consts::SE => {
                    self.state = NegotiationState::Idle;
                    debug!(option, len = self.buffer.len(), "unmapped sub-negotiation");
                    let reply = listener.on_unmapped_subnegotiation(option, &self.buffer);
                    self.buffer.clear();
                    if let Some(reply) = reply {
                        self.send_reply(reply, transport)?;
                    }
                }
                consts::IAC => {
                    self.buffer.push(consts::IAC);
                    self.state = NegotiationState::InSubnegotiationUnmapped { option, iac: false };
                }
                _ => self.desync_subnegotiation(byte, listener),
            },
            NegotiationState::AwaitSubnegotiationEnd { iac: false } => {
                if byte == consts::IAC {
                    self.state = NegotiationState::AwaitSubnegotiationEnd { iac: true };
                } else {
                    self.desync_subnegotiation(byte, listener);
                }
            }
            NegotiationState::AwaitSubnegotiationEnd { iac: true } => {
                if byte == consts::SE {
                    self.state = NegotiationState::Idle;
                } else {
                    self.desync_subnegotiation(byte, listener);
                }
            }
            NegotiationState::DiscardSubnegotiation { iac } => {
                self.state = match (iac, byte) {
                    (true, consts::SE) => NegotiationState::Idle,
                    (_, consts::IAC) => NegotiationState::DiscardSubnegotiation { iac: !iac },
                    _ => NegotiationState::DiscardSubnegotiation { iac: false },
                };
            }
        }
        Ok(())
    }

    fn step_command<L>(&mut self, byte: u8, listener: &mut L)
    where
        L: NegotiationListener + ?Sized,
    {
        self.state = NegotiationState::Idle;
        match byte {
            consts::IAC => listener.on_recv(&[consts::IAC]),
            consts::DO | consts::DONT | consts::WILL | consts::WONT => {
                if let Some(command) = NegotiationCommand::from_u8(byte) {
                    self.state = NegotiationState::AwaitOptionFor(command);
                }
            }
            consts::SB => self.state = NegotiationState::InSubnegotiation,
            consts::DM
            | consts::BRK
            | consts::IP
            | consts::AO
            | consts::AYT
            | consts::EC
            | consts::EL
            | consts::GA
            | consts::NOP
            | consts::EOR => trace!(command = byte, "ignoring single-byte command"),
            consts::SE => self.report(
                listener,
                ProtocolError::UnexpectedByte {
                    state: NegotiationState::SawIac.name(),
                    byte,
                },
            ),
            command => self.report(listener, ProtocolError::UnknownCommand { command }),
        }
    }

    fn handle_option<L, T>(
        &mut self,
        command: NegotiationCommand,
        option: u8,
        listener: &mut L,
        transport: &mut T,
    ) -> NegotiationResult<()>
    where
        L: NegotiationListener + ?Sized,
        T: Transport + ?Sized,
    {
        let previous = self.options.record_received(command, option);
        debug!(%command, option, %previous, "received negotiation");
        match self.action_for(command, option) {
            Some(Action::AnnounceTerminalType) => {
                if !self.options.sent(consts::option::TTYPE).is_on() {
                    self.set_will(consts::option::TTYPE, transport)?;
                }
            }
            Some(Action::SendWindowSize) => {
                if !self.options.sent(consts::option::NAWS).is_on() {
                    self.set_will(consts::option::NAWS, transport)?;
                }
                self.send_window_size(transport)?;
            }
            Some(Action::RequestTerminalType) => {
                if !self.options.sent(consts::option::TTYPE).is_on() {
                    self.set_do(consts::option::TTYPE, transport)?;
                }
                if !previous.is_on() {
                    self.send_subnegotiation(
                        consts::option::TTYPE,
                        SubnegotiationKind::Send,
                        &[],
                        transport,
                    )?;
                }
            }
            None => {
                debug!(%command, option, "unmapped option");
                if let Some(reply) = listener.on_unmapped_option(command, option, &self.options) {
                    self.send_reply(reply, transport)?;
                }
            }
        }
        listener.on_option_changed(command, option);
        Ok(())
    }

    fn action_for(&self, command: NegotiationCommand, option: u8) -> Option<Action> {
        match (command, option) {
            (NegotiationCommand::Do, consts::option::TTYPE) => Some(Action::AnnounceTerminalType),
            (NegotiationCommand::Do, consts::option::NAWS) => Some(Action::SendWindowSize),
            (NegotiationCommand::Will, consts::option::TTYPE)
                if self.config.request_terminal_type =>
            {
                Some(Action::RequestTerminalType)
            }
            _ => None,
        }
    }

    fn push_window_byte(&mut self, received: u8, byte: u8) {
        self.window[usize::from(received)] = byte;
        self.state = NegotiationState::InSubnegotiationWindowSize {
            received: received + 1,
            iac: false,
        };
    }

    fn desync_subnegotiation<L>(&mut self, byte: u8, listener: &mut L)
    where
        L: NegotiationListener + ?Sized,
    {
        let state = self.state.name();
        self.buffer.clear();
        // An IAC here may already be the start of the closing IAC SE.
        self.state = NegotiationState::DiscardSubnegotiation {
            iac: byte == consts::IAC,
        };
        self.report(listener, ProtocolError::UnexpectedByte { state, byte });
    }

    fn report<L>(&mut self, listener: &mut L, error: ProtocolError)
    where
        L: NegotiationListener + ?Sized,
    {
        warn!(%error, "negotiation desynchronised");
        listener.on_protocol_error(&error);
    }

    // #### Outbound ###########################################################

    /// Sends `IAC DO <option>`.
    pub fn set_do<T: Transport + ?Sized>(&mut self, option: u8, transport: &mut T) -> NegotiationResult<()> {
        self.negotiate(NegotiationCommand::Do, option, transport)
    }

    /// Sends `IAC DONT <option>`.
    pub fn set_dont<T: Transport + ?Sized>(&mut self, option: u8, transport: &mut T) -> NegotiationResult<()> {
        self.negotiate(NegotiationCommand::Dont, option, transport)
    }

    /// Sends `IAC WILL <option>`.
    pub fn set_will<T: Transport + ?Sized>(&mut self, option: u8, transport: &mut T) -> NegotiationResult<()> {
        self.negotiate(NegotiationCommand::Will, option, transport)
    }

    /// Sends `IAC WONT <option>`.
    pub fn set_wont<T: Transport + ?Sized>(&mut self, option: u8, transport: &mut T) -> NegotiationResult<()> {
        self.negotiate(NegotiationCommand::Wont, option, transport)
    }

    /// Records `command` in the sent table and writes the 3-byte frame.
    pub fn negotiate<T>(&mut self, command: NegotiationCommand, option: u8, transport: &mut T) -> NegotiationResult<()>
    where
        T: Transport + ?Sized,
    {
        self.options.record_sent(command, option);
        trace!(%command, option, "sending negotiation");
        transport.write(&[consts::IAC, command.to_u8(), option])?;
        Ok(())
    }

    /// Writes `IAC SB <option> <kind> <payload> IAC SE` as one frame.
    ///
    /// Payload bytes equal to IAC are doubled on the wire. Payloads longer than
    /// [`consts::MAX_SUBNEGOTIATION_PAYLOAD`] must be chunked by the caller.
    pub fn send_subnegotiation<T>(
        &mut self,
        option: u8,
        kind: SubnegotiationKind,
        payload: &[u8],
        transport: &mut T,
    ) -> NegotiationResult<()>
    where
        T: Transport + ?Sized,
    {
        if payload.len() > consts::MAX_SUBNEGOTIATION_PAYLOAD {
            return Err(NegotiationError::payload_too_large(option, payload.len()));
        }
        let mut frame = BytesMut::with_capacity(6 + payload.len() * 2);
        frame.put_u8(consts::IAC);
        frame.put_u8(consts::SB);
        frame.put_u8(option);
        frame.put_u8(kind.to_u8());
        put_escaped(&mut frame, payload);
        frame.put_u8(consts::IAC);
        frame.put_u8(consts::SE);
        trace!(option, len = payload.len(), "sending sub-negotiation");
        transport.write(&frame)?;
        Ok(())
    }

    /// Writes application payload, doubling every IAC byte.
    pub fn send_data<T: Transport + ?Sized>(&mut self, buf: &[u8], transport: &mut T) -> NegotiationResult<()> {
        if !buf.contains(&consts::IAC) {
            transport.write(buf)?;
            return Ok(());
        }
        let mut escaped = BytesMut::with_capacity(buf.len() + 8);
        put_escaped(&mut escaped, buf);
        transport.write(&escaped)?;
        Ok(())
    }

    /// Writes bytes straight to the transport without escaping.
    pub fn send_raw<T: Transport + ?Sized>(&mut self, buf: &[u8], transport: &mut T) -> NegotiationResult<()> {
        transport.write(buf)?;
        Ok(())
    }

    fn send_terminal_name<T: Transport + ?Sized>(&mut self, transport: &mut T) -> NegotiationResult<()> {
        let name = self.config.terminal_name.clone();
        debug!(terminal = %name, "answering terminal type request");
        self.send_subnegotiation(
            consts::option::TTYPE,
            SubnegotiationKind::Is,
            name.as_bytes(),
            transport,
        )
    }

    fn send_window_size<T: Transport + ?Sized>(&mut self, transport: &mut T) -> NegotiationResult<()> {
        let mut frame = BytesMut::with_capacity(13);
        frame.put_u8(consts::IAC);
        frame.put_u8(consts::SB);
        frame.put_u8(consts::option::NAWS);
        let mut payload = Vec::with_capacity(4);
        self.config.window.write(&mut payload)?;
        put_escaped(&mut frame, &payload);
        frame.put_u8(consts::IAC);
        frame.put_u8(consts::SE);
        trace!(window = %self.config.window, "sending window size");
        transport.write(&frame)?;
        Ok(())
    }

    fn send_reply<T: Transport + ?Sized>(&mut self, reply: Reply, transport: &mut T) -> NegotiationResult<()> {
        match reply {
            Reply::Negotiate(command, option) => self.negotiate(command, option, transport),
            Reply::Subnegotiate {
                option,
                kind,
                payload,
            } => self.send_subnegotiation(option, kind, &payload, transport),
        }
    }
}

impl Default for NegotiationEngine {
    fn default() -> Self {
        NegotiationEngine::new(NegotiationConfig::default())
    }
}

fn put_escaped(frame: &mut BytesMut, payload: &[u8]) {
    for &byte in payload {
        if byte == consts::IAC {
            frame.put_u8(consts::IAC);
        }
        frame.put_u8(byte);
    }
}

/// Built-in responses keyed by (command, option).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Action {
    AnnounceTerminalType,
    SendWindowSize,
    RequestTerminalType,
}

///
/// Parse position of the command framing state machine.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NegotiationState {
    /// Passing payload through.
    Idle,
    /// Received IAC, next byte is a command.
    SawIac,
    /// Received a negotiation verb, next byte is the option code.
    AwaitOptionFor(NegotiationCommand),
    /// Received `IAC SB`, next byte is the option code.
    InSubnegotiation,
    /// Inside `SB TERMINAL-TYPE`, next byte is IS or SEND.
    InSubnegotiationTermType,
    /// Collecting a terminal name after `SB TERMINAL-TYPE IS`.
    InSubnegotiationTermTypeIs {
        /// The previous byte was an IAC
        iac: bool,
    },
    /// Collecting the four NAWS bytes.
    InSubnegotiationWindowSize {
        /// Number of geometry bytes already collected
        received: u8,
        /// The previous byte was an IAC
        iac: bool,
    },
    /// Collecting the payload of an option with no built-in grammar.
    InSubnegotiationUnmapped {
        /// Option being sub-negotiated
        option: u8,
        /// The previous byte was an IAC
        iac: bool,
    },
    /// Expecting the closing `IAC SE`.
    AwaitSubnegotiationEnd {
        /// The previous byte was an IAC
        iac: bool,
    },
    /// Skipping a malformed sub-negotiation up to the next `IAC SE`.
    DiscardSubnegotiation {
        /// The previous byte was an IAC
        iac: bool,
    },
}

impl NegotiationState {
    /// Short name used in logs and protocol errors.
    pub fn name(&self) -> &'static str {
        match self {
            NegotiationState::Idle => "Idle",
            NegotiationState::SawIac => "SawIac",
            NegotiationState::AwaitOptionFor(_) => "AwaitOption",
            NegotiationState::InSubnegotiation => "InSubnegotiation",
            NegotiationState::InSubnegotiationTermType => "InSubnegotiationTermType",
            NegotiationState::InSubnegotiationTermTypeIs { .. } => "InSubnegotiationTermTypeIs",
            NegotiationState::InSubnegotiationWindowSize { .. } => "InSubnegotiationWindowSize",
            NegotiationState::InSubnegotiationUnmapped { .. } => "InSubnegotiationUnmapped",
            NegotiationState::AwaitSubnegotiationEnd { .. } => "AwaitSubnegotiationEnd",
            NegotiationState::DiscardSubnegotiation { .. } => "DiscardSubnegotiation",
        }
    }
}
