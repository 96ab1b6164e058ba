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


use crate::{Key, ListenerSet, TerminalConfig, TerminalListener};
use std::sync::Arc;
use termlink_negotiation::consts::option::{ECHO, NAWS, SGA, TTYPE};
use termlink_negotiation::{
    NegotiationCommand, NegotiationListener, OptionState, OptionTable, ProtocolError, Reply,
    WindowGeometry,
};
use tracing::{debug, trace, warn};

const ESC: u8 = 0x1B;

///
/// Parse position of the escape sequence state machine.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TerminalParseState {
    /// Plain input
    #[default]
    Ascii,
    /// After ESC
    Escape,
    /// After `ESC [`
    Csi,
    /// After `ESC [ ?`, collecting a private mode report
    CsiMode,
    /// Collecting CSI parameters
    CsiArg,
    /// After `ESC O`
    FunctionKeyPrefix1,
    /// After `ESC [ [`
    FunctionKeyPrefix2,
    /// After `ESC (`
    CharsetG0,
    /// After `ESC )`
    CharsetG1,
}

impl TerminalParseState {
    /// Short name used in logs and protocol errors.
    pub fn name(&self) -> &'static str {
        match self {
            TerminalParseState::Ascii => "Ascii",
            TerminalParseState::Escape => "Escape",
            TerminalParseState::Csi => "Csi",
            TerminalParseState::CsiMode => "CsiMode",
            TerminalParseState::CsiArg => "CsiArg",
            TerminalParseState::FunctionKeyPrefix1 => "FunctionKeyPrefix1",
            TerminalParseState::FunctionKeyPrefix2 => "FunctionKeyPrefix2",
            TerminalParseState::CharsetG0 => "CharsetG0",
            TerminalParseState::CharsetG1 => "CharsetG1",
        }
    }
}

/// VT100/ANSI terminal control engine.
///
/// Decodes the payload a [`termlink_negotiation::NegotiationEngine`] passes through into
/// [`Key`] events, fans connection events out to its [`TerminalListener`]s, and formats
/// outbound escape sequences (see the command methods taking an [`crate::Outbound`]).
///
/// The engine is the negotiation engine's listener: hand it to
/// [`termlink_negotiation::NegotiationEngine::on_bytes`], or let [`crate::Terminal`] do it.
#[derive(Debug)]
pub struct TerminalControlEngine {
    pub(crate) config: TerminalConfig,
    state: TerminalParseState,
    arguments: Vec<u8>,
    charsets: [u8; 2],
    listeners: ListenerSet,
    pub(crate) family: Option<String>,
}

impl TerminalControlEngine {
    /// Creates an engine in the `Ascii` state with no listeners.
    pub fn new(config: TerminalConfig) -> Self {
        TerminalControlEngine {
            config,
            state: TerminalParseState::Ascii,
            arguments: Vec::new(),
            charsets: [b'B', b'B'],
            listeners: ListenerSet::new(),
            family: None,
        }
    }

    /// Registers a listener. Only a weak reference is kept.
    pub fn add_listener<L>(&mut self, listener: &Arc<L>)
    where
        L: TerminalListener + 'static,
    {
        self.listeners.add(listener);
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current parse state.
    pub fn state(&self) -> TerminalParseState {
        self.state
    }

    /// Designators of the G0 and G1 character sets, `B` (US ASCII) until the peer selects another.
    pub fn charsets(&self) -> (u8, u8) {
        (self.charsets[0], self.charsets[1])
    }

    /// Configuration in use.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Canonical name of the identified terminal family, once identification has run.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Decodes one buffer of payload, then signals a single display change.
    pub fn on_payload(&mut self, buf: &[u8]) {
        if buf.is_empty() {
            return;
        }
        for &byte in buf {
            self.step(byte);
        }
        self.listeners.notify(|l| l.on_display_changed());
    }

    fn step(&mut self, byte: u8) {
        trace!(state = self.state.name(), byte, "terminal byte");
        match self.state {
            TerminalParseState::Ascii => {
                if byte == ESC {
                    self.state = TerminalParseState::Escape;
                } else if let Some(key) = Key::from_byte(byte) {
                    self.emit(key);
                }
            }
            TerminalParseState::Escape => match byte {
                b'[' => self.state = TerminalParseState::Csi,
                b'(' => self.state = TerminalParseState::CharsetG0,
                b')' => self.state = TerminalParseState::CharsetG1,
                b'O' => self.state = TerminalParseState::FunctionKeyPrefix1,
                _ => self.desync(byte),
            },
            TerminalParseState::Csi => match byte {
                b'?' => {
                    self.arguments.clear();
                    self.state = TerminalParseState::CsiMode;
                }
                b'[' => self.state = TerminalParseState::FunctionKeyPrefix2,
                b'0'..=b'9' | b';' => {
                    self.arguments.clear();
                    self.arguments.push(byte);
                    self.state = TerminalParseState::CsiArg;
                }
                b'P' => self.finish(Some(Key::Break)),
                _ => match Key::from_cursor_final(byte) {
                    Some(key) => self.finish(Some(key)),
                    None => self.desync(byte),
                },
            },
            TerminalParseState::CsiMode => match byte {
                b'0'..=b'9' | b';' => self.arguments.push(byte),
                0x40..=0x7E => {
                    debug!(
                        report = %String::from_utf8_lossy(&self.arguments),
                        terminator = byte,
                        "ignoring private mode report"
                    );
                    self.finish(None);
                }
                _ => self.desync(byte),
            },
            TerminalParseState::CsiArg => match byte {
                b'0'..=b'9' | b';' => self.arguments.push(byte),
                b'~' => {
                    let code = self.first_argument();
                    match Key::from_tilde_code(code) {
                        Some(key) => self.finish(Some(key)),
                        None => {
                            debug!(code, "unmapped CSI ~ key");
                            self.finish(None);
                        }
                    }
                }
                b'P' => self.finish(Some(Key::Break)),
                0x40..=0x7E => match Key::from_cursor_final(byte) {
                    Some(key) => self.finish(Some(key)),
                    None => {
                        debug!(final_byte = byte, "unmapped CSI sequence");
                        self.finish(None);
                    }
                },
                _ => self.desync(byte),
            },
            TerminalParseState::FunctionKeyPrefix1 => match byte {
                b'P'..=b'[' => self.finish(Some(Key::Function(byte - b'P' + 1))),
                _ => match Key::from_cursor_final(byte) {
                    Some(key) => self.finish(Some(key)),
                    None => self.desync(byte),
                },
            },
            TerminalParseState::FunctionKeyPrefix2 => match byte {
                b'A'..=b'L' => self.finish(Some(Key::Function(byte - b'A' + 1))),
                _ => self.desync(byte),
            },
            TerminalParseState::CharsetG0 | TerminalParseState::CharsetG1 => {
                if (0x20..=0x7E).contains(&byte) {
                    let slot = usize::from(self.state == TerminalParseState::CharsetG1);
                    debug!(slot, designator = byte, "character set selected");
                    self.charsets[slot] = byte;
                    self.finish(None);
                } else {
                    self.desync(byte);
                }
            }
        }
    }

    /// Leading numeric parameter of the collected CSI arguments.
    fn first_argument(&self) -> u16 {
        self.arguments
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .fold(0u16, |n, b| n.saturating_mul(10).saturating_add(u16::from(b - b'0')))
    }

    fn finish(&mut self, key: Option<Key>) {
        self.arguments.clear();
        self.state = TerminalParseState::Ascii;
        if let Some(key) = key {
            self.emit(key);
        }
    }

    fn emit(&mut self, key: Key) {
        trace!(%key, "key");
        self.listeners.notify(|l| l.on_key(key));
    }

    fn desync(&mut self, byte: u8) {
        let error = ProtocolError::UnexpectedByte {
            state: self.state.name(),
            byte,
        };
        self.arguments.clear();
        self.state = TerminalParseState::Ascii;
        warn!(%error, "escape sequence desynchronised");
        self.listeners.notify(|l| l.on_protocol_error(&error));
    }

    /// Refusal for an option nobody handles, unless one was already sent.
    fn refuse(command: NegotiationCommand, option: u8, options: &OptionTable) -> Option<Reply> {
        if matches!(option, ECHO | SGA | TTYPE | NAWS) {
            return None;
        }
        let refusal = match command {
            NegotiationCommand::Do => NegotiationCommand::Wont,
            NegotiationCommand::Will => NegotiationCommand::Dont,
            NegotiationCommand::Dont | NegotiationCommand::Wont => return None,
        };
        if options.sent(option) == OptionState::Off {
            return None;
        }
        debug!(%command, option, %refusal, "refusing option");
        Some(Reply::Negotiate(refusal, option))
    }
}

impl Default for TerminalControlEngine {
    fn default() -> Self {
        TerminalControlEngine::new(TerminalConfig::default())
    }
}

impl NegotiationListener for TerminalControlEngine {
    fn on_connect(&mut self) {
        self.listeners.notify(|l| l.on_connect());
    }

    fn on_close(&mut self) {
        self.listeners.notify(|l| l.on_close());
    }

    fn on_transport_error(&mut self, error: &std::io::Error) {
        self.listeners.notify(|l| l.on_error(error));
    }

    fn on_recv(&mut self, data: &[u8]) {
        self.on_payload(data);
    }

    fn on_option_changed(&mut self, command: NegotiationCommand, option: u8) {
        trace!(%command, option, "option changed");
    }

    fn on_unmapped_option(
        &mut self,
        command: NegotiationCommand,
        option: u8,
        options: &OptionTable,
    ) -> Option<Reply> {
        Self::refuse(command, option, options)
    }

    fn on_unmapped_subnegotiation(&mut self, option: u8, payload: &[u8]) -> Option<Reply> {
        debug!(option, len = payload.len(), "ignoring sub-negotiation");
        None
    }

    fn on_terminal_name(&mut self, name: &str) {
        if self.family.take().is_some() {
            debug!(terminal = name, "terminal renamed, identification will rerun");
        }
        self.listeners.notify(|l| l.on_terminal_name(name));
    }

    fn on_window_size(&mut self, geometry: WindowGeometry) {
        self.listeners.notify(|l| l.on_resize(geometry));
    }

    fn on_protocol_error(&mut self, error: &ProtocolError) {
        self.listeners.notify(|l| l.on_protocol_error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Seen {
        Key(Key),
        Display,
        Error(ProtocolError),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Seen>>);

    impl TerminalListener for Recorder {
        fn on_key(&self, key: Key) {
            self.0.lock().unwrap().push(Seen::Key(key));
        }
        fn on_display_changed(&self) {
            self.0.lock().unwrap().push(Seen::Display);
        }
        fn on_protocol_error(&self, error: &ProtocolError) {
            self.0.lock().unwrap().push(Seen::Error(error.clone()));
        }
    }

    fn parse(input: &[u8]) -> (TerminalControlEngine, Vec<Seen>) {
        let recorder = Arc::new(Recorder::default());
        let mut engine = TerminalControlEngine::default();
        engine.add_listener(&recorder);
        engine.on_payload(input);
        let seen = recorder.0.lock().unwrap().clone();
        (engine, seen)
    }

    fn keys(input: &[u8]) -> Vec<Key> {
        parse(input)
            .1
            .into_iter()
            .filter_map(|seen| match seen {
                Seen::Key(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plain_text() {
        let (_, seen) = parse(b"hi\r\n");
        assert_eq!(
            seen,
            vec![
                Seen::Key(Key::Char(b'h')),
                Seen::Key(Key::Char(b'i')),
                Seen::Key(Key::CarriageReturn),
                Seen::Key(Key::LineFeed),
                Seen::Display,
            ]
        );
    }

    #[test]
    fn test_nul_is_swallowed() {
        assert_eq!(keys(b"\r\0"), vec![Key::CarriageReturn]);
    }

    #[test]
    fn test_cursor_keys_then_one_display_change() {
        let (engine, seen) = parse(b"\x1b[A\x1b[B\x1b[C\x1b[D");
        assert_eq!(
            seen,
            vec![
                Seen::Key(Key::Up),
                Seen::Key(Key::Down),
                Seen::Key(Key::Right),
                Seen::Key(Key::Left),
                Seen::Display,
            ]
        );
        assert_eq!(engine.state(), TerminalParseState::Ascii);
    }

    #[test]
    fn test_unknown_escape_resets() {
        let (_, seen) = parse(b"\x1bZx");
        assert_eq!(
            seen,
            vec![
                Seen::Error(ProtocolError::UnexpectedByte {
                    state: "Escape",
                    byte: b'Z',
                }),
                Seen::Key(Key::Char(b'x')),
                Seen::Display,
            ]
        );
    }

    #[test]
    fn test_tilde_keys() {
        assert_eq!(
            keys(b"\x1b[1~\x1b[2~\x1b[3~\x1b[4~\x1b[5~\x1b[6~"),
            vec![Key::Home, Key::Insert, Key::Delete, Key::End, Key::PageUp, Key::PageDown]
        );
        assert_eq!(
            keys(b"\x1b[15~\x1b[17~\x1b[24~"),
            vec![Key::Function(5), Key::Function(6), Key::Function(12)]
        );
    }

    #[test]
    fn test_unmapped_tilde_is_silent() {
        let (engine, seen) = parse(b"\x1b[99~k");
        assert_eq!(seen, vec![Seen::Key(Key::Char(b'k')), Seen::Display]);
        assert_eq!(engine.state(), TerminalParseState::Ascii);
    }

    #[test]
    fn test_ss3_keys() {
        assert_eq!(
            keys(b"\x1bOP\x1bOQ\x1bOR\x1bOS\x1bO["),
            vec![
                Key::Function(1),
                Key::Function(2),
                Key::Function(3),
                Key::Function(4),
                Key::Function(12),
            ]
        );
        assert_eq!(keys(b"\x1bOA\x1bOD"), vec![Key::Up, Key::Left]);
    }

    #[test]
    fn test_linux_console_function_keys() {
        assert_eq!(
            keys(b"\x1b[[A\x1b[[E\x1b[[L"),
            vec![Key::Function(1), Key::Function(5), Key::Function(12)]
        );
    }

    #[test]
    fn test_break() {
        assert_eq!(keys(b"\x1b[P\x1b[2P"), vec![Key::Break, Key::Break]);
    }

    #[test]
    fn test_modified_cursor_key() {
        assert_eq!(keys(b"\x1b[1;5C"), vec![Key::Right]);
    }

    #[test]
    fn test_mode_report_is_consumed() {
        let (engine, seen) = parse(b"\x1b[?1;2cz");
        assert_eq!(seen, vec![Seen::Key(Key::Char(b'z')), Seen::Display]);
        assert!(engine.arguments.is_empty());
    }

    #[test]
    fn test_charset_designation() {
        let (engine, seen) = parse(b"\x1b(0\x1b)A");
        assert_eq!(seen, vec![Seen::Display]);
        assert_eq!(engine.charsets(), (b'0', b'A'));
    }

    #[test]
    fn test_sequence_spanning_buffers() {
        let recorder = Arc::new(Recorder::default());
        let mut engine = TerminalControlEngine::default();
        engine.add_listener(&recorder);
        engine.on_payload(b"\x1b[");
        engine.on_payload(b"2");
        engine.on_payload(b"1~");
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                Seen::Display,
                Seen::Display,
                Seen::Key(Key::Function(10)),
                Seen::Display,
            ]
        );
    }

    #[test]
    fn test_control_byte_inside_csi_desyncs() {
        let (_, seen) = parse(b"\x1b[1\x07y");
        assert_eq!(
            seen,
            vec![
                Seen::Error(ProtocolError::UnexpectedByte {
                    state: "CsiArg",
                    byte: 0x07,
                }),
                Seen::Key(Key::Char(b'y')),
                Seen::Display,
            ]
        );
    }

    #[test]
    fn test_refusal_policy() {
        let mut negotiation = termlink_negotiation::NegotiationEngine::default();
        let options = negotiation.options().clone();
        assert_eq!(
            TerminalControlEngine::refuse(NegotiationCommand::Do, 39, &options),
            Some(Reply::Negotiate(NegotiationCommand::Wont, 39))
        );
        assert_eq!(
            TerminalControlEngine::refuse(NegotiationCommand::Will, 39, &options),
            Some(Reply::Negotiate(NegotiationCommand::Dont, 39))
        );
        assert_eq!(TerminalControlEngine::refuse(NegotiationCommand::Do, ECHO, &options), None);
        assert_eq!(TerminalControlEngine::refuse(NegotiationCommand::Wont, 39, &options), None);

        negotiation.set_wont(39, &mut Vec::new()).unwrap();
        assert_eq!(
            TerminalControlEngine::refuse(NegotiationCommand::Do, 39, negotiation.options()),
            None
        );
    }
}
