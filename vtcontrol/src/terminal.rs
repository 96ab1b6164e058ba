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
    AttributeFlags, CharacterSet, Color, ColorMode, Outbound, TerminalConfig,
    TerminalControlEngine, TerminalListener, TerminalResult,
};
use std::sync::Arc;
use termlink_negotiation::{
    NegotiationCommand, NegotiationConfig, NegotiationEngine, SubnegotiationKind, Transport,
    WindowGeometry,
};

/// One terminal connection: both protocol engines plus the transport they write to.
///
/// Inbound bytes go through [`Terminal::on_bytes`]; outbound commands are methods on the
/// terminal. A transport failure from any call is also reported to the listeners through
/// [`TerminalListener::on_error`] before the error is returned.
///
/// # Example
///
/// ```no_run
/// use termlink_vtcontrol::{Color, AttributeFlags, Terminal};
///
/// let mut terminal = Terminal::new(Vec::new());
/// terminal.on_bytes(b"\xFF\xFD\x18").unwrap();
/// terminal.clear_screen().unwrap();
/// terminal.set_attributes(Color::Yellow, Color::Black, AttributeFlags::BOLD).unwrap();
/// terminal.send_text(b"Welcome!\r\n").unwrap();
/// ```
#[derive(Debug)]
pub struct Terminal<T: Transport> {
    negotiation: NegotiationEngine,
    control: TerminalControlEngine,
    transport: T,
}

impl<T: Transport> Terminal<T> {
    /// Creates a terminal with default configuration.
    pub fn new(transport: T) -> Self {
        Terminal::with_config(transport, NegotiationConfig::default(), TerminalConfig::default())
    }

    /// Creates a terminal with explicit configuration for both layers.
    pub fn with_config(transport: T, negotiation: NegotiationConfig, terminal: TerminalConfig) -> Self {
        Terminal {
            negotiation: NegotiationEngine::new(negotiation),
            control: TerminalControlEngine::new(terminal),
            transport,
        }
    }

    /// Registers a listener. Only a weak reference is kept.
    pub fn add_listener<L>(&mut self, listener: &Arc<L>)
    where
        L: TerminalListener + 'static,
    {
        self.control.add_listener(listener);
    }

    /// The negotiation engine.
    pub fn negotiation(&self) -> &NegotiationEngine {
        &self.negotiation
    }

    /// The terminal control engine.
    pub fn control(&self) -> &TerminalControlEngine {
        &self.control
    }

    /// The transport outbound bytes are written to.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport, e.g. to drain a buffer.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the terminal, returning its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // #### Inbound ############################################################

    /// Feeds raw transport bytes through both engines.
    pub fn on_bytes(&mut self, buf: &[u8]) -> TerminalResult<()> {
        let result = self
            .negotiation
            .on_bytes(buf, &mut self.control, &mut self.transport)
            .map_err(Into::into);
        self.surface(result)
    }

    /// Delivers the connect notification.
    pub fn connect(&mut self) {
        self.negotiation.connect(&mut self.control);
    }

    /// Delivers the close notification once and stops accepting input.
    pub fn close(&mut self) {
        self.negotiation.close(&mut self.control);
    }

    /// Whether the terminal has been closed.
    pub fn is_closed(&self) -> bool {
        self.negotiation.is_closed()
    }

    /// Reports a failure of the transport underneath the terminal.
    pub fn transport_error(&mut self, error: &std::io::Error) {
        self.negotiation.transport_error(&mut self.control, error);
    }

    fn surface<R>(&mut self, result: TerminalResult<R>) -> TerminalResult<R> {
        if let Err(error) = &result {
            if let Some(io) = error.transport() {
                self.negotiation.transport_error(&mut self.control, io);
            }
        }
        result
    }

    fn outbound<R>(
        &mut self,
        command: impl FnOnce(&mut TerminalControlEngine, &mut Outbound<'_>) -> TerminalResult<R>,
    ) -> TerminalResult<R> {
        let result = {
            let mut out = Outbound::new(&mut self.negotiation, &mut self.transport);
            command(&mut self.control, &mut out)
        };
        self.surface(result)
    }

    // #### Negotiation ########################################################

    /// Sends `IAC <command> <option>` and records it.
    pub fn negotiate(&mut self, command: NegotiationCommand, option: u8) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.negotiate(command, option)?))
    }

    /// Sends `IAC DO <option>`.
    pub fn set_do(&mut self, option: u8) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.set_do(option)?))
    }

    /// Sends `IAC DONT <option>`.
    pub fn set_dont(&mut self, option: u8) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.set_dont(option)?))
    }

    /// Sends `IAC WILL <option>`.
    pub fn set_will(&mut self, option: u8) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.set_will(option)?))
    }

    /// Sends `IAC WONT <option>`.
    pub fn set_wont(&mut self, option: u8) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.set_wont(option)?))
    }

    /// Sends one sub-negotiation frame.
    pub fn send_subnegotiation(
        &mut self,
        option: u8,
        kind: SubnegotiationKind,
        payload: &[u8],
    ) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.send_subnegotiation(option, kind, payload)?))
    }

    /// Updates the local window size, announcing it if NAWS has been agreed.
    pub fn set_window(&mut self, window: WindowGeometry) -> TerminalResult<()> {
        let result = self
            .negotiation
            .set_window(window, &mut self.transport)
            .map_err(Into::into);
        self.surface(result)
    }

    /// Writes bytes without escaping.
    pub fn send_raw(&mut self, buf: &[u8]) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.send_raw(buf)?))
    }

    /// Writes application text, doubling any IAC byte.
    pub fn send_text(&mut self, buf: &[u8]) -> TerminalResult<()> {
        self.outbound(|_, out| Ok(out.send_data(buf)?))
    }

    // #### Display ############################################################

    /// Identifies the peer's terminal family and returns its canonical name.
    pub fn identify_capabilities(&mut self) -> TerminalResult<String> {
        self.outbound(|control, out| Ok(control.identify_capabilities(out)?.name().to_string()))
    }

    /// Clears the screen and homes the cursor.
    pub fn clear_screen(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::clear_screen)
    }

    /// Moves the cursor to a 0-based position.
    pub fn set_cursor(&mut self, row: u16, col: u16) -> TerminalResult<()> {
        self.outbound(|control, out| control.set_cursor(out, row, col))
    }

    /// Saves the cursor position.
    pub fn save_cursor(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::save_cursor)
    }

    /// Restores the saved cursor position.
    pub fn restore_cursor(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::restore_cursor)
    }

    /// Saves the cursor position and attributes.
    pub fn save_attributes(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::save_attributes)
    }

    /// Restores the saved cursor position and attributes.
    pub fn restore_attributes(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::restore_attributes)
    }

    /// Enables or disables automatic margins.
    pub fn set_line_wrap(&mut self, enabled: bool) -> TerminalResult<()> {
        self.outbound(|control, out| control.set_line_wrap(out, enabled))
    }

    /// Switches to an ANSI.SYS screen mode.
    pub fn set_screen_mode(&mut self, mode: ColorMode, cols: u16, rows: u16) -> TerminalResult<()> {
        self.outbound(|control, out| control.set_screen_mode(out, mode, cols, rows))
    }

    /// Shifts G0 or G1 into use.
    pub fn set_character_set(&mut self, set: CharacterSet) -> TerminalResult<()> {
        self.outbound(|control, out| control.set_character_set(out, set))
    }

    /// Puts the keypad and cursor keys into application mode.
    pub fn enable_keypad_transmit(&mut self) -> TerminalResult<()> {
        self.outbound(TerminalControlEngine::enable_keypad_transmit)
    }

    /// Sets colours and attributes in one SGR sequence.
    pub fn set_attributes(
        &mut self,
        foreground: Color,
        background: Color,
        flags: AttributeFlags,
    ) -> TerminalResult<()> {
        self.outbound(|control, out| control.set_attributes(out, foreground, background, flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        errors: AtomicUsize,
        closes: AtomicUsize,
    }

    impl TerminalListener for Counter {
        fn on_error(&self, _error: &std::io::Error) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
        fn on_close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Broken;

    impl Transport for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let counter = Arc::new(Counter::default());
        let mut terminal = Terminal::new(Broken);
        terminal.add_listener(&counter);

        let error = terminal.clear_screen().unwrap_err();
        assert!(error.is_transport());
        let error = terminal.on_bytes(&[255, 253, 24]).unwrap_err();
        assert!(error.is_transport());
        assert_eq!(counter.errors.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_caller_errors_are_not_transport_errors() {
        let counter = Arc::new(Counter::default());
        let mut terminal = Terminal::new(Vec::new());
        terminal.add_listener(&counter);

        assert!(terminal.set_screen_mode(ColorMode::Color, 1, 1).is_err());
        assert_eq!(counter.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_close_once() {
        let counter = Arc::new(Counter::default());
        let mut terminal = Terminal::new(Vec::new());
        terminal.add_listener(&counter);
        terminal.close();
        terminal.close();
        terminal.on_bytes(b"ignored").unwrap();
        assert!(terminal.is_closed());
        assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_send_text_escapes() {
        let mut terminal = Terminal::new(Vec::new());
        terminal.send_text(&[b'a', 255]).unwrap();
        terminal.send_raw(&[255]).unwrap();
        assert_eq!(terminal.into_transport(), vec![b'a', 255, 255, 255]);
    }
}
