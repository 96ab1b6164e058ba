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


//! Outbound commands of the terminal control engine

use crate::attributes::{format_sgr, screen_mode};
use crate::{
    AttributeFlags, CharacterSet, Color, ColorMode, Outbound, TerminalControlEngine, TerminalEntry,
    TerminalError, TerminalResult,
};
use termlink_negotiation::consts::option::NAWS;
use tracing::{debug, trace, warn};

impl TerminalControlEngine {
    /// Resolves the peer's terminal family, sending its initialisation string the first time.
    ///
    /// Runs implicitly before every other outbound command. The choice is cached until the
    /// peer reports a new terminal name.
    pub fn identify_capabilities(&mut self, out: &mut Outbound<'_>) -> TerminalResult<&TerminalEntry> {
        if self.family.is_none() {
            let family = self.select_family(out)?;
            let init = self
                .config
                .capabilities
                .lookup(&family)
                .and_then(|entry| entry.string("is2"))
                .map(<[u8]>::to_vec);
            if let Some(init) = init {
                out.send_raw(&init)?;
            }
            debug!(%family, "terminal identified");
            self.family = Some(family);
        }
        let family = self.family.as_deref().unwrap_or(&self.config.default_family);
        self.config
            .capabilities
            .lookup(family)
            .ok_or_else(|| TerminalError::UnknownTerminal {
                name: family.to_string(),
            })
    }

    fn select_family(&self, out: &Outbound<'_>) -> TerminalResult<String> {
        let database = &self.config.capabilities;
        let requested = match out.terminal_name() {
            None | Some("") => self.config.default_family.as_str(),
            Some("ansi") if out.option(NAWS).received.is_on() => self.config.enhanced_family.as_str(),
            Some(name) => name,
        };
        let entry = match database.lookup(requested) {
            Some(entry) => entry,
            None => {
                warn!(terminal = requested, fallback = %self.config.default_family, "unknown terminal");
                database.lookup(&self.config.default_family).ok_or_else(|| {
                    TerminalError::UnknownTerminal {
                        name: self.config.default_family.clone(),
                    }
                })?
            }
        };
        Ok(entry.name().to_string())
    }

    fn send_capability(
        &mut self,
        out: &mut Outbound<'_>,
        capability: &str,
        params: &[i32],
    ) -> TerminalResult<()> {
        let sequence = self.identify_capabilities(out)?.format(capability, params)?;
        trace!(capability, len = sequence.len(), "sending capability");
        out.send_raw(&sequence)?;
        Ok(())
    }

    /// Clears the screen and homes the cursor.
    pub fn clear_screen(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "clear", &[])
    }

    /// Moves the cursor to a 0-based `row` and `col`.
    pub fn set_cursor(&mut self, out: &mut Outbound<'_>, row: u16, col: u16) -> TerminalResult<()> {
        self.send_capability(out, "cup", &[i32::from(row), i32::from(col)])
    }

    /// Saves the cursor position.
    pub fn save_cursor(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "sc", &[])
    }

    /// Restores the cursor position saved by [`TerminalControlEngine::save_cursor`].
    pub fn restore_cursor(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "rc", &[])
    }

    /// Saves the cursor position and attributes.
    pub fn save_attributes(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "svattr", &[])
    }

    /// Restores what [`TerminalControlEngine::save_attributes`] saved.
    pub fn restore_attributes(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "rsattr", &[])
    }

    /// Enables or disables automatic margins.
    pub fn set_line_wrap(&mut self, out: &mut Outbound<'_>, enabled: bool) -> TerminalResult<()> {
        self.send_capability(out, if enabled { "smam" } else { "rmam" }, &[])
    }

    /// Switches the display to an ANSI.SYS screen mode.
    pub fn set_screen_mode(
        &mut self,
        out: &mut Outbound<'_>,
        mode: ColorMode,
        cols: u16,
        rows: u16,
    ) -> TerminalResult<()> {
        let number = screen_mode(mode, cols, rows)
            .ok_or(TerminalError::UnsupportedScreenMode { cols, rows })?;
        self.send_capability(out, "scrmode", &[i32::from(number)])
    }

    /// Shifts G0 or G1 into use.
    pub fn set_character_set(&mut self, out: &mut Outbound<'_>, set: CharacterSet) -> TerminalResult<()> {
        self.identify_capabilities(out)?;
        out.send_raw(&[set.shift_byte()])?;
        Ok(())
    }

    /// Puts the keypad and cursor keys into application mode.
    pub fn enable_keypad_transmit(&mut self, out: &mut Outbound<'_>) -> TerminalResult<()> {
        self.send_capability(out, "smkx", &[])
    }

    /// Applies `flags` and the two colours in one SGR sequence.
    pub fn set_attributes(
        &mut self,
        out: &mut Outbound<'_>,
        foreground: Color,
        background: Color,
        flags: AttributeFlags,
    ) -> TerminalResult<()> {
        self.identify_capabilities(out)?;
        out.send_raw(&format_sgr(foreground, background, flags))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CapabilityDatabase, TerminalConfig};
    use std::sync::Arc;
    use termlink_negotiation::consts::option::TTYPE;
    use termlink_negotiation::consts::{DO, IAC, SB, SE, WILL, WONT};
    use termlink_negotiation::{NegotiationEngine, Transport};

    /// Fails the first write, then records.
    #[derive(Default)]
    struct FailsOnce {
        failed: bool,
        written: Vec<u8>,
    }

    impl Transport for FailsOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(())
        }
    }

    fn engines() -> (NegotiationEngine, TerminalControlEngine) {
        (NegotiationEngine::default(), TerminalControlEngine::default())
    }

    fn report_name(negotiation: &mut NegotiationEngine, control: &mut TerminalControlEngine, name: &[u8]) {
        let mut frame = vec![IAC, SB, TTYPE, 0];
        frame.extend_from_slice(name);
        frame.extend_from_slice(&[IAC, SE]);
        negotiation.on_bytes(&frame, control, &mut Vec::new()).unwrap();
    }

    #[test]
    fn test_unnamed_peer_gets_default_family() {
        let (mut negotiation, mut control) = engines();
        let mut wire = Vec::new();
        control
            .clear_screen(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("vt100"));
        let mut expected = b"\x1b[r\x1b[m\x1b[?7h\x1b[?1;3;4;6l\x1b[4l".to_vec();
        expected.extend_from_slice(b"\x1b[H\x1b[J");
        assert_eq!(wire, expected);
    }

    #[test]
    fn test_initialisation_is_sent_once() {
        let (mut negotiation, mut control) = engines();
        let mut wire = Vec::new();
        let mut out = Outbound::new(&mut negotiation, &mut wire);
        control.save_cursor(&mut out).unwrap();
        control.restore_cursor(&mut out).unwrap();
        let init = b"\x1b[r\x1b[m\x1b[?7h\x1b[?1;3;4;6l\x1b[4l";
        assert_eq!(&wire[..init.len()], init);
        assert_eq!(&wire[init.len()..], b"\x1b7\x1b8");
    }

    #[test]
    fn test_named_peer() {
        let (mut negotiation, mut control) = engines();
        report_name(&mut negotiation, &mut control, b"XTERM-256COLOR");
        let mut wire = Vec::new();
        let entry = control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(entry.name(), "xterm");
        assert_eq!(wire, b"\x1b[!p\x1b[?3;4l\x1b[4l\x1b>".to_vec());
    }

    #[test]
    fn test_ansi_with_window_size_is_enhanced() {
        let (mut negotiation, mut control) = engines();
        negotiation
            .on_bytes(&[IAC, WILL, NAWS], &mut control, &mut Vec::new())
            .unwrap();
        report_name(&mut negotiation, &mut control, b"ANSI");
        let mut wire = Vec::new();
        control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("ansi-bbs"));
    }

    #[test]
    fn test_plain_ansi() {
        let (mut negotiation, mut control) = engines();
        report_name(&mut negotiation, &mut control, b"ansi");
        let mut wire = Vec::new();
        control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("ansi"));
        assert_eq!(wire, b"\x1b[0m".to_vec());
    }

    #[test]
    fn test_failed_initialisation_is_retried() {
        let (mut negotiation, mut control) = engines();
        let mut wire = FailsOnce::default();

        let error = control
            .clear_screen(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap_err();
        assert!(error.is_transport());
        assert_eq!(control.family(), None);

        control
            .clear_screen(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("vt100"));
        let mut expected = b"\x1b[r\x1b[m\x1b[?7h\x1b[?1;3;4;6l\x1b[4l".to_vec();
        expected.extend_from_slice(b"\x1b[H\x1b[J");
        assert_eq!(wire.written, expected);
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let (mut negotiation, mut control) = engines();
        report_name(&mut negotiation, &mut control, b"adm3a");
        let mut wire = Vec::new();
        control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("vt100"));
    }

    #[test]
    fn test_new_name_reidentifies() {
        let (mut negotiation, mut control) = engines();
        let mut wire = Vec::new();
        control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("vt100"));
        report_name(&mut negotiation, &mut control, b"linux");
        assert_eq!(control.family(), None);
        wire.clear();
        control
            .clear_screen(&mut Outbound::new(&mut negotiation, &mut wire))
            .unwrap();
        assert_eq!(control.family(), Some("linux"));
        assert_eq!(wire, b"\x1b[H\x1b[J".to_vec());
    }

    #[test]
    fn test_missing_default_family() {
        let database = Arc::new(CapabilityDatabase::parse("dumb|Dumb,\n\tam,\n").unwrap());
        let mut control =
            TerminalControlEngine::new(TerminalConfig::default().with_capabilities(database));
        let mut negotiation = NegotiationEngine::default();
        let error = control
            .clear_screen(&mut Outbound::new(&mut negotiation, &mut Vec::new()))
            .unwrap_err();
        assert!(matches!(error, TerminalError::UnknownTerminal { ref name } if name == "vt100"));
    }

    #[test]
    fn test_cursor_and_wrap() {
        let (mut negotiation, mut control) = engines();
        let mut init = Vec::new();
        control
            .identify_capabilities(&mut Outbound::new(&mut negotiation, &mut init))
            .unwrap();
        let mut wire = Vec::new();
        let mut out = Outbound::new(&mut negotiation, &mut wire);
        control.set_cursor(&mut out, 9, 19).unwrap();
        control.set_line_wrap(&mut out, false).unwrap();
        control.set_line_wrap(&mut out, true).unwrap();
        control.enable_keypad_transmit(&mut out).unwrap();
        assert_eq!(wire, b"\x1b[10;20H\x1b[?7l\x1b[?7h\x1b[?1h\x1b=".to_vec());
    }

    #[test]
    fn test_screen_mode_needs_ansi() {
        let (mut negotiation, mut control) = engines();
        let mut wire = Vec::new();
        let error = control
            .set_screen_mode(&mut Outbound::new(&mut negotiation, &mut wire), ColorMode::Color, 80, 25)
            .unwrap_err();
        assert!(matches!(error, TerminalError::MissingCapability { .. }));

        let (mut negotiation, mut control) = engines();
        report_name(&mut negotiation, &mut control, b"ansi");
        let mut wire = Vec::new();
        let mut out = Outbound::new(&mut negotiation, &mut wire);
        control.set_screen_mode(&mut out, ColorMode::Color, 80, 25).unwrap();
        assert!(matches!(
            control.set_screen_mode(&mut out, ColorMode::Mono, 132, 25),
            Err(TerminalError::UnsupportedScreenMode { cols: 132, rows: 25 })
        ));
        assert_eq!(wire, b"\x1b[0m\x1b[=3h".to_vec());
    }

    #[test]
    fn test_character_set_and_attributes() {
        let (mut negotiation, mut control) = engines();
        report_name(&mut negotiation, &mut control, b"linux");
        let mut wire = Vec::new();
        let mut out = Outbound::new(&mut negotiation, &mut wire);
        control.set_character_set(&mut out, CharacterSet::G1).unwrap();
        control.set_character_set(&mut out, CharacterSet::G0).unwrap();
        control
            .set_attributes(&mut out, Color::Red, Color::Blue, AttributeFlags::BOLD)
            .unwrap();
        assert_eq!(wire, b"\x0e\x0f\x1b[1;31;44m".to_vec());
    }

    #[test]
    fn test_refused_option_is_written() {
        let (mut negotiation, mut control) = engines();
        let mut wire = Vec::new();
        negotiation.on_bytes(&[IAC, DO, 39], &mut control, &mut wire).unwrap();
        negotiation.on_bytes(&[IAC, DO, 39], &mut control, &mut wire).unwrap();
        assert_eq!(wire, vec![IAC, WONT, 39]);
    }
}
