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

/// Result Type for Negotiation Operations
pub type NegotiationResult<T> = Result<T, NegotiationError>;

/// Errors returned by [`crate::NegotiationEngine`] operations.
///
/// Malformed input is never an error here: it is reported to the listener as a
/// [`ProtocolError`] and parsing continues.
#[derive(Debug, thiserror::Error)]
pub enum NegotiationError {
    /// Writing to the transport failed.
    #[error("transport write failed: {0}")]
    Transport(#[from] std::io::Error),

    /// A sub-negotiation payload exceeded the per-frame limit.
    #[error("sub-negotiation payload for option {option} is {length} bytes (limit {limit})")]
    PayloadTooLarge {
        /// Option being sub-negotiated
        option: u8,
        /// Payload length supplied by the caller
        length: usize,
        /// Per-frame limit
        limit: usize,
    },
}

impl NegotiationError {
    pub(crate) fn payload_too_large(option: u8, length: usize) -> Self {
        NegotiationError::PayloadTooLarge {
            option,
            length,
            limit: consts::MAX_SUBNEGOTIATION_PAYLOAD,
        }
    }

    /// Whether this error came from the transport rather than the caller.
    pub fn is_transport(&self) -> bool {
        matches!(self, NegotiationError::Transport(_))
    }
}

/// A recoverable desynchronisation in one of the protocol state machines.
///
/// The state machine that produced it has already reset to its idle state.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    /// An IAC was followed by a byte that is not a known command.
    #[error("unknown telnet command 0x{command:02X}")]
    UnknownCommand {
        /// The offending command byte
        command: u8,
    },

    /// A byte arrived that the current parse state does not accept.
    #[error("unexpected byte 0x{byte:02X} in {state} state")]
    UnexpectedByte {
        /// Name of the parse state that rejected the byte
        state: &'static str,
        /// The offending byte
        byte: u8,
    },

    /// A sub-negotiation ended before its fixed-size payload was complete.
    #[error("sub-negotiation for option {option} ended after {received} of {expected} bytes")]
    TruncatedSubnegotiation {
        /// Option being sub-negotiated
        option: u8,
        /// Payload bytes received
        received: usize,
        /// Payload bytes required
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_from_io() {
        let error: NegotiationError =
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone").into();
        assert!(error.is_transport());
        assert!(error.to_string().contains("gone"));
    }

    #[test]
    fn test_payload_too_large_display() {
        let error = NegotiationError::payload_too_large(24, 300);
        assert!(!error.is_transport());
        assert_eq!(
            error.to_string(),
            "sub-negotiation payload for option 24 is 300 bytes (limit 250)"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let error = ProtocolError::UnexpectedByte {
            state: "Escape",
            byte: b'Z',
        };
        assert_eq!(error.to_string(), "unexpected byte 0x5A in Escape state");
        assert_eq!(
            ProtocolError::UnknownCommand { command: 0x10 }.to_string(),
            "unknown telnet command 0x10"
        );
    }
}
