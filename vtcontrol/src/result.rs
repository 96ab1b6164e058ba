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


use termlink_negotiation::NegotiationError;

/// Result type for the terminal control layer
pub type TerminalResult<T> = Result<T, TerminalError>;

/// Errors returned by terminal control operations.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// The negotiation layer failed, usually a transport write.
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    /// A terminal family is not present in the capability database.
    #[error("terminal '{name}' is not in the capability database")]
    UnknownTerminal {
        /// Requested family or alias
        name: String,
    },

    /// The identified terminal lacks a capability a command needs.
    #[error("terminal '{family}' has no '{capability}' capability")]
    MissingCapability {
        /// Canonical family name
        family: String,
        /// Capability name
        capability: String,
    },

    /// A capability template could not be expanded.
    #[error("capability '{capability}' cannot be formatted: {message}")]
    CapabilityFormat {
        /// Capability name
        capability: String,
        /// What went wrong
        message: String,
    },

    /// Capability database source text is malformed.
    #[error("capability database line {line}: {message}")]
    CapabilitySyntax {
        /// 1-based line of the offending entry
        line: usize,
        /// What went wrong
        message: String,
    },

    /// An entry inherits (`use=`) from a terminal that does not exist.
    #[error("terminal '{entry}' uses unknown terminal '{target}'")]
    UnresolvedUse {
        /// Entry carrying the `use=` field
        entry: String,
        /// Missing target
        target: String,
    },

    /// No screen mode exists for the requested geometry.
    #[error("unsupported screen mode {cols}x{rows}")]
    UnsupportedScreenMode {
        /// Requested columns
        cols: u16,
        /// Requested rows
        rows: u16,
    },
}

impl TerminalError {
    /// The transport failure underneath this error, if any.
    pub fn transport(&self) -> Option<&std::io::Error> {
        match self {
            TerminalError::Negotiation(NegotiationError::Transport(error)) => Some(error),
            _ => None,
        }
    }

    /// Whether this error came from the transport.
    pub fn is_transport(&self) -> bool {
        self.transport().is_some()
    }
}

impl From<std::io::Error> for TerminalError {
    fn from(error: std::io::Error) -> Self {
        TerminalError::Negotiation(NegotiationError::Transport(error))
    }
}
