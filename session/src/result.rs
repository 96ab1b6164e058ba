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


use std::time::Duration;
use termlink_vtcontrol::TerminalError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that end or interrupt a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading from or writing to the stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A terminal command failed
    #[error("terminal error: {0}")]
    Terminal(#[from] TerminalError),

    /// No data arrived within the configured read timeout
    #[error("no data received for {0:?}")]
    Timeout(Duration),
}

impl SessionError {
    /// Whether the underlying stream is unusable
    pub fn is_io(&self) -> bool {
        match self {
            SessionError::Io(_) => true,
            SessionError::Terminal(error) => error.is_transport(),
            SessionError::Timeout(_) => false,
        }
    }

    /// Whether this is a read timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }
}
