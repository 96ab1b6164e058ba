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
use termlink_negotiation::NegotiationCommand;
use termlink_negotiation::consts::option::{ECHO, NAWS, SGA, TTYPE};

/// Connection driver settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bytes requested from the stream per read
    pub read_buffer_size: usize,

    /// Negotiation commands sent when the connection opens
    pub announce: Vec<(NegotiationCommand, u8)>,

    /// Read timeout (None for no timeout)
    pub read_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024,
            announce: vec![
                (NegotiationCommand::Will, ECHO),
                (NegotiationCommand::Will, SGA),
                (NegotiationCommand::Do, TTYPE),
                (NegotiationCommand::Do, NAWS),
            ],
            read_timeout: None,
        }
    }
}

impl SessionConfig {
    /// Set the read buffer size
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Replace the commands sent on open
    pub fn with_announce(mut self, announce: Vec<(NegotiationCommand, u8)>) -> Self {
        self.announce = announce;
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }
}
