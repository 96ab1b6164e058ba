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


use crate::WindowGeometry;

///
/// Settings consulted by the built-in negotiation actions.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NegotiationConfig {
    /// Name sent in answer to `SB TERMINAL-TYPE SEND`
    pub terminal_name: String,
    /// Geometry sent in answer to `DO NAWS`
    pub window: WindowGeometry,
    /// Ask for the peer's terminal name when it offers `WILL TERMINAL-TYPE`
    pub request_terminal_type: bool,
}

impl NegotiationConfig {
    /// Replaces the local terminal name.
    pub fn with_terminal_name(mut self, name: impl Into<String>) -> Self {
        self.terminal_name = name.into();
        self
    }

    /// Replaces the local window geometry.
    pub fn with_window(mut self, window: WindowGeometry) -> Self {
        self.window = window;
        self
    }

    /// Enables or disables the automatic terminal-type request.
    pub fn with_request_terminal_type(mut self, enabled: bool) -> Self {
        self.request_terminal_type = enabled;
        self
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        NegotiationConfig {
            terminal_name: String::from("ansi"),
            window: WindowGeometry::default(),
            request_terminal_type: true,
        }
    }
}
