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


use crate::CapabilityDatabase;
use std::sync::Arc;

/// Terminal identification settings.
#[derive(Clone, Debug)]
pub struct TerminalConfig {
    /// Family used when the peer reported no name, or one the database does not know
    pub default_family: String,
    /// Family substituted for a peer named `ansi` that also agreed to NAWS
    pub enhanced_family: String,
    /// Shared capability database
    pub capabilities: Arc<CapabilityDatabase>,
}

impl TerminalConfig {
    /// Replaces the fallback family.
    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = family.into();
        self
    }

    /// Replaces the family used for window-size capable `ansi` peers.
    pub fn with_enhanced_family(mut self, family: impl Into<String>) -> Self {
        self.enhanced_family = family.into();
        self
    }

    /// Replaces the capability database.
    pub fn with_capabilities(mut self, capabilities: Arc<CapabilityDatabase>) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            default_family: String::from("vt100"),
            enhanced_family: String::from("ansi-bbs"),
            capabilities: CapabilityDatabase::builtin(),
        }
    }
}
