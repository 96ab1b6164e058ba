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


//! Observer traits for the terminal control layer

use crate::Key;
use std::sync::{Arc, Weak};
use termlink_negotiation::{ProtocolError, WindowGeometry};

/// Terminal event observer
///
/// Implement this trait to receive decoded keystrokes and connection events from a
/// [`crate::TerminalControlEngine`]. All methods have default implementations that do nothing.
///
/// Listeners are registered as weak references; a listener is silently dropped from the
/// fan-out once its last strong reference goes away. Events are delivered to listeners in
/// registration order.
///
/// # Example
///
/// ```no_run
/// use termlink_vtcontrol::{Key, TerminalListener};
///
/// struct KeyLogger;
///
/// impl TerminalListener for KeyLogger {
///     fn on_key(&self, key: Key) {
///         println!("pressed {key}");
///     }
/// }
/// ```
pub trait TerminalListener: Send + Sync {
    /// Called for every decoded keystroke, in input order
    fn on_key(&self, _key: Key) {}

    /// Called once after each inbound buffer, after its key events
    fn on_display_changed(&self) {}

    /// Called when the peer reports a new window size
    fn on_resize(&self, _geometry: WindowGeometry) {}

    /// Called when the peer reports its terminal name
    fn on_terminal_name(&self, _name: &str) {}

    /// Called when the connection is established
    fn on_connect(&self) {}

    /// Called once when the connection closes
    fn on_close(&self) {}

    /// Called when the transport fails
    ///
    /// The hosting application is expected to tear the connection down.
    fn on_error(&self, _error: &std::io::Error) {}

    /// Called when either state machine recovers from malformed input
    fn on_protocol_error(&self, _error: &ProtocolError) {}
}

/// Ordered set of weakly held listeners.
#[derive(Clone, Default)]
pub struct ListenerSet {
    listeners: Vec<Weak<dyn TerminalListener>>,
}

impl ListenerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener after all existing ones.
    pub fn add<L>(&mut self, listener: &Arc<L>)
    where
        L: TerminalListener + 'static,
    {
        let listener: Weak<L> = Arc::downgrade(listener);
        self.listeners.push(listener);
    }

    /// Number of listeners still alive.
    pub fn len(&self) -> usize {
        self.listeners.iter().filter(|l| l.strong_count() > 0).count()
    }

    /// Whether no live listener remains.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `event` on every live listener in registration order, pruning dropped ones.
    pub fn notify<F>(&mut self, event: F)
    where
        F: Fn(&dyn TerminalListener),
    {
        let mut dropped = false;
        for listener in &self.listeners {
            match listener.upgrade() {
                Some(listener) => event(listener.as_ref()),
                None => dropped = true,
            }
        }
        if dropped {
            self.listeners.retain(|l| l.strong_count() > 0);
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("registered", &self.listeners.len())
            .field("alive", &self.len())
            .finish()
    }
}
