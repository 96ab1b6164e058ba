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


//! # Termlink VT100 Terminal Control
//!
//! Interprets the payload carried by a Telnet connection as VT100/ANSI terminal input, and
//! drives the remote display with escape sequences chosen for the peer's terminal family.
//!
//! ## Core Components
//!
//! ### [`TerminalControlEngine`]
//!
//! An escape sequence state machine that turns payload bytes into [`Key`] events and fans
//! them out to registered [`TerminalListener`]s, followed by one display-changed event per
//! inbound buffer. It is also the [`termlink_negotiation::NegotiationListener`] of the
//! connection: options nobody handles are refused, and window size, terminal name and
//! lifecycle events are forwarded.
//!
//! ### [`CapabilityDatabase`]
//!
//! Terminfo-style descriptions of the supported terminal families (`ansi`, `ansi-bbs`,
//! `vt100`, `xterm`, `linux`), shared read-only between connections.
//!
//! ### [`Terminal`]
//!
//! A connection: the negotiation engine, the control engine and the transport, with one
//! method per outbound command.
//!
//! ## Terminal Identification
//!
//! The first outbound command identifies the peer from its negotiated terminal name and sends
//! that family's initialisation string. Peers that report no name, or a name the database
//! does not know, get [`TerminalConfig::default_family`]. A peer calling itself `ansi` that
//! also agreed to NAWS gets [`TerminalConfig::enhanced_family`].

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod attributes;
mod capability;
mod commands;
mod config;
mod engine;
mod key;
mod listener;
mod outbound;
mod result;
mod terminal;

pub use self::attributes::{AttributeFlags, CharacterSet, Color, ColorMode, format_sgr, screen_mode};
pub use self::capability::{Capability, CapabilityDatabase, TerminalEntry, expand};
pub use self::config::TerminalConfig;
pub use self::engine::{TerminalControlEngine, TerminalParseState};
pub use self::key::{Key, KeyKind};
pub use self::listener::{ListenerSet, TerminalListener};
pub use self::outbound::Outbound;
pub use self::result::{TerminalError, TerminalResult};
pub use self::terminal::Terminal;
