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


//! # Termlink Telnet Negotiation
//!
//! A byte-oriented Telnet (RFC 854) option negotiation engine. It sits between a raw transport
//! and an application, separates in-band commands from payload, and keeps the per-option
//! agreement table for one connection.
//!
//! ## Core Components
//!
//! ### [`NegotiationEngine`]
//!
//! The state machine. Feed it transport bytes with [`NegotiationEngine::on_bytes`]; it calls
//! back into a [`NegotiationListener`] and writes auto-responses through a [`Transport`].
//!
//! ### [`OptionTable`]
//!
//! What was sent and what was received for each of the 256 option codes, as an
//! [`OptionState`] of `Unset`, `On` or `Off`.
//!
//! ### Built-in options
//!
//! - **TERMINAL-TYPE** (RFC 1091): `DO` is answered with `WILL`, `SEND` is answered with the
//!   configured terminal name, and a peer's `IS` is reported lower-cased.
//! - **NAWS** (RFC 1073): `DO` is answered with `WILL` and the configured [`WindowGeometry`];
//!   the peer's geometry is reported as one event per frame.
//!
//! Everything else goes to the listener, which may return a [`Reply`].
//!
//! ## Thread Safety
//!
//! One engine per connection. The engine borrows its listener and transport per call and does
//! no locking of its own.

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

mod command;
mod config;
pub mod consts;
mod engine;
mod geometry;
mod listener;
mod options;
mod result;
mod transport;

pub use self::command::{NegotiationCommand, SubnegotiationKind};
pub use self::config::NegotiationConfig;
pub use self::engine::{NegotiationEngine, NegotiationState};
pub use self::geometry::WindowGeometry;
pub use self::listener::{NegotiationListener, Reply};
pub use self::options::{OptionState, OptionStatus, OptionTable};
pub use self::result::{NegotiationError, NegotiationResult, ProtocolError};
pub use self::transport::Transport;
