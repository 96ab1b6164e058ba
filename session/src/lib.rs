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


//! # Termlink Session
//!
//! Drives a [`termlink_vtcontrol::Terminal`] over any tokio `AsyncRead + AsyncWrite` stream,
//! such as a `TcpStream`.
//!
//! The protocol engines are synchronous. [`Connection`] reads a chunk, feeds it through the
//! terminal (which fires listener callbacks inline), then flushes whatever the engines wrote.
//! Each connection owns its engines outright; only the capability database is shared.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use termlink_session::{Connection, SessionConfig};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = TcpListener::bind("0.0.0.0:2323").await?;
//!     loop {
//!         let (socket, _) = listener.accept().await?;
//!         tokio::spawn(async move {
//!             let mut connection = Connection::new(socket, SessionConfig::default());
//!             let _ = connection.run().await;
//!         });
//!     }
//! }
//! ```

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

mod config;
mod connection;
mod result;

pub use self::config::SessionConfig;
pub use self::connection::Connection;
pub use self::result::{SessionError, SessionResult};
