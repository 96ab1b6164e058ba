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


//! Tokio driver for one terminal connection

use crate::{SessionConfig, SessionError, SessionResult};
use bytes::BytesMut;
use std::sync::Arc;
use termlink_negotiation::NegotiationConfig;
use termlink_vtcontrol::{Terminal, TerminalConfig, TerminalListener};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, trace};

/// A terminal session over an async byte stream.
///
/// Owns the stream and a [`Terminal`] whose transport is an outbound [`BytesMut`] buffer.
/// Everything the engines write lands in that buffer, which is flushed to the stream after
/// every processed read and on [`Connection::flush`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use termlink_session::{Connection, SessionConfig};
/// use termlink_vtcontrol::{Key, TerminalListener};
/// use tokio::net::TcpListener;
///
/// struct Printer;
///
/// impl TerminalListener for Printer {
///     fn on_key(&self, key: Key) {
///         println!("{key}");
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let listener = TcpListener::bind("127.0.0.1:2323").await?;
/// let (socket, _) = listener.accept().await?;
/// let printer = Arc::new(Printer);
/// let mut connection = Connection::new(socket, SessionConfig::default());
/// connection.add_listener(&printer);
/// connection.run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    terminal: Terminal<BytesMut>,
    config: SessionConfig,
    read_buffer: Vec<u8>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a stream with default negotiation and terminal settings.
    pub fn new(stream: S, config: SessionConfig) -> Self {
        Self::with_terminal_config(
            stream,
            config,
            NegotiationConfig::default(),
            TerminalConfig::default(),
        )
    }

    /// Wraps a stream with explicit settings for every layer.
    pub fn with_terminal_config(
        stream: S,
        config: SessionConfig,
        negotiation: NegotiationConfig,
        terminal: TerminalConfig,
    ) -> Self {
        let read_buffer = vec![0; config.read_buffer_size.max(1)];
        Self {
            stream,
            terminal: Terminal::with_config(BytesMut::with_capacity(1024), negotiation, terminal),
            config,
            read_buffer,
        }
    }

    /// Registers a terminal listener. Only a weak reference is kept.
    pub fn add_listener<L>(&mut self, listener: &Arc<L>)
    where
        L: TerminalListener + 'static,
    {
        self.terminal.add_listener(listener);
    }

    /// The terminal driven by this connection.
    pub fn terminal(&self) -> &Terminal<BytesMut> {
        &self.terminal
    }

    /// Mutable access for issuing outbound commands; call [`Connection::flush`] afterwards.
    pub fn terminal_mut(&mut self) -> &mut Terminal<BytesMut> {
        &mut self.terminal
    }

    /// Session settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Consumes the connection, returning the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Delivers the connect notification, announces the configured options and flushes.
    #[instrument(skip(self))]
    pub async fn open(&mut self) -> SessionResult<()> {
        self.terminal.connect();
        for index in 0..self.config.announce.len() {
            let (command, option) = self.config.announce[index];
            trace!(%command, option, "announcing");
            self.terminal.negotiate(command, option)?;
        }
        self.flush().await
    }

    /// Reads once from the stream and runs the bytes through the terminal.
    ///
    /// Returns `false` once the peer has closed the stream, after the close notification
    /// has been delivered.
    pub async fn process(&mut self) -> SessionResult<bool> {
        let read = match self.config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.read(&mut self.read_buffer))
                .await
                .map_err(|_| SessionError::Timeout(limit))?,
            None => self.stream.read(&mut self.read_buffer).await,
        };
        match read {
            Ok(0) => {
                debug!("peer closed the stream");
                self.terminal.close();
                Ok(false)
            }
            Ok(len) => {
                trace!(len, "read");
                self.terminal.on_bytes(&self.read_buffer[..len])?;
                self.flush().await?;
                Ok(true)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Opens the session and processes reads until the peer closes or the terminal is closed.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> SessionResult<()> {
        self.open().await?;
        while !self.terminal.is_closed() && self.process().await? {}
        debug!("session finished");
        Ok(())
    }

    /// Writes all buffered outbound bytes to the stream.
    pub async fn flush(&mut self) -> SessionResult<()> {
        if self.terminal.transport().is_empty() {
            return Ok(());
        }
        let pending = self.terminal.transport_mut().split();
        trace!(len = pending.len(), "flushing");
        if let Err(err) = self.stream.write_all(&pending).await {
            return Err(self.fail(err));
        }
        if let Err(err) = self.stream.flush().await {
            return Err(self.fail(err));
        }
        Ok(())
    }

    /// Delivers the close notification, flushes pending output and shuts the stream down.
    pub async fn close(&mut self) -> SessionResult<()> {
        self.terminal.close();
        self.flush().await?;
        if let Err(err) = self.stream.shutdown().await {
            return Err(self.fail(err));
        }
        Ok(())
    }

    fn fail(&mut self, err: std::io::Error) -> SessionError {
        error!(%err, "stream failure");
        self.terminal.transport_error(&err);
        SessionError::Io(err)
    }
}
