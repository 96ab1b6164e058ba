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


//! Echo Terminal Example
//!
//! Accepts Telnet connections on port 2323, negotiates terminal type and window size,
//! then echoes every keystroke back. Cursor keys are described in brackets and Ctrl-D
//! ends the session.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example echo_terminal
//! telnet localhost 2323
//! ```

use std::sync::{Arc, Mutex};
use termlink_negotiation::WindowGeometry;
use termlink_session::{Connection, SessionConfig, SessionResult};
use termlink_vtcontrol::{AttributeFlags, Color, Key, TerminalListener};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

#[derive(Default)]
struct KeyQueue {
    keys: Mutex<Vec<Key>>,
}

impl KeyQueue {
    fn drain(&self) -> Vec<Key> {
        match self.keys.lock() {
            Ok(mut keys) => std::mem::take(&mut *keys),
            Err(_) => Vec::new(),
        }
    }
}

impl TerminalListener for KeyQueue {
    fn on_key(&self, key: Key) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.push(key);
        }
    }

    fn on_resize(&self, geometry: WindowGeometry) {
        info!(%geometry, "client resized");
    }

    fn on_terminal_name(&self, name: &str) {
        info!(name, "client terminal identified");
    }
}

async fn serve(socket: TcpStream) -> SessionResult<()> {
    let queue = Arc::new(KeyQueue::default());
    let mut connection = Connection::new(socket, SessionConfig::default());
    connection.add_listener(&queue);
    connection.open().await?;

    let terminal = connection.terminal_mut();
    terminal.clear_screen()?;
    terminal.set_attributes(Color::Green, Color::Black, AttributeFlags::BOLD)?;
    terminal.send_text(b"termlink echo terminal\r\n")?;
    terminal.set_attributes(Color::White, Color::Black, AttributeFlags::empty())?;
    connection.flush().await?;

    while connection.process().await? {
        for key in queue.drain() {
            let terminal = connection.terminal_mut();
            match key {
                Key::Control(0x04) => {
                    connection.close().await?;
                    return Ok(());
                }
                Key::Char(byte) => terminal.send_text(&[byte])?,
                Key::CarriageReturn => terminal.send_text(b"\r\n")?,
                Key::LineFeed => {}
                other => terminal.send_text(format!("[{other}]").as_bytes())?,
            }
        }
        connection.flush().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let listener = TcpListener::bind("127.0.0.1:2323").await?;
    println!("Connect with: telnet localhost 2323");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                info!(%peer, "accepted connection");
                tokio::spawn(async move {
                    if let Err(err) = serve(socket).await {
                        warn!(%peer, %err, "session ended with error");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Shutting down");
                return Ok(());
            }
        }
    }
}
