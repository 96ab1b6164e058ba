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


//! Connection tests over in-memory duplex streams

use std::sync::{Arc, Mutex};
use std::time::Duration;
use termlink_negotiation::consts::option::{ECHO, NAWS, SGA, TTYPE};
use termlink_negotiation::consts::{DO, IAC, SB, SE, WILL, WONT};
use termlink_negotiation::{NegotiationCommand, WindowGeometry};
use termlink_session::{Connection, SessionConfig, SessionError};
use termlink_vtcontrol::{Key, TerminalListener};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tracing_test::traced_test;

// ============================================================================
// Helper Functions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Key(Key),
    Resize(WindowGeometry),
    Name(String),
    Connect,
    Close,
    Error(std::io::ErrorKind),
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

impl Recorder {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }
}

impl TerminalListener for Recorder {
    fn on_key(&self, key: Key) {
        self.push(Event::Key(key));
    }
    fn on_resize(&self, geometry: WindowGeometry) {
        self.push(Event::Resize(geometry));
    }
    fn on_terminal_name(&self, name: &str) {
        self.push(Event::Name(name.to_string()));
    }
    fn on_connect(&self) {
        self.push(Event::Connect);
    }
    fn on_close(&self) {
        self.push(Event::Close);
    }
    fn on_error(&self, error: &std::io::Error) {
        self.push(Event::Error(error.kind()));
    }
}

const ANNOUNCE: [u8; 12] = [
    IAC, WILL, ECHO, IAC, WILL, SGA, IAC, DO, TTYPE, IAC, DO, NAWS,
];

fn connection(config: SessionConfig) -> (Connection<DuplexStream>, DuplexStream, Arc<Recorder>) {
    let (server, client) = duplex(4096);
    let recorder = Arc::new(Recorder::default());
    let mut connection = Connection::new(server, config);
    connection.add_listener(&recorder);
    (connection, client, recorder)
}

async fn read_n(client: &mut DuplexStream, len: usize) -> Vec<u8> {
    let mut buf = vec![0; len];
    client.read_exact(&mut buf).await.unwrap();
    buf
}

// ============================================================================
// Opening
// ============================================================================

#[tokio::test]
#[traced_test]
async fn test_open_announces_default_options() {
    let (mut connection, mut client, recorder) = connection(SessionConfig::default());
    connection.open().await.unwrap();

    assert_eq!(read_n(&mut client, ANNOUNCE.len()).await, ANNOUNCE);
    assert_eq!(recorder.events(), vec![Event::Connect]);
    assert!(logs_contain("announcing"));
}

#[tokio::test]
async fn test_open_with_custom_announcements() {
    let config = SessionConfig::default().with_announce(vec![(NegotiationCommand::Will, SGA)]);
    let (mut connection, mut client, _recorder) = connection(config);
    connection.open().await.unwrap();

    assert_eq!(read_n(&mut client, 3).await, [IAC, WILL, SGA]);
}

// ============================================================================
// Inbound Processing
// ============================================================================

#[tokio::test]
async fn test_keys_reach_listeners() {
    let (mut connection, mut client, recorder) = connection(SessionConfig::default());
    client.write_all(b"hi\x1b[A").await.unwrap();

    assert!(connection.process().await.unwrap());
    assert_eq!(
        recorder.events(),
        vec![
            Event::Key(Key::Char(b'h')),
            Event::Key(Key::Char(b'i')),
            Event::Key(Key::Up),
        ]
    );
}

#[tokio::test]
async fn test_unsupported_option_is_refused_on_the_wire() {
    let (mut connection, mut client, _recorder) = connection(SessionConfig::default());
    client.write_all(&[IAC, DO, 39]).await.unwrap();

    assert!(connection.process().await.unwrap());
    assert_eq!(read_n(&mut client, 3).await, [IAC, WONT, 39]);
}

#[tokio::test]
async fn test_terminal_name_and_window_size_exchange() {
    let (mut connection, mut client, recorder) = connection(SessionConfig::default());
    connection.open().await.unwrap();
    read_n(&mut client, ANNOUNCE.len()).await;

    client.write_all(&[IAC, WILL, TTYPE]).await.unwrap();
    assert!(connection.process().await.unwrap());
    assert_eq!(read_n(&mut client, 6).await, [IAC, SB, TTYPE, 1, IAC, SE]);

    let mut reply = vec![IAC, SB, TTYPE, 0];
    reply.extend_from_slice(b"xterm");
    reply.extend_from_slice(&[IAC, SE, IAC, WILL, NAWS, IAC, SB, NAWS, 0, 100, 0, 30, IAC, SE]);
    client.write_all(&reply).await.unwrap();
    assert!(connection.process().await.unwrap());

    let events = recorder.events();
    assert!(events.contains(&Event::Name("xterm".to_string())));
    assert!(events.contains(&Event::Resize(WindowGeometry::new(100, 30))));
    assert_eq!(connection.terminal().negotiation().terminal_name(), Some("xterm"));
}

#[tokio::test]
async fn test_display_commands_follow_identified_family() {
    let (mut connection, mut client, _recorder) = connection(SessionConfig::default());
    client.write_all(&[IAC, WILL, TTYPE]).await.unwrap();
    connection.process().await.unwrap();
    assert_eq!(
        read_n(&mut client, 9).await,
        [IAC, DO, TTYPE, IAC, SB, TTYPE, 1, IAC, SE]
    );

    let mut name = vec![IAC, SB, TTYPE, 0];
    name.extend_from_slice(b"xterm");
    name.extend_from_slice(&[IAC, SE]);
    client.write_all(&name).await.unwrap();
    connection.process().await.unwrap();

    connection.terminal_mut().clear_screen().unwrap();
    connection.flush().await.unwrap();

    let expected = b"\x1b[!p\x1b[?3;4l\x1b[4l\x1b>\x1b[H\x1b[2J";
    assert_eq!(read_n(&mut client, expected.len()).await, expected);
}

// ============================================================================
// Shutdown and Failure
// ============================================================================

#[tokio::test]
async fn test_peer_close_ends_processing() {
    let (mut connection, client, recorder) = connection(SessionConfig::default());
    drop(client);

    assert!(!connection.process().await.unwrap());
    assert!(connection.terminal().is_closed());
    assert_eq!(recorder.events(), vec![Event::Close]);
}

#[tokio::test]
async fn test_run_until_peer_disconnects() {
    let (mut connection, mut client, recorder) = connection(SessionConfig::default());
    let peer = async move {
        read_n(&mut client, ANNOUNCE.len()).await;
        client.write_all(b"q").await.unwrap();
        drop(client);
    };
    let (result, ()) = tokio::join!(connection.run(), peer);

    result.unwrap();
    assert_eq!(
        recorder.events(),
        vec![Event::Connect, Event::Key(Key::Char(b'q')), Event::Close]
    );
}

#[tokio::test]
#[traced_test]
async fn test_write_failure_reaches_listeners() {
    let (mut connection, client, recorder) = connection(SessionConfig::default());
    drop(client);

    let err = connection.open().await.unwrap_err();
    assert!(err.is_io());
    assert_eq!(
        recorder.events(),
        vec![Event::Connect, Event::Error(std::io::ErrorKind::BrokenPipe)]
    );
    assert!(logs_contain("stream failure"));
}

#[tokio::test(start_paused = true)]
async fn test_idle_peer_times_out() {
    let config = SessionConfig::default().with_read_timeout(Some(Duration::from_secs(30)));
    let (mut connection, _client, _recorder) = connection(config);

    let err = connection.process().await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, SessionError::Timeout(limit) if limit == Duration::from_secs(30)));
}

#[tokio::test]
async fn test_close_flushes_and_shuts_down() {
    let (mut connection, mut client, recorder) = connection(SessionConfig::default());
    connection.terminal_mut().send_text(b"bye").unwrap();
    connection.close().await.unwrap();

    let mut received = Vec::new();
    client.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"bye");
    assert_eq!(recorder.events(), vec![Event::Close]);
}
