use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tick_tcp::ClientEvent;
use tick_tcp::TcpClient;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio::time::timeout;
use tokio::time::Instant;

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

// one host frame at 60 fps
pub const FRAME: Duration = Duration::from_millis(16);

pub async fn bind_loopback() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

pub async fn accept(listener: &TcpListener) -> TcpStream {
    let (stream, _) = timeout(WAIT_TIMEOUT, listener.accept())
        .await
        .expect("client did not connect in time")
        .unwrap();
    stream
}

pub async fn read_text(
    stream: &mut TcpStream,
    len: usize,
) -> String {
    let mut buf = vec![0; len];
    timeout(WAIT_TIMEOUT, stream.read_exact(&mut buf))
        .await
        .expect("timed out reading from client")
        .unwrap();
    String::from_utf8(buf).unwrap()
}

/// Everything the client's listeners were called with
#[derive(Clone, Default)]
pub struct Recorder {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub failures: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn attach(client: &mut TcpClient) -> Self {
        let recorder = Self::default();
        let messages = recorder.messages.clone();
        client.on_message_received(move |m| messages.lock().push(m.to_string()));
        let failures = recorder.failures.clone();
        client.on_connection_failed(move |r| failures.lock().push(r.to_string()));
        recorder
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }
}

/// Waits without ticking, so nothing is delivered meanwhile
pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Ticks once per frame until `condition` holds, collecting fired events
pub async fn tick_until<F>(
    client: &mut TcpClient,
    mut condition: F,
) -> Vec<ClientEvent>
where
    F: FnMut(&TcpClient, &[ClientEvent]) -> bool,
{
    let deadline = Instant::now() + WAIT_TIMEOUT;
    let mut all = Vec::new();
    while Instant::now() < deadline {
        all.extend(client.tick());
        if condition(&*client, &all) {
            break;
        }
        sleep(FRAME).await;
    }
    all
}

#[allow(deprecated)]
pub fn reset_on_drop(stream: &TcpStream) {
    stream.set_linger(Some(Duration::ZERO)).unwrap();
}
