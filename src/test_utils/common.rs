use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio::time::Instant;

use crate::connection::ConnectionInner;
use crate::ClientEvent;
use crate::ConnectionManager;
use crate::LatestPayload;
use crate::NetworkConfig;
use crate::TextEncoding;

pub(crate) const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Loopback listener on an ephemeral port
pub(crate) async fn bind_loopback() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A port nothing listens on
pub(crate) async fn closed_port() -> u16 {
    let (listener, port) = bind_loopback().await;
    drop(listener);
    port
}

pub(crate) async fn accept(listener: &TcpListener) -> TcpStream {
    let (stream, _) = tokio::time::timeout(WAIT_TIMEOUT, listener.accept())
        .await
        .expect("client did not connect in time")
        .unwrap();
    stream
}

/// Reads exactly `len` bytes from the server side of a connection
pub(crate) async fn read_text(
    stream: &mut TcpStream,
    len: usize,
) -> String {
    let mut buf = vec![0; len];
    tokio::time::timeout(WAIT_TIMEOUT, stream.read_exact(&mut buf))
        .await
        .expect("timed out reading from client")
        .unwrap();
    String::from_utf8(buf).unwrap()
}

/// Polls `condition` until it holds or [`WAIT_TIMEOUT`] elapses
pub(crate) async fn wait_until<F>(mut condition: F) -> bool
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

/// Manager wired to a bare latest slot and event channel, without dispatcher
pub(crate) struct ManagerHarness {
    pub(crate) manager: ConnectionManager,
    pub(crate) inner: Arc<ConnectionInner>,
    pub(crate) latest: Arc<LatestPayload>,
    pub(crate) events: mpsc::UnboundedReceiver<ClientEvent>,
}

pub(crate) fn manager_harness() -> ManagerHarness {
    let latest = Arc::new(LatestPayload::new());
    let (events_tx, events) = mpsc::unbounded_channel();
    let inner = Arc::new(ConnectionInner::new(
        latest.clone(),
        TextEncoding::Ascii,
        events_tx,
    ));
    let network = NetworkConfig {
        connect_timeout_in_ms: 1000,
        ..NetworkConfig::default()
    };
    let manager = ConnectionManager::new(Handle::current(), network, inner.clone());
    ManagerHarness {
        manager,
        inner,
        latest,
        events,
    }
}

/// Server side sends RST instead of FIN when dropped
#[allow(deprecated)]
pub(crate) fn reset_on_drop(stream: &TcpStream) {
    stream.set_linger(Some(Duration::ZERO)).unwrap();
}
