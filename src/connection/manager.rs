//! Connection lifecycle and the outbound send path.
//!
//! [`ConnectionManager::connect`] is fire-and-forget: it records the attempt,
//! then a background task opens the socket, spawns the writer and hands the
//! read side to a [`ReceiveLoop`]. Callers learn about failures only through
//! the `ConnectionFailed` notification.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::write_loop;
use super::ConnectionState;
use super::LatestPayload;
use super::PendingQueue;
use super::ReceiveLoop;
use crate::utils::async_task::spawn_task;
use crate::utils::net::address_str;
use crate::utils::net::connect_with_timeout;
use crate::ClientEvent;
use crate::NetworkConfig;
use crate::Result;
use crate::TextEncoding;

/// Why a connection stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The TCP handshake never completed. Logged only.
    ConnectFailed,
    /// The peer closed its side gracefully. Logged only.
    PeerClosed,
    /// A socket read failed.
    ReadFailed(String),
    /// A socket write failed; the message being written is dropped.
    WriteFailed(String),
}

#[derive(Debug, Default)]
struct LinkState {
    state: ConnectionState,
    /// Bumped on every connect so stale tasks of a replaced connection
    /// cannot touch the current one.
    generation: u64,
    address: Option<String>,
    /// Present iff `state` is `Connected`
    writer: Option<mpsc::UnboundedSender<Vec<u8>>>,
    cancel: Option<CancellationToken>,
}

/// State shared between the host thread and the connection tasks.
pub(crate) struct ConnectionInner {
    link: Mutex<LinkState>,
    pub(crate) pending: PendingQueue,
    pub(crate) latest: Arc<LatestPayload>,
    pub(crate) encoding: TextEncoding,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl ConnectionInner {
    pub(crate) fn new(
        latest: Arc<LatestPayload>,
        encoding: TextEncoding,
        events: mpsc::UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            link: Mutex::new(LinkState::default()),
            pending: PendingQueue::new(),
            latest,
            encoding,
            events,
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.link.lock().state
    }

    /// Registers a new connection attempt, cancelling the previous one.
    ///
    /// Returns the generation and cancellation token owned by the attempt.
    pub(crate) fn begin(
        &self,
        address: &str,
    ) -> (u64, CancellationToken) {
        let cancel = CancellationToken::new();
        let mut link = self.link.lock();
        if let Some(previous) = link.cancel.replace(cancel.clone()) {
            debug!("cancelling previous connection to {:?}", link.address);
            previous.cancel();
        }
        link.generation += 1;
        link.state = ConnectionState::Connecting;
        link.writer = None;
        link.address = Some(address.to_string());
        (link.generation, cancel)
    }

    /// Marks the connection as open and flushes the pending queue into it.
    ///
    /// Both happen under the link lock, so a concurrent [`send`](Self::send)
    /// either lands in the queue before it is taken or goes to the writer
    /// after every queued message. Returns `false` if the attempt was
    /// superseded in the meantime.
    pub(crate) fn activate(
        &self,
        generation: u64,
        writer: mpsc::UnboundedSender<Vec<u8>>,
    ) -> bool {
        let mut link = self.link.lock();
        if link.generation != generation || link.state != ConnectionState::Connecting {
            return false;
        }
        link.state = ConnectionState::Connected;
        info!("connected to {:?}", link.address);

        let queued = self.pending.take_all();
        if !queued.is_empty() {
            debug!("flushing {} queued messages", queued.len());
        }
        for message in queued {
            self.write_connected(&writer, message);
        }
        link.writer = Some(writer);
        true
    }

    pub(crate) fn send(
        &self,
        message: String,
    ) {
        let link = self.link.lock();
        match &link.writer {
            Some(writer) if link.state.is_connected() => self.write_connected(writer, message),
            _ => {
                debug!("Tried to send message whilst not connected, queued. {}", message);
                self.pending.push(message);
            }
        }
    }

    fn write_connected(
        &self,
        writer: &mpsc::UnboundedSender<Vec<u8>>,
        message: String,
    ) {
        let bytes = self.encoding.encode(&message);
        if writer.send(bytes).is_err() {
            // Writer already gone with its connection; the message is dropped.
            warn!("connection writer closed, dropping message: {}", message);
        }
    }

    /// Ends the connection of `generation`.
    ///
    /// Only the first termination of a live connection takes effect, so the
    /// failure notification fires at most once per connection. Returns whether
    /// this call performed the transition.
    pub(crate) fn terminate(
        &self,
        generation: u64,
        termination: Termination,
    ) -> bool {
        {
            let mut link = self.link.lock();
            if link.generation != generation || !link.state.is_live() {
                return false;
            }
            link.state = ConnectionState::Failed;
            link.writer = None;
            if let Some(cancel) = link.cancel.take() {
                cancel.cancel();
            }
        }

        match termination {
            Termination::ConnectFailed => {}
            Termination::PeerClosed => info!("peer closed the connection"),
            Termination::ReadFailed(reason) => {
                // The error text also replaces the latest payload
                self.latest.store(reason.clone());
                self.notify_failure(reason);
            }
            Termination::WriteFailed(reason) => self.notify_failure(reason),
        }
        true
    }

    fn notify_failure(
        &self,
        reason: String,
    ) {
        if self.events.send(ClientEvent::ConnectionFailed(reason)).is_err() {
            debug!("event dispatcher dropped, failure notification discarded");
        }
    }

    /// Cancels whatever connection is current. Used on teardown.
    pub(crate) fn shutdown(&self) {
        let mut link = self.link.lock();
        link.writer = None;
        if let Some(cancel) = link.cancel.take() {
            cancel.cancel();
        }
    }
}

/// Owns the socket lifecycle of the client's single connection.
pub struct ConnectionManager {
    runtime: Handle,
    network: NetworkConfig,
    inner: Arc<ConnectionInner>,
}

impl ConnectionManager {
    pub(crate) fn new(
        runtime: Handle,
        network: NetworkConfig,
        inner: Arc<ConnectionInner>,
    ) -> Self {
        Self {
            runtime,
            network,
            inner,
        }
    }

    /// Starts connecting to `host:port` in the background.
    ///
    /// Any previous connection is cancelled. Nothing signals success; a failed
    /// handshake is logged and leaves the state `Failed`.
    pub fn connect(
        &self,
        host: &str,
        port: u16,
    ) {
        let address = address_str(host, port);
        let (generation, cancel) = self.inner.begin(&address);
        info!("connecting to {address} (attempt {generation})");

        let inner = self.inner.clone();
        let network = self.network.clone();
        spawn_task(&self.runtime, "connection", move || {
            run_connection(inner, generation, address, network, cancel)
        });
    }

    /// Writes `message` if connected, otherwise queues it for the next
    /// connection. Never fails from the caller's point of view.
    pub fn send(
        &self,
        message: &str,
    ) {
        self.inner.send(message.to_string());
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.pending.len()
    }

    pub(crate) fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_connection(
    inner: Arc<ConnectionInner>,
    generation: u64,
    address: String,
    network: NetworkConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let connected = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("connect to {address} cancelled");
            return Ok(());
        }
        result = connect_with_timeout(&address, network.connect_timeout(), network.tcp_nodelay) => result,
    };

    let stream = match connected {
        Ok(stream) => stream,
        Err(e) => {
            warn!("On client connect exception {}", e);
            inner.terminate(generation, Termination::ConnectFailed);
            return Ok(());
        }
    };

    let (reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    let writer_inner = inner.clone();
    let writer_cancel = cancel.clone();
    spawn_task(&Handle::current(), "write_loop", move || {
        write_loop(writer, outbound_rx, writer_inner, generation, writer_cancel)
    });

    ReceiveLoop::new(reader, inner, generation, cancel, network.read_buffer_size)
        .run(outbound_tx)
        .await
}
