//! Polling TCP client facade
//!
//! Contains [`TcpClient`], which combines:
//! - the [`ConnectionManager`] owning the socket and its background tasks
//! - the [`EventDispatcher`] delivering notifications on tick
//!
//! plus the tokio runtime the background tasks run on.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::debug;

use super::TcpClientBuilder;
use crate::ClientEvent;
use crate::ConnectionManager;
use crate::ConnectionState;
use crate::EventDispatcher;
use crate::LatestPayload;
use crate::Result;

/// Main entry point for the host application
///
/// Connect with [`connect`](TcpClient::connect), send with
/// [`send`](TcpClient::send) and call [`tick`](TcpClient::tick) once per
/// frame to receive notifications.
///
/// Created through [`builder()`](TcpClient::builder) or
/// [`new()`](TcpClient::new).
pub struct TcpClient {
    manager: ConnectionManager,
    dispatcher: EventDispatcher,
    latest: Arc<LatestPayload>,
    /// Set when no ambient tokio runtime existed at build time
    runtime: Option<Runtime>,
}

impl TcpClient {
    pub(super) fn from_parts(
        manager: ConnectionManager,
        dispatcher: EventDispatcher,
        latest: Arc<LatestPayload>,
        runtime: Option<Runtime>,
    ) -> Self {
        Self {
            manager,
            dispatcher,
            latest,
            runtime,
        }
    }

    /// Client with default configuration
    pub fn new() -> Result<Self> {
        TcpClientBuilder::new().build()
    }

    pub fn builder() -> TcpClientBuilder {
        TcpClientBuilder::new()
    }

    /// Starts connecting in the background; see [`ConnectionManager::connect`].
    ///
    /// # Examples
    /// ```rust,ignore
    /// client.connect("127.0.0.1", 9000);
    /// client.send("hello"); // queued until the socket opens
    /// ```
    pub fn connect(
        &self,
        host: &str,
        port: u16,
    ) {
        self.manager.connect(host, port);
    }

    /// Writes when connected, queues otherwise.
    pub fn send(
        &self,
        message: &str,
    ) {
        self.manager.send(message);
    }

    /// Polling step, to be called once per frame.
    pub fn tick(&mut self) -> Vec<ClientEvent> {
        self.dispatcher.tick()
    }

    /// Registers a listener for changed inbound payloads.
    pub fn on_message_received<F>(
        &mut self,
        listener: F,
    ) where
        F: FnMut(&str) + Send + 'static,
    {
        self.dispatcher.on_message_received(listener);
    }

    /// Registers a listener for connections ending in a socket error.
    pub fn on_connection_failed<F>(
        &mut self,
        listener: F,
    ) where
        F: FnMut(&str) + Send + 'static,
    {
        self.dispatcher.on_connection_failed(listener);
    }

    pub fn state(&self) -> ConnectionState {
        self.manager.state()
    }

    /// Current content of the latest-payload slot, without delivering it.
    pub fn latest_payload(&self) -> Option<String> {
        self.latest.load().map(|payload| payload.as_ref().clone())
    }

    /// Number of messages waiting for a connection
    pub fn pending_len(&self) -> usize {
        self.manager.pending_len()
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        // Cancel the connection before the runtime goes away
        self.manager.shutdown();
        if let Some(runtime) = self.runtime.take() {
            debug!("shutting down owned I/O runtime");
            runtime.shutdown_background();
        }
    }
}
