use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;

use super::TcpClient;
use crate::connection::ConnectionInner;
use crate::ClientConfig;
use crate::ConnectionManager;
use crate::EventDispatcher;
use crate::LatestPayload;
use crate::Result;
use crate::SystemError;
use crate::TextEncoding;

/// Name of the worker thread of an owned I/O runtime
pub const IO_THREAD_NAME: &str = "tick-tcp-io";

pub struct TcpClientBuilder {
    pub(super) config: ClientConfig,
    runtime: Option<Handle>,
}

impl Default for TcpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpClientBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            runtime: None,
        }
    }

    /// Set connection timeout (default: 5s)
    pub fn connect_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.config.network.connect_timeout_in_ms =
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the size of each socket read (default: 1024 bytes)
    pub fn read_buffer_size(
        mut self,
        size: usize,
    ) -> Self {
        self.config.network.read_buffer_size = size;
        self
    }

    /// Set the wire text encoding (default: ASCII)
    pub fn encoding(
        mut self,
        encoding: TextEncoding,
    ) -> Self {
        self.config.codec.encoding = encoding;
        self
    }

    /// Completely replaces the default configuration
    ///
    /// # Warning: Configuration Override
    /// This will discard all previous settings configured through individual
    /// methods like [`connect_timeout`](TcpClientBuilder::connect_timeout).
    pub fn set_config(
        mut self,
        config: ClientConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Run the background tasks on an existing runtime.
    ///
    /// Without it the ambient runtime is used when `build` is called from
    /// inside one, otherwise the client starts its own single worker runtime.
    pub fn runtime(
        mut self,
        handle: Handle,
    ) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build the client with current configuration
    pub fn build(self) -> Result<TcpClient> {
        let config = self.config.validate()?;

        let (handle, owned) = match self.runtime.or_else(|| Handle::try_current().ok()) {
            Some(handle) => (handle, None),
            None => {
                let runtime = build_io_runtime()?;
                (runtime.handle().clone(), Some(runtime))
            }
        };
        debug!(
            "building client, owned runtime: {}, config: {:?}",
            owned.is_some(),
            config
        );

        let latest = Arc::new(LatestPayload::new());
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(ConnectionInner::new(
            latest.clone(),
            config.codec.encoding,
            events_tx,
        ));

        let manager = ConnectionManager::new(handle, config.network, inner);
        let dispatcher = EventDispatcher::new(latest.clone(), events_rx);
        Ok(TcpClient::from_parts(manager, dispatcher, latest, owned))
    }
}

fn build_io_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name(IO_THREAD_NAME)
        .enable_all()
        .build()
        .map_err(|e| SystemError::RuntimeBuild(e).into())
}
