use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;

use super::manager::ConnectionInner;
use super::manager::Termination;
use crate::Error;
use crate::NetworkError;
use crate::Result;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReadOutcome {
    /// A read returned zero bytes
    PeerClosed,
    /// The connection's token fired while waiting for data
    Cancelled,
}

/// Background task owning the read side of one connection.
///
/// Every non-empty read is decoded and overwrites the latest payload slot.
/// One read is one message: TCP may split or coalesce what the peer wrote,
/// and nothing here reassembles it.
pub(crate) struct ReceiveLoop {
    reader: OwnedReadHalf,
    inner: Arc<ConnectionInner>,
    generation: u64,
    cancel: CancellationToken,
    buffer: Vec<u8>,
}

impl ReceiveLoop {
    pub(crate) fn new(
        reader: OwnedReadHalf,
        inner: Arc<ConnectionInner>,
        generation: u64,
        cancel: CancellationToken,
        read_buffer_size: usize,
    ) -> Self {
        Self {
            reader,
            inner,
            generation,
            cancel,
            buffer: vec![0; read_buffer_size],
        }
    }

    /// Flushes the pending queue into `outbound`, then reads until the
    /// connection closes, fails or is cancelled.
    pub(crate) async fn run(
        mut self,
        outbound: mpsc::UnboundedSender<Vec<u8>>,
    ) -> Result<()> {
        if !self.inner.activate(self.generation, outbound) {
            debug!("connection {} superseded before activation", self.generation);
            return Ok(());
        }

        match self.read_until_closed().await {
            Ok(ReadOutcome::PeerClosed) => {
                self.inner.terminate(self.generation, Termination::PeerClosed);
            }
            Ok(ReadOutcome::Cancelled) => {
                debug!("receive loop of connection {} cancelled", self.generation);
            }
            Err(e) => {
                error!("Socket exception: {}", e);
                self.inner.terminate(self.generation, Termination::ReadFailed(e.reason()));
            }
        }
        Ok(())
    }

    pub(crate) async fn read_until_closed(&mut self) -> Result<ReadOutcome> {
        loop {
            let length = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(ReadOutcome::Cancelled),
                read = self.reader.read(&mut self.buffer) => read.map_err(|e| Error::from(NetworkError::Read(e)))?,
            };

            if length == 0 {
                return Ok(ReadOutcome::PeerClosed);
            }

            let payload = self.inner.encoding.decode(&self.buffer[..length]);
            debug!("[S] {}", payload);
            self.inner.latest.store(payload);
        }
    }
}
