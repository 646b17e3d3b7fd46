use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::trace;

use super::manager::ConnectionInner;
use super::manager::Termination;
use crate::Error;
use crate::NetworkError;
use crate::Result;

/// Drains the connection's outbound channel into the socket, in order.
///
/// A failed write drops the message, ends the connection and reports the
/// socket error through the failure notification.
pub(crate) async fn write_loop(
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<Vec<u8>>,
    inner: Arc<ConnectionInner>,
    generation: u64,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = outbound.recv() => match next {
                Some(bytes) => bytes,
                None => break,
            },
        };

        let written = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            written = writer.write_all(&bytes) => written,
        };

        match written {
            Ok(()) => debug!("[C] {}", inner.encoding.decode(&bytes)),
            Err(e) => {
                let err: Error = NetworkError::Write(e).into();
                error!("Socket exception: {}", err);
                inner.terminate(generation, Termination::WriteFailed(err.reason()));
                return Ok(());
            }
        }
    }

    trace!("write loop of connection {generation} stopped");
    Ok(())
}
