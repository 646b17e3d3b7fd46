//! Minimal bidirectional TCP client for hosts that poll once per frame.
//!
//! A background task owns the socket and overwrites a single latest-payload
//! slot with every read; the host calls [`TcpClient::tick`] each frame and is
//! notified only when that payload changed. Messages sent before the
//! connection is open are queued and flushed in order once it is.

mod client;
mod codec;
mod config;
mod connection;
mod dispatcher;
mod errors;
mod utils;

pub use crate::client::*;
pub use crate::codec::*;
pub use crate::config::*;
pub use crate::connection::*;
pub use crate::dispatcher::*;
pub use crate::errors::*;


//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
