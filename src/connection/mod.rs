//! The connection core: lifecycle, background receive loop, pending outbound
//! queue and the latest-payload slot shared with the dispatcher.

mod latest_payload;
mod manager;
mod pending_queue;
mod receive_loop;
mod state;
mod write_loop;

pub use latest_payload::*;
pub use manager::ConnectionManager;
pub(crate) use manager::ConnectionInner;
pub use pending_queue::*;
pub(crate) use receive_loop::ReceiveLoop;
pub use state::*;
pub(crate) use write_loop::write_loop;
