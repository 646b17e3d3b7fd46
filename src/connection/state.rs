/// Lifecycle of the client connection.
///
/// ```text
/// Disconnected --connect()--> Connecting --socket opens--> Connected
///                                  |                           |
///                                  +--- error ---> Failed <----+ error / peer close
/// ```
///
/// `Failed` is terminal for the connection; only a fresh `connect` leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// A connection attempt or an open connection exists
    pub(crate) fn is_live(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}
