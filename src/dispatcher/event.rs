/// Notifications surfaced to the consumer on tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The latest inbound payload changed since the previous delivery
    MessageReceived(String),
    /// The connection ended because of a socket error
    ConnectionFailed(String),
}
