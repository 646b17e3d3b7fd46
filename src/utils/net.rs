use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::NetworkError;
use crate::Result;

/// accept host either like 127.0.0.1, ::1 or docker host name: node1
pub(crate) fn address_str(
    host: &str,
    port: u16,
) -> String {
    // Bare IPv6 literals need brackets before a port can be appended.
    let host = host.trim();
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Opens a TCP connection, giving up after `connect_timeout`.
pub(crate) async fn connect_with_timeout(
    address: &str,
    connect_timeout: Duration,
    tcp_nodelay: bool,
) -> Result<TcpStream> {
    let stream = match timeout(connect_timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            return Err(NetworkError::ConnectFailed {
                address: address.to_string(),
                source,
            }
            .into())
        }
        Err(_) => {
            return Err(NetworkError::ConnectTimeout {
                address: address.to_string(),
                duration: connect_timeout,
            }
            .into())
        }
    };

    stream.set_nodelay(tcp_nodelay).map_err(NetworkError::TcpNodelay)?;
    debug!("connected to {address}, nodelay={tcp_nodelay}");
    Ok(stream)
}
