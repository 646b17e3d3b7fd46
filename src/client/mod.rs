//! Client module for the polling TCP client
//!
//! Provides the public surface used by the host application:
//! - [`TcpClient`] - connect, send, tick and listener registration
//! - [`TcpClientBuilder`] - configurable client construction
//!
//! # Basic Usage
//! ```no_run
//! use std::time::Duration;
//! use tick_tcp::TcpClient;
//!
//! let mut client = TcpClient::builder()
//!     .connect_timeout(Duration::from_secs(3))
//!     .build()
//!     .unwrap();
//!
//! client.on_message_received(|message| println!("server says {message}"));
//! client.on_connection_failed(|reason| eprintln!("connection lost: {reason}"));
//!
//! client.send("queued until connected");
//! client.connect("127.0.0.1", 9000);
//!
//! loop {
//!     // once per frame
//!     client.tick();
//!     std::thread::sleep(Duration::from_millis(16));
//! }
//! ```

mod builder;
#[allow(clippy::module_inception)]
mod client;

pub use builder::*;
pub use client::*;
