//! Transport Module
//!
//! Client-side connection to the region store.
//!
//! ## Architecture
//! - `Transport`: one request/response exchange at a time over an
//!   established connection
//! - `Connector`: dials a new transport from a [`StoreConfig`]; the seam
//!   that lets tests substitute a scripted transport for a real socket
//!
//! [`StoreConfig`]: crate::StoreConfig

mod tcp;

pub use tcp::{TcpConnector, TcpTransport};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::protocol::{Command, Response};

/// A live, request/response connection to the store
pub trait Transport {
    /// Send one command and wait for its response
    fn call(&mut self, command: &Command) -> Result<Response>;

    /// Whether the underlying connection is still open, polled at call time
    /// rather than cached, so asynchronous remote closure is visible
    fn is_open(&self) -> bool;

    /// Close the connection; further calls fail
    fn close(&mut self);
}

/// Dials new transports
pub trait Connector {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn Transport>>;
}
