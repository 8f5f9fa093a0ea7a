//! TCP transport
//!
//! Blocking TCP connection to the store with buffered I/O and timeouts.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::protocol::{read_response, write_command, Command, Response};
use super::{Connector, Transport};

/// A blocking TCP transport
pub struct TcpTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Cleared on close() or on a fatal I/O error
    open: bool,
}

impl TcpTransport {
    /// Dial the locator address and set up buffered I/O with timeouts
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let addr_str = config.locator_addr();
        let addr = addr_str
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| StoreError::Transport(format!("cannot resolve {}", addr_str)))?;

        // Zero means no timeout, same as the read/write timeouts below
        let stream = if config.connect_timeout_ms > 0 {
            TcpStream::connect_timeout(&addr, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(&addr)
        }
        .map_err(|e| StoreError::Transport(format!("connect to {}: {}", addr_str, e)))?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr_str.clone());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to store at {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            open: true,
        })
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn call(&mut self, command: &Command) -> Result<Response> {
        if !self.open {
            return Err(StoreError::Transport(format!(
                "connection to {} is closed",
                self.peer_addr
            )));
        }

        let result = write_command(&mut self.writer, command)
            .and_then(|_| read_response(&mut self.reader));

        // Any I/O or framing error leaves the stream in an unknown state
        if let Err(ref e) = result {
            tracing::warn!("Transport error talking to {}: {}", self.peer_addr, e);
            self.open = false;
        }

        result
    }

    fn is_open(&self) -> bool {
        if !self.open {
            return false;
        }
        // Pending socket errors mean the peer is gone even though we have
        // not attempted I/O since it happened
        matches!(self.reader.get_ref().take_error(), Ok(None))
    }

    fn close(&mut self) {
        if self.open {
            tracing::debug!("Closing connection to {}", self.peer_addr);
            let _ = self.writer.get_ref().shutdown(std::net::Shutdown::Both);
            self.open = false;
        }
    }
}

/// Default connector: dials a [`TcpTransport`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    fn connect(&self, config: &StoreConfig) -> Result<Box<dyn Transport>> {
        Ok(Box::new(TcpTransport::connect(config)?))
    }
}
