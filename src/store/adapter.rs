//! StoreAdapter
//!
//! The client adapter that coordinates transport and region state.
//!
//! ## Connection Model
//!
//! An adapter is in exactly one of two states:
//!
//! - `Disconnected`: no transport, no region handle
//! - `Connected`: a live transport plus the region handle resolved for this
//!   session
//!
//! Every data operation requires a connected session and will lazily open
//! one if the adapter is disconnected (or its transport died underneath it).
//! Region resolution happens at most once per session; the server creates
//! the region with default proxy policy if it does not exist yet.
//!
//! ## Error Model
//!
//! A miss is `Ok(None)`, a failure is `Err`: callers can always tell an
//! absent key from an unreachable store. Query semantic errors (malformed
//! predicate, type mismatch, unresolved field name) surface as
//! [`StoreError::Query`], distinct from transport failures. A
//! connection-level failure drops the session so the next operation
//! reconnects.

use std::collections::HashMap;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::protocol::{decode_batch_values, decode_query_results, Command, Response, Status};
use crate::transport::{Connector, TcpConnector, Transport};
use super::{Key, RegionHandle, Value};

/// Connection state of an adapter
enum Session {
    Disconnected,
    Connected {
        transport: Box<dyn Transport>,
        region: RegionHandle,
    },
}

/// Client adapter for the remote region store
pub struct StoreAdapter {
    /// Adapter configuration (locator address, region name, timeouts)
    config: StoreConfig,

    /// Dials new transports; swapped out for a scripted one in tests
    connector: Box<dyn Connector>,

    /// Current connection state
    session: Session,
}

impl StoreAdapter {
    /// Create a disconnected adapter using the TCP connector
    ///
    /// Nothing is dialed here; the connection materializes on `connect()`
    /// or on the first data operation.
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::with_connector(config, Box::new(TcpConnector))
    }

    /// Create a disconnected adapter with a custom connector
    pub fn with_connector(config: StoreConfig, connector: Box<dyn Connector>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            connector,
            session: Session::Disconnected,
        })
    }

    // =========================================================================
    // Connection Lifecycle
    // =========================================================================

    /// Open a connection and resolve the configured region
    ///
    /// Idempotent: calling while connected with a live transport reuses the
    /// cached region handle and does not touch the server.
    pub fn connect(&mut self) -> Result<()> {
        if self.has_live_session() {
            return Ok(());
        }
        self.open_session()
    }

    /// Close the connection and discard the region handle
    ///
    /// Idempotent: disconnecting while disconnected is a no-op.
    pub fn disconnect(&mut self) -> Result<()> {
        if let Session::Connected { transport, region } = &mut self.session {
            tracing::debug!("Disconnecting from region '{}'", region.name());
            transport.close();
        }
        self.session = Session::Disconnected;
        Ok(())
    }

    /// Whether the adapter currently holds a live connection
    ///
    /// Polls the transport's open flag at call time rather than caching it,
    /// so a connection closed by the remote side reads as disconnected even
    /// before the next operation fails.
    pub fn is_connected(&self) -> bool {
        match &self.session {
            Session::Connected { transport, .. } => transport.is_open(),
            Session::Disconnected => false,
        }
    }

    // =========================================================================
    // Data Operations
    // =========================================================================

    /// Get a value by key
    ///
    /// `Ok(None)` means the key is absent; transport failures are `Err`.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Value>> {
        let response = self.exchange(&Command::Get { key: key.to_vec() })?;
        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            Status::Error => Err(StoreError::Remote(response.error_message())),
        }
    }

    /// Batched lookup preserving input key order
    ///
    /// One round trip, not N single gets. The result has the same length and
    /// order as `keys`; absent keys map to `None` in the same position.
    pub fn get_all(&mut self, keys: &[Key]) -> Result<Vec<Option<Value>>> {
        let response = self.exchange(&Command::GetAll {
            keys: keys.to_vec(),
        })?;
        let values = match response.status {
            Status::Ok => decode_batch_values(response.payload.as_deref().unwrap_or(&[]))?,
            Status::NotFound => {
                return Err(StoreError::Protocol(
                    "unexpected NOT_FOUND status for GET_ALL".to_string(),
                ))
            }
            Status::Error => return Err(StoreError::Remote(response.error_message())),
        };

        // A short reply would silently misalign keys and values
        if values.len() != keys.len() {
            return Err(StoreError::Protocol(format!(
                "GET_ALL reply length {} does not match request length {}",
                values.len(),
                keys.len()
            )));
        }

        Ok(values)
    }

    /// Same batched lookup as `get_all`, returned as a key-to-value map
    ///
    /// Absent keys are simply absent from the map.
    pub fn get_all_map(&mut self, keys: &[Key]) -> Result<HashMap<Key, Value>> {
        let values = self.get_all(keys)?;
        let map = keys
            .iter()
            .cloned()
            .zip(values)
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        Ok(map)
    }

    /// Upsert a key-value pair
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let response = self.exchange(&Command::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        })?;
        self.expect_ok(response, "PUT")
    }

    /// Batched upsert in a single round trip
    pub fn put_all(&mut self, entries: Vec<(Key, Value)>) -> Result<()> {
        let response = self.exchange(&Command::PutAll { entries })?;
        self.expect_ok(response, "PUT_ALL")
    }

    /// Delete a key
    ///
    /// Removing an absent key is not an error; the store's NOT_FOUND reply
    /// is logged and swallowed so a double remove stays clean.
    pub fn remove(&mut self, key: &[u8]) -> Result<()> {
        let response = self.exchange(&Command::Remove { key: key.to_vec() })?;
        match response.status {
            Status::Ok => Ok(()),
            Status::NotFound => {
                tracing::debug!("Remove of absent key");
                Ok(())
            }
            Status::Error => Err(StoreError::Remote(response.error_message())),
        }
    }

    /// Execute a store-native query against the region
    ///
    /// The predicate string is passed through verbatim. Semantic errors the
    /// store reports (malformed predicate, type mismatch, unresolved field
    /// name) come back as [`StoreError::Query`].
    pub fn query(&mut self, predicate: &str) -> Result<Vec<Value>> {
        let response = self.exchange(&Command::Query {
            predicate: predicate.to_string(),
        })?;
        match response.status {
            Status::Ok => match response.payload.as_deref() {
                Some(payload) => decode_query_results(payload),
                None => Ok(Vec::new()),
            },
            Status::NotFound => Ok(Vec::new()),
            Status::Error => Err(StoreError::Query(response.error_message())),
        }
    }

    /// Health check against the store
    pub fn ping(&mut self) -> Result<()> {
        let response = self.exchange(&Command::Ping)?;
        self.expect_ok(response, "PING")
    }

    // =========================================================================
    // Session Management
    // =========================================================================

    /// Whether the current session holds a transport that still reports open
    fn has_live_session(&self) -> bool {
        matches!(
            &self.session,
            Session::Connected { transport, .. } if transport.is_open()
        )
    }

    /// Dial the locator and resolve the configured region
    ///
    /// The region is resolved exactly once per session; the handle is cached
    /// until disconnect.
    fn open_session(&mut self) -> Result<()> {
        // A dead transport still needs its handle discarded
        self.session = Session::Disconnected;

        let mut transport = self.connector.connect(&self.config)?;

        let response = transport.call(&Command::ResolveRegion {
            name: self.config.region_name.clone(),
        })?;

        match response.status {
            Status::Ok => {
                tracing::debug!("Resolved region '{}'", self.config.region_name);
                self.session = Session::Connected {
                    transport,
                    region: RegionHandle::new(&self.config.region_name),
                };
                Ok(())
            }
            _ => {
                transport.close();
                Err(StoreError::Region(format!(
                    "cannot resolve region '{}': {}",
                    self.config.region_name,
                    response.error_message()
                )))
            }
        }
    }

    /// Send one command over the session, lazily connecting first
    ///
    /// A connection-level failure drops the session so the next operation
    /// triggers a reconnect.
    fn exchange(&mut self, command: &Command) -> Result<Response> {
        if !self.has_live_session() {
            self.open_session()?;
        }

        let Session::Connected { transport, .. } = &mut self.session else {
            return Err(StoreError::Transport("no live session".to_string()));
        };

        match transport.call(command) {
            Ok(response) => Ok(response),
            Err(e) => {
                if matches!(
                    e,
                    StoreError::Io(_) | StoreError::Transport(_) | StoreError::Protocol(_)
                ) {
                    transport.close();
                    self.session = Session::Disconnected;
                }
                Err(e)
            }
        }
    }

    /// Map a status-only reply onto `Result<()>`
    fn expect_ok(&self, response: Response, what: &str) -> Result<()> {
        match response.status {
            Status::Ok => Ok(()),
            Status::NotFound => Err(StoreError::Protocol(format!(
                "unexpected NOT_FOUND status for {}",
                what
            ))),
            Status::Error => Err(StoreError::Remote(response.error_message())),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Region handle for the current session, if connected
    pub fn region(&self) -> Option<&RegionHandle> {
        match &self.session {
            Session::Connected { region, .. } => Some(region),
            Session::Disconnected => None,
        }
    }
}
