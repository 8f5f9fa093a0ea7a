//! Configuration for regionkv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, StoreError};

/// Configuration for a [`StoreAdapter`](crate::StoreAdapter) instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Locator Configuration
    // -------------------------------------------------------------------------
    /// Hostname of the store's locator
    pub locator_host: String,

    /// Port of the store's locator
    pub locator_port: u16,

    // -------------------------------------------------------------------------
    // Region Configuration
    // -------------------------------------------------------------------------
    /// Name of the region this adapter binds to; created server-side with
    /// default proxy policy if it does not exist
    pub region_name: String,

    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Connection establishment timeout (milliseconds; 0 means no timeout)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds; 0 means no timeout)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds; 0 means no timeout)
    pub write_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            locator_host: "127.0.0.1".to_string(),
            locator_port: 10334,
            region_name: "default".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Locator address in `host:port` form
    pub fn locator_addr(&self) -> String {
        format!("{}:{}", self.locator_host, self.locator_port)
    }

    /// Check the config for values that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.locator_host.is_empty() {
            return Err(StoreError::Config("locator host is empty".to_string()));
        }
        if self.region_name.is_empty() {
            return Err(StoreError::Config("region name is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the locator hostname
    pub fn locator_host(mut self, host: impl Into<String>) -> Self {
        self.config.locator_host = host.into();
        self
    }

    /// Set the locator port
    pub fn locator_port(mut self, port: u16) -> Self {
        self.config.locator_port = port;
        self
    }

    /// Set the region name
    pub fn region_name(mut self, name: impl Into<String>) -> Self {
        self.config.region_name = name.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
