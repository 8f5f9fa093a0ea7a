//! Store Module
//!
//! Client adapter for the remote key-value region store.
//!
//! ## Responsibilities
//! - Hide connection setup and region resolution behind a CRUD + query API
//! - Lazily and idempotently materialize the connection and region handle
//! - Keep batch lookups to a single round trip

mod adapter;

pub use adapter::StoreAdapter;

/// Opaque key; the store does not interpret its structure
pub type Key = Vec<u8>;

/// Opaque value; the store does not interpret its structure
pub type Value = Vec<u8>;

/// Opaque reference to a named partition of the remote store
///
/// At most one live handle per adapter instance; created on first use and
/// discarded on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionHandle {
    name: String,
}

impl RegionHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the region this handle is bound to
    pub fn name(&self) -> &str {
        &self.name
    }
}
