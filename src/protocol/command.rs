//! Command definitions
//!
//! Represents commands sent to the region store.

use crate::store::{Key, Value};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Put = 0x02,
    Remove = 0x03,
    Ping = 0x04,
    GetAll = 0x05,
    PutAll = 0x06,
    Query = 0x07,
    ResolveRegion = 0x08,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Key },

    /// Put a key-value pair
    Put { key: Key, value: Value },

    /// Remove a key
    Remove { key: Key },

    /// Ping (health check)
    Ping,

    /// Batched lookup; the reply is positionally aligned with `keys`
    GetAll { keys: Vec<Key> },

    /// Batched upsert
    PutAll { entries: Vec<(Key, Value)> },

    /// Store-native query; the predicate is passed through verbatim
    Query { predicate: String },

    /// Bind the connection to a region, creating it if absent
    ResolveRegion { name: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Remove { .. } => CommandType::Remove,
            Command::Ping => CommandType::Ping,
            Command::GetAll { .. } => CommandType::GetAll,
            Command::PutAll { .. } => CommandType::PutAll,
            Command::Query { .. } => CommandType::Query,
            Command::ResolveRegion { .. } => CommandType::ResolveRegion,
        }
    }
}
