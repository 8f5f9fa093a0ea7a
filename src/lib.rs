//! # regionkv
//!
//! Client-side building blocks for a record pipeline backed by a remote
//! key-value region store:
//! - Lazily-connecting store adapter (get / batched get / put / batched put
//!   / remove / query)
//! - At-most-once region resolution per connected session
//! - Schema-bound conversion stage with typed primary and error outputs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Orchestration Layer                       │
//! │              (external; feeds records, issues calls)         │
//! └────────────┬───────────────────────────────┬─────────────────┘
//!              │                               │
//! ┌────────────▼─────────────┐    ┌────────────▼─────────────┐
//! │     ConversionStage      │    │       StoreAdapter       │
//! │  convert → out, or err   │    │  Session state machine   │
//! └────────────┬─────────────┘    └────────────┬─────────────┘
//!              │                               │
//!       ┌──────▼──────┐                 ┌──────▼──────┐
//!       │  out / err  │                 │  Transport  │
//!       │  (channels) │                 │    (TCP)    │
//!       └─────────────┘                 └──────┬──────┘
//!                                              │
//!                                       ┌──────▼──────┐
//!                                       │ Region Store│
//!                                       │  (remote)   │
//!                                       └─────────────┘
//! ```
//!
//! The two components never call each other; only the hosting layer
//! composes them.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod store;
pub mod convert;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::StoreConfig;
pub use store::{Key, RegionHandle, StoreAdapter, Value};
pub use convert::{
    ConversionOutcome, ConversionStage, Converter, Disposition, RecordSchema, RejectPolicy,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of regionkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
