//! Convert Module
//!
//! Schema-bound per-record conversion with error routing.
//!
//! ## Responsibilities
//! - Attempt a typed conversion of each input record
//! - Emit converted records on the primary output
//! - Route records that fail to convert to the error output, never both
//! - Make the schema binding an explicit, checked precondition
//!
//! The conversion itself is injected as a [`Converter`] strategy (any
//! `FnMut(&I) -> Option<O>` works); the stage owns only the routing policy.

mod stage;

pub use stage::{ConversionStage, Disposition};

use crate::error::{Result, StoreError};

/// A conversion strategy: produce a typed output from an input record,
/// or `None` when the record cannot be converted
pub trait Converter<I, O> {
    fn convert(&mut self, input: &I) -> Option<O>;
}

impl<I, O, F> Converter<I, O> for F
where
    F: FnMut(&I) -> Option<O>,
{
    fn convert(&mut self, input: &I) -> Option<O> {
        self(input)
    }
}

/// Outcome of converting a single record: exactly one of the two,
/// no partial or third state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome<I, O> {
    /// The record converted; carries the typed output
    Converted(O),

    /// The record did not convert; carries the original input
    Rejected(I),
}

/// Runtime type binding for a conversion stage
///
/// The hosting pipeline names the concrete record type the stage should
/// treat its input as. Constructing the schema validates the binding up
/// front, so a stage can never process a record with the descriptor unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    type_name: String,
}

impl RecordSchema {
    /// Bind to a record type by name; empty names are rejected
    pub fn new(type_name: impl Into<String>) -> Result<Self> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(StoreError::Config(
                "record schema type name is empty".to_string(),
            ));
        }
        Ok(Self { type_name })
    }

    /// Name of the bound record type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// What to do with a rejected record when no error listener exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectPolicy {
    /// Drop silently (the original system's behavior)
    Drop,

    /// Drop, but log at debug and count; the host can read the counter
    #[default]
    Count,
}
