//! ConversionStage
//!
//! Routes each input record to exactly one of two output ports.
//!
//! ## Port Model
//!
//! Ports are crossbeam channel senders, optionally attached by the host:
//!
//! - `out`: converted records, typed `O`
//! - `err`: records that failed to convert, in their original form `I`
//!
//! "Has a listener" means a sender is attached and its receiver is still
//! alive; a port whose receiver has been dropped is detached on first use.
//! Emission is mutually exclusive per record, and a record is resolved
//! completely (converted and routed) before the next one is accepted.

use crossbeam::channel::Sender;

use super::{ConversionOutcome, Converter, RecordSchema, RejectPolicy};

/// How a processed record was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Converted and emitted on the primary output
    EmittedPrimary,

    /// Rejected and emitted on the error output
    EmittedError,

    /// Dropped: no applicable listener for this record
    Dropped,
}

/// Schema-bound record conversion stage
///
/// Single-threaded, one record in flight; stateless across records apart
/// from the schema binding and the rejected-record counter.
pub struct ConversionStage<I, O, C: Converter<I, O>> {
    /// Runtime type binding, required at construction
    schema: RecordSchema,

    /// Injected conversion strategy
    converter: C,

    /// Primary output port (converted records)
    out: Option<Sender<O>>,

    /// Error output port (original form of rejected records)
    err: Option<Sender<I>>,

    /// What to do with rejects nobody listens to
    reject_policy: RejectPolicy,

    /// Rejected records dropped for lack of an error listener
    rejected_dropped: u64,
}

impl<I, O, C: Converter<I, O>> ConversionStage<I, O, C> {
    /// Create a stage bound to `schema`, with both ports unconnected
    pub fn new(schema: RecordSchema, converter: C) -> Self {
        Self {
            schema,
            converter,
            out: None,
            err: None,
            reject_policy: RejectPolicy::default(),
            rejected_dropped: 0,
        }
    }

    /// Set the policy for rejects with no error listener
    pub fn with_reject_policy(mut self, policy: RejectPolicy) -> Self {
        self.reject_policy = policy;
        self
    }

    // =========================================================================
    // Port Wiring
    // =========================================================================

    /// Attach a listener to the primary output
    pub fn connect_output(&mut self, sender: Sender<O>) {
        self.out = Some(sender);
    }

    /// Attach a listener to the error output
    pub fn connect_error(&mut self, sender: Sender<I>) {
        self.err = Some(sender);
    }

    /// Whether the primary output currently has a listener attached
    pub fn output_connected(&self) -> bool {
        self.out.is_some()
    }

    /// Whether the error output currently has a listener attached
    pub fn error_connected(&self) -> bool {
        self.err.is_some()
    }

    // =========================================================================
    // Record Processing
    // =========================================================================

    /// Convert one record without routing it anywhere
    pub fn convert_one(&mut self, input: I) -> ConversionOutcome<I, O> {
        match self.converter.convert(&input) {
            Some(output) => ConversionOutcome::Converted(output),
            None => ConversionOutcome::Rejected(input),
        }
    }

    /// Convert one record and route it to exactly one port
    ///
    /// A converted record goes to the primary output if it has a listener,
    /// otherwise it is dropped. A rejected record goes to the error output
    /// if it has a listener, otherwise it is dropped under the configured
    /// [`RejectPolicy`].
    pub fn process(&mut self, input: I) -> Disposition {
        match self.convert_one(input) {
            ConversionOutcome::Converted(output) => self.emit_primary(output),
            ConversionOutcome::Rejected(original) => self.emit_error(original),
        }
    }

    /// Rejected records dropped so far for lack of an error listener
    pub fn rejected_dropped(&self) -> u64 {
        self.rejected_dropped
    }

    /// The schema this stage was bound to
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    // =========================================================================
    // Internal Routing
    // =========================================================================

    fn emit_primary(&mut self, output: O) -> Disposition {
        match self.out.take() {
            Some(sender) => match sender.send(output) {
                Ok(()) => {
                    self.out = Some(sender);
                    Disposition::EmittedPrimary
                }
                Err(_) => {
                    // Receiver gone: the port no longer has a listener
                    tracing::debug!(
                        schema = self.schema.type_name(),
                        "Primary output listener gone; dropping converted record"
                    );
                    Disposition::Dropped
                }
            },
            None => Disposition::Dropped,
        }
    }

    fn emit_error(&mut self, original: I) -> Disposition {
        match self.err.take() {
            Some(sender) => match sender.send(original) {
                Ok(()) => {
                    self.err = Some(sender);
                    Disposition::EmittedError
                }
                Err(_) => {
                    self.record_unheard_reject();
                    Disposition::Dropped
                }
            },
            None => {
                self.record_unheard_reject();
                Disposition::Dropped
            }
        }
    }

    /// A record was rejected and nobody is listening on the error port
    fn record_unheard_reject(&mut self) {
        match self.reject_policy {
            RejectPolicy::Drop => {}
            RejectPolicy::Count => {
                self.rejected_dropped += 1;
                tracing::debug!(
                    schema = self.schema.type_name(),
                    total = self.rejected_dropped,
                    "Rejected record dropped; no error listener"
                );
            }
        }
    }
}
