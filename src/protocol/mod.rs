//! Protocol Module
//!
//! Defines the wire protocol between the adapter and the region store.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET            - Payload: key_len (4) + key
//! - 0x02: PUT            - Payload: key_len (4) + key + value
//! - 0x03: REMOVE         - Payload: key_len (4) + key
//! - 0x04: PING           - Payload: empty
//! - 0x05: GET_ALL        - Payload: bincode BatchGetBody (keys)
//! - 0x06: PUT_ALL        - Payload: bincode BatchPutBody (entries)
//! - 0x07: QUERY          - Payload: UTF-8 predicate string (verbatim)
//! - 0x08: RESOLVE_REGION - Payload: UTF-8 region name
//!
//! RESOLVE_REGION binds the connection to a named region; the server creates
//! the region with default proxy policy if absent. Every later data command
//! on the connection targets the bound region.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK         (GET_ALL payload: bincode BatchValuesBody,
//!                     QUERY payload: bincode QueryResultsBody)
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR      (payload: UTF-8 message)

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    encode_command, decode_command, encode_response, decode_response,
    read_command, write_command, read_response, write_response,
    decode_batch_values, encode_batch_values,
    decode_query_results, encode_query_results,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
