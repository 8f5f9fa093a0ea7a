//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:            key_len (4 bytes) + key
//! - PUT:            key_len (4 bytes) + key + value
//! - REMOVE:         key_len (4 bytes) + key
//! - PING:           empty
//! - GET_ALL:        bincode BatchGetBody (keys)
//! - PUT_ALL:        bincode BatchPutBody (entries)
//! - QUERY:          UTF-8 predicate string
//! - RESOLVE_REGION: UTF-8 region name
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::store::{Key, Value};
use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Batch Payload Bodies
// =============================================================================

/// GET_ALL request body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchGetBody {
    keys: Vec<Key>,
}

/// PUT_ALL request body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchPutBody {
    entries: Vec<(Key, Value)>,
}

/// GET_ALL reply body, positionally aligned with the request keys
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchValuesBody {
    values: Vec<Option<Value>>,
}

/// QUERY reply body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QueryResultsBody {
    results: Vec<Value>,
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let cmd_type = command.command_type() as u8;

    // Build payload based on command type
    let payload = match command {
        Command::Get { key } | Command::Remove { key } => encode_keyed(key, None),
        Command::Put { key, value } => encode_keyed(key, Some(value)),
        Command::Ping => Vec::new(),
        Command::GetAll { keys } => bincode::serialize(&BatchGetBody { keys: keys.clone() })
            .map_err(|e| StoreError::Serialization(e.to_string()))?,
        Command::PutAll { entries } => bincode::serialize(&BatchPutBody {
            entries: entries.clone(),
        })
        .map_err(|e| StoreError::Serialization(e.to_string()))?,
        Command::Query { predicate } => predicate.as_bytes().to_vec(),
        Command::ResolveRegion { name } => name.as_bytes().to_vec(),
    };

    if payload.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(StoreError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    // Build full message: header + payload
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(cmd_type);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(&payload);

    Ok(message)
}

/// key_len (4) + key [+ value]
fn encode_keyed(key: &[u8], value: Option<&[u8]>) -> Vec<u8> {
    let value_len = value.map(|v| v.len()).unwrap_or(0);
    let mut payload = Vec::with_capacity(4 + key.len() + value_len);
    payload.extend_from_slice(&(key.len() as u32).to_be_bytes());
    payload.extend_from_slice(key);
    if let Some(value) = value {
        payload.extend_from_slice(value);
    }
    payload
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let payload = frame_payload(bytes, "command")?;
    let cmd_type = bytes[0];

    // Parse command based on type
    match cmd_type {
        0x01 => Ok(Command::Get {
            key: decode_key(payload, "GET")?,
        }),
        0x02 => decode_put_command(payload),
        0x03 => Ok(Command::Remove {
            key: decode_key(payload, "REMOVE")?,
        }),
        0x04 => decode_ping_command(payload),
        0x05 => {
            let body: BatchGetBody = bincode::deserialize(payload)
                .map_err(|e| StoreError::Serialization(format!("GET_ALL keys: {}", e)))?;
            Ok(Command::GetAll { keys: body.keys })
        }
        0x06 => {
            let body: BatchPutBody = bincode::deserialize(payload)
                .map_err(|e| StoreError::Serialization(format!("PUT_ALL entries: {}", e)))?;
            Ok(Command::PutAll {
                entries: body.entries,
            })
        }
        0x07 => Ok(Command::Query {
            predicate: decode_utf8(payload, "QUERY predicate")?,
        }),
        0x08 => Ok(Command::ResolveRegion {
            name: decode_utf8(payload, "RESOLVE_REGION name")?,
        }),
        _ => Err(StoreError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Validate the frame header and return the payload slice
fn frame_payload<'a>(bytes: &'a [u8], what: &str) -> Result<&'a [u8]> {
    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(StoreError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(StoreError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok(&bytes[HEADER_SIZE..total_len])
}

/// Decode a key_len-prefixed key payload
fn decode_key(payload: &[u8], what: &str) -> Result<Key> {
    if payload.len() < 4 {
        return Err(StoreError::Protocol(format!(
            "{} command: missing key length",
            what
        )));
    }

    let key_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;

    if payload.len() < 4 + key_len {
        return Err(StoreError::Protocol(format!(
            "{} command: incomplete key (expected {}, got {})",
            what,
            key_len,
            payload.len() - 4
        )));
    }

    Ok(payload[4..4 + key_len].to_vec())
}

/// Decode PUT command payload
fn decode_put_command(payload: &[u8]) -> Result<Command> {
    let key = decode_key(payload, "PUT")?;
    let value = payload[4 + key.len()..].to_vec();
    Ok(Command::Put { key, value })
}

/// Decode PING command payload
fn decode_ping_command(payload: &[u8]) -> Result<Command> {
    if !payload.is_empty() {
        return Err(StoreError::Protocol(format!(
            "PING command: unexpected payload of {} bytes",
            payload.len()
        )));
    }
    Ok(Command::Ping)
}

fn decode_utf8(payload: &[u8], what: &str) -> Result<String> {
    String::from_utf8(payload.to_vec())
        .map_err(|e| StoreError::Protocol(format!("{}: invalid UTF-8: {}", what, e)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(response.status as u8);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let payload = frame_payload(bytes, "response")?;
    let status_byte = bytes[0];

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(StoreError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Batch Payload Helpers
// =============================================================================

/// Encode a GET_ALL reply body (positional, aligned with the request keys)
pub fn encode_batch_values(values: &[Option<Value>]) -> Result<Vec<u8>> {
    bincode::serialize(&BatchValuesBody {
        values: values.to_vec(),
    })
    .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a GET_ALL reply body
pub fn decode_batch_values(payload: &[u8]) -> Result<Vec<Option<Value>>> {
    let body: BatchValuesBody = bincode::deserialize(payload)
        .map_err(|e| StoreError::Serialization(format!("GET_ALL values: {}", e)))?;
    Ok(body.values)
}

/// Encode a QUERY reply body
pub fn encode_query_results(results: &[Value]) -> Result<Vec<u8>> {
    bincode::serialize(&QueryResultsBody {
        results: results.to_vec(),
    })
    .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a QUERY reply body
pub fn decode_query_results(payload: &[u8]) -> Result<Vec<Value>> {
    let body: QueryResultsBody = bincode::deserialize(payload)
        .map_err(|e| StoreError::Serialization(format!("QUERY results: {}", e)))?;
    Ok(body.results)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(StoreError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "Command")?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "Response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
