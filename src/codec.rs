//! Value Codec
//!
//! Converts cached values to and from their transport string:
//! `base64(zlib(json(value)))`. Absent values have no encoding and travel as
//! `None` (written to the store as the empty string).

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, DecodeError, Result};

/// Dynamically typed cached document, used when the caller has no concrete type.
pub type Document = serde_json::Value;

/// JSON text of an absent value.
const JSON_NULL: &[u8] = b"null";

// == Encode ==
/// Encodes a value into its transport string.
///
/// Values that serialize to JSON `null` (`None`, `()`, `Document::Null`) yield
/// `None` and are never compressed.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Option<String>> {
    let json = serde_json::to_vec(value).map_err(|e| CacheError::Encode(e.to_string()))?;
    if json == JSON_NULL {
        return Ok(None);
    }

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| CacheError::Encode(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| CacheError::Encode(e.to_string()))?;

    Ok(Some(BASE64.encode(compressed)))
}

// == Decode ==
/// Decodes a transport string back into a value.
///
/// `None` and the empty string are the absent marker and decode to `None`.
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> std::result::Result<Option<T>, DecodeError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    let compressed = BASE64.decode(raw)?;
    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(DecodeError::Inflate)?;

    Ok(Some(serde_json::from_slice(&json)?))
}
