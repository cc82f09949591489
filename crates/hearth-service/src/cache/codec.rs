//! Versioned payload encoding for cached values.
//!
//! Every value is wrapped as `{"v": <version>, "data": <value>}`. Decoding
//! checks the version before touching the body, so a payload written by an
//! incompatible build is rejected as [`HearthError::CorruptCacheEntry`] and
//! the caller recomputes it.

use hearth_core::{HearthError, HearthResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Schema version written into every payload.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    v: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Header {
    v: u32,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Encodes a value into a versioned payload.
pub fn encode<T: Serialize>(value: &T) -> HearthResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        v: SCHEMA_VERSION,
        data: value,
    })?)
}

/// Decodes a payload read from `key`.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> HearthResult<T> {
    let corrupt = |message: String| HearthError::CorruptCacheEntry {
        key: key.to_string(),
        message,
    };

    let header: Header = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;
    if header.v != SCHEMA_VERSION {
        return Err(corrupt(format!(
            "unsupported payload version {} (expected {})",
            header.v, SCHEMA_VERSION
        )));
    }

    serde_json::from_str::<Envelope<T>>(raw)
        .map(|envelope| envelope.data)
        .map_err(|e| corrupt(e.to_string()))
}
