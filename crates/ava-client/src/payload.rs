//! Decoding of inbound data-channel payloads.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why an inbound payload could not be decoded.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("payload is not a valid {kind}: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes a UTF-8 JSON payload into `T`. `kind` names the expected shape in
/// the error message.
pub fn decode_payload<T: DeserializeOwned>(
    kind: &'static str,
    payload: &[u8],
) -> Result<T, PayloadError> {
    let text = std::str::from_utf8(payload)?;
    serde_json::from_str(text).map_err(|source| PayloadError::Json { kind, source })
}
