//! Wire payload codec.
//!
//! File bodies travel as standard base64 of their UTF-8 bytes. Encoding never
//! wraps lines; decoding tolerates the 60-column wrapping the server applies
//! to `content` fields.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared encoding of a payload. Base64 is the only one accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    Base64,
}

impl PayloadEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
        }
    }

    /// Map the declared wire encoding, refusing anything but `base64`.
    pub fn from_declared(declared: &str) -> Result<Self, DecodeError> {
        match declared {
            "base64" => Ok(Self::Base64),
            other => Err(DecodeError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported payload encoding: {0:?}")]
    UnsupportedEncoding(String),
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
    #[error("payload is not valid UTF-8 text")]
    InvalidUtf8,
    #[error("malformed response body: {0}")]
    MalformedResponse(String),
}

/// Encode text for a PUT body.
pub fn encode_text(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode a `content` field after checking its declared `encoding`.
pub fn decode_payload(declared_encoding: &str, content: &str) -> Result<Vec<u8>, DecodeError> {
    PayloadEncoding::from_declared(declared_encoding)?;
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))
}

/// Decode a `content` field straight to text.
pub fn decode_text(declared_encoding: &str, content: &str) -> Result<String, DecodeError> {
    let bytes = decode_payload(declared_encoding, content)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

pub fn payload_text(payload: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)
}
