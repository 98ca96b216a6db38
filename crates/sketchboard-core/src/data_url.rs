//! `data:<mime>;base64,<payload>` encoding used for images on the wire.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("missing 'data:' scheme")]
    MissingScheme,
    #[error("missing ',' separating header from payload")]
    MissingPayload,
    #[error("only base64 data URLs are supported")]
    NotBase64,
    #[error("missing content type")]
    MissingContentType,
    #[error("empty payload")]
    EmptyPayload,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    content_type: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn parse(input: &str) -> Result<Self, DataUrlError> {
        let rest = input
            .strip_prefix(SCHEME)
            .ok_or(DataUrlError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;

        // Parameters such as `charset=` may sit between the mime and the marker.
        let mut params = header.split(';');
        let content_type = params.next().unwrap_or_default().trim();
        if !header.ends_with(BASE64_MARKER) {
            return Err(DataUrlError::NotBase64);
        }
        if content_type.is_empty() {
            return Err(DataUrlError::MissingContentType);
        }

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(DataUrlError::EmptyPayload);
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?;

        Ok(Self::new(content_type, bytes))
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Renders back to `data:<mime>;base64,<payload>`.
    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}{}{BASE64_MARKER},{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl std::str::FromStr for DataUrl {
    type Err = DataUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
