//! Decoder implementations

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON document per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode every non-blank line of `body` into `T`
    ///
    /// `source` is only used to label errors.
    pub fn decode<T: DeserializeOwned>(&self, source: &str, body: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(line)
                .map_err(|e| Error::input_shape(source, line_num + 1, e.to_string()))?;

            records.push(record);
        }

        Ok(records)
    }

    /// Decode raw bytes, rejecting bodies that are not UTF-8
    pub fn decode_bytes<T: DeserializeOwned>(&self, source: &str, body: &[u8]) -> Result<Vec<T>> {
        let text = std::str::from_utf8(body)
            .map_err(|e| Error::input_shape(source, 0, format!("Body is not UTF-8: {e}")))?;
        self.decode(source, text)
    }
}
