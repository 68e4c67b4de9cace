//! Storage Encoding
//!
//! Reversible text encoding applied to storage keys and values.
//!
//! This is obfuscation, not encryption: anyone with access to the backing
//! store can decode the entries. It only keeps tokens from being stored as
//! plain inspectable text.

use base64::Engine;

/// Reversible codec interface.
pub trait ValueCodec: Send + Sync {
    /// Encode a logical value into its stored form.
    fn encode(&self, value: &str) -> String;

    /// Decode a stored value.
    ///
    /// Returns `None` when the stored form is not a valid encoding. An empty
    /// stored value decodes to an empty string.
    fn decode(&self, encoded: &str) -> Option<String>;
}

/// Standard base64 over the UTF-8 bytes of the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Base64Codec {
    pub fn new() -> Self {
        Self
    }
}

impl ValueCodec for Base64Codec {
    fn encode(&self, value: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(value.as_bytes())
    }

    fn decode(&self, encoded: &str) -> Option<String> {
        if encoded.is_empty() {
            return Some(String::new());
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .ok()?;
        String::from_utf8(bytes).ok()
    }
}
