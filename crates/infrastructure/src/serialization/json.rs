//! serde_json adapter for the document encoder port.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use jsonapi_application::DocumentEncoder;
use jsonapi_domain::Document;

use crate::config::EncoderConfig;

/// Encodes documents as JSON according to an [`EncoderConfig`].
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentEncoder {
    config: EncoderConfig,
}

impl JsonDocumentEncoder {
    /// Creates an encoder with `config`.
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Returns the encoder's configuration.
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Serializes any value with this encoder's layout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_vec<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, serde_json::Error> {
        let mut buffer = if self.config.pretty {
            let formatter = PrettyFormatter::with_indent(self.config.indent.as_bytes());
            let mut buffer = Vec::new();
            let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
            value.serialize(&mut serializer)?;
            buffer
        } else {
            serde_json::to_vec(value)?
        };

        if self.config.trailing_newline {
            buffer.push(b'\n');
        }
        Ok(buffer)
    }
}

impl DocumentEncoder for JsonDocumentEncoder {
    type Error = serde_json::Error;

    fn encode(&self, document: &Document) -> Result<Vec<u8>, Self::Error> {
        self.to_vec(document)
    }
}
