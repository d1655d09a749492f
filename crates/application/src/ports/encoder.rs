//! Document encoder port

use jsonapi_domain::Document;

/// Port for turning an assembled document into bytes.
///
/// The engine stays format-agnostic; adapters in the infrastructure layer
/// decide the wire encoding and its layout.
pub trait DocumentEncoder: Send + Sync {
    /// Error produced when encoding fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encodes `document` into a byte buffer.
    fn encode(&self, document: &Document) -> Result<Vec<u8>, Self::Error>;
}
