//! JSON:API Infrastructure - Encoding adapters
//!
//! This crate implements the encoder port with `serde_json` and exposes
//! writer-facing entry points that marshal records straight into any
//! [`std::io::Write`] sink.

pub mod config;
pub mod error;
pub mod marshal;
pub mod serialization;

pub use config::EncoderConfig;
pub use error::{EncodeError, EncodeResult};
pub use marshal::{
    DocumentWriter, marshal_many_payload, marshal_many_payload_with_extras, marshal_one_payload,
    marshal_one_payload_with_extras,
};
pub use serialization::JsonDocumentEncoder;
