//! JSON encoding of assembled documents.
//!
//! Output is deterministic for a given document: attributes and
//! relationships keep declaration order, link maps are sorted by name.

mod json;

pub use json::*;
