//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the marshaling engine and external
//! systems. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod encoder;

pub use encoder::DocumentEncoder;
