//! JSON:API Application - Marshaling engine
//!
//! Turns describable records into JSON:API documents: descriptors are cached
//! in a [`DescriptorRegistry`], and a [`Marshaler`] builds the primary
//! resources, collects the included set and resolves relationship links.

pub mod marshal;
pub mod ports;
pub mod registry;

#[cfg(test)]
mod fixtures;

pub use marshal::{IncludedCollector, LinkResolver, Marshaler, NodeBuilder, ResourceNode};
pub use ports::DocumentEncoder;
pub use registry::DescriptorRegistry;
