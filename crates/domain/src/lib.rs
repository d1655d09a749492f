//! JSON:API Domain - Core marshaling types
//!
//! This crate defines the document model and the type description layer of
//! the JSON:API marshaling engine. All types here are pure Rust with no I/O
//! dependencies.

pub mod annotation;
pub mod builder;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod extras;
pub mod record;
pub mod value;

pub use annotation::{FieldTag, TOP_LINKS_BUCKET, TagRole};
pub use builder::DescriptorBuilder;
pub use descriptor::{
    DescriptorSource, FieldDescriptor, FieldRole, FieldValue, RoleClass, TypeDescriptor,
    describe, short_type_name,
};
pub use document::{
    Document, Links, ManyPayload, OnePayload, RelationshipData, RelationshipObject,
    ResourceIdentifier, ResourceObject, non_empty, non_empty_links,
};
pub use error::{MarshalError, MarshalResult};
pub use extras::{ApiExtras, RelationshipLinkRule};
pub use record::{AsRecord, Describable, Record, RecordRef};
pub use value::AttributeValue;
