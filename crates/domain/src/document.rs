//! JSON:API document model
//!
//! In-memory document tree handed to the encoder. Optional members are
//! skipped during serialization so the encoded output never carries empty
//! `included`, `attributes`, `relationships` or `links` members.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::value::AttributeValue;

/// A links object: link name to URL.
pub type Links = BTreeMap<String, String>;

/// The `{type, id}` pair that identifies a resource.
///
/// Two resources with equal identifiers are the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceIdentifier {
    /// Resource type name.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource id, always a string on the wire.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

/// Linkage carried by a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// Empty to-one relationship (`null`).
    Null,
    /// To-one relationship.
    One(ResourceIdentifier),
    /// To-many relationship, possibly empty.
    Many(Vec<ResourceIdentifier>),
}

impl RelationshipData {
    /// Returns the referenced identifiers in order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match self {
            Self::Null => Vec::new(),
            Self::One(identifier) => vec![identifier],
            Self::Many(identifiers) => identifiers.iter().collect(),
        }
    }

    /// Returns true for an empty to-one relationship.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A relationship member of a resource object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipObject {
    /// Resource linkage.
    pub data: RelationshipData,
    /// Relationship links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl RelationshipObject {
    /// Creates a relationship without links.
    #[must_use]
    pub const fn new(data: RelationshipData) -> Self {
        Self { data, links: None }
    }

    /// Inserts a link, creating the links object on first use.
    pub fn insert_link(&mut self, name: impl Into<String>, href: impl Into<String>) {
        self.links
            .get_or_insert_with(Links::new)
            .insert(name.into(), href.into());
    }

    /// Merges `links` into this relationship's links.
    ///
    /// Existing entries with the same name are overwritten.
    pub fn extend_links(&mut self, links: &Links) {
        if links.is_empty() {
            return;
        }
        self.links
            .get_or_insert_with(Links::new)
            .extend(links.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

/// One resource on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    /// Resource type name.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource id.
    pub id: String,
    /// Non-zero attributes in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeValue>,
    /// Relationships in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, RelationshipObject>,
    /// Resource links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl ResourceObject {
    /// Creates a resource with no members besides its identity.
    #[must_use]
    pub fn new(identifier: ResourceIdentifier) -> Self {
        Self {
            resource_type: identifier.resource_type,
            id: identifier.id,
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
            links: None,
        }
    }

    /// Returns this resource's identifier.
    #[must_use]
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.resource_type.clone(), self.id.clone())
    }

    /// Returns an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns a relationship by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&RelationshipObject> {
        self.relationships.get(name)
    }
}

/// Document with a single primary resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnePayload {
    /// The primary resource.
    pub data: ResourceObject,
    /// Resources reachable from `data`, once each.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    /// Document links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Document with a sequence of primary resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyPayload {
    /// The primary resources.
    pub data: Vec<ResourceObject>,
    /// Resources reachable from `data`, once each.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    /// Document links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Either document shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// Single primary resource.
    One(OnePayload),
    /// Sequence of primary resources.
    Many(ManyPayload),
}

impl Document {
    /// Returns the included resources, empty when the member is absent.
    #[must_use]
    pub fn included(&self) -> &[ResourceObject] {
        let included = match self {
            Self::One(payload) => payload.included.as_deref(),
            Self::Many(payload) => payload.included.as_deref(),
        };
        included.unwrap_or_default()
    }

    /// Returns the document links.
    #[must_use]
    pub const fn links(&self) -> Option<&Links> {
        match self {
            Self::One(payload) => payload.links.as_ref(),
            Self::Many(payload) => payload.links.as_ref(),
        }
    }
}

impl From<OnePayload> for Document {
    fn from(payload: OnePayload) -> Self {
        Self::One(payload)
    }
}

impl From<ManyPayload> for Document {
    fn from(payload: ManyPayload) -> Self {
        Self::Many(payload)
    }
}

/// Wraps `items` in `Some` unless empty.
///
/// Used for members that must be absent rather than empty.
#[must_use]
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

/// Wraps `links` in `Some` unless empty.
#[must_use]
pub fn non_empty_links(links: Links) -> Option<Links> {
    if links.is_empty() { None } else { Some(links) }
}
