//! Node builder
//!
//! Turns one record into a [`ResourceObject`] using its type descriptor, and
//! reports the records it references so the walker can visit them.

use std::sync::Arc;

use tracing::debug;

use jsonapi_domain::{
    FieldDescriptor, FieldRole, FieldValue, Links, MarshalError, MarshalResult, Record,
    RecordRef, RelationshipData, RelationshipObject, ResourceIdentifier, ResourceObject,
    TypeDescriptor,
};

use crate::registry::DescriptorRegistry;

/// A marshaled resource plus what the assembler still needs to place.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    /// The resource object; `links` is left empty by the builder.
    pub resource: ResourceObject,
    /// Contents of the record's `top` links bucket, if non-empty.
    pub top_links: Option<Links>,
    /// Descriptor of the record's type.
    pub descriptor: Arc<TypeDescriptor>,
}

impl ResourceNode {
    /// Returns the resource's identifier.
    #[must_use]
    pub fn identifier(&self) -> ResourceIdentifier {
        self.resource.identifier()
    }

    /// Returns the resource with its `top` links attached.
    #[must_use]
    pub fn into_resource(self) -> ResourceObject {
        let mut resource = self.resource;
        resource.links = self.top_links;
        resource
    }
}

/// A built node and the records it references, in declaration order.
#[derive(Debug)]
pub struct BuiltNode<'a> {
    /// The marshaled resource.
    pub node: ResourceNode,
    /// Referenced records: to-one targets and to-many elements, in order.
    pub related: Vec<RecordRef<'a>>,
}

/// Builds resource nodes from records.
#[derive(Debug, Clone, Copy)]
pub struct NodeBuilder<'r> {
    registry: &'r DescriptorRegistry,
}

impl<'r> NodeBuilder<'r> {
    /// Creates a builder backed by `registry`.
    #[must_use]
    pub const fn new(registry: &'r DescriptorRegistry) -> Self {
        Self { registry }
    }

    /// Returns the registry used to describe records.
    #[must_use]
    pub const fn registry(&self) -> &'r DescriptorRegistry {
        self.registry
    }

    /// Returns the `{type, id}` of `record` without building its node.
    pub fn identify(&self, record: &dyn Record) -> MarshalResult<ResourceIdentifier> {
        let descriptor = self.registry.describe(record)?;
        identifier_of(&descriptor, record)
    }

    /// Builds the node for `record`.
    pub fn build<'a>(&self, record: &'a dyn Record) -> MarshalResult<BuiltNode<'a>> {
        let descriptor = self.registry.describe(record)?;
        let owner = descriptor.type_name();
        let mut resource = ResourceObject::new(identifier_of(&descriptor, record)?);
        let mut top_links: Option<Links> = None;
        let mut relation_links: Vec<(&FieldDescriptor, &'a Links)> = Vec::new();
        let mut related = Vec::new();

        for field in descriptor.fields() {
            match (field.role, field.read(record, owner)?) {
                (FieldRole::Primary, FieldValue::Id(_)) => {}
                (FieldRole::Attribute, FieldValue::Attribute(value)) => {
                    if !value.is_zero() {
                        resource
                            .attributes
                            .insert(field.serialized_name.clone(), value);
                    }
                }
                (FieldRole::ToOne, FieldValue::ToOne(target)) => {
                    let data = match target {
                        Some(target) => {
                            let identifier = self.identify(target.get())?;
                            related.push(target);
                            RelationshipData::One(identifier)
                        }
                        None => RelationshipData::Null,
                    };
                    resource
                        .relationships
                        .insert(field.serialized_name.clone(), RelationshipObject::new(data));
                }
                (FieldRole::ToMany, FieldValue::ToMany(targets)) => {
                    let mut identifiers = Vec::with_capacity(targets.len());
                    for target in targets {
                        identifiers.push(self.identify(target.get())?);
                        related.push(target);
                    }
                    resource.relationships.insert(
                        field.serialized_name.clone(),
                        RelationshipObject::new(RelationshipData::Many(identifiers)),
                    );
                }
                (FieldRole::Links, FieldValue::Links(links)) => {
                    let Some(links) = links.filter(|links| !links.is_empty()) else {
                        continue;
                    };
                    if field.is_top_links() {
                        top_links
                            .get_or_insert_with(Links::new)
                            .extend(links.iter().map(|(k, v)| (k.clone(), v.clone())));
                    } else {
                        relation_links.push((field, links));
                    }
                }
                (_, value) => return Err(mismatched(owner, field, &value)),
            }
        }

        for (field, links) in relation_links {
            match resource.relationships.get_mut(&field.serialized_name) {
                Some(relationship) => relationship.extend_links(links),
                None => debug!(
                    type_name = owner,
                    bucket = %field.serialized_name,
                    "links bucket names no relationship, ignoring"
                ),
            }
        }

        Ok(BuiltNode {
            node: ResourceNode {
                resource,
                top_links,
                descriptor,
            },
            related,
        })
    }
}

fn identifier_of(
    descriptor: &TypeDescriptor,
    record: &dyn Record,
) -> MarshalResult<ResourceIdentifier> {
    let primary = descriptor.require_primary()?;
    match primary.read(record, descriptor.type_name())? {
        FieldValue::Id(id) => Ok(ResourceIdentifier::new(&primary.serialized_name, id)),
        other => Err(mismatched(descriptor.type_name(), primary, &other)),
    }
}

fn mismatched(owner: &str, field: &FieldDescriptor, value: &FieldValue<'_>) -> MarshalError {
    MarshalError::unsupported_field_type(
        owner,
        &field.source_path,
        format!("{:?} field produced {value:?}", field.role),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{Blog, Comment, Holder, Orphaned, Post, test_blog};
    use chrono::{TimeZone, Utc};
    use jsonapi_domain::AttributeValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primary_and_attributes() {
        let registry = DescriptorRegistry::new();
        let blog = Blog {
            id: 5,
            title: "Title 1".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ..Default::default()
        };

        let built = NodeBuilder::new(&registry).build(&blog).unwrap();
        let resource = &built.node.resource;

        assert_eq!(resource.resource_type, "blogs");
        assert_eq!(resource.id, "5");
        assert_eq!(
            resource.attributes.keys().collect::<Vec<_>>(),
            vec!["title", "created_at"]
        );
        assert_eq!(
            resource.attribute("title"),
            Some(&AttributeValue::from("Title 1"))
        );
        assert!(built.related.is_empty());
    }

    #[test]
    fn test_zero_attributes_are_omitted() {
        let registry = DescriptorRegistry::new();
        let blog = Blog {
            id: 5,
            ..Default::default()
        };

        let built = NodeBuilder::new(&registry).build(&blog).unwrap();
        assert!(built.node.resource.attributes.is_empty());
    }

    #[test]
    fn test_relationship_linkage() {
        let registry = DescriptorRegistry::new();
        let blog = test_blog();

        let built = NodeBuilder::new(&registry).build(&blog).unwrap();
        let resource = &built.node.resource;

        assert_eq!(
            resource.relationship("posts").unwrap().data,
            RelationshipData::Many(vec![
                ResourceIdentifier::new("posts", "1"),
                ResourceIdentifier::new("posts", "2"),
            ])
        );
        assert_eq!(
            resource.relationship("current_post").unwrap().data,
            RelationshipData::One(ResourceIdentifier::new("posts", "1"))
        );
        assert_eq!(built.related.len(), 3);
    }

    #[test]
    fn test_null_and_empty_relationships() {
        let registry = DescriptorRegistry::new();
        let blog = Blog {
            id: 1,
            ..Default::default()
        };

        let built = NodeBuilder::new(&registry).build(&blog).unwrap();
        let resource = &built.node.resource;

        assert!(resource.relationship("current_post").unwrap().data.is_null());
        assert_eq!(
            resource.relationship("posts").unwrap().data,
            RelationshipData::Many(Vec::new())
        );
    }

    #[test]
    fn test_embedded_fields_are_promoted() {
        let registry = DescriptorRegistry::new();
        let post = Post {
            id: 1,
            title: "Foo".to_string(),
            blog: Blog {
                id: 9,
                title: "Shadowed".to_string(),
                view_count: 3,
                ..Default::default()
            },
            comments: vec![Comment {
                id: 1,
                body: "foo".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let built = NodeBuilder::new(&registry).build(&post).unwrap();
        let resource = &built.node.resource;

        assert_eq!(resource.identifier(), ResourceIdentifier::new("posts", "1"));
        assert_eq!(resource.attribute("title"), Some(&AttributeValue::from("Foo")));
        assert_eq!(resource.attribute("view_count"), Some(&AttributeValue::from(3_i64)));
        assert!(resource.relationship("posts").is_some());
        assert!(resource.relationship("comments").is_some());
    }

    #[test]
    fn test_links_buckets() {
        let registry = DescriptorRegistry::new();
        let mut blog = test_blog();
        blog.links = Links::from([("self".to_string(), "/blogs/5".to_string())]);
        blog.posts_links = Links::from([("self".to_string(), "/blogs/5/relationships/posts".to_string())]);

        let built = NodeBuilder::new(&registry).build(&blog).unwrap();
        let node = built.node;

        assert_eq!(node.top_links.as_ref().unwrap()["self"], "/blogs/5");
        assert!(node.resource.links.is_none());
        assert_eq!(
            node.resource.relationship("posts").unwrap().links.as_ref().unwrap()["self"],
            "/blogs/5/relationships/posts"
        );
        assert!(node.resource.relationship("current_post").unwrap().links.is_none());

        let resource = node.into_resource();
        assert_eq!(resource.links.unwrap()["self"], "/blogs/5");
    }

    #[test]
    fn test_missing_primary_on_root() {
        let registry = DescriptorRegistry::new();
        let record = Orphaned::default();

        let err = NodeBuilder::new(&registry).build(&record).unwrap_err();
        assert_eq!(err, MarshalError::missing_primary("Orphaned"));
    }

    #[test]
    fn test_missing_primary_on_related_record() {
        let registry = DescriptorRegistry::new();
        let holder = Holder {
            id: 1,
            owner: Some(Orphaned::default()),
            ..Default::default()
        };

        let err = NodeBuilder::new(&registry).build(&holder).unwrap_err();
        assert_eq!(err, MarshalError::missing_primary("Orphaned"));
    }
}
