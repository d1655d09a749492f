//! Type descriptors
//!
//! A [`TypeDescriptor`] is the merged, ordered list of marshaled fields of
//! one record type. Descriptors are built once per type by
//! [`DescriptorBuilder::finish`](crate::builder::DescriptorBuilder::finish)
//! and never change afterwards.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use crate::annotation::TOP_LINKS_BUCKET;
use crate::builder::DescriptorBuilder;
use crate::document::Links;
use crate::error::{MarshalError, MarshalResult};
use crate::record::{Describable, Record, RecordRef};
use crate::value::AttributeValue;

/// Role of a field in the marshaled resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Resource id; serialized name is the resource type.
    Primary,
    /// Attribute.
    Attribute,
    /// Relationship to at most one resource.
    ToOne,
    /// Relationship to a sequence of resources.
    ToMany,
    /// Literal links bucket.
    Links,
}

/// Namespace in which serialized names must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    /// The single primary field.
    Primary,
    /// Attribute names.
    Attribute,
    /// Relationship names, shared by to-one and to-many.
    Relation,
    /// Links bucket names.
    Links,
}

impl FieldRole {
    /// Returns the namespace this role's names live in.
    #[must_use]
    pub const fn class(self) -> RoleClass {
        match self {
            Self::Primary => RoleClass::Primary,
            Self::Attribute => RoleClass::Attribute,
            Self::ToOne | Self::ToMany => RoleClass::Relation,
            Self::Links => RoleClass::Links,
        }
    }

    /// Returns true for to-one and to-many relations.
    #[must_use]
    pub const fn is_relation(self) -> bool {
        matches!(self, Self::ToOne | Self::ToMany)
    }
}

/// Value read from a record through a field accessor.
#[derive(Debug)]
pub enum FieldValue<'a> {
    /// Primary id in canonical string form.
    Id(String),
    /// Attribute value, zero values included.
    Attribute(AttributeValue),
    /// To-one target, `None` for a null reference.
    ToOne(Option<RecordRef<'a>>),
    /// To-many targets in sequence order.
    ToMany(Vec<RecordRef<'a>>),
    /// Literal links, `None` when the record carries none.
    Links(Option<&'a Links>),
}

/// Reads one field from a type-erased record.
///
/// Returns `None` if the record is not of the declaring type.
pub type Accessor = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<FieldValue<'a>> + Send + Sync>;

/// Wraps a closure as an [`Accessor`].
pub fn accessor<F>(read: F) -> Accessor
where
    F: for<'a> Fn(&'a dyn Any) -> Option<FieldValue<'a>> + Send + Sync + 'static,
{
    Arc::new(read)
}

/// Identity of a describable type plus the function that describes it.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorSource {
    /// Type identity, the registry key.
    pub type_id: TypeId,
    /// Short Rust type name for diagnostics.
    pub type_name: &'static str,
    /// Builds the type's descriptor.
    pub build: fn() -> MarshalResult<TypeDescriptor>,
}

impl DescriptorSource {
    /// Returns the source for `T`.
    #[must_use]
    pub fn of<T: Describable>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            build: describe::<T>,
        }
    }
}

impl PartialEq for DescriptorSource {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for DescriptorSource {}

/// Builds the descriptor of `T` without caching it.
pub fn describe<T: Describable>() -> MarshalResult<TypeDescriptor> {
    let mut fields = DescriptorBuilder::<T>::new();
    T::describe(&mut fields);
    fields.finish()
}

/// Returns `T`'s type name without its module path.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(index) => &full[index + 2..],
        None => full,
    }
}

/// One marshaled field.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Role in the resource.
    pub role: FieldRole,
    /// Serialized name; the resource type for the primary field and the
    /// bucket name for links.
    pub serialized_name: String,
    /// Field path, dotted through compositions (`blog.title`).
    pub source_path: String,
    /// Type of the related records for relations.
    pub related: Option<DescriptorSource>,
    /// Composition depth: 0 for fields declared on the type itself.
    pub depth: usize,
    pub(crate) accessor: Accessor,
}

impl FieldDescriptor {
    /// Reads this field from `record`.
    ///
    /// `owner` names the descriptor's type in errors.
    pub fn read<'a>(&self, record: &'a dyn Record, owner: &str) -> MarshalResult<FieldValue<'a>> {
        (self.accessor)(record.as_any()).ok_or_else(|| {
            MarshalError::unsupported_field_type(
                owner,
                &self.source_path,
                format!(
                    "accessor expects `{owner}` but was given `{}`",
                    record.descriptor_source().type_name
                ),
            )
        })
    }

    /// Returns true for the `top` links bucket.
    #[must_use]
    pub fn is_top_links(&self) -> bool {
        self.role == FieldRole::Links && self.serialized_name == TOP_LINKS_BUCKET
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("role", &self.role)
            .field("serialized_name", &self.serialized_name)
            .field("source_path", &self.source_path)
            .field("related", &self.related.map(|source| source.type_name))
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// The merged field list of one record type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub(crate) const fn new(
        type_id: TypeId,
        type_name: &'static str,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            type_id,
            type_name,
            fields,
        }
    }

    /// Returns the described type's identity.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the described type's short name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns all fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the primary field, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.role == FieldRole::Primary)
    }

    /// Returns the primary field or a [`MarshalError::MissingPrimary`].
    pub fn require_primary(&self) -> MarshalResult<&FieldDescriptor> {
        self.primary()
            .ok_or_else(|| MarshalError::missing_primary(self.type_name))
    }

    /// Returns the resource type name declared by the primary field.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.primary().map(|f| f.serialized_name.as_str())
    }

    /// Returns the attribute fields in order.
    pub fn attributes(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.role == FieldRole::Attribute)
    }

    /// Returns the relation fields in order.
    pub fn relations(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.role.is_relation())
    }

    /// Returns a relation field by serialized name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&FieldDescriptor> {
        self.relations().find(|f| f.serialized_name == name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    struct Comment {
        id: u32,
        body: String,
    }

    impl Describable for Comment {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .primary("id", "primary,comments", |c| c.id)
                .attribute("body", "attr,body", |c| c.body.clone());
        }
    }

    struct Stranger;

    impl Describable for Stranger {
        fn describe(_fields: &mut DescriptorBuilder<Self>) {}
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Comment>(), "Comment");
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<u8>(), "u8");
    }

    #[test]
    fn test_descriptor_queries() {
        let descriptor = describe::<Comment>().unwrap();

        assert_eq!(descriptor.type_name(), "Comment");
        assert_eq!(descriptor.type_id(), TypeId::of::<Comment>());
        assert_eq!(descriptor.resource_type(), Some("comments"));
        assert_eq!(descriptor.attributes().count(), 1);
        assert_eq!(descriptor.relations().count(), 0);
        assert!(descriptor.relation("body").is_none());
    }

    #[test]
    fn test_read_fields() {
        let descriptor = describe::<Comment>().unwrap();
        let comment = Comment {
            id: 9,
            body: "foo".to_string(),
        };

        let primary = descriptor.require_primary().unwrap();
        match primary.read(&comment, "Comment").unwrap() {
            FieldValue::Id(id) => assert_eq!(id, "9"),
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_read_on_wrong_record_is_unsupported() {
        let descriptor = describe::<Comment>().unwrap();
        let primary = descriptor.require_primary().unwrap();

        let err = primary.read(&Stranger, "Comment").unwrap_err();
        assert!(matches!(err, MarshalError::UnsupportedFieldType { .. }));
        assert!(err.to_string().contains("Stranger"));
    }

    #[test]
    fn test_missing_primary() {
        let descriptor = describe::<Stranger>().unwrap();
        let err = descriptor.require_primary().unwrap_err();
        assert_eq!(err, MarshalError::missing_primary("Stranger"));
    }

    #[test]
    fn test_role_classes() {
        assert_eq!(FieldRole::ToOne.class(), FieldRole::ToMany.class());
        assert_ne!(FieldRole::Attribute.class(), FieldRole::Links.class());
        assert!(FieldRole::ToMany.is_relation());
        assert!(!FieldRole::Primary.is_relation());
    }
}
