//! Descriptor builder
//!
//! [`DescriptorBuilder`] collects a type's field declarations. Each
//! declaration pairs an annotation string with a typed accessor; the
//! annotation is parsed and the declarations are merged in [`finish`].
//!
//! Merge rules:
//! - a field declared on the type itself shadows promoted fields (from
//!   [`embed`]) with the same serialized name and role class;
//! - between promoted fields the shallower one wins, then the first declared;
//! - a shadowing field takes the position of the field it shadows;
//! - two same-class fields with the same name declared in one scope are an
//!   error, and so are two primary fields.
//!
//! [`finish`]: DescriptorBuilder::finish
//! [`embed`]: DescriptorBuilder::embed

use std::any::{Any, TypeId};
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::annotation::{FieldTag, TagRole};
use crate::descriptor::{
    Accessor, DescriptorSource, FieldDescriptor, FieldRole, FieldValue, RoleClass, TypeDescriptor,
    accessor, short_type_name,
};
use crate::document::Links;
use crate::error::{MarshalError, MarshalResult};
use crate::record::{AsRecord, Describable, Record, RecordRef};
use crate::value::AttributeValue;

/// How a field was declared, which fixes the shape its accessor returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declared {
    Primary,
    Attribute,
    ToOne,
    ToMany,
    Links,
}

impl Declared {
    /// Combines the declaration with the annotation's role.
    const fn role(self, tag: TagRole) -> Option<FieldRole> {
        match (self, tag) {
            (Self::Primary, TagRole::Primary) => Some(FieldRole::Primary),
            (Self::Attribute, TagRole::Attribute) => Some(FieldRole::Attribute),
            (Self::ToOne, TagRole::Relation) => Some(FieldRole::ToOne),
            (Self::ToMany, TagRole::Relation) => Some(FieldRole::ToMany),
            (Self::Links, TagRole::Links) => Some(FieldRole::Links),
            _ => None,
        }
    }

    const fn expected(self) -> TagRole {
        match self {
            Self::Primary => TagRole::Primary,
            Self::Attribute => TagRole::Attribute,
            Self::ToOne | Self::ToMany => TagRole::Relation,
            Self::Links => TagRole::Links,
        }
    }
}

struct PendingField {
    path: String,
    scope: String,
    annotation: String,
    declared: Declared,
    related: Option<DescriptorSource>,
    depth: usize,
    accessor: Accessor,
}

/// Collects the field declarations of `T`.
pub struct DescriptorBuilder<T> {
    pending: Vec<PendingField>,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Describable> DescriptorBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn push(
        &mut self,
        field: &str,
        annotation: &str,
        declared: Declared,
        related: Option<DescriptorSource>,
        accessor: Accessor,
    ) -> &mut Self {
        self.pending.push(PendingField {
            path: field.to_string(),
            scope: String::new(),
            annotation: annotation.to_string(),
            declared,
            related,
            depth: 0,
            accessor,
        });
        self
    }

    /// Declares the primary field; `read` yields the id, rendered with
    /// [`Display`].
    pub fn primary<I, F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        I: Display,
        F: Fn(&T) -> I + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>()
                .map(|record| FieldValue::Id(read(record).to_string()))
        });
        self.push(field, annotation, Declared::Primary, None, read)
    }

    /// Declares an attribute.
    pub fn attribute<V, F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        V: Into<AttributeValue>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>()
                .map(|record| FieldValue::Attribute(read(record).into()))
        });
        self.push(field, annotation, Declared::Attribute, None, read)
    }

    /// Declares a to-one relation to a record held by the field.
    pub fn to_one<R, F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        R: AsRecord + 'static,
        F: for<'a> Fn(&'a T) -> Option<&'a R> + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>().map(|record| {
                FieldValue::ToOne(read(record).map(|target| RecordRef::Borrowed(target.as_record())))
            })
        });
        let related = DescriptorSource::of::<R::Target>();
        self.push(field, annotation, Declared::ToOne, Some(related), read)
    }

    /// Declares a to-one relation resolved to a shared handle.
    ///
    /// Use this for back-references held as `Weak`: `read` upgrades the
    /// handle, and a dangling one marshals as a null relationship.
    pub fn to_one_shared<R, F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        R: Describable,
        F: Fn(&T) -> Option<Arc<R>> + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>().map(|record| {
                FieldValue::ToOne(read(record).map(|target| {
                    let target: Arc<dyn Record> = target;
                    RecordRef::Shared(target)
                }))
            })
        });
        let related = DescriptorSource::of::<R>();
        self.push(field, annotation, Declared::ToOne, Some(related), read)
    }

    /// Declares a to-many relation over a slice of records.
    pub fn to_many<R, F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        R: AsRecord + 'static,
        F: for<'a> Fn(&'a T) -> &'a [R] + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>().map(|record| {
                FieldValue::ToMany(
                    read(record)
                        .iter()
                        .map(|target| RecordRef::Borrowed(target.as_record()))
                        .collect(),
                )
            })
        });
        let related = DescriptorSource::of::<R::Target>();
        self.push(field, annotation, Declared::ToMany, Some(related), read)
    }

    /// Declares a literal links bucket.
    pub fn links<F>(&mut self, field: &str, annotation: &str, read: F) -> &mut Self
    where
        F: for<'a> Fn(&'a T) -> Option<&'a Links> + Send + Sync + 'static,
    {
        let read = accessor(move |any: &dyn Any| {
            any.downcast_ref::<T>().map(|record| FieldValue::Links(read(record)))
        });
        self.push(field, annotation, Declared::Links, None, read)
    }

    /// Promotes the fields of a composed record `E` reached through `project`.
    ///
    /// Promoted fields sit one level deeper than `E`'s own declarations and
    /// lose to any same-named field declared on `T`.
    pub fn embed<E, F>(&mut self, field: &str, project: F) -> &mut Self
    where
        E: Describable,
        F: for<'a> Fn(&'a T) -> &'a E + Send + Sync + 'static,
    {
        let mut inner = DescriptorBuilder::<E>::new();
        E::describe(&mut inner);

        let project = Arc::new(project);
        for promoted in inner.pending {
            let PendingField {
                path,
                scope,
                annotation,
                declared,
                related,
                depth,
                accessor: inner_read,
            } = promoted;

            let project = Arc::clone(&project);
            let read = accessor(move |any: &dyn Any| {
                let outer = any.downcast_ref::<T>()?;
                let embedded: &dyn Any = (*project)(outer);
                inner_read(embedded)
            });

            self.pending.push(PendingField {
                path: format!("{field}.{path}"),
                scope: if scope.is_empty() {
                    field.to_string()
                } else {
                    format!("{field}.{scope}")
                },
                annotation,
                declared,
                related,
                depth: depth + 1,
                accessor: read,
            });
        }
        self
    }

    /// Parses every annotation and merges the declarations.
    pub fn finish(self) -> MarshalResult<TypeDescriptor> {
        let type_name = short_type_name::<T>();
        let mut merged: Vec<(FieldDescriptor, String)> = Vec::with_capacity(self.pending.len());

        for pending in self.pending {
            let tag = FieldTag::parse(&pending.annotation, &pending.path, type_name)?;
            let role = pending.declared.role(tag.role).ok_or_else(|| {
                MarshalError::unsupported_field_type(
                    type_name,
                    &pending.path,
                    format!(
                        "annotated `{}` but declared as a `{}` field",
                        tag.role,
                        pending.declared.expected()
                    ),
                )
            })?;

            let candidate = FieldDescriptor {
                role,
                serialized_name: tag.argument,
                source_path: pending.path,
                related: pending.related,
                depth: pending.depth,
                accessor: pending.accessor,
            };
            merge(&mut merged, candidate, pending.scope, type_name)?;
        }

        let fields = merged.into_iter().map(|(field, _)| field).collect();
        Ok(TypeDescriptor::new(TypeId::of::<T>(), type_name, fields))
    }
}

impl<T: Describable> Default for DescriptorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if the two fields compete for the same slot.
fn collides(existing: &FieldDescriptor, candidate: &FieldDescriptor) -> bool {
    let class = existing.role.class();
    class == candidate.role.class()
        && (class == RoleClass::Primary || existing.serialized_name == candidate.serialized_name)
}

fn merge(
    merged: &mut Vec<(FieldDescriptor, String)>,
    candidate: FieldDescriptor,
    scope: String,
    type_name: &str,
) -> MarshalResult<()> {
    let Some(index) = merged
        .iter()
        .position(|(existing, _)| collides(existing, &candidate))
    else {
        merged.push((candidate, scope));
        return Ok(());
    };

    let (existing, existing_scope) = &merged[index];
    if existing.depth == candidate.depth && *existing_scope == scope {
        let what = if candidate.role == FieldRole::Primary {
            "duplicate primary field".to_string()
        } else {
            format!(
                "duplicate name `{}` also declared by `{}`",
                candidate.serialized_name, existing.source_path
            )
        };
        return Err(MarshalError::malformed_annotation(
            type_name,
            &candidate.source_path,
            what,
        ));
    }

    if candidate.depth < existing.depth {
        merged[index] = (candidate, scope);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::descriptor::describe;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Author {
        id: u64,
        name: String,
        email: String,
        links: Links,
    }

    impl Describable for Author {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .primary("id", "primary,authors", |a| a.id)
                .links("links", "links,top", |a| Some(&a.links))
                .attribute("name", "attr,name", |a| a.name.clone())
                .attribute("email", "attr,email", |a| a.email.clone());
        }
    }

    #[derive(Default)]
    struct Editor {
        author: Author,
        id: u64,
        name: String,
        desk: String,
    }

    impl Describable for Editor {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .embed("author", |e| &e.author)
                .primary("id", "primary,editors", |e| e.id)
                .attribute("name", "attr,name", |e| e.name.clone())
                .attribute("desk", "attr,desk", |e| e.desk.clone());
        }
    }

    #[derive(Default)]
    struct Anonymous {
        author: Author,
        alias: String,
    }

    impl Describable for Anonymous {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .embed("author", |a| &a.author)
                .attribute("alias", "attr,alias", |a| a.alias.clone());
        }
    }

    struct Twice {
        id: u8,
    }

    impl Describable for Twice {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .primary("id", "primary,twice", |t| t.id)
                .primary("other_id", "primary,twice", |t| t.id);
        }
    }

    struct Clash {
        title: String,
    }

    impl Describable for Clash {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .primary("id", "primary,clashes", |_| 1)
                .attribute("title", "attr,title", |c| c.title.clone())
                .attribute("headline", "attr,title", |c| c.title.clone());
        }
    }

    struct Mislabeled {
        id: u8,
    }

    impl Describable for Mislabeled {
        fn describe(fields: &mut DescriptorBuilder<Self>) {
            fields
                .primary("id", "primary,mislabeled", |m| m.id)
                .attribute("owner", "relation,owner", |m| m.id);
        }
    }

    fn names(descriptor: &TypeDescriptor) -> Vec<(FieldRole, String, String)> {
        descriptor
            .fields()
            .iter()
            .map(|f| (f.role, f.serialized_name.clone(), f.source_path.clone()))
            .collect()
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let descriptor = describe::<Author>().unwrap();

        assert_eq!(
            names(&descriptor),
            vec![
                (FieldRole::Primary, "authors".to_string(), "id".to_string()),
                (FieldRole::Links, "top".to_string(), "links".to_string()),
                (FieldRole::Attribute, "name".to_string(), "name".to_string()),
                (FieldRole::Attribute, "email".to_string(), "email".to_string()),
            ]
        );
    }

    #[test]
    fn test_outer_fields_shadow_promoted_ones_in_place() {
        let descriptor = describe::<Editor>().unwrap();

        assert_eq!(
            names(&descriptor),
            vec![
                (FieldRole::Primary, "editors".to_string(), "id".to_string()),
                (FieldRole::Links, "top".to_string(), "author.links".to_string()),
                (FieldRole::Attribute, "name".to_string(), "name".to_string()),
                (FieldRole::Attribute, "email".to_string(), "author.email".to_string()),
                (FieldRole::Attribute, "desk".to_string(), "desk".to_string()),
            ]
        );
        assert_eq!(descriptor.fields()[1].depth, 1);
    }

    #[test]
    fn test_promoted_primary_is_used_when_outer_has_none() {
        let descriptor = describe::<Anonymous>().unwrap();
        let primary = descriptor.primary().unwrap();

        assert_eq!(primary.serialized_name, "authors");
        assert_eq!(primary.source_path, "author.id");
    }

    #[test]
    fn test_promoted_accessors_read_through_the_composition() {
        let descriptor = describe::<Anonymous>().unwrap();
        let record = Anonymous {
            author: Author {
                id: 12,
                email: "a@example.com".to_string(),
                ..Default::default()
            },
            alias: "ghost".to_string(),
        };

        let primary = descriptor.require_primary().unwrap();
        assert!(matches!(
            primary.read(&record, "Anonymous").unwrap(),
            FieldValue::Id(id) if id == "12"
        ));

        let email = descriptor
            .attributes()
            .find(|f| f.serialized_name == "email")
            .unwrap();
        assert!(matches!(
            email.read(&record, "Anonymous").unwrap(),
            FieldValue::Attribute(AttributeValue::String(s)) if s == "a@example.com"
        ));
    }

    #[test]
    fn test_duplicate_primary_in_one_scope_is_malformed() {
        let err = describe::<Twice>().unwrap_err();
        assert!(matches!(err, MarshalError::MalformedAnnotation { .. }));
        assert!(err.to_string().contains("duplicate primary field"));
    }

    #[test]
    fn test_duplicate_name_in_one_scope_is_malformed() {
        let err = describe::<Clash>().unwrap_err();
        assert!(err.to_string().contains("duplicate name `title`"));
    }

    #[test]
    fn test_role_mismatch_is_unsupported() {
        let err = describe::<Mislabeled>().unwrap_err();
        match err {
            MarshalError::UnsupportedFieldType { field, reason, .. } => {
                assert_eq!(field, "owner");
                assert!(reason.contains("annotated `relation`"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
