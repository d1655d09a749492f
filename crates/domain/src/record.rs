//! Record capability traits
//!
//! A type becomes marshalable by implementing [`Describable`], which lists
//! its fields through a [`DescriptorBuilder`]. [`Record`] is the object-safe
//! view the engine walks; it is implemented for every describable type.

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use crate::builder::DescriptorBuilder;
use crate::descriptor::DescriptorSource;

/// A type that declares its marshaled fields.
///
/// # Example
///
/// ```
/// use jsonapi_domain::{Describable, DescriptorBuilder};
///
/// struct Comment {
///     id: u32,
///     body: String,
/// }
///
/// impl Describable for Comment {
///     fn describe(fields: &mut DescriptorBuilder<Self>) {
///         fields
///             .primary("id", "primary,comments", |c| c.id)
///             .attribute("body", "attr,body", |c| c.body.clone());
///     }
/// }
/// ```
pub trait Describable: Any {
    /// Declares this type's fields on `fields`.
    fn describe(fields: &mut DescriptorBuilder<Self>)
    where
        Self: Sized;
}

/// Object-safe view of a describable record.
pub trait Record: Any {
    /// Returns the record as [`Any`] for field accessors.
    fn as_any(&self) -> &dyn Any;

    /// Returns what the registry needs to describe this record's type.
    fn descriptor_source(&self) -> DescriptorSource;
}

impl<T: Describable> Record for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn descriptor_source(&self) -> DescriptorSource {
        DescriptorSource::of::<T>()
    }
}

/// Something that holds a describable record.
///
/// Lets relation accessors return records held by value, `Rc` or `Arc`.
pub trait AsRecord {
    /// The describable type held.
    type Target: Describable;

    /// Borrows the held record.
    fn as_record(&self) -> &dyn Record;
}

impl<T: Describable> AsRecord for T {
    type Target = T;

    fn as_record(&self) -> &dyn Record {
        self
    }
}

impl<T: Describable> AsRecord for Rc<T> {
    type Target = T;

    fn as_record(&self) -> &dyn Record {
        &**self
    }
}

impl<T: Describable> AsRecord for Arc<T> {
    type Target = T;

    fn as_record(&self) -> &dyn Record {
        &**self
    }
}

/// A related record produced by a relation accessor.
///
/// Borrowed records live in the graph being marshaled. Shared records are
/// owned handles, typically upgraded from a `Weak` back-reference.
#[derive(Clone)]
pub enum RecordRef<'a> {
    /// A record borrowed from its owner.
    Borrowed(&'a dyn Record),
    /// A reference-counted record.
    Shared(Arc<dyn Record>),
}

impl RecordRef<'_> {
    /// Borrows the record.
    #[must_use]
    pub fn get(&self) -> &dyn Record {
        match self {
            Self::Borrowed(record) => *record,
            Self::Shared(record) => record.as_ref(),
        }
    }
}

impl std::fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Borrowed(_) => "Borrowed",
            Self::Shared(_) => "Shared",
        };
        f.debug_tuple(kind)
            .field(&self.get().descriptor_source().type_name)
            .finish()
    }
}
