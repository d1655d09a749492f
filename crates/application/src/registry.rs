//! Descriptor registry
//!
//! Memoizes [`TypeDescriptor`]s by type identity. A descriptor is built at
//! most once per registry in the common case; two threads racing on the same
//! type may both build it, and the last insert wins. Both values are equal
//! since descriptors depend only on the type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::trace;

use jsonapi_domain::{DescriptorSource, Describable, MarshalResult, Record, TypeDescriptor};

static GLOBAL: OnceLock<DescriptorRegistry> = OnceLock::new();

/// Cache of type descriptors keyed by [`TypeId`].
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl DescriptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, creating it on first use.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the descriptor of `record`'s type.
    pub fn describe(&self, record: &dyn Record) -> MarshalResult<Arc<TypeDescriptor>> {
        self.describe_source(record.descriptor_source())
    }

    /// Returns the descriptor of `T`.
    pub fn describe_type<T: Describable>(&self) -> MarshalResult<Arc<TypeDescriptor>> {
        self.describe_source(DescriptorSource::of::<T>())
    }

    /// Returns the descriptor for `source`, building it on a miss.
    ///
    /// Build errors are returned and not cached.
    pub fn describe_source(&self, source: DescriptorSource) -> MarshalResult<Arc<TypeDescriptor>> {
        if let Some(descriptor) = self.descriptors.read().get(&source.type_id) {
            trace!(type_name = source.type_name, "descriptor cache hit");
            return Ok(Arc::clone(descriptor));
        }

        trace!(type_name = source.type_name, "descriptor cache miss");
        let descriptor = Arc::new((source.build)()?);
        self.descriptors
            .write()
            .insert(source.type_id, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Returns true if `T` has been described.
    #[must_use]
    pub fn contains<T: Describable>(&self) -> bool {
        self.descriptors.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    /// Returns true if nothing has been described yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }

    /// Drops every cached descriptor.
    pub fn clear(&self) {
        self.descriptors.write().clear();
    }
}
