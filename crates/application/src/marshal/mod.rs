//! Document assembler
//!
//! [`Marshaler`] drives one marshal call: it builds the primary nodes, collects
//! the included set, resolves relationship links on every node and places
//! the document links.

mod included;
mod links;
mod node;

pub use included::IncludedCollector;
pub use links::{LinkResolver, resolve_template};
pub use node::{BuiltNode, NodeBuilder, ResourceNode};

use tracing::{debug, debug_span};

use jsonapi_domain::{
    ApiExtras, ManyPayload, MarshalResult, OnePayload, Record, non_empty, non_empty_links,
};

use crate::registry::DescriptorRegistry;

/// Assembles JSON:API documents from records.
#[derive(Debug, Clone, Copy)]
pub struct Marshaler<'r> {
    registry: &'r DescriptorRegistry,
}

impl Default for Marshaler<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl Marshaler<'static> {
    /// Creates a marshaler backed by the process-wide registry.
    #[must_use]
    pub fn global() -> Self {
        Self::new(DescriptorRegistry::global())
    }
}

impl<'r> Marshaler<'r> {
    /// Creates a marshaler backed by `registry`.
    #[must_use]
    pub const fn new(registry: &'r DescriptorRegistry) -> Self {
        Self { registry }
    }

    /// Marshals a single primary record.
    ///
    /// The record's `top` links and the extras' root links (which win on a
    /// name clash) become the document links.
    pub fn marshal_one(&self, record: &dyn Record, extras: &ApiExtras) -> MarshalResult<OnePayload> {
        let span = debug_span!("marshal_one");
        let _enter = span.enter();

        let nodes = NodeBuilder::new(self.registry);
        let resolver = LinkResolver::new(extras, self.registry);
        let BuiltNode { mut node, related } = nodes.build(record)?;

        let mut collector = IncludedCollector::new(nodes);
        collector.mark_root(node.identifier());
        collector.walk(&related)?;

        resolver.apply(&mut node)?;
        resolver.apply_all(collector.nodes_mut())?;

        let mut links = node.top_links.take().unwrap_or_default();
        links.extend(extras.root_links().clone());

        let included = collector.into_nodes();
        debug!(
            root = %node.identifier(),
            included = included.len(),
            "assembled one payload"
        );

        Ok(OnePayload {
            data: node.resource,
            included: non_empty(included.into_iter().map(ResourceNode::into_resource).collect()),
            links: non_empty_links(links),
        })
    }

    /// Marshals a sequence of primary records.
    ///
    /// Each primary resource keeps its own `top` links as resource `links`,
    /// unlike [`Marshaler::marshal_one`] which moves them to the document.
    /// The document links are the extras' root links.
    pub fn marshal_many(
        &self,
        records: &[&dyn Record],
        extras: &ApiExtras,
    ) -> MarshalResult<ManyPayload> {
        let span = debug_span!("marshal_many", roots = records.len());
        let _enter = span.enter();

        let nodes = NodeBuilder::new(self.registry);
        let resolver = LinkResolver::new(extras, self.registry);
        let mut collector = IncludedCollector::new(nodes);

        let mut roots = Vec::with_capacity(records.len());
        for record in records {
            let built = nodes.build(*record)?;
            collector.mark_root(built.node.identifier());
            roots.push(built);
        }

        let mut data = Vec::with_capacity(roots.len());
        for BuiltNode { mut node, related } in roots {
            collector.walk(&related)?;
            resolver.apply(&mut node)?;
            data.push(node);
        }
        resolver.apply_all(collector.nodes_mut())?;

        let included = collector.into_nodes();
        debug!(roots = data.len(), included = included.len(), "assembled many payload");

        Ok(ManyPayload {
            data: data.into_iter().map(ResourceNode::into_resource).collect(),
            included: non_empty(included.into_iter().map(ResourceNode::into_resource).collect()),
            links: non_empty_links(extras.root_links().clone()),
        })
    }
}
