//! Included collector
//!
//! Walks the relationships reachable from the primary resources and gathers
//! every other resource exactly once, in first-seen depth-first order.

use std::collections::HashSet;

use jsonapi_domain::{MarshalResult, RecordRef, ResourceIdentifier};

use super::node::{BuiltNode, NodeBuilder, ResourceNode};

/// Collects the `included` set of one document.
#[derive(Debug)]
pub struct IncludedCollector<'r> {
    nodes: NodeBuilder<'r>,
    visited: HashSet<ResourceIdentifier>,
    included: Vec<ResourceNode>,
}

impl<'r> IncludedCollector<'r> {
    /// Creates an empty collector.
    #[must_use]
    pub fn new(nodes: NodeBuilder<'r>) -> Self {
        Self {
            nodes,
            visited: HashSet::new(),
            included: Vec::new(),
        }
    }

    /// Marks a primary resource as seen so it never lands in `included`.
    ///
    /// Returns false if it was already marked.
    pub fn mark_root(&mut self, identifier: ResourceIdentifier) -> bool {
        self.visited.insert(identifier)
    }

    /// Visits `related` and everything reachable from it.
    ///
    /// Each unseen record is marked, built and appended before its own
    /// relations are walked. Seen records are skipped without recursion,
    /// which also ends cycles.
    pub fn walk(&mut self, related: &[RecordRef<'_>]) -> MarshalResult<()> {
        for target in related {
            let record = target.get();
            if !self.visited.insert(self.nodes.identify(record)?) {
                continue;
            }

            let BuiltNode { node, related } = self.nodes.build(record)?;
            self.included.push(node);
            self.walk(&related)?;
        }
        Ok(())
    }

    /// Returns the number of collected resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.included.len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.included.is_empty()
    }

    /// Returns the collected nodes for in-place updates.
    pub fn nodes_mut(&mut self) -> &mut [ResourceNode] {
        &mut self.included
    }

    /// Consumes the collector, returning the nodes in first-seen order.
    #[must_use]
    pub fn into_nodes(self) -> Vec<ResourceNode> {
        self.included
    }
}
