//! Link resolver
//!
//! Applies [`ApiExtras`] relationship link rules to built nodes. A template
//! names the owner's id as `{<owner_type>.id}`; everything else in braces is
//! kept as written. Ids substituted into the path or fragment are
//! percent-encoded, and the query component is encoded as a single value.

use tracing::debug;

use jsonapi_domain::{ApiExtras, MarshalResult, RelationshipLinkRule};

use super::node::ResourceNode;
use crate::registry::DescriptorRegistry;

/// Resolves relationship link templates against resource nodes.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    extras: &'a ApiExtras,
    registry: &'a DescriptorRegistry,
}

impl<'a> LinkResolver<'a> {
    /// Creates a resolver for the rules in `extras`.
    #[must_use]
    pub const fn new(extras: &'a ApiExtras, registry: &'a DescriptorRegistry) -> Self {
        Self { extras, registry }
    }

    /// Adds every matching rule's link to `node`'s relationships.
    pub fn apply(&self, node: &mut ResourceNode) -> MarshalResult<()> {
        for rule in self.extras.rules_for(&node.resource.resource_type) {
            if !self.points_to(node, rule)? {
                continue;
            }
            if let Some(relationship) = node.resource.relationships.get_mut(&rule.relation_name) {
                let href = resolve_template(&rule.template, &rule.placeholder(), &node.resource.id);
                relationship.insert_link(rule.link_name.clone(), href);
            }
        }
        Ok(())
    }

    /// Applies the rules to every node in `nodes`.
    pub fn apply_all(&self, nodes: &mut [ResourceNode]) -> MarshalResult<()> {
        nodes.iter_mut().try_for_each(|node| self.apply(node))
    }

    fn points_to(&self, node: &ResourceNode, rule: &RelationshipLinkRule) -> MarshalResult<bool> {
        let Some(field) = node.descriptor.relation(&rule.relation_name) else {
            debug!(
                owner_type = %rule.owner_type,
                relation = %rule.relation_name,
                "link rule names an undeclared relation, ignoring"
            );
            return Ok(false);
        };
        let Some(related) = field.related else {
            return Ok(false);
        };

        let related = self.registry.describe_source(related)?;
        Ok(related.resource_type() == Some(rule.related_type.as_str()))
    }
}

/// Substitutes `id` for `placeholder` in `template` and percent-encodes the
/// result.
///
/// The template is split into base, query and fragment before substitution,
/// so an id can never move those boundaries. Ids placed in the base or the
/// fragment are percent-encoded; the query is encoded as one opaque value
/// after substitution.
///
/// # Examples
///
/// ```
/// use jsonapi_application::marshal::resolve_template;
///
/// let href = resolve_template(
///     "https://localhost:8080/api/v1/blogs/posts?blog_id={blogs.id}&page=2",
///     "{blogs.id}",
///     "5",
/// );
/// assert_eq!(href, "https://localhost:8080/api/v1/blogs/posts?blog_id%3D5%26page%3D2");
/// ```
#[must_use]
pub fn resolve_template(template: &str, placeholder: &str, id: &str) -> String {
    let (body, fragment) = match template.split_once('#') {
        Some((body, fragment)) => (body, Some(fragment)),
        None => (template, None),
    };
    let (base, query) = match body.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (body, None),
    };

    let segment = urlencoding::encode(id);
    let mut href = base.replace(placeholder, &segment);
    if let Some(query) = query {
        href.push('?');
        href.push_str(&urlencoding::encode(&query.replace(placeholder, id)));
    }
    if let Some(fragment) = fragment {
        href.push('#');
        href.push_str(&fragment.replace(placeholder, &segment));
    }
    href
}
