//! Per-call marshaling options
//!
//! [`ApiExtras`] carries the caller's document-level links and the
//! relationship link templates. It is built fresh for every marshal call and
//! never shared between calls.

use crate::document::Links;

/// A link template attached to one relationship of one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipLinkRule {
    /// Key under which the resolved link is stored (`related`, `self`, ...).
    pub link_name: String,
    /// Serialized name of the relationship on the owner.
    pub relation_name: String,
    /// Resource type the relationship must point to.
    pub related_type: String,
    /// Resource type the rule applies to.
    pub owner_type: String,
    /// URL template; `{<owner_type>.id}` is replaced by the owner's id.
    pub template: String,
}

impl RelationshipLinkRule {
    /// Returns the placeholder substituted with the owner's id.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{{{}.id}}", self.owner_type)
    }
}

/// Caller-supplied links for one marshal call.
///
/// # Example
///
/// ```
/// use jsonapi_domain::ApiExtras;
///
/// let mut extras = ApiExtras::new();
/// extras
///     .add_root_link("next", "https://localhost:8080/api/v1/blogs?page=2")
///     .add_relationship_link(
///         "related",
///         "posts",
///         "posts",
///         "blogs",
///         "https://localhost:8080/api/v1/blogs/posts?blog_id={blogs.id}",
///     );
///
/// assert_eq!(extras.relationship_links().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiExtras {
    root_links: Links,
    relationship_links: Vec<RelationshipLinkRule>,
}

impl ApiExtras {
    /// Creates empty extras.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document-level link, stored verbatim.
    ///
    /// A later link with the same name replaces the earlier one.
    pub fn add_root_link(&mut self, name: impl Into<String>, href: impl Into<String>) -> &mut Self {
        self.root_links.insert(name.into(), href.into());
        self
    }

    /// Adds a relationship link template.
    pub fn add_relationship_link(
        &mut self,
        link_name: impl Into<String>,
        relation_name: impl Into<String>,
        related_type: impl Into<String>,
        owner_type: impl Into<String>,
        template: impl Into<String>,
    ) -> &mut Self {
        self.relationship_links.push(RelationshipLinkRule {
            link_name: link_name.into(),
            relation_name: relation_name.into(),
            related_type: related_type.into(),
            owner_type: owner_type.into(),
            template: template.into(),
        });
        self
    }

    /// Returns the document-level links.
    #[must_use]
    pub const fn root_links(&self) -> &Links {
        &self.root_links
    }

    /// Returns the relationship link rules in insertion order.
    #[must_use]
    pub fn relationship_links(&self) -> &[RelationshipLinkRule] {
        &self.relationship_links
    }

    /// Returns the rules that apply to resources of `owner_type`.
    pub fn rules_for<'a>(
        &'a self,
        owner_type: &'a str,
    ) -> impl Iterator<Item = &'a RelationshipLinkRule> + 'a {
        self.relationship_links
            .iter()
            .filter(move |rule| rule.owner_type == owner_type)
    }

    /// Returns true if no links were configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root_links.is_empty() && self.relationship_links.is_empty()
    }
}
