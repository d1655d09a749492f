//! Field annotation parser
//!
//! Parses the `role,argument` metadata attached to every marshaled field.
//!
//! | annotation            | meaning                                         |
//! |-----------------------|-------------------------------------------------|
//! | `primary,<type>`      | resource id; argument is the resource type      |
//! | `attr,<name>`         | attribute serialized under `name`               |
//! | `relation,<name>`     | to-one or to-many relationship named `name`     |
//! | `links,<bucket>`      | literal links; `top` or a relationship name     |

use crate::error::{MarshalError, MarshalResult};

/// Separator between the role token and its argument.
pub const ANNOTATION_SEPARATOR: char = ',';

/// Links bucket that carries a resource's own links.
pub const TOP_LINKS_BUCKET: &str = "top";

/// Role token of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagRole {
    /// `primary`
    Primary,
    /// `attr`
    Attribute,
    /// `relation`
    Relation,
    /// `links`
    Links,
}

impl TagRole {
    /// Parses a role token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "primary" => Some(Self::Primary),
            "attr" => Some(Self::Attribute),
            "relation" => Some(Self::Relation),
            "links" => Some(Self::Links),
            _ => None,
        }
    }

    /// Returns the token as written in annotations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Attribute => "attr",
            Self::Relation => "relation",
            Self::Links => "links",
        }
    }
}

impl std::fmt::Display for TagRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    /// The role token.
    pub role: TagRole,
    /// The single argument following the role.
    pub argument: String,
}

impl FieldTag {
    /// Parses `raw` for the field `field` declared on `type_name`.
    ///
    /// Every role takes exactly one argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonapi_domain::annotation::{FieldTag, TagRole};
    ///
    /// let tag = FieldTag::parse("primary,blogs", "id", "Blog").unwrap();
    /// assert_eq!(tag.role, TagRole::Primary);
    /// assert_eq!(tag.argument, "blogs");
    ///
    /// let err = FieldTag::parse("primary", "id", "BadModel").unwrap_err();
    /// assert!(err.to_string().contains("too few arguments"));
    /// ```
    pub fn parse(raw: &str, field: &str, type_name: &str) -> MarshalResult<Self> {
        let mut segments = raw.split(ANNOTATION_SEPARATOR).map(str::trim);
        let token = segments.next().unwrap_or_default();

        let Some(role) = TagRole::from_token(token) else {
            return Err(MarshalError::malformed_annotation(
                type_name,
                field,
                format!("unknown role `{token}` in `{raw}`"),
            ));
        };

        let Some(argument) = segments.next() else {
            return Err(MarshalError::malformed_annotation(
                type_name,
                field,
                format!("too few arguments in `{raw}`: `{role}` takes exactly one"),
            ));
        };

        if segments.next().is_some() {
            return Err(MarshalError::malformed_annotation(
                type_name,
                field,
                format!("too many arguments in `{raw}`: `{role}` takes exactly one"),
            ));
        }

        if argument.is_empty() {
            return Err(MarshalError::malformed_annotation(
                type_name,
                field,
                format!("empty argument in `{raw}`"),
            ));
        }

        Ok(Self {
            role,
            argument: argument.to_string(),
        })
    }

    /// Returns true if this tag names the `top` links bucket.
    #[must_use]
    pub fn is_top_links(&self) -> bool {
        self.role == TagRole::Links && self.argument == TOP_LINKS_BUCKET
    }
}
