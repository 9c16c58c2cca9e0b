//! Wire types for the username.dev `/check` endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The result of a username lookup, as returned by the API.
///
/// Field names serialize in the API's camelCase form, so printing this value
/// with `serde_json` reproduces the wire document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// The username as normalized by the server (trimmed, lowercased).
    pub username: String,
    /// Whether the username is held under one or more categories.
    pub is_reserved: bool,
    /// Whether the username has been flagged as deleted. Deleted usernames
    /// are still reserved.
    #[serde(default)]
    pub is_deleted: bool,
    /// Categories the username is reserved under. Empty when available.
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A category a username is reserved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The category tag.
    pub category: CategoryKind,
    /// Optional country/language qualifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CategoryMetadata>,
}

impl fmt::Display for Category {
    /// Renders `city (DE, de)`; qualifiers are omitted when none are present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        let parts: Vec<&str> = self
            .metadata
            .iter()
            .flat_map(|m| [m.country.as_deref(), m.lang.as_deref()])
            .flatten()
            .collect();
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Qualifiers attached to a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    /// ISO country code, e.g. `DE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Language code, e.g. `de`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// The category tag of a reserved username.
///
/// Tags the server adds after this crate was released decode as
/// [`CategoryKind::Unrecognized`] and serialize back to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[non_exhaustive]
pub enum CategoryKind {
    /// `other`
    Other,
    /// `dictionary`
    Dictionary,
    /// `city`
    City,
    /// `country`
    Country,
    /// `region`
    Region,
    /// `brand`
    Brand,
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `system`
    System,
    /// `restricted`
    Restricted,
    /// `product`
    Product,
    /// `public_figure`
    PublicFigure,
    /// `government`
    Government,
    /// `agency`
    Agency,
    /// `institution`
    Institution,
    /// `event`
    Event,
    /// `company`
    Company,
    /// `place`
    Place,
    /// `organization`
    Organization,
    /// A tag this version of the crate does not know about.
    Unrecognized(String),
}

const KNOWN_CATEGORIES: &[(&str, CategoryKind)] = &[
    ("other", CategoryKind::Other),
    ("dictionary", CategoryKind::Dictionary),
    ("city", CategoryKind::City),
    ("country", CategoryKind::Country),
    ("region", CategoryKind::Region),
    ("brand", CategoryKind::Brand),
    ("first_name", CategoryKind::FirstName),
    ("last_name", CategoryKind::LastName),
    ("system", CategoryKind::System),
    ("restricted", CategoryKind::Restricted),
    ("product", CategoryKind::Product),
    ("public_figure", CategoryKind::PublicFigure),
    ("government", CategoryKind::Government),
    ("agency", CategoryKind::Agency),
    ("institution", CategoryKind::Institution),
    ("event", CategoryKind::Event),
    ("company", CategoryKind::Company),
    ("place", CategoryKind::Place),
    ("organization", CategoryKind::Organization),
];

impl CategoryKind {
    /// The wire tag for this category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if let Self::Unrecognized(tag) = self {
            return tag;
        }
        KNOWN_CATEGORIES
            .iter()
            .find(|(_, kind)| kind == self)
            .map_or("other", |(tag, _)| *tag)
    }
}

impl From<String> for CategoryKind {
    fn from(tag: String) -> Self {
        KNOWN_CATEGORIES
            .iter()
            .find(|(known, _)| *known == tag)
            .map_or(Self::Unrecognized(tag), |(_, kind)| kind.clone())
    }
}

impl From<CategoryKind> for String {
    fn from(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Unrecognized(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RFC 7807 problem document, returned by the API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    /// URI identifying the problem type.
    #[serde(rename = "type", default)]
    pub problem_type: String,
    /// Short summary of the problem type.
    pub title: String,
    /// HTTP status code of this occurrence.
    pub status: u16,
    /// Explanation specific to this occurrence.
    #[serde(default)]
    pub detail: String,
    /// URI identifying this occurrence.
    #[serde(default)]
    pub instance: String,
    /// Seconds to wait before retrying. Only sent with 429 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
