//! Capability requirements declared by a generated method.
//!
//! Feature-aware families override `get_requirements()` so that the host
//! program can check, before running a method, that the molecule provides
//! everything the numeric code needs (geometry, topology, perceived bonds...).

use super::method::identifiers::is_identifier;
use super::schema::SchemaError;
use itertools::Itertools;

fn is_feature_tag(tag: &str) -> bool {
    is_identifier(tag) && !tag.bytes().any(|b| b.is_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureList {
    tags: Vec<String>,
}

impl FeatureList {
    /// De-duplicates `tags`, keeping the first occurrence of each.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidIdentifier`] if a tag is not a lower-case
    /// identifier. Tags are upper-cased on rendering, so mixed case would let
    /// two distinct tags collapse into one enumerator.
    pub fn new<S: AsRef<str>>(method: &str, tags: &[S]) -> Result<Self, SchemaError> {
        if let Some(bad) = tags.iter().map(AsRef::as_ref).find(|t| !is_feature_tag(t)) {
            return Err(SchemaError::InvalidIdentifier {
                method: method.to_string(),
                field: "required feature",
                value: bad.to_string(),
            });
        }
        let tags = tags
            .iter()
            .map(|t| t.as_ref().to_string())
            .unique()
            .collect();
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Renders the accessor list, e.g. `RequiredFeatures::GEOMETRY, RequiredFeatures::TOPOLOGY`.
    pub fn render(&self) -> String {
        self.tags
            .iter()
            .map(|tag| format!("RequiredFeatures::{}", tag.to_ascii_uppercase()))
            .join(", ")
    }
}
