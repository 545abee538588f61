use super::descriptor::MethodDescriptor;
use crate::core::templates::family::FamilyKey;
use crate::core::templates::registry::UnknownFamilyError;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileTemplate {
    backend: String,
    linkage: String,
    #[serde(default)]
    feature_aware: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
struct FileDefinition {
    template: FileTemplate,
    method: MethodDescriptor,
}

/// A method descriptor together with the family it should be expanded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub method: MethodDescriptor,
    pub family: FamilyKey,
}

#[derive(Debug, Error)]
pub enum DefinitionLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Template selection error for '{path}': {source}")]
    Family {
        path: String,
        source: UnknownFamilyError,
    },
}

impl MethodDefinition {
    pub fn load(path: &Path) -> Result<Self, DefinitionLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| DefinitionLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionLoadError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> Result<Self, DefinitionLoadError> {
        let file: FileDefinition =
            toml::from_str(content).map_err(|e| DefinitionLoadError::Toml {
                path: path.to_string(),
                source: e,
            })?;
        let template = file.template;
        let family = FamilyKey::parse(&template.backend, &template.linkage, template.feature_aware)
            .map_err(|e| DefinitionLoadError::Family {
                path: path.to_string(),
                source: e,
            })?;
        Ok(Self {
            method: file.method,
            family,
        })
    }
}
