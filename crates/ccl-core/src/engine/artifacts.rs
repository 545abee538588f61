use crate::core::templates::family::{DECLARATION_FILE_NAME, FamilyKey, IMPLEMENTATION_FILE_NAME};

/// One emitted source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    file_name: &'static str,
    contents: String,
}

impl Artifact {
    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn into_contents(self) -> String {
        self.contents
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub method_name: String,
    pub family: FamilyKey,
    /// Same de-duplicated list the requirements accessor returns; empty for families without one.
    pub required_features: Vec<String>,
}

/// The declaration/implementation pair of one method.
///
/// Only the engine constructs it, and always with both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    declaration: Artifact,
    implementation: Artifact,
    metadata: ArtifactMetadata,
}

impl Artifacts {
    pub(crate) fn new(declaration: String, implementation: String, metadata: ArtifactMetadata) -> Self {
        Self {
            declaration: Artifact {
                file_name: DECLARATION_FILE_NAME,
                contents: declaration,
            },
            implementation: Artifact {
                file_name: IMPLEMENTATION_FILE_NAME,
                contents: implementation,
            },
            metadata,
        }
    }

    pub fn declaration(&self) -> &Artifact {
        &self.declaration
    }

    pub fn implementation(&self) -> &Artifact {
        &self.implementation
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Both files, declaration first.
    pub fn files(&self) -> [&Artifact; 2] {
        [&self.declaration, &self.implementation]
    }

    pub fn into_pair(self) -> (Artifact, Artifact) {
        (self.declaration, self.implementation)
    }
}
