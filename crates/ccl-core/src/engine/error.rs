use crate::core::schema::SchemaError;
use crate::core::templates::family::FamilyKey;
use crate::core::templates::registry::UnknownFamilyError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(
        "method '{method}': template family ({family}) requires placeholder '{placeholder}' but field '{field}' is unbound"
    )]
    UnboundPlaceholder {
        method: String,
        family: FamilyKey,
        placeholder: String,
        field: &'static str,
    },

    #[error("method '{method}': {source}")]
    UnknownFamily {
        method: String,
        #[source]
        source: UnknownFamilyError,
    },
}

impl ExpansionError {
    /// Name of the method the error was raised for.
    pub fn method(&self) -> &str {
        match self {
            Self::Schema(
                SchemaError::DuplicateParameter { method, .. }
                | SchemaError::DuplicateVariable { method, .. }
                | SchemaError::InvalidIdentifier { method, .. }
                | SchemaError::ReservedName { method, .. },
            ) => method,
            Self::UnboundPlaceholder { method, .. } | Self::UnknownFamily { method, .. } => method,
        }
    }
}
