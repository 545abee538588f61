//! Parameter schema: the three ordered parameter enumerations of a method.
//!
//! Every generated class exposes its tunable parameters as three unscoped
//! enumerations (`common`, `atom`, `bond`). The enumerator index is the
//! position of the name in the descriptor, and the numeric code fragment
//! uses those indices to address parameter storage. A [`ParameterSchema`] is
//! computed once per expansion and shared by both emitted artifacts.

use super::method::identifiers::{is_identifier, is_reserved_member};
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterScope {
    Common,
    Atom,
    Bond,
}

impl ParameterScope {
    pub const ALL: [ParameterScope; 3] = [Self::Common, Self::Atom, Self::Bond];

    /// Name of the enumeration emitted for this scope.
    pub fn enum_name(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Atom => "atom",
            Self::Bond => "bond",
        }
    }
}

impl fmt::Display for ParameterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.enum_name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("method '{method}': duplicate {scope} parameter '{name}'")]
    DuplicateParameter {
        method: String,
        scope: ParameterScope,
        name: String,
    },

    #[error("method '{method}': duplicate variable '{name}'")]
    DuplicateVariable { method: String, name: String },

    #[error("method '{method}': {field} '{value}' is not a valid C++ identifier")]
    InvalidIdentifier {
        method: String,
        field: &'static str,
        value: String,
    },

    #[error("method '{method}': {field} '{value}' clashes with a name reserved by the generated code")]
    ReservedName {
        method: String,
        field: &'static str,
        value: String,
    },
}

/// One ordered scope of parameter names with zero-based indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEnum {
    scope: ParameterScope,
    names: Vec<String>,
}

impl ParameterEnum {
    pub fn scope(&self) -> ParameterScope {
        self.scope
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }

    /// Renders the enumeration, e.g. `enum atom { alpha = 0, beta = 1 };`.
    ///
    /// An empty scope renders as `enum atom {};`.
    pub fn enum_block(&self) -> String {
        if self.names.is_empty() {
            return format!("enum {} {{}};", self.scope.enum_name());
        }
        let entries = self
            .iter()
            .map(|(index, name)| format!("{name} = {index}"))
            .join(", ");
        format!("enum {} {{ {entries} }};", self.scope.enum_name())
    }

    /// Renders the quoted, comma-joined names forwarded to the base constructor.
    pub fn initializer_list(&self) -> String {
        self.names.iter().map(|name| format!("\"{name}\"")).join(", ")
    }

    /// One compile-time index check per parameter, for use inside the implementation.
    pub fn index_checks(&self) -> impl Iterator<Item = String> + '_ {
        let scope = self.scope.enum_name();
        self.iter().map(move |(index, name)| {
            format!(
                "static_assert({scope}::{name} == {index}, \"{scope} parameter '{name}' must have index {index}\");"
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSchema {
    common: ParameterEnum,
    atom: ParameterEnum,
    bond: ParameterEnum,
}

impl ParameterSchema {
    /// Builds the three enumerations for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateParameter`] if a name repeats, within a
    /// scope or across scopes (unscoped enumerators share the class scope), and
    /// [`SchemaError::InvalidIdentifier`] for names that are not C++ identifiers.
    /// Names equal to `method` or to a member the generated class declares are
    /// [`SchemaError::ReservedName`].
    pub fn build<S: AsRef<str>>(
        method: &str,
        common: &[S],
        atom: &[S],
        bond: &[S],
    ) -> Result<Self, SchemaError> {
        let mut seen: HashMap<String, ParameterScope> = HashMap::new();
        let mut scope_enum = |scope: ParameterScope, names: &[S]| {
            let mut ordered = Vec::with_capacity(names.len());
            for name in names.iter().map(AsRef::as_ref) {
                if !is_identifier(name) {
                    return Err(SchemaError::InvalidIdentifier {
                        method: method.to_string(),
                        field: "parameter name",
                        value: name.to_string(),
                    });
                }
                if name == method || is_reserved_member(name) {
                    return Err(SchemaError::ReservedName {
                        method: method.to_string(),
                        field: "parameter name",
                        value: name.to_string(),
                    });
                }
                if seen.insert(name.to_string(), scope).is_some() {
                    return Err(SchemaError::DuplicateParameter {
                        method: method.to_string(),
                        scope,
                        name: name.to_string(),
                    });
                }
                ordered.push(name.to_string());
            }
            Ok(ParameterEnum {
                scope,
                names: ordered,
            })
        };

        Ok(Self {
            common: scope_enum(ParameterScope::Common, common)?,
            atom: scope_enum(ParameterScope::Atom, atom)?,
            bond: scope_enum(ParameterScope::Bond, bond)?,
        })
    }

    pub fn scope(&self, scope: ParameterScope) -> &ParameterEnum {
        match scope {
            ParameterScope::Common => &self.common,
            ParameterScope::Atom => &self.atom,
            ParameterScope::Bond => &self.bond,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterEnum> {
        [&self.common, &self.atom, &self.bond].into_iter()
    }

    /// All index checks of the three scopes, indented for a function body.
    pub fn index_checks(&self) -> String {
        self.iter()
            .flat_map(ParameterEnum::index_checks)
            .map(|line| format!("    {line}"))
            .join("\n")
    }
}
