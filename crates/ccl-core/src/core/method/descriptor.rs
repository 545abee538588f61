use super::identifiers::{is_identifier, is_qualified_identifier, is_reserved_local};
use crate::core::schema::SchemaError;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_METHOD_TYPE: &str = "Method";

const UNNAMED: &str = "<unnamed>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableScope {
    Atom,
    Bond,
}

impl VariableScope {
    /// The bound count variable the vector is sized by.
    pub fn size_variable(self) -> &'static str {
        match self {
            Self::Atom => "n",
            Self::Bond => "m",
        }
    }
}

/// A zero-initialised per-atom or per-bond work vector declared before the code fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDefinition {
    pub name: String,
    pub scope: VariableScope,
}

impl VariableDefinition {
    pub fn new(name: impl Into<String>, scope: VariableScope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "std::vector<double> {}({}, 0);",
            self.name,
            self.scope.size_variable()
        )
    }
}

/// Structured description of one charge calculation method.
///
/// Fields that a template family may require but that have no sensible
/// default (`code_fragment`, `required_features`) are optional here; the
/// engine reports them as unbound placeholders when the chosen family needs
/// them. Everything else defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_method_type")]
    pub method_type: String,
    #[serde(default)]
    pub common_parameters: Vec<String>,
    #[serde(default)]
    pub atom_parameters: Vec<String>,
    #[serde(default)]
    pub bond_parameters: Vec<String>,
    #[serde(default)]
    pub required_features: Option<Vec<String>>,
    #[serde(default, rename = "code")]
    pub code_fragment: Option<String>,
    #[serde(default)]
    pub helper_prototypes: Vec<String>,
    #[serde(default)]
    pub definitions: String,
    #[serde(default)]
    pub variables: Vec<VariableDefinition>,
    #[serde(default)]
    pub system_includes: Vec<String>,
    #[serde(default)]
    pub user_includes: Vec<String>,
}

fn default_method_type() -> String {
    DEFAULT_METHOD_TYPE.to_string()
}

impl Default for MethodDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            method_type: default_method_type(),
            common_parameters: Vec::new(),
            atom_parameters: Vec::new(),
            bond_parameters: Vec::new(),
            required_features: None,
            code_fragment: None,
            helper_prototypes: Vec::new(),
            definitions: String::new(),
            variables: Vec::new(),
            system_includes: Vec::new(),
            user_includes: Vec::new(),
        }
    }
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn method_type(mut self, base: impl Into<String>) -> Self {
        self.method_type = base.into();
        self
    }
    pub fn common_parameters<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.common_parameters = names.into_iter().map(Into::into).collect();
        self
    }
    pub fn atom_parameters<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.atom_parameters = names.into_iter().map(Into::into).collect();
        self
    }
    pub fn bond_parameters<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.bond_parameters = names.into_iter().map(Into::into).collect();
        self
    }
    pub fn required_features<I: IntoIterator<Item = S>, S: Into<String>>(mut self, tags: I) -> Self {
        self.required_features = Some(tags.into_iter().map(Into::into).collect());
        self
    }
    pub fn code(mut self, fragment: impl Into<String>) -> Self {
        self.code_fragment = Some(fragment.into());
        self
    }
    pub fn helper_prototype(mut self, prototype: impl Into<String>) -> Self {
        self.helper_prototypes.push(prototype.into());
        self
    }
    pub fn definitions(mut self, definitions: impl Into<String>) -> Self {
        self.definitions = definitions.into();
        self
    }
    pub fn variable(mut self, variable: VariableDefinition) -> Self {
        self.variables.push(variable);
        self
    }
    pub fn system_include(mut self, path: impl Into<String>) -> Self {
        self.system_includes.push(path.into());
        self
    }
    pub fn user_include(mut self, path: impl Into<String>) -> Self {
        self.user_includes.push(path.into());
        self
    }

    /// Name used in diagnostics; never empty.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED
        } else {
            &self.name
        }
    }

    /// Checks the identifiers the descriptor contributes outside the parameter schema.
    ///
    /// An empty `name` or `method_type` is left to the placeholder check.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let method = self.display_name();
        let invalid = |field: &'static str, value: &str| SchemaError::InvalidIdentifier {
            method: method.to_string(),
            field,
            value: value.to_string(),
        };

        if !self.name.is_empty() && !is_identifier(&self.name) {
            return Err(invalid("name", &self.name));
        }
        if !self.method_type.is_empty() && !is_qualified_identifier(&self.method_type) {
            return Err(invalid("method_type", &self.method_type));
        }
        if !self.name.is_empty() && self.method_type.trim_start_matches("::") == self.name {
            return Err(SchemaError::ReservedName {
                method: method.to_string(),
                field: "name",
                value: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for variable in &self.variables {
            if !is_identifier(&variable.name) {
                return Err(invalid("variable", &variable.name));
            }
            if is_reserved_local(&variable.name) {
                return Err(SchemaError::ReservedName {
                    method: method.to_string(),
                    field: "variable",
                    value: variable.name.clone(),
                });
            }
            if !seen.insert(variable.name.as_str()) {
                return Err(SchemaError::DuplicateVariable {
                    method: method.to_string(),
                    name: variable.name.clone(),
                });
            }
        }
        Ok(())
    }
}
