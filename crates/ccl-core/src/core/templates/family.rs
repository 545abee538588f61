use super::registry::UnknownFamilyError;
use itertools::Itertools;
use std::fmt;

/// File name of the emitted declaration; the implementation includes it by this name.
pub const DECLARATION_FILE_NAME: &str = "ccl_method.h";
pub const IMPLEMENTATION_FILE_NAME: &str = "ccl_method.cpp";

/// Numeric strategy the implementation skeleton wraps around the code fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    /// Fragment leaves a dense solved vector `_q`; the result is a bulk copy of its buffer.
    DenseSolve,
    /// As [`Backend::DenseSolve`], with `std::bind` and the argument placeholders in scope.
    Iterative,
    /// Fragment leaves an indexable `_q`; the result is copied element by element over `0..n`.
    IndexCopy,
    /// No linear algebra; the fragment fills a zeroed `q` of length `n` in place.
    TrivialLoop,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Self::DenseSolve,
        Self::Iterative,
        Self::IndexCopy,
        Self::TrivialLoop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DenseSolve => "dense-solve",
            Self::Iterative => "iterative",
            Self::IndexCopy => "index-copy",
            Self::TrivialLoop => "trivial-loop",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Linkage {
    /// Compiled into the host program.
    Static,
    /// Built as a loadable module exporting a single `method` instance.
    Plugin,
}

impl Linkage {
    pub const ALL: [Linkage; 2] = [Self::Static, Self::Plugin];

    pub fn name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Plugin => "plugin",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureSupport {
    /// The base exposes `get_requirements()` and the class overrides it.
    FeatureAware,
    Plain,
}

impl FeatureSupport {
    pub fn from_flag(feature_aware: bool) -> Self {
        if feature_aware {
            Self::FeatureAware
        } else {
            Self::Plain
        }
    }

    pub fn is_feature_aware(self) -> bool {
        self == Self::FeatureAware
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FeatureAware => "feature-aware",
            Self::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyKey {
    pub backend: Backend,
    pub linkage: Linkage,
    pub features: FeatureSupport,
}

impl FamilyKey {
    pub const fn new(backend: Backend, linkage: Linkage, features: FeatureSupport) -> Self {
        Self {
            backend,
            linkage,
            features,
        }
    }

    /// Resolves a textual family request.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFamilyError`] naming the requested triple if the back-end
    /// or linkage is not one the registry knows.
    pub fn parse(
        backend: &str,
        linkage: &str,
        feature_aware: bool,
    ) -> Result<Self, UnknownFamilyError> {
        let unknown = || UnknownFamilyError::new(backend, linkage, feature_aware);
        Ok(Self::new(
            Backend::from_name(backend).ok_or_else(unknown)?,
            Linkage::from_name(linkage).ok_or_else(unknown)?,
            FeatureSupport::from_flag(feature_aware),
        ))
    }

    /// Registry id, e.g. `dense-solve/static/feature-aware`.
    pub fn id(&self) -> String {
        format!(
            "{}/{}/{}",
            self.backend.name(),
            self.linkage.name(),
            self.features.name()
        )
    }
}

impl fmt::Display for FamilyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend={}, linkage={}, feature-aware={}",
            self.backend.name(),
            self.linkage.name(),
            self.features.is_feature_aware()
        )
    }
}

/// Named substitution points understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    MethodName,
    MethodType,
    CommonParametersEnum,
    AtomParametersEnum,
    BondParametersEnum,
    CommonParameters,
    AtomParameters,
    BondParameters,
    ParameterChecks,
    Prototypes,
    RequiredFeatures,
    Includes,
    Definitions,
    VariableDefinitions,
    Code,
}

impl Placeholder {
    pub const ALL: [Placeholder; 15] = [
        Self::MethodName,
        Self::MethodType,
        Self::CommonParametersEnum,
        Self::AtomParametersEnum,
        Self::BondParametersEnum,
        Self::CommonParameters,
        Self::AtomParameters,
        Self::BondParameters,
        Self::ParameterChecks,
        Self::Prototypes,
        Self::RequiredFeatures,
        Self::Includes,
        Self::Definitions,
        Self::VariableDefinitions,
        Self::Code,
    ];

    /// Name as written inside the braces of a skeleton.
    pub fn name(self) -> &'static str {
        match self {
            Self::MethodName => "method_name",
            Self::MethodType => "method_type",
            Self::CommonParametersEnum => "common_parameters_enum",
            Self::AtomParametersEnum => "atom_parameters_enum",
            Self::BondParametersEnum => "bond_parameters_enum",
            Self::CommonParameters => "common_parameters",
            Self::AtomParameters => "atom_parameters",
            Self::BondParameters => "bond_parameters",
            Self::ParameterChecks => "parameter_checks",
            Self::Prototypes => "prototypes",
            Self::RequiredFeatures => "required_features",
            Self::Includes => "includes",
            Self::Definitions => "definitions",
            Self::VariableDefinitions => "variable_definitions",
            Self::Code => "code",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Descriptor field the placeholder's value is derived from.
    pub fn field(self) -> &'static str {
        match self {
            Self::MethodName => "name",
            Self::MethodType => "method_type",
            Self::CommonParametersEnum | Self::CommonParameters => "common_parameters",
            Self::AtomParametersEnum | Self::AtomParameters => "atom_parameters",
            Self::BondParametersEnum | Self::BondParameters => "bond_parameters",
            Self::ParameterChecks => "parameters",
            Self::Prototypes => "helper_prototypes",
            Self::RequiredFeatures => "required_features",
            Self::Includes => "includes",
            Self::Definitions => "definitions",
            Self::VariableDefinitions => "variables",
            Self::Code => "code_fragment",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include {
    System(&'static str),
    User(&'static str),
}

impl Include {
    pub fn render(self) -> String {
        match self {
            Self::System(path) => render_system_include(path),
            Self::User(path) => render_user_include(path),
        }
    }
}

pub fn render_system_include(path: &str) -> String {
    format!("#include <{path}>")
}

pub fn render_user_include(path: &str) -> String {
    format!("#include \"{path}\"")
}

/// An immutable declaration/implementation skeleton pair and its contract.
#[derive(Debug)]
pub struct TemplateFamily {
    pub key: FamilyKey,
    pub declaration: &'static str,
    pub implementation: &'static str,
    pub declaration_placeholders: &'static [Placeholder],
    pub implementation_placeholders: &'static [Placeholder],
    /// Directives the implementation artifact always starts with.
    pub includes: &'static [Include],
}

impl TemplateFamily {
    /// Every placeholder the family needs bound, in first-use order.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.declaration_placeholders
            .iter()
            .chain(self.implementation_placeholders)
            .copied()
            .unique()
            .collect()
    }

    pub fn supports_requirements(&self) -> bool {
        self.key.features.is_feature_aware()
    }
}
