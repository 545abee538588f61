use super::family::{
    Backend, DECLARATION_FILE_NAME, FamilyKey, FeatureSupport, Include, Linkage, Placeholder,
    TemplateFamily,
};
use phf::{Map, phf_map};
use thiserror::Error;

use Placeholder::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no template family registered for {key}")]
pub struct UnknownFamilyError {
    pub key: String,
}

impl UnknownFamilyError {
    pub fn new(backend: &str, linkage: &str, feature_aware: bool) -> Self {
        Self {
            key: format!("backend={backend}, linkage={linkage}, feature-aware={feature_aware}"),
        }
    }
}

impl From<&FamilyKey> for UnknownFamilyError {
    fn from(key: &FamilyKey) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

const STATIC_FEATURES_DECLARATION: &str = include_str!("../../../templates/static_features.h");
const STATIC_PLAIN_DECLARATION: &str = include_str!("../../../templates/static_plain.h");
const PLUGIN_PLAIN_DECLARATION: &str = include_str!("../../../templates/plugin_plain.h");

const DENSE_SOLVE: &str = include_str!("../../../templates/dense_solve.cpp");
const ITERATIVE: &str = include_str!("../../../templates/iterative.cpp");
const INDEX_COPY: &str = include_str!("../../../templates/index_copy.cpp");
const TRIVIAL_LOOP: &str = include_str!("../../../templates/trivial_loop.cpp");

const DENSE_SOLVE_PLUGIN: &str = concat!(
    include_str!("../../../templates/dense_solve.cpp"),
    include_str!("../../../templates/plugin_instance.cpp")
);
const ITERATIVE_PLUGIN: &str = concat!(
    include_str!("../../../templates/iterative.cpp"),
    include_str!("../../../templates/plugin_instance.cpp")
);
const INDEX_COPY_PLUGIN: &str = concat!(
    include_str!("../../../templates/index_copy.cpp"),
    include_str!("../../../templates/plugin_instance.cpp")
);
const TRIVIAL_LOOP_PLUGIN: &str = concat!(
    include_str!("../../../templates/trivial_loop.cpp"),
    include_str!("../../../templates/plugin_instance.cpp")
);

const FEATURE_AWARE_DECLARATION: &[Placeholder] = &[
    MethodName,
    MethodType,
    CommonParametersEnum,
    AtomParametersEnum,
    BondParametersEnum,
    Prototypes,
    CommonParameters,
    AtomParameters,
    BondParameters,
    RequiredFeatures,
];

const PLAIN_DECLARATION: &[Placeholder] = &[
    MethodName,
    MethodType,
    CommonParametersEnum,
    AtomParametersEnum,
    BondParametersEnum,
    Prototypes,
    CommonParameters,
    AtomParameters,
    BondParameters,
];

const IMPLEMENTATION: &[Placeholder] = &[
    Includes,
    Definitions,
    MethodName,
    ParameterChecks,
    VariableDefinitions,
    Code,
];

const LINEAR_ALGEBRA_INCLUDES: &[Include] = &[
    Include::System("vector"),
    Include::System("Eigen/Dense"),
    Include::User("structures/molecule.h"),
    Include::User(DECLARATION_FILE_NAME),
];

const ITERATIVE_INCLUDES: &[Include] = &[
    Include::System("vector"),
    Include::System("functional"),
    Include::System("Eigen/Dense"),
    Include::User("structures/molecule.h"),
    Include::User(DECLARATION_FILE_NAME),
];

const TRIVIAL_LOOP_INCLUDES: &[Include] = &[
    Include::System("vector"),
    Include::User("structures/molecule.h"),
    Include::User(DECLARATION_FILE_NAME),
];

macro_rules! family {
    ($backend:ident, $linkage:ident, $features:ident, $declaration:expr, $declaration_placeholders:expr, $implementation:expr, $includes:expr) => {
        TemplateFamily {
            key: FamilyKey::new(Backend::$backend, Linkage::$linkage, FeatureSupport::$features),
            declaration: $declaration,
            implementation: $implementation,
            declaration_placeholders: $declaration_placeholders,
            implementation_placeholders: IMPLEMENTATION,
            includes: $includes,
        }
    };
}

// Plugin bases predate the requirements accessor, so there are no
// plugin/feature-aware families.
static FAMILIES: Map<&'static str, TemplateFamily> = phf_map! {
    "dense-solve/static/feature-aware" => family!(DenseSolve, Static, FeatureAware, STATIC_FEATURES_DECLARATION, FEATURE_AWARE_DECLARATION, DENSE_SOLVE, LINEAR_ALGEBRA_INCLUDES),
    "iterative/static/feature-aware" => family!(Iterative, Static, FeatureAware, STATIC_FEATURES_DECLARATION, FEATURE_AWARE_DECLARATION, ITERATIVE, ITERATIVE_INCLUDES),
    "index-copy/static/feature-aware" => family!(IndexCopy, Static, FeatureAware, STATIC_FEATURES_DECLARATION, FEATURE_AWARE_DECLARATION, INDEX_COPY, LINEAR_ALGEBRA_INCLUDES),
    "trivial-loop/static/feature-aware" => family!(TrivialLoop, Static, FeatureAware, STATIC_FEATURES_DECLARATION, FEATURE_AWARE_DECLARATION, TRIVIAL_LOOP, TRIVIAL_LOOP_INCLUDES),

    "dense-solve/static/plain" => family!(DenseSolve, Static, Plain, STATIC_PLAIN_DECLARATION, PLAIN_DECLARATION, DENSE_SOLVE, LINEAR_ALGEBRA_INCLUDES),
    "iterative/static/plain" => family!(Iterative, Static, Plain, STATIC_PLAIN_DECLARATION, PLAIN_DECLARATION, ITERATIVE, ITERATIVE_INCLUDES),
    "index-copy/static/plain" => family!(IndexCopy, Static, Plain, STATIC_PLAIN_DECLARATION, PLAIN_DECLARATION, INDEX_COPY, LINEAR_ALGEBRA_INCLUDES),
    "trivial-loop/static/plain" => family!(TrivialLoop, Static, Plain, STATIC_PLAIN_DECLARATION, PLAIN_DECLARATION, TRIVIAL_LOOP, TRIVIAL_LOOP_INCLUDES),

    "dense-solve/plugin/plain" => family!(DenseSolve, Plugin, Plain, PLUGIN_PLAIN_DECLARATION, PLAIN_DECLARATION, DENSE_SOLVE_PLUGIN, LINEAR_ALGEBRA_INCLUDES),
    "iterative/plugin/plain" => family!(Iterative, Plugin, Plain, PLUGIN_PLAIN_DECLARATION, PLAIN_DECLARATION, ITERATIVE_PLUGIN, ITERATIVE_INCLUDES),
    "index-copy/plugin/plain" => family!(IndexCopy, Plugin, Plain, PLUGIN_PLAIN_DECLARATION, PLAIN_DECLARATION, INDEX_COPY_PLUGIN, LINEAR_ALGEBRA_INCLUDES),
    "trivial-loop/plugin/plain" => family!(TrivialLoop, Plugin, Plain, PLUGIN_PLAIN_DECLARATION, PLAIN_DECLARATION, TRIVIAL_LOOP_PLUGIN, TRIVIAL_LOOP_INCLUDES),
};

/// Returns the family registered under `key`.
pub fn lookup(key: &FamilyKey) -> Result<&'static TemplateFamily, UnknownFamilyError> {
    FAMILIES.get(key.id().as_str()).ok_or_else(|| key.into())
}

/// Resolves a textual `(backend, linkage, feature-awareness)` request.
pub fn find(
    backend: &str,
    linkage: &str,
    feature_aware: bool,
) -> Result<&'static TemplateFamily, UnknownFamilyError> {
    lookup(&FamilyKey::parse(backend, linkage, feature_aware)?)
}

/// All registered families, ordered by key.
pub fn families() -> Vec<&'static TemplateFamily> {
    let mut all: Vec<_> = FAMILIES.values().collect();
    all.sort_by_key(|family| family.key);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::skeleton::placeholder_names;
    use std::collections::BTreeSet;

    fn names(placeholders: &[Placeholder]) -> BTreeSet<&'static str> {
        placeholders.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn registry_holds_twelve_families() {
        assert_eq!(families().len(), 12);
    }

    #[test]
    fn every_family_is_stored_under_its_own_id() {
        for (id, family) in FAMILIES.entries() {
            assert_eq!(*id, family.key.id());
        }
    }

    #[test]
    fn declared_placeholders_match_skeleton_text() {
        for family in families() {
            let declaration: BTreeSet<_> =
                placeholder_names(family.declaration).unwrap().into_iter().collect();
            assert_eq!(
                declaration,
                names(family.declaration_placeholders),
                "declaration of {}",
                family.key
            );

            let implementation: BTreeSet<_> = placeholder_names(family.implementation)
                .unwrap()
                .into_iter()
                .collect();
            assert_eq!(
                implementation,
                names(family.implementation_placeholders),
                "implementation of {}",
                family.key
            );
        }
    }

    #[test]
    fn only_feature_aware_declarations_reference_required_features() {
        for family in families() {
            assert_eq!(
                family.declaration_placeholders.contains(&RequiredFeatures),
                family.supports_requirements(),
                "{}",
                family.key
            );
        }
    }

    #[test]
    fn plugin_families_export_exactly_one_instance() {
        for family in families() {
            let exports = family.declaration.matches("BOOST_SYMBOL_EXPORT").count();
            let instances = family.implementation.matches("{method_name} method;").count();
            match family.key.linkage {
                Linkage::Plugin => assert_eq!((exports, instances), (1, 1), "{}", family.key),
                Linkage::Static => assert_eq!((exports, instances), (0, 0), "{}", family.key),
            }
        }
    }

    #[test]
    fn only_trivial_loop_families_skip_linear_algebra() {
        for family in families() {
            let uses_eigen = family.includes.contains(&Include::System("Eigen/Dense"));
            assert_eq!(uses_eigen, family.key.backend != Backend::TrivialLoop);
        }
    }

    #[test]
    fn lookup_returns_the_requested_family() {
        let key = FamilyKey::new(Backend::IndexCopy, Linkage::Static, FeatureSupport::Plain);
        assert_eq!(lookup(&key).unwrap().key, key);
    }

    #[test]
    fn lookup_fails_for_unregistered_key() {
        let key = FamilyKey::new(Backend::DenseSolve, Linkage::Plugin, FeatureSupport::FeatureAware);
        let err = lookup(&key).unwrap_err();
        assert_eq!(
            err.key,
            "backend=dense-solve, linkage=plugin, feature-aware=true"
        );
    }

    #[test]
    fn find_fails_for_unknown_backend_name() {
        let err = find("quantum", "static", true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no template family registered for backend=quantum, linkage=static, feature-aware=true"
        );
    }
}
