use super::artifacts::{ArtifactMetadata, Artifacts};
use super::bindings::{Bindings, first_unbound};
use super::error::ExpansionError;
use crate::core::features::FeatureList;
use crate::core::method::descriptor::MethodDescriptor;
use crate::core::schema::{ParameterSchema, ParameterScope};
use crate::core::templates::family::{FamilyKey, Placeholder, TemplateFamily};
use crate::core::templates::registry;
use crate::core::templates::skeleton::{self, SkeletonError};
use tracing::{debug, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Expands `descriptor` into the family registered under `key`.
///
/// # Errors
///
/// - [`ExpansionError::UnknownFamily`] if no family is registered for `key`
/// - [`ExpansionError::UnboundPlaceholder`] if the family needs a field the descriptor lacks
/// - [`ExpansionError::Schema`] for duplicate or malformed names
#[instrument(skip_all, name = "expand", fields(method = %descriptor.display_name(), family = %key))]
pub fn expand(descriptor: &MethodDescriptor, key: &FamilyKey) -> Result<Artifacts, ExpansionError> {
    let family = registry::lookup(key).map_err(|source| ExpansionError::UnknownFamily {
        method: descriptor.display_name().to_string(),
        source,
    })?;
    expand_family(descriptor, family)
}

/// Expands `descriptor` against an already resolved family.
///
/// Every check runs before any text is produced, so an error never leaves
/// half a pair behind.
pub fn expand_family(
    descriptor: &MethodDescriptor,
    family: &TemplateFamily,
) -> Result<Artifacts, ExpansionError> {
    let method = descriptor.display_name();

    if let Some(placeholder) = first_unbound(descriptor, family) {
        return Err(unbound(method, family, placeholder.name(), placeholder.field()));
    }

    descriptor.validate()?;
    let schema = ParameterSchema::build(
        method,
        &descriptor.common_parameters,
        &descriptor.atom_parameters,
        &descriptor.bond_parameters,
    )?;
    debug!(
        common = schema.scope(ParameterScope::Common).len(),
        atom = schema.scope(ParameterScope::Atom).len(),
        bond = schema.scope(ParameterScope::Bond).len(),
        "Built parameter schema."
    );

    let features = resolve_features(descriptor, family)?;
    let bindings = Bindings::new(descriptor, family, &schema, features.as_ref());

    let declaration = fill(family.declaration, &bindings, method, family)?;
    let implementation = fill(family.implementation, &bindings, method, family)?;

    let metadata = ArtifactMetadata {
        method_name: descriptor.name.clone(),
        family: family.key,
        required_features: features.map(|f| f.tags().to_vec()).unwrap_or_default(),
    };
    Ok(Artifacts::new(declaration, implementation, metadata))
}

/// Expands every `(descriptor, key)` request independently, in input order.
#[instrument(skip_all, name = "expand_all", fields(requests = requests.len()))]
pub fn expand_all(
    requests: &[(MethodDescriptor, FamilyKey)],
) -> Vec<Result<Artifacts, ExpansionError>> {
    #[cfg(not(feature = "parallel"))]
    let iterator = requests.iter();

    #[cfg(feature = "parallel")]
    let iterator = requests.par_iter();

    iterator
        .map(|(descriptor, key)| expand(descriptor, key))
        .collect()
}

fn resolve_features(
    descriptor: &MethodDescriptor,
    family: &TemplateFamily,
) -> Result<Option<FeatureList>, ExpansionError> {
    let Some(tags) = &descriptor.required_features else {
        return Ok(None);
    };
    if !family.supports_requirements() {
        if !tags.is_empty() {
            warn!(
                family = %family.key,
                "Family has no requirements accessor; required features are not emitted."
            );
        }
        return Ok(None);
    }
    Ok(Some(FeatureList::new(descriptor.display_name(), tags)?))
}

fn fill(
    skeleton_text: &'static str,
    bindings: &Bindings,
    method: &str,
    family: &TemplateFamily,
) -> Result<String, ExpansionError> {
    let tokens = skeleton::tokenize(skeleton_text).map_err(|SkeletonError { text, .. }| {
        ExpansionError::UnboundPlaceholder {
            method: method.to_string(),
            family: family.key,
            placeholder: text,
            field: "skeleton",
        }
    })?;
    skeleton::render(&tokens, |name| {
        let value = Placeholder::from_name(name).and_then(|p| bindings.get(p));
        trace!(placeholder = name, bound = value.is_some(), "Substituting.");
        value
    })
    .map_err(|name| {
        let field = Placeholder::from_name(name).map_or("unknown", Placeholder::field);
        unbound(method, family, name, field)
    })
}

fn unbound(
    method: &str,
    family: &TemplateFamily,
    placeholder: &str,
    field: &'static str,
) -> ExpansionError {
    ExpansionError::UnboundPlaceholder {
        method: method.to_string(),
        family: family.key,
        placeholder: placeholder.to_string(),
        field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::method::descriptor::{VariableDefinition, VariableScope};
    use crate::core::schema::SchemaError;
    use crate::core::templates::family::{Backend, FeatureSupport, Linkage};

    fn key(backend: Backend, linkage: Linkage, features: FeatureSupport) -> FamilyKey {
        FamilyKey::new(backend, linkage, features)
    }

    fn eem() -> MethodDescriptor {
        MethodDescriptor::new("Eem")
            .common_parameters(["kappa"])
            .atom_parameters(["A", "B"])
            .required_features(["geometry", "topology", "geometry"])
            .code("    Eigen::VectorXd _q = solve(A, B);")
    }

    #[test]
    fn expand_fills_both_skeletons_without_leftover_placeholders() {
        for family in registry::families() {
            let artifacts = expand_family(&eem(), family).unwrap();
            for artifact in artifacts.files() {
                for placeholder in Placeholder::ALL {
                    let marker = format!("{{{}}}", placeholder.name());
                    assert!(
                        !artifact.contents().contains(&marker),
                        "{} of {} still contains {marker}",
                        artifact.file_name(),
                        family.key
                    );
                }
            }
        }
    }

    #[test]
    fn declaration_carries_enums_and_constructor_lists() {
        let key = key(Backend::DenseSolve, Linkage::Static, FeatureSupport::FeatureAware);
        let artifacts = expand(&eem(), &key).unwrap();
        let header = artifacts.declaration().contents();
        assert!(header.contains("class Eem : public Method {"));
        assert!(header.contains("enum common { kappa = 0 };"));
        assert!(header.contains("enum atom { A = 0, B = 1 };"));
        assert!(header.contains("enum bond {};"));
        assert!(header.contains(r#"Method("Eem", {"kappa"}, {"A", "B"}, {}, {})"#));
    }

    #[test]
    fn feature_aware_families_render_deduplicated_requirements() {
        let key = key(Backend::IndexCopy, Linkage::Static, FeatureSupport::FeatureAware);
        let artifacts = expand(&eem(), &key).unwrap();
        assert!(artifacts.declaration().contents().contains(
            "return {RequiredFeatures::GEOMETRY, RequiredFeatures::TOPOLOGY};"
        ));
        assert_eq!(artifacts.metadata().required_features, ["geometry", "topology"]);
    }

    #[test]
    fn plain_families_omit_the_requirements_accessor() {
        let key = key(Backend::DenseSolve, Linkage::Static, FeatureSupport::Plain);
        let artifacts = expand(&eem(), &key).unwrap();
        assert!(!artifacts.declaration().contents().contains("get_requirements"));
        assert!(artifacts.metadata().required_features.is_empty());
    }

    #[test]
    fn implementation_checks_the_declared_indices() {
        let key = key(Backend::DenseSolve, Linkage::Static, FeatureSupport::FeatureAware);
        let artifacts = expand(&eem(), &key).unwrap();
        let source = artifacts.implementation().contents();
        assert!(source.contains("static_assert(common::kappa == 0,"));
        assert!(source.contains("static_assert(atom::A == 0,"));
        assert!(source.contains("static_assert(atom::B == 1,"));
    }

    #[test]
    fn dense_solve_and_index_copy_return_q_differently() {
        let dense = expand(
            &eem(),
            &key(Backend::DenseSolve, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        assert!(dense.implementation().contents().contains(
            "return std::vector<double>(_q.data(), _q.data() + _q.size());"
        ));

        let copy = expand(
            &eem(),
            &key(Backend::IndexCopy, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        let source = copy.implementation().contents();
        assert!(source.contains("results[i] = _q(i);"));
        assert!(!source.contains("_q.data()"));
    }

    #[test]
    fn iterative_brings_bind_into_scope() {
        let artifacts = expand(
            &eem(),
            &key(Backend::Iterative, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        let source = artifacts.implementation().contents();
        assert!(source.contains("#include <functional>"));
        assert!(source.contains("using namespace std::placeholders;"));
    }

    #[test]
    fn plugin_linkage_exports_one_singleton() {
        let artifacts = expand(
            &eem(),
            &key(Backend::TrivialLoop, Linkage::Plugin, FeatureSupport::Plain),
        )
        .unwrap();
        let header = artifacts.declaration().contents();
        let source = artifacts.implementation().contents();
        assert_eq!(
            header.matches(r#"extern "C" BOOST_SYMBOL_EXPORT Eem method;"#).count(),
            1
        );
        assert_eq!(source.matches("\nEem method;").count(), 1);
    }

    #[test]
    fn includes_are_merged_after_template_directives() {
        let descriptor = eem()
            .system_include("cmath")
            .system_include("vector")
            .user_include("helpers.h");
        let artifacts = expand(
            &descriptor,
            &key(Backend::DenseSolve, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        let source = artifacts.implementation().contents();
        assert!(source.starts_with(
            "#include <vector>\n#include <Eigen/Dense>\n#include \"structures/molecule.h\"\n#include \"ccl_method.h\"\n#include <cmath>\n#include \"helpers.h\"\n"
        ));
        assert_eq!(source.matches("#include <vector>").count(), 1);
    }

    #[test]
    fn variables_are_declared_before_the_fragment() {
        let descriptor = eem()
            .variable(VariableDefinition::new("chi", VariableScope::Atom))
            .variable(VariableDefinition::new("order", VariableScope::Bond));
        let artifacts = expand(
            &descriptor,
            &key(Backend::DenseSolve, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        let source = artifacts.implementation().contents();
        let chi = source.find("    std::vector<double> chi(n, 0);").unwrap();
        let order = source.find("    std::vector<double> order(m, 0);").unwrap();
        let code = source.find("Eigen::VectorXd _q").unwrap();
        assert!(chi < order && order < code);
    }

    #[test]
    fn code_fragment_is_not_rescanned() {
        let descriptor = eem().code("    auto s = \"{method_name}\"; } {");
        let artifacts = expand(
            &descriptor,
            &key(Backend::DenseSolve, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap();
        assert!(
            artifacts
                .implementation()
                .contents()
                .contains("auto s = \"{method_name}\"; } {")
        );
    }

    #[test]
    fn missing_code_is_an_unbound_placeholder() {
        let mut descriptor = eem();
        descriptor.code_fragment = None;
        let err = expand(
            &descriptor,
            &key(Backend::TrivialLoop, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::UnboundPlaceholder { ref placeholder, field: "code_fragment", .. }
                if placeholder == "code"
        ));
        assert_eq!(err.method(), "Eem");
    }

    #[test]
    fn unbound_check_runs_before_schema_validation() {
        let descriptor = MethodDescriptor::new("Eem").atom_parameters(["alpha", "alpha"]);
        let err = expand(
            &descriptor,
            &key(Backend::TrivialLoop, Linkage::Static, FeatureSupport::Plain),
        )
        .unwrap_err();
        assert!(matches!(err, ExpansionError::UnboundPlaceholder { .. }));
    }

    #[test]
    fn duplicate_parameters_are_a_schema_error() {
        let descriptor = eem().atom_parameters(["alpha", "alpha"]);
        let err = expand(
            &descriptor,
            &key(Backend::DenseSolve, Linkage::Static, FeatureSupport::FeatureAware),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::Schema(SchemaError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn unregistered_key_is_an_unknown_family() {
        let err = expand(
            &eem(),
            &key(Backend::DenseSolve, Linkage::Plugin, FeatureSupport::FeatureAware),
        )
        .unwrap_err();
        match err {
            ExpansionError::UnknownFamily { method, source } => {
                assert_eq!(method, "Eem");
                assert_eq!(
                    source.key,
                    "backend=dense-solve, linkage=plugin, feature-aware=true"
                );
            }
            other => panic!("expected an unknown family, got {other:?}"),
        }
    }

    #[test]
    fn expand_all_keeps_input_order_and_isolates_failures() {
        let good = key(Backend::TrivialLoop, Linkage::Static, FeatureSupport::Plain);
        let bad = key(Backend::TrivialLoop, Linkage::Plugin, FeatureSupport::FeatureAware);
        let requests = vec![
            (eem(), good),
            (MethodDescriptor::new("Equal").code("q[0] = 0;"), bad),
            (MethodDescriptor::new("Equal").code("q[0] = 0;"), good),
        ];
        let results = expand_all(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().metadata().method_name, "Eem");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().metadata().method_name, "Equal");
    }
}
