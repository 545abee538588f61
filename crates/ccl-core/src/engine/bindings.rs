use crate::core::features::FeatureList;
use crate::core::method::descriptor::MethodDescriptor;
use crate::core::schema::{ParameterSchema, ParameterScope};
use crate::core::templates::family::{
    Include, Placeholder, TemplateFamily, render_system_include, render_user_include,
};
use itertools::Itertools;
use std::collections::BTreeMap;
use tracing::debug;

/// Returns the first placeholder `family` needs that `descriptor` leaves unbound.
///
/// Only descriptor-sourced placeholders can be unbound; everything the
/// engine computes itself (enumerations, includes, checks) always is.
pub(crate) fn first_unbound(
    descriptor: &MethodDescriptor,
    family: &TemplateFamily,
) -> Option<Placeholder> {
    family.placeholders().into_iter().find(|placeholder| match placeholder {
        Placeholder::MethodName => descriptor.name.is_empty(),
        Placeholder::MethodType => descriptor.method_type.is_empty(),
        Placeholder::RequiredFeatures => descriptor.required_features.is_none(),
        Placeholder::Code => descriptor.code_fragment.is_none(),
        _ => false,
    })
}

/// Template directives first, then the caller's system and user includes,
/// each rendered and kept once in first-seen order.
pub(crate) fn merge_includes(
    template: &[Include],
    system: &[String],
    user: &[String],
) -> Vec<String> {
    template
        .iter()
        .map(|include| include.render())
        .chain(system.iter().map(|path| render_system_include(path)))
        .chain(user.iter().map(|path| render_user_include(path)))
        .unique()
        .collect()
}

fn enum_placeholder(scope: ParameterScope) -> Placeholder {
    match scope {
        ParameterScope::Common => Placeholder::CommonParametersEnum,
        ParameterScope::Atom => Placeholder::AtomParametersEnum,
        ParameterScope::Bond => Placeholder::BondParametersEnum,
    }
}

fn list_placeholder(scope: ParameterScope) -> Placeholder {
    match scope {
        ParameterScope::Common => Placeholder::CommonParameters,
        ParameterScope::Atom => Placeholder::AtomParameters,
        ParameterScope::Bond => Placeholder::BondParameters,
    }
}

/// Immutable placeholder-to-text mapping shared by both skeletons of one expansion.
#[derive(Debug)]
pub(crate) struct Bindings {
    values: BTreeMap<Placeholder, String>,
}

impl Bindings {
    pub(crate) fn new(
        descriptor: &MethodDescriptor,
        family: &TemplateFamily,
        schema: &ParameterSchema,
        features: Option<&FeatureList>,
    ) -> Self {
        let mut values = BTreeMap::new();

        if !descriptor.name.is_empty() {
            values.insert(Placeholder::MethodName, descriptor.name.clone());
        }
        if !descriptor.method_type.is_empty() {
            values.insert(Placeholder::MethodType, descriptor.method_type.clone());
        }

        for parameters in schema.iter() {
            values.insert(enum_placeholder(parameters.scope()), parameters.enum_block());
            values.insert(
                list_placeholder(parameters.scope()),
                parameters.initializer_list(),
            );
        }
        values.insert(Placeholder::ParameterChecks, schema.index_checks());

        values.insert(
            Placeholder::Prototypes,
            descriptor.helper_prototypes.join("\n    "),
        );
        if let Some(features) = features {
            values.insert(Placeholder::RequiredFeatures, features.render());
        }

        let includes = merge_includes(
            family.includes,
            &descriptor.system_includes,
            &descriptor.user_includes,
        );
        debug!(count = includes.len(), "Merged include directives.");
        values.insert(Placeholder::Includes, includes.join("\n"));

        values.insert(Placeholder::Definitions, descriptor.definitions.clone());
        values.insert(
            Placeholder::VariableDefinitions,
            descriptor
                .variables
                .iter()
                .map(|variable| format!("    {}", variable.render()))
                .join("\n"),
        );
        if let Some(code) = &descriptor.code_fragment {
            values.insert(Placeholder::Code, code.clone());
        }

        Self { values }
    }

    pub(crate) fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }
}
