//! Property unification.
//!
//! [`PropertyUnifier`] merges the parameters of the construction route with the
//! collected fields, getters and builder setters into one canonical
//! [`Properties`] list. The steps are order-sensitive:
//!
//! 1. Decide once whether every getter follows an accessor naming convention; if
//!    so, all getter names are stripped, otherwise none is.
//! 2. Drop builder setters named like a constructor or factory parameter.
//! 3. Drop getters of fields marked as not persisted.
//! 4. Drop fields that are private, not persisted, or have a same-named getter.
//! 5. Merge the annotations of every member sharing a logical name, as reported
//!    by [`TypeModel::annotations_of`] and [`TypeModel::param_annotations_of`]; the same
//!    annotation instance occurring twice is reported as `DuplicateAnnotation`.
//! 6. Assemble params, then unrepresented fields, then unrepresented getters.

use std::collections::HashSet;

use crate::{
    analysis::{
        collector::Collected,
        config::AnalysisConfig,
        diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
        property::{Properties, Property},
        route::ConstructionRoute,
    },
    model::{AnnotationList, Element, MethodRc, TypeModel},
    Result,
};

/// Merges parameters, fields, getters and setters into [`Properties`].
pub struct PropertyUnifier<'a> {
    model: &'a dyn TypeModel,
    config: &'a AnalysisConfig,
}

impl<'a> PropertyUnifier<'a> {
    /// Creates a unifier over a model.
    pub fn new(model: &'a dyn TypeModel, config: &'a AnalysisConfig) -> Self {
        Self { model, config }
    }

    /// Unifies the members collected for `route`.
    ///
    /// ## Arguments
    /// * 'route'     - The resolved construction route; its element supplies the parameters
    /// * 'collected' - Fields, getters and setters gathered for the route
    ///
    /// # Errors
    /// Returns [`crate::Error::Analysis`] with one `DuplicateAnnotation` entry per
    /// offending annotation (only the first in fail-fast mode).
    pub fn unify(&self, route: &ConstructionRoute, collected: Collected) -> Result<Properties> {
        let element = route.element();
        let mut constructor_params: Vec<Property> = (0..element.params.len())
            .map(|index| self.declared(Property::constructor_param(element.clone(), index)))
            .collect();

        // 1
        let all_getters: Vec<Property> = collected
            .getters
            .iter()
            .cloned()
            .zip(self.getter_names(&collected.getters))
            .map(|(method, name)| self.declared(Property::getter(method, name)))
            .collect();
        let all_fields: Vec<Property> = collected
            .fields
            .iter()
            .cloned()
            .map(|field| self.declared(Property::field(field)))
            .collect();

        // 2
        let param_names: HashSet<&str> = constructor_params.iter().map(Property::name).collect();
        let mut builder_params: Vec<Property> = Vec::new();
        for setter in &collected.setters {
            if param_names.contains(setter.name.as_str()) {
                log::debug!("setter {} duplicates a constructor parameter", setter.name);
                continue;
            }
            builder_params.push(self.declared(Property::builder_param(setter.clone())));
        }

        // 3
        let not_persisted: HashSet<&str> = collected
            .fields
            .iter()
            .filter(|f| f.is_transient())
            .map(|f| f.name.as_str())
            .collect();
        let mut getters: Vec<Property> = all_getters
            .iter()
            .filter(|g| !not_persisted.contains(g.name()))
            .cloned()
            .collect();

        // 4
        let getter_names: HashSet<&str> = getters.iter().map(Property::name).collect();
        let mut fields: Vec<Property> = collected
            .fields
            .iter()
            .filter(|f| {
                !f.is_private() && !f.is_transient() && !getter_names.contains(f.name.as_str())
            })
            .cloned()
            .map(|field| self.declared(Property::field(field)))
            .collect();

        // 5
        let diagnostics = Diagnostics::with_mode(self.config.report_mode);
        let mut names: Vec<String> = Vec::new();
        for property in constructor_params
            .iter()
            .chain(&builder_params)
            .chain(&all_fields)
            .chain(&all_getters)
        {
            if !names.iter().any(|n| n == property.name()) {
                names.push(property.name().to_string());
            }
        }

        for name in &names {
            let sources = constructor_params
                .iter()
                .chain(&builder_params)
                .chain(&all_fields)
                .chain(&all_getters)
                .filter(|p| p.name() == name);

            let mut merged = AnnotationList::new();
            let mut seen = HashSet::new();
            for source in sources {
                for annotation in source.annotations() {
                    if !seen.insert(annotation.token) {
                        diagnostics.report(
                            Diagnostic::new(
                                DiagnosticKind::DuplicateAnnotation,
                                format!("{annotation} appears more than once on property '{name}'"),
                            )
                            .with_element(source.element()),
                        )?;
                        continue;
                    }
                    merged.push(annotation.clone());
                }
            }

            for property in constructor_params
                .iter_mut()
                .chain(builder_params.iter_mut())
                .chain(fields.iter_mut())
                .chain(getters.iter_mut())
                .filter(|p| p.name() == name)
            {
                property.set_annotations(merged.clone());
            }
        }
        diagnostics.finish()?;

        // 6
        let mut all: Vec<Property> = constructor_params
            .iter()
            .chain(&builder_params)
            .cloned()
            .collect();
        let mut represented: HashSet<String> = all.iter().map(|p| p.name().to_string()).collect();
        for field in &fields {
            if represented.insert(field.name().to_string()) {
                all.push(field.clone());
            }
        }
        for getter in &getters {
            if represented.insert(getter.name().to_string()) {
                all.push(getter.clone());
            }
        }

        Ok(Properties {
            all,
            constructor_params,
            builder_params,
            fields,
            getters,
        })
    }

    /// `property` carrying the annotations the model reports for its own declaration
    fn declared(&self, mut property: Property) -> Property {
        let own = match &property {
            Property::Field { field, .. } => {
                self.model.annotations_of(&Element::Field(field.clone()))
            }
            Property::Getter { method, .. } => {
                self.model.annotations_of(&Element::Method(method.clone()))
            }
            Property::ConstructorParam { element, index, .. } => {
                self.model.param_annotations_of(element, *index)
            }
            Property::BuilderParam { setter, .. } => self.model.param_annotations_of(setter, 0),
        };
        property.set_annotations(own);
        property
    }

    /// Logical names of the getters: all stripped if every getter follows a
    /// convention, all as declared otherwise.
    fn getter_names(&self, getters: &[MethodRc]) -> Vec<String> {
        let stripped: Option<Vec<String>> = getters
            .iter()
            .map(|getter| {
                self.config.bean_conventions.iter().find_map(|convention| {
                    convention.strip(&getter.name, &getter.returns, self.config.min_stripped_len)
                })
            })
            .collect();

        match stripped {
            Some(names) => names,
            None => {
                log::debug!("accessors do not follow a naming convention, keeping names");
                getters.iter().map(|g| g.name.clone()).collect()
            }
        }
    }
}
