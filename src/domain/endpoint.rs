use crate::config::AnnotationMatcher;
use crate::domain::diagnostics::{DiagnosticKind, Diagnostics};
use crate::domain::model::{Annotation, AnnotationArgs, MethodId, TypeDecl, is_string_literal, unquote};
use serde::Serialize;

/// A request handler and its full route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub method: MethodId,
    pub path: String,
}

/// Route text carried by a mapping annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteValue<'a> {
    /// `@GetMapping` without arguments.
    Empty,
    Text(&'a str),
    /// Named form without any of the configured route attributes.
    Missing,
}

pub fn route_value<'a>(annotation: &'a Annotation, rules: &AnnotationMatcher) -> RouteValue<'a> {
    match &annotation.args {
        AnnotationArgs::Marker => RouteValue::Empty,
        AnnotationArgs::Single(value) => RouteValue::Text(value),
        AnnotationArgs::Normal(_) => rules
            .route_attributes
            .iter()
            .find_map(|attr| annotation.attribute(attr))
            .map_or(RouteValue::Missing, RouteValue::Text),
    }
}

fn route_text(value: &str, location: &str) -> String {
    if !is_string_literal(value) {
        tracing::debug!(location, value, "non-literal route used verbatim");
    }
    unquote(value).to_string()
}

fn mapping<'a>(annotations: &'a [Annotation], rules: &AnnotationMatcher) -> Option<&'a Annotation> {
    annotations.iter().find(|a| rules.is_mapping(&a.name))
}

pub fn is_controller(ty: &TypeDecl, rules: &AnnotationMatcher) -> bool {
    ty.annotations.iter().any(|a| rules.is_controller(&a.name))
}

/// Route-mapped handlers of a controller type, with the type-level prefix prepended verbatim.
/// Returns nothing for non-controller types.
pub fn extract_endpoints(
    ty: &TypeDecl,
    rules: &AnnotationMatcher,
    diags: &mut Diagnostics,
) -> Vec<Endpoint> {
    if !is_controller(ty, rules) {
        return Vec::new();
    }

    let prefix = match mapping(&ty.annotations, rules).map(|a| route_value(a, rules)) {
        Some(RouteValue::Text(value)) => route_text(value, &ty.name),
        Some(RouteValue::Missing) => {
            diags.push(
                DiagnosticKind::UnresolvableRoute,
                ty.name.clone(),
                "type-level mapping has no route attribute; no prefix applied",
            );
            String::new()
        }
        Some(RouteValue::Empty) | None => String::new(),
    };

    let mut endpoints = Vec::new();
    for method in &ty.methods {
        let Some(annotation) = mapping(&method.annotations, rules) else {
            continue;
        };
        let location = format!("{}#{}", ty.name, method.name);
        let route = match route_value(annotation, rules) {
            RouteValue::Text(value) => route_text(value, &location),
            RouteValue::Empty => String::new(),
            RouteValue::Missing => {
                diags.push(
                    DiagnosticKind::UnresolvableRoute,
                    location,
                    format!("@{} has no route attribute; handler skipped", annotation.name),
                );
                continue;
            }
        };
        endpoints.push(Endpoint {
            method: method.id,
            path: format!("{prefix}{route}"),
        });
    }
    endpoints
}
