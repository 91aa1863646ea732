//! Guard roots: methods whose circuit breaker coverage is declared by annotation rather than
//! discovered through the call graph.
//!
//! Policy per type:
//! 1. A named class-level guard covers every public method of the type.
//! 2. Otherwise each method carrying a named guard is covered by that guard alone.
//! 3. A guard without a usable name contributes nothing (recorded as a diagnostic).

use crate::config::AnnotationMatcher;
use crate::domain::diagnostics::{DiagnosticKind, Diagnostics};
use crate::domain::model::{Annotation, AnnotationArgs, MethodId, SourceModel, TypeDecl, unquote};
use std::collections::{BTreeSet, HashMap};

/// Circuit breaker name.
pub type GuardTag = String;

/// Set of guard names; ordered so reports are deterministic.
pub type GuardSet = BTreeSet<GuardTag>;

/// Guard declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeGuard<'a> {
    /// Named guard on the type: wraps all public operations.
    ClassLevel(&'a str),
    /// No usable class-level guard; methods are inspected one by one.
    PerMethod,
}

/// Guard declared on a single method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodGuard<'a> {
    Named(&'a str),
    /// Annotation present but its name is missing or empty.
    Unnamed,
    Absent,
}

/// Classify an annotation list. The first guard annotation wins.
pub fn method_guard<'a>(annotations: &'a [Annotation], rules: &AnnotationMatcher) -> MethodGuard<'a> {
    let Some(annotation) = annotations.iter().find(|a| rules.is_guard(&a.name)) else {
        return MethodGuard::Absent;
    };
    let name = match &annotation.args {
        AnnotationArgs::Normal(_) => annotation
            .attribute(&rules.guard_name_attribute)
            .map(unquote),
        AnnotationArgs::Marker | AnnotationArgs::Single(_) => None,
    };
    match name {
        Some(name) if !name.is_empty() => MethodGuard::Named(name),
        _ => MethodGuard::Unnamed,
    }
}

pub fn type_guard<'a>(ty: &'a TypeDecl, rules: &AnnotationMatcher) -> TypeGuard<'a> {
    match method_guard(&ty.annotations, rules) {
        MethodGuard::Named(name) => TypeGuard::ClassLevel(name),
        MethodGuard::Unnamed | MethodGuard::Absent => TypeGuard::PerMethod,
    }
}

/// Declared guard tags per method. Built once per run, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct RootAssignment {
    roots: HashMap<MethodId, GuardSet>,
}

impl RootAssignment {
    /// Scan every primary type of the model.
    pub fn scan(model: &SourceModel, rules: &AnnotationMatcher, diags: &mut Diagnostics) -> Self {
        let mut assignment = Self::default();
        for ty in model.types() {
            assignment.roots.extend(scan_roots(ty, rules, diags));
        }
        assignment
    }

    pub fn get(&self, method: MethodId) -> Option<&GuardSet> {
        self.roots.get(&method)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MethodId, &GuardSet)> {
        self.roots.iter()
    }
}

impl FromIterator<(MethodId, GuardSet)> for RootAssignment {
    fn from_iter<I: IntoIterator<Item = (MethodId, GuardSet)>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().filter(|(_, tags)| !tags.is_empty()).collect(),
        }
    }
}

/// Root tags declared on one type. Only methods with a non-empty set appear.
pub fn scan_roots(
    ty: &TypeDecl,
    rules: &AnnotationMatcher,
    diags: &mut Diagnostics,
) -> HashMap<MethodId, GuardSet> {
    let mut roots = HashMap::new();
    match type_guard(ty, rules) {
        TypeGuard::ClassLevel(name) => {
            for method in ty.methods.iter().filter(|m| m.is_public()) {
                roots.insert(method.id, GuardSet::from([name.to_string()]));
            }
        }
        TypeGuard::PerMethod => {
            if matches!(method_guard(&ty.annotations, rules), MethodGuard::Unnamed) {
                diags.push(
                    DiagnosticKind::UnnamedGuard,
                    ty.name.clone(),
                    "class-level guard has no name; falling back to method-level guards",
                );
            }
            for method in &ty.methods {
                match method_guard(&method.annotations, rules) {
                    MethodGuard::Named(name) => {
                        roots.insert(method.id, GuardSet::from([name.to_string()]));
                    }
                    MethodGuard::Unnamed => diags.push(
                        DiagnosticKind::UnnamedGuard,
                        format!("{}#{}", ty.name, method.name),
                        "guard has no name; method is not treated as a root",
                    ),
                    MethodGuard::Absent => {}
                }
            }
        }
    }
    roots
}
