//! Source model: contract between a language front-end (parser + symbol solver) and the
//! circuit breaker coverage analysis.
//!
//! **Front-end mapping**: a `CompilationUnit` is one parsed source file, its `primary_type` is
//! the top-level type named after the file. Annotation arguments and call targets are carried as
//! printed source text, exactly as the parser renders them (string literals keep their quotes).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a method declaration in the model.
///
/// Assigned by [`SourceModel::new`] in declaration order. Two declarations with identical
/// signatures still receive distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Parsed project: every compilation unit the front-end produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceModel {
    /// Root the unit paths are relative to.
    #[serde(default)]
    pub project_root: String,
    pub units: Vec<CompilationUnit>,
    /// Position of each method: `method_index[id] = (unit, method)`.
    #[serde(skip)]
    method_index: Vec<(usize, usize)>,
}

impl SourceModel {
    /// Build a model and assign method identities.
    pub fn new(project_root: impl Into<String>, units: Vec<CompilationUnit>) -> Self {
        let mut model = Self {
            project_root: project_root.into(),
            units,
            method_index: Vec::new(),
        };
        model.reindex();
        model
    }

    /// (Re)assign method identities. Deserialized models must pass through here (or `new`)
    /// before analysis; ids found in the input are ignored.
    pub fn reindex(&mut self) {
        self.method_index.clear();
        for (unit_pos, unit) in self.units.iter_mut().enumerate() {
            let Some(ty) = unit.primary_type.as_mut() else {
                continue;
            };
            for (method_pos, method) in ty.methods.iter_mut().enumerate() {
                method.id = MethodId(self.method_index.len() as u32);
                self.method_index.push((unit_pos, method_pos));
            }
        }
    }

    pub fn method_count(&self) -> usize {
        self.method_index.len()
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodDecl> {
        let &(unit, method) = self.method_index.get(id.0 as usize)?;
        self.units[unit]
            .primary_type
            .as_ref()
            .and_then(|ty| ty.methods.get(method))
    }

    pub fn enclosing_type(&self, id: MethodId) -> Option<&TypeDecl> {
        let &(unit, _) = self.method_index.get(id.0 as usize)?;
        self.units[unit].primary_type.as_ref()
    }

    /// Primary types of all units, skipping units that have none.
    pub fn types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.units.iter().filter_map(|u| u.primary_type.as_ref())
    }

    /// All method declarations in identity order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.method_index.iter().filter_map(|&(unit, method)| {
            self.units[unit]
                .primary_type
                .as_ref()
                .and_then(|ty| ty.methods.get(method))
        })
    }

    /// Human-readable label for logs and reports: `Type#method`.
    pub fn label(&self, id: MethodId) -> String {
        match (self.enclosing_type(id), self.method(id)) {
            (Some(ty), Some(m)) => format!("{}#{}", ty.name, m.name),
            _ => id.to_string(),
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path relative to `project_root`.
    pub path: String,
    /// Top-level type of the file; absent for e.g. `package-info` units.
    #[serde(default)]
    pub primary_type: Option<TypeDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully qualified name.
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default = "unassigned")]
    pub id: MethodId,
    pub name: String,
    /// Resolution key, e.g. `com.acme.OrderService#place(java.lang.String)`.
    pub signature: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Call and method-reference expressions found anywhere in the body.
    #[serde(default)]
    pub body: Vec<BodyExpr>,
}

fn unassigned() -> MethodId {
    MethodId(u32::MAX)
}

impl MethodDecl {
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn calls(&self) -> impl Iterator<Item = &BodyExpr> {
        self.body.iter().filter(|e| e.kind == ExprKind::Call)
    }

    pub fn method_references(&self) -> impl Iterator<Item = &BodyExpr> {
        self.body.iter().filter(|e| e.kind == ExprKind::MethodReference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

/// An annotation as written on a type or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Name as written (simple or qualified).
    pub name: String,
    #[serde(default)]
    pub args: AnnotationArgs,
}

impl Annotation {
    /// Value of a named attribute (normal form only).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.args {
            AnnotationArgs::Normal(pairs) => pairs
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.value.as_str()),
            _ => None,
        }
    }
}

/// Argument form of an annotation: `@A`, `@A(v)` or `@A(k = v, ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationArgs {
    #[default]
    Marker,
    Single(String),
    Normal(Vec<MemberValue>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberValue {
    pub name: String,
    /// Printed source text of the value expression.
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Call,
    MethodReference,
}

/// A call or method-reference expression inside a method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyExpr {
    pub kind: ExprKind,
    /// Printed source text, for diagnostics.
    #[serde(default)]
    pub text: String,
    /// Signature of the invoked declaration as named by the front-end's symbol solver, when it
    /// could name one.
    #[serde(default)]
    pub target: Option<String>,
}

/// Strip surrounding double quotes from printed annotation text.
pub fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

/// True when printed text is a plain string literal.
pub fn is_string_literal(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str) -> MethodDecl {
        MethodDecl {
            id: unassigned(),
            name: name.to_string(),
            signature: format!("T#{name}()"),
            visibility: Visibility::Public,
            annotations: vec![],
            body: vec![],
        }
    }

    fn unit(path: &str, ty: Option<TypeDecl>) -> CompilationUnit {
        CompilationUnit {
            path: path.to_string(),
            primary_type: ty,
        }
    }

    #[test]
    fn new_assigns_dense_ids_across_units() {
        let model = SourceModel::new(
            "/p",
            vec![
                unit(
                    "A.java",
                    Some(TypeDecl {
                        name: "A".into(),
                        annotations: vec![],
                        methods: vec![method("a1"), method("a2")],
                    }),
                ),
                unit("package-info.java", None),
                unit(
                    "B.java",
                    Some(TypeDecl {
                        name: "B".into(),
                        annotations: vec![],
                        methods: vec![method("b1")],
                    }),
                ),
            ],
        );
        assert_eq!(model.method_count(), 3);
        assert_eq!(model.method(MethodId(2)).map(|m| m.name.as_str()), Some("b1"));
        assert_eq!(model.enclosing_type(MethodId(1)).map(|t| t.name.as_str()), Some("A"));
        assert_eq!(model.label(MethodId(2)), "B#b1");
        assert!(model.method(MethodId(3)).is_none());
    }

    #[test]
    fn identical_signatures_get_distinct_ids() {
        let model = SourceModel::new(
            "",
            vec![unit(
                "A.java",
                Some(TypeDecl {
                    name: "A".into(),
                    annotations: vec![],
                    methods: vec![method("dup"), method("dup")],
                }),
            )],
        );
        let ids: Vec<_> = model.methods().map(|m| m.id).collect();
        assert_eq!(ids, vec![MethodId(0), MethodId(1)]);
    }

    #[test]
    fn deserializes_annotation_forms() {
        let json = r#"[
            {"name": "RestController"},
            {"name": "RequestMapping", "args": {"single": "\"/api\""}},
            {"name": "CircuitBreaker", "args": {"normal": [{"name": "name", "value": "\"cb\""}]}}
        ]"#;
        let anns: Vec<Annotation> = serde_json::from_str(json).unwrap();
        assert_eq!(anns[0].args, AnnotationArgs::Marker);
        assert_eq!(anns[1].args, AnnotationArgs::Single("\"/api\"".into()));
        assert_eq!(anns[2].attribute("name"), Some("\"cb\""));
        assert_eq!(anns[2].attribute("path"), None);
    }

    #[test]
    fn unquote_strips_all_surrounding_quotes() {
        assert_eq!(unquote("\"/api\""), "/api");
        assert_eq!(unquote("Routes.BASE"), "Routes.BASE");
        assert!(is_string_literal("\"x\""));
        assert!(!is_string_literal("Routes.BASE"));
    }

    #[test]
    fn calls_and_references_are_partitioned() {
        let mut m = method("m");
        m.body = vec![
            BodyExpr {
                kind: ExprKind::MethodReference,
                text: "this::x".into(),
                target: None,
            },
            BodyExpr {
                kind: ExprKind::Call,
                text: "y()".into(),
                target: None,
            },
        ];
        assert_eq!(m.calls().count(), 1);
        assert_eq!(m.method_references().count(), 1);
    }
}
