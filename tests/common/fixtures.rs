//! Source model fixtures for integration tests.
#![allow(dead_code)]

use breaker_footprint::domain::model::{
    Annotation, AnnotationArgs, BodyExpr, CompilationUnit, ExprKind, MemberValue, MethodDecl,
    MethodId, SourceModel, TypeDecl, Visibility,
};

pub fn marker(name: &str) -> Annotation {
    Annotation {
        name: name.to_string(),
        args: AnnotationArgs::Marker,
    }
}

pub fn single(name: &str, value: &str) -> Annotation {
    Annotation {
        name: name.to_string(),
        args: AnnotationArgs::Single(value.to_string()),
    }
}

pub fn named(name: &str, pairs: &[(&str, &str)]) -> Annotation {
    Annotation {
        name: name.to_string(),
        args: AnnotationArgs::Normal(
            pairs
                .iter()
                .map(|&(n, v)| MemberValue {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        ),
    }
}

/// `@CircuitBreaker(name = "<name>")`
pub fn breaker(name: &str) -> Annotation {
    named("CircuitBreaker", &[("name", &format!("\"{name}\""))])
}

/// `@GetMapping("<path>")`
pub fn get_mapping(path: &str) -> Annotation {
    single("GetMapping", &format!("\"{path}\""))
}

/// `@RequestMapping("<prefix>")`
pub fn request_mapping(prefix: &str) -> Annotation {
    single("RequestMapping", &format!("\"{prefix}\""))
}

pub fn call(target: &str) -> BodyExpr {
    BodyExpr {
        kind: ExprKind::Call,
        text: format!("{target}(..)"),
        target: Some(target.to_string()),
    }
}

pub fn method_ref(target: &str) -> BodyExpr {
    BodyExpr {
        kind: ExprKind::MethodReference,
        text: format!("::{target}"),
        target: Some(target.to_string()),
    }
}

/// Expression the front-end could not attribute to any declaration.
pub fn opaque_call(text: &str) -> BodyExpr {
    BodyExpr {
        kind: ExprKind::Call,
        text: text.to_string(),
        target: None,
    }
}

/// Method builder; signature is `<Type>#<name>()` once added to a type.
pub struct MethodSpec {
    name: String,
    visibility: Visibility,
    annotations: Vec<Annotation>,
    body: Vec<BodyExpr>,
}

pub fn method(name: &str) -> MethodSpec {
    MethodSpec {
        name: name.to_string(),
        visibility: Visibility::Public,
        annotations: vec![],
        body: vec![],
    }
}

impl MethodSpec {
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn calls(mut self, target: &str) -> Self {
        self.body.push(call(target));
        self
    }

    pub fn references(mut self, target: &str) -> Self {
        self.body.push(method_ref(target));
        self
    }

    pub fn expr(mut self, expr: BodyExpr) -> Self {
        self.body.push(expr);
        self
    }
}

pub fn type_decl(name: &str, annotations: Vec<Annotation>, methods: Vec<MethodSpec>) -> TypeDecl {
    TypeDecl {
        name: name.to_string(),
        annotations,
        methods: methods
            .into_iter()
            .map(|m| MethodDecl {
                id: MethodId(0),
                signature: format!("{name}#{}()", m.name),
                name: m.name,
                visibility: m.visibility,
                annotations: m.annotations,
                body: m.body,
            })
            .collect(),
    }
}

pub fn model(types: Vec<TypeDecl>) -> SourceModel {
    let units = types
        .into_iter()
        .map(|ty| CompilationUnit {
            path: format!("src/main/java/{}.java", ty.name.replace('.', "/")),
            primary_type: Some(ty),
        })
        .collect();
    SourceModel::new("/project", units)
}

pub fn id_of(model: &SourceModel, signature: &str) -> MethodId {
    model
        .methods()
        .find(|m| m.signature == signature)
        .map(|m| m.id)
        .unwrap_or_else(|| panic!("no method with signature {signature}"))
}

/// Orders example: controller -> service -> guarded client.
///
/// - `GET /api/orders` reaches `orders-cb` through the service.
/// - `GET /api/health` reaches nothing.
/// - `GET /api/stock` is itself guarded by `stock-cb`.
pub fn orders_model() -> SourceModel {
    model(vec![
        type_decl(
            "OrderController",
            vec![marker("RestController"), request_mapping("/api")],
            vec![
                method("list")
                    .annotated(get_mapping("/orders"))
                    .calls("OrderService#findAll()"),
                method("health").annotated(get_mapping("/health")),
                method("stock")
                    .annotated(get_mapping("/stock"))
                    .annotated(breaker("stock-cb"))
                    .calls("OrderService#findAll()"),
            ],
        ),
        type_decl(
            "OrderService",
            vec![marker("Service")],
            vec![
                method("findAll")
                    .calls("OrderClient#fetch()")
                    .expr(opaque_call("repository.findAll()")),
            ],
        ),
        type_decl(
            "OrderClient",
            vec![marker("Component")],
            vec![method("fetch").annotated(breaker("orders-cb"))],
        ),
    ])
}
