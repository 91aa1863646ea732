use crate::domain::model::{BodyExpr, MethodId, SourceModel};
use crate::domain::report::Report;
use anyhow::Result;
use thiserror::Error;

/// Source model port (implemented by Infrastructure)
pub trait SourceModelLoader {
    fn load(&self) -> Result<SourceModel>;
}

/// Report output port
pub trait ReportSink {
    fn write(&self, report: &Report) -> Result<()>;
}

/// Why a body expression could not be mapped to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no target named for `{text}`")]
    NoTarget { text: String },
    #[error("no declaration for `{target}`")]
    NotFound { target: String },
    #[error("`{target}` matches {candidates} declarations")]
    Ambiguous { target: String, candidates: usize },
}

/// Symbol resolution port: maps a call or method reference to the declaration it invokes.
///
/// Best effort. Callers must treat every error as "contributes nothing".
pub trait CallResolver {
    fn resolve(&self, expr: &BodyExpr) -> Result<MethodId, ResolveError>;
}
