use crate::domain::model::{BodyExpr, MethodId, SourceModel};
use crate::domain::ports::{CallResolver, ResolveError};
use std::collections::HashMap;

/// Resolves body expressions by the signature the front-end attached to them.
///
/// A signature naming exactly one declaration in the model resolves; one naming none (library
/// code) or several (duplicate declarations) does not.
pub struct SignatureResolver {
    by_signature: HashMap<String, Vec<MethodId>>,
}

impl SignatureResolver {
    pub fn new(model: &SourceModel) -> Self {
        let mut by_signature: HashMap<String, Vec<MethodId>> = HashMap::new();
        for method in model.methods() {
            by_signature
                .entry(method.signature.clone())
                .or_default()
                .push(method.id);
        }
        Self { by_signature }
    }
}

impl CallResolver for SignatureResolver {
    fn resolve(&self, expr: &BodyExpr) -> Result<MethodId, ResolveError> {
        let target = expr.target.as_deref().ok_or_else(|| ResolveError::NoTarget {
            text: expr.text.clone(),
        })?;
        match self.by_signature.get(target).map(Vec::as_slice) {
            Some([id]) => Ok(*id),
            Some(candidates) if candidates.len() > 1 => Err(ResolveError::Ambiguous {
                target: target.to_string(),
                candidates: candidates.len(),
            }),
            _ => Err(ResolveError::NotFound {
                target: target.to_string(),
            }),
        }
    }
}
