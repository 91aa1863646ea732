//! Mock resolvers for integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use breaker_footprint::adapters::resolver::signature::SignatureResolver;
use breaker_footprint::domain::model::{BodyExpr, MethodId, SourceModel};
use breaker_footprint::domain::ports::{CallResolver, ResolveError};

/// Resolver that counts how often it is asked, delegating to a `SignatureResolver`.
pub struct CountingResolver {
    inner: SignatureResolver,
    calls: Cell<usize>,
}

impl CountingResolver {
    pub fn new(model: &SourceModel) -> Self {
        Self {
            inner: SignatureResolver::new(model),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CallResolver for CountingResolver {
    fn resolve(&self, expr: &BodyExpr) -> Result<MethodId, ResolveError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.resolve(expr)
    }
}

/// Resolver backed by an explicit expression-text → method map.
pub struct MapResolver {
    targets: HashMap<String, MethodId>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    pub fn with(mut self, text: impl Into<String>, target: MethodId) -> Self {
        self.targets.insert(text.into(), target);
        self
    }
}

impl Default for MapResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CallResolver for MapResolver {
    fn resolve(&self, expr: &BodyExpr) -> Result<MethodId, ResolveError> {
        self.targets
            .get(&expr.text)
            .copied()
            .ok_or_else(|| ResolveError::NotFound {
                target: expr.text.clone(),
            })
    }
}

/// Resolver that fails every expression.
pub struct NeverResolver;

impl CallResolver for NeverResolver {
    fn resolve(&self, expr: &BodyExpr) -> Result<MethodId, ResolveError> {
        Err(ResolveError::NoTarget {
            text: expr.text.clone(),
        })
    }
}
