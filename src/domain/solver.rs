use crate::domain::guard::{GuardSet, RootAssignment};
use crate::domain::model::{MethodId, SourceModel};
use crate::domain::ports::CallResolver;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Counters collected while resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Methods whose body was traversed.
    pub resolved_methods: usize,
    /// Call / reference expressions the resolver could not map.
    pub unresolved_calls: usize,
    /// Edges skipped because the target was already on the call path.
    pub cycle_edges: usize,
    pub cache_hits: usize,
}

/// Memoized guard sets per method, owned by one analysis run.
///
/// Seeded with the root assignment, so guard-annotated methods are terminal: their bodies are
/// never traversed. Once a key is present its value is final.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<MethodId, GuardSet>,
    stats: ResolutionStats,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(roots: &RootAssignment) -> Self {
        let mut cache = Self::new();
        for (&method, tags) in roots.iter() {
            cache.insert(method, tags.clone());
        }
        cache
    }

    pub fn get(&self, method: MethodId) -> Option<&GuardSet> {
        self.entries.get(&method)
    }

    pub fn contains(&self, method: MethodId) -> bool {
        self.entries.contains_key(&method)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    /// Insert unless already present; returns the stored value.
    fn insert(&mut self, method: MethodId, tags: GuardSet) -> &GuardSet {
        self.entries.entry(method).or_insert(tags)
    }
}

/// One method being traversed.
struct Frame {
    method: MethodId,
    callees: Vec<MethodId>,
    next: usize,
    acc: GuardSet,
}

/// Coverage solver: computes the guard names reachable from a method through its calls and
/// method references.
pub struct CoverageSolver<'a> {
    model: &'a SourceModel,
    resolver: &'a dyn CallResolver,
}

impl<'a> CoverageSolver<'a> {
    pub fn new(model: &'a SourceModel, resolver: &'a dyn CallResolver) -> Self {
        Self { model, resolver }
    }

    pub fn resolve(&self, method: MethodId, cache: &mut ResolutionCache) -> GuardSet {
        self.resolve_on_path(method, &[], cache)
    }

    /// Resolve `method` as if reached through `path`.
    ///
    /// Targets on the current call path are back-edges and contribute nothing. Every method
    /// whose traversal completes is cached, including those completed inside a cycle.
    pub fn resolve_on_path(
        &self,
        method: MethodId,
        path: &[MethodId],
        cache: &mut ResolutionCache,
    ) -> GuardSet {
        if let Some(tags) = cache.get(method) {
            let tags = tags.clone();
            cache.stats.cache_hits += 1;
            return tags;
        }

        // Methods currently on the stack, plus the caller-supplied prefix.
        let mut on_path: HashSet<MethodId> = path.iter().copied().collect();
        on_path.insert(method);
        let mut stack = vec![self.enter(method, cache)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&target) = frame.callees.get(frame.next) {
                frame.next += 1;
                if on_path.contains(&target) {
                    cache.stats.cycle_edges += 1;
                    continue;
                }
                if let Some(tags) = cache.get(target) {
                    frame.acc.extend(tags.iter().cloned());
                    cache.stats.cache_hits += 1;
                    continue;
                }
                on_path.insert(target);
                let child = self.enter(target, cache);
                stack.push(child);
                continue;
            }

            let Some(done) = stack.pop() else { break };
            on_path.remove(&done.method);
            cache.stats.resolved_methods += 1;
            let tags = cache.insert(done.method, done.acc).clone();
            match stack.last_mut() {
                Some(parent) => parent.acc.extend(tags),
                None => return tags,
            }
        }

        GuardSet::new()
    }

    /// Resolve the body of `method` to target identities: calls first, then method references.
    fn enter(&self, method: MethodId, cache: &mut ResolutionCache) -> Frame {
        let mut callees = Vec::new();
        if let Some(decl) = self.model.method(method) {
            for expr in decl.calls().chain(decl.method_references()) {
                match self.resolver.resolve(expr) {
                    Ok(target) => callees.push(target),
                    Err(err) => {
                        cache.stats.unresolved_calls += 1;
                        tracing::debug!(
                            method = %self.model.label(method),
                            expr = %expr.text,
                            "unresolved: {err}"
                        );
                    }
                }
            }
        }
        Frame {
            method,
            callees,
            next: 0,
            acc: GuardSet::new(),
        }
    }
}
