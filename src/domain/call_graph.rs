use crate::domain::model::{ExprKind, MethodId, SourceModel};
use crate::domain::ports::CallResolver;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Edge kind of the resolved call graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    Call,
    MethodReference,
}

impl From<ExprKind> for EdgeKind {
    fn from(kind: ExprKind) -> Self {
        match kind {
            ExprKind::Call => EdgeKind::Call,
            ExprKind::MethodReference => EdgeKind::MethodReference,
        }
    }
}

/// Resolved call graph over the whole model. Used for inspection only; coverage is computed
/// lazily by the solver.
pub struct CallGraph {
    pub graph: DiGraph<MethodId, EdgeKind>,
    pub method_to_node: HashMap<MethodId, NodeIndex>,
    /// Expressions the resolver could not map.
    pub unresolved: usize,
}

impl CallGraph {
    pub fn build(model: &SourceModel, resolver: &dyn CallResolver) -> Self {
        let mut graph = DiGraph::new();
        let mut method_to_node = HashMap::new();
        for method in model.methods() {
            method_to_node.insert(method.id, graph.add_node(method.id));
        }

        let mut unresolved = 0;
        for method in model.methods() {
            let Some(&source) = method_to_node.get(&method.id) else {
                continue;
            };
            for expr in &method.body {
                match resolver
                    .resolve(expr)
                    .ok()
                    .and_then(|target| method_to_node.get(&target))
                {
                    Some(&target) => {
                        graph.add_edge(source, target, EdgeKind::from(expr.kind));
                    }
                    None => unresolved += 1,
                }
            }
        }

        Self {
            graph,
            method_to_node,
            unresolved,
        }
    }

    pub fn node_by_method(&self, method: MethodId) -> Option<NodeIndex> {
        self.method_to_node.get(&method).copied()
    }

    pub fn callees(&self, method: MethodId) -> impl Iterator<Item = (MethodId, EdgeKind)> + '_ {
        self.node_by_method(method).into_iter().flat_map(move |idx| {
            self.graph
                .edges(idx)
                .map(|e| (self.graph[e.target()], *e.weight()))
        })
    }
}
