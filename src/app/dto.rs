use crate::domain::diagnostics::{DiagnosticKind, Diagnostics};
use crate::domain::report::Report;
use crate::domain::solver::ResolutionStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Coverage of one handler, whether or not any guard reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCoverage {
    pub endpoint: String,
    /// `Type#method` of the handler.
    pub handler: String,
    pub circuit_breakers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootItem {
    pub method: String,
    pub circuit_breakers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RootsResponse {
    pub items: Vec<RootItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub units: usize,
    pub methods: usize,
    pub roots: usize,
    pub endpoints: usize,
    pub covered_endpoints: usize,
    pub stats: ResolutionStats,
    pub diagnostics: BTreeMap<DiagnosticKind, usize>,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// All handlers in discovery order, covered or not.
    pub endpoints: Vec<EndpointCoverage>,
    /// Covered handlers only.
    pub report: Report,
    pub diagnostics: Diagnostics,
    pub summary: AnalysisSummary,
}
