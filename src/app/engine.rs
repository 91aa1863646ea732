use crate::app::dto::*;
use crate::config::{AnalysisConfig, AnnotationMatcher};
use crate::domain::diagnostics::{DiagnosticKind, Diagnostics};
use crate::domain::endpoint::extract_endpoints;
use crate::domain::guard::RootAssignment;
use crate::domain::model::SourceModel;
use crate::domain::ports::CallResolver;
use crate::domain::report::ReportBuilder;
use crate::domain::solver::{CoverageSolver, ResolutionCache};
use anyhow::{Result, bail};
use tracing::info;

/// Runs the coverage analysis: roots, then endpoints, then resolution, in one synchronous pass.
pub struct CoverageEngine {
    rules: AnnotationMatcher,
}

impl CoverageEngine {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            rules: config.rules.compile()?,
        })
    }

    pub fn analyze(
        &self,
        model: &SourceModel,
        resolver: &dyn CallResolver,
    ) -> Result<AnalysisOutcome> {
        if model.units.is_empty() {
            bail!("Source model contains no compilation units");
        }

        let mut diagnostics = Diagnostics::new();
        for unit in model.units.iter().filter(|u| u.primary_type.is_none()) {
            diagnostics.push(
                DiagnosticKind::MissingPrimaryType,
                unit.path.clone(),
                "compilation unit has no primary type; skipped",
            );
        }

        let roots = RootAssignment::scan(model, &self.rules, &mut diagnostics);
        info!(
            units = model.units.len(),
            methods = model.method_count(),
            roots = roots.len(),
            "scanned guard roots"
        );

        let mut cache = ResolutionCache::seeded(&roots);
        let solver = CoverageSolver::new(model, resolver);
        let mut builder = ReportBuilder::new();
        let mut endpoints = Vec::new();

        for ty in model.types() {
            for endpoint in extract_endpoints(ty, &self.rules, &mut diagnostics) {
                let guards = solver.resolve(endpoint.method, &mut cache);
                builder.push(endpoint.path.clone(), &guards);
                endpoints.push(EndpointCoverage {
                    endpoint: endpoint.path,
                    handler: model.label(endpoint.method),
                    circuit_breakers: guards.into_iter().collect(),
                });
            }
        }

        let report = builder.build();
        let stats = cache.stats();
        info!(
            endpoints = endpoints.len(),
            covered = report.len(),
            unresolved_calls = stats.unresolved_calls,
            diagnostics = diagnostics.len(),
            "resolved endpoint coverage"
        );

        let summary = AnalysisSummary {
            units: model.units.len(),
            methods: model.method_count(),
            roots: roots.len(),
            endpoints: endpoints.len(),
            covered_endpoints: report.len(),
            stats,
            diagnostics: diagnostics.counts(),
        };

        Ok(AnalysisOutcome {
            endpoints,
            report,
            diagnostics,
            summary,
        })
    }

    /// Declared roots, sorted by method label.
    pub fn roots(&self, model: &SourceModel) -> RootsResponse {
        let mut diagnostics = Diagnostics::new();
        let roots = RootAssignment::scan(model, &self.rules, &mut diagnostics);
        let mut items: Vec<RootItem> = roots
            .iter()
            .map(|(&method, tags)| RootItem {
                method: model.label(method),
                circuit_breakers: tags.iter().cloned().collect(),
            })
            .collect();
        items.sort_by(|a, b| a.method.cmp(&b.method));
        RootsResponse { items }
    }
}
