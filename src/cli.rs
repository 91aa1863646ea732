use crate::adapters::fs::reader::JsonModelSource;
use crate::adapters::fs::writer::JsonReportWriter;
use crate::adapters::resolver::signature::SignatureResolver;
use crate::app::dto::AnalysisSummary;
use crate::app::engine::CoverageEngine;
use crate::config::AnalysisConfig;
use crate::domain::call_graph::CallGraph;
use crate::domain::model::SourceModel;
use crate::domain::ports::{ReportSink, SourceModelLoader};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use petgraph::visit::EdgeRef;
use std::path::{Path, PathBuf};

/// bftool: circuit breaker coverage of request handlers
#[derive(Parser, Debug)]
#[command(name = "bftool")]
#[command(version)]
#[command(about = "Map every HTTP endpoint to the circuit breakers that protect it", long_about = None)]
pub struct Cli {
    /// Source model JSON exported by the front-end
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Analysis config (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve coverage for all endpoints and write the report
    Analyze {
        /// Report path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List methods with declared circuit breakers
    Roots,
    /// List endpoints with their resolved circuit breakers
    Endpoints {
        /// Include endpoints no circuit breaker reaches
        #[arg(long)]
        all: bool,
    },
    /// Dump the resolved call graph as JSON
    Graph,
}

impl Cli {
    pub fn load_config(&self) -> Result<AnalysisConfig> {
        match &self.config {
            Some(path) => AnalysisConfig::load(path),
            None => Ok(AnalysisConfig::default()),
        }
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let mut config = cli.load_config()?;
    let model = JsonModelSource::new(&cli.model).load()?;
    match &cli.command {
        Command::Analyze { output } => {
            if let Some(output) = output {
                config.output = output.clone();
            }
            analyze(&model, &config)
        }
        Command::Roots => display_roots(&model, &config),
        Command::Endpoints { all } => display_endpoints(&model, &config, *all),
        Command::Graph => debug_call_graph(&model),
    }
}

/// Run the analysis and write the report to `config.output`.
pub fn analyze(model: &SourceModel, config: &AnalysisConfig) -> Result<()> {
    let engine = CoverageEngine::new(config)?;
    let resolver = SignatureResolver::new(model);
    let outcome = engine.analyze(model, &resolver)?;

    JsonReportWriter::new(&config.output).write(&outcome.report)?;

    print_summary(&outcome.summary, &config.output);
    Ok(())
}

fn print_summary(summary: &AnalysisSummary, output: &Path) {
    println!("Analysis Summary:");
    println!("  Compilation units: {}", summary.units);
    println!("  Methods:           {}", summary.methods);
    println!("  Guard roots:       {}", summary.roots);
    println!(
        "  Endpoints:         {} ({} covered)",
        summary.endpoints, summary.covered_endpoints
    );
    println!("  Unresolved calls:  {}", summary.stats.unresolved_calls);
    println!("  Cycle back-edges:  {}", summary.stats.cycle_edges);
    if !summary.diagnostics.is_empty() {
        println!("\n  Diagnostics:");
        for (kind, count) in &summary.diagnostics {
            println!("    {:<22} {}", kind.to_string(), count);
        }
    }
    println!("\nReport written to {}", output.display());
}

pub fn display_roots(model: &SourceModel, config: &AnalysisConfig) -> Result<()> {
    let engine = CoverageEngine::new(config)?;
    let roots = engine.roots(model);
    println!("Guard roots: {}", roots.items.len());
    println!("{}", "=".repeat(80));
    for item in &roots.items {
        println!("  {} -> [{}]", item.method, item.circuit_breakers.join(", "));
    }
    Ok(())
}

pub fn display_endpoints(model: &SourceModel, config: &AnalysisConfig, all: bool) -> Result<()> {
    let engine = CoverageEngine::new(config)?;
    let resolver = SignatureResolver::new(model);
    let outcome = engine.analyze(model, &resolver)?;

    println!(
        "Endpoints: {} ({} covered)",
        outcome.endpoints.len(),
        outcome.report.len()
    );
    println!("{}", "=".repeat(80));
    for (i, item) in outcome
        .endpoints
        .iter()
        .filter(|e| all || !e.circuit_breakers.is_empty())
        .enumerate()
    {
        println!("{}. {}", i + 1, item.endpoint);
        println!("   handler: {}", item.handler);
        if item.circuit_breakers.is_empty() {
            println!("   circuit breakers: (none)");
        } else {
            println!("   circuit breakers: {}", item.circuit_breakers.join(", "));
        }
    }
    Ok(())
}

/// Build the resolved call graph and print it as JSON.
pub fn debug_call_graph(model: &SourceModel) -> Result<()> {
    let resolver = SignatureResolver::new(model);
    let graph = CallGraph::build(model, &resolver);

    let mut nodes = Vec::new();
    for idx in graph.graph.node_indices() {
        let method = graph.graph[idx];
        let Some(decl) = model.method(method) else {
            continue;
        };
        let edges_out: Vec<_> = graph
            .graph
            .edges(idx)
            .map(|e| {
                serde_json::json!({
                    "target": model.label(graph.graph[e.target()]),
                    "kind": format!("{:?}", e.weight()),
                })
            })
            .collect();
        nodes.push(serde_json::json!({
            "id": method.0,
            "method": model.label(method),
            "signature": decl.signature,
            "visibility": format!("{:?}", decl.visibility),
            "edges": edges_out,
        }));
    }

    let output = serde_json::json!({
        "node_count": graph.graph.node_count(),
        "edge_count": graph.graph.edge_count(),
        "unresolved": graph.unresolved,
        "nodes": nodes,
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize call graph")?
    );
    Ok(())
}
