use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Non-fatal anomaly found while analysing one unit, type or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Compilation unit without a primary type; skipped.
    MissingPrimaryType,
    /// Guard annotation without a usable name attribute; contributes no root tag.
    UnnamedGuard,
    /// Route-mapping annotation whose route could not be read; handler or prefix skipped.
    UnresolvableRoute,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::MissingPrimaryType => "missing primary type",
            DiagnosticKind::UnnamedGuard => "unnamed guard",
            DiagnosticKind::UnresolvableRoute => "unresolvable route",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Unit path or `Type#method`.
    pub location: String,
    pub message: String,
}

/// Collects diagnostics for one run; summarised at the end instead of aborting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            location: location.into(),
            message: message.into(),
        };
        tracing::warn!(
            kind = %diagnostic.kind,
            location = %diagnostic.location,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.entries {
            *counts.entry(d.kind).or_insert(0) += 1;
        }
        counts
    }
}
