use crate::domain::guard::GuardSet;
use serde::{Deserialize, Serialize};

/// One covered endpoint in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub endpoint: String,
    #[serde(rename = "circuitBreakers")]
    pub circuit_breakers: Vec<String>,
}

/// Coverage report: serialized as a bare JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    pub records: Vec<EndpointRecord>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Joins endpoint routes with their resolved guard sets, in discovery order.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    records: Vec<EndpointRecord>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an endpoint; uncovered endpoints are dropped. Returns whether a record was added.
    pub fn push(&mut self, endpoint: impl Into<String>, guards: &GuardSet) -> bool {
        if guards.is_empty() {
            return false;
        }
        self.records.push(EndpointRecord {
            endpoint: endpoint.into(),
            circuit_breakers: guards.iter().cloned().collect(),
        });
        true
    }

    pub fn build(self) -> Report {
        Report {
            records: self.records,
        }
    }
}
