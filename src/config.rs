//! Analysis configuration.
//!
//! Loaded from an optional JSON file; every field has a default matching Spring + resilience4j
//! conventions, so an empty object `{}` is a valid config.
//!
//! ```json
//! {
//!   "rules": {
//!     "guard_annotation": "^(CircuitBreaker|Bulkhead)$",
//!     "route_attributes": ["path", "value"]
//!   },
//!   "output": "build/result.json"
//! }
//! ```

use anyhow::{Context as _, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "result.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub rules: AnnotationRules,
    /// Report path.
    pub output: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rules: AnnotationRules::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Which annotations mean what. Patterns are regular expressions matched against the annotation
/// name as written; unanchored patterns match anywhere in the name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationRules {
    pub guard_annotation: String,
    /// Attribute of the guard annotation holding the breaker name.
    pub guard_name_attribute: String,
    pub controller_annotation: String,
    pub mapping_annotation: String,
    /// Attributes holding the route in named form, tried in order.
    pub route_attributes: Vec<String>,
}

impl Default for AnnotationRules {
    fn default() -> Self {
        Self {
            guard_annotation: "^CircuitBreaker$".to_string(),
            guard_name_attribute: "name".to_string(),
            controller_annotation: "Controller".to_string(),
            mapping_annotation: "Mapping".to_string(),
            route_attributes: vec!["path".to_string()],
        }
    }
}

impl AnnotationRules {
    pub fn compile(&self) -> Result<AnnotationMatcher> {
        let compile = |field: &str, pattern: &str| {
            Regex::new(pattern).with_context(|| format!("Invalid {field} pattern: {pattern}"))
        };
        Ok(AnnotationMatcher {
            guard: compile("guard_annotation", &self.guard_annotation)?,
            controller: compile("controller_annotation", &self.controller_annotation)?,
            mapping: compile("mapping_annotation", &self.mapping_annotation)?,
            guard_name_attribute: self.guard_name_attribute.clone(),
            route_attributes: self.route_attributes.clone(),
        })
    }
}

/// Compiled form of [`AnnotationRules`].
#[derive(Debug, Clone)]
pub struct AnnotationMatcher {
    guard: Regex,
    controller: Regex,
    mapping: Regex,
    pub guard_name_attribute: String,
    pub route_attributes: Vec<String>,
}

impl AnnotationMatcher {
    pub fn is_guard(&self, name: &str) -> bool {
        self.guard.is_match(name)
    }

    pub fn is_controller(&self, name: &str) -> bool {
        self.controller.is_match(name)
    }

    pub fn is_mapping(&self, name: &str) -> bool {
        self.mapping.is_match(name)
    }
}
