use crate::domain::ports::ReportSink;
use crate::domain::report::Report;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes the report as a compact JSON array, creating parent directories as needed.
pub struct JsonReportWriter {
    pub output_path: PathBuf,
}

impl JsonReportWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            output_path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReportSink for JsonReportWriter {
    fn write(&self, report: &Report) -> Result<()> {
        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory: {}", parent.display())
            })?;
        }
        let json = report.to_json().context("Failed to serialize report")?;
        std::fs::write(&self.output_path, json).with_context(|| {
            format!("Failed to write report: {}", self.output_path.display())
        })
    }
}
