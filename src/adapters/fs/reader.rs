use crate::domain::model::SourceModel;
use crate::domain::ports::SourceModelLoader;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Loads a source model exported by a front-end as JSON.
pub struct JsonModelSource {
    pub model_path: PathBuf,
}

impl JsonModelSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            model_path: path.as_ref().to_path_buf(),
        }
    }
}

impl SourceModelLoader for JsonModelSource {
    fn load(&self) -> Result<SourceModel> {
        use memmap2::Mmap;

        let file = std::fs::File::open(&self.model_path).with_context(|| {
            format!("Failed to open source model: {}", self.model_path.display())
        })?;
        // SAFETY: the file is opened read-only and only read for the duration of parsing.
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| {
            format!("Failed to map source model: {}", self.model_path.display())
        })?;
        let mut model: SourceModel = serde_json::from_slice(&mmap).with_context(|| {
            format!("Failed to parse source model JSON: {}", self.model_path.display())
        })?;
        model.reindex();
        Ok(model)
    }
}
