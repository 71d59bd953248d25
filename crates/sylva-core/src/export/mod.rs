//! Export of generated trees for inspection
//!
//! These writers are debugging aids; render-ready consumers read the
//! buffers of [`TreeOutput`] directly.

mod json;
mod obj;

use crate::Result;
use crate::pipeline::TreeOutput;
use std::path::Path;

pub use json::export_json;
pub use obj::export_obj;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Obj,
    Json,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "obj" => Some(Self::Obj),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Json => "json",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Obj => "OBJ (baked leaves)",
            Self::Json => "JSON (raw buffers)",
        }
    }
}

/// Export a tree, auto-detecting the format from the extension
pub fn export_tree<P: AsRef<Path>>(tree: &TreeOutput, path: P) -> Result<()> {
    let path = path.as_ref();
    match ExportFormat::from_extension(path) {
        Some(ExportFormat::Obj) => export_obj(tree, path),
        Some(ExportFormat::Json) => export_json(tree, path),
        None => Err(crate::Error::Export(format!(
            "Unknown file extension: {}",
            path.display()
        ))),
    }
}
