use placard_model::ModelError;
use placard_render_core::RenderError;
use placard_traits::{QrError, StoreError};
use placard_types::{BatchId, StylePresetId};
use thiserror::Error;

/// Top-level error for rendering and batch export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Batch not found: {0}")]
    BatchNotFound(BatchId),

    #[error("Style preset not found: {0}")]
    StylePresetNotFound(StylePresetId),

    #[error("Nothing to export: none of the {requested} requested item(s) rendered")]
    NothingToExport { requested: usize },

    #[error("Archive could not be written: {0}")]
    Archive(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("QR payload rejected: {0}")]
    Qr(#[from] QrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ModelError> for ExportError {
    fn from(e: ModelError) -> Self {
        ExportError::Render(e.into())
    }
}
