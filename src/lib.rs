//! placard: design resolution-independent print layouts and export them as
//! PDFs, one document at a time or a whole batch into a zip archive.
//!
//! The workspace crates carry the pieces:
//! - `placard-model`: elements, page types, spacing and alignment resolution
//! - `placard-layout`: font metrics and text fitting
//! - `placard-canvas`: the interactive editing surface
//! - `placard-render-lopdf`: the PDF writer
//!
//! This crate ties them together with the bundled QR encoder and the batch
//! exporter.

pub mod archive;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod qr;

pub use error::ExportError;
pub use pipeline::{BatchExportReport, BatchExporter, BatchExporterBuilder, ExportConfig, ItemFailure};
pub use qr::QrcodeProvider;

pub use placard_canvas::CanvasState;
pub use placard_model::{FieldValues, Layout, MissingFieldPolicy, PageType};
pub use placard_render_core::RenderOptions;
pub use placard_traits::{ExportStore, InMemoryExportStore, QrProvider, StylePreset};

use std::sync::Arc;

/// Renders a single layout for preview or download. Fields without a value
/// show their placeholder text.
pub fn export_single(layout: &Layout, fields: &FieldValues) -> Result<Vec<u8>, ExportError> {
    export_single_with(layout, fields, Arc::new(QrcodeProvider), &RenderOptions::default())
}

/// [`export_single`] with an explicit QR provider and render options.
pub fn export_single_with(
    layout: &Layout,
    fields: &FieldValues,
    qr: Arc<dyn QrProvider>,
    options: &RenderOptions,
) -> Result<Vec<u8>, ExportError> {
    Ok(placard_render_lopdf::render_pdf(layout, fields, qr, options)?)
}
