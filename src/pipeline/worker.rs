use super::config::ExportConfig;
use super::default_layout::default_layout;
use crate::error::ExportError;
use crate::naming::{document_file_name, sanitize_label};
use log::{debug, warn};
use placard_model::{FieldValues, Layout, PageType, SemanticField};
use placard_render_core::RenderOptions;
use placard_render_lopdf::render_pdf;
use placard_traits::{BatchItem, ExportStore, QrError, QrImage, QrProvider, QrRequest, StylePreset};
use placard_types::ItemId;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Everything one blocking task needs to render a single batch item.
pub(crate) struct ItemJob {
    pub worker_id: usize,
    pub item: BatchItem,
    pub default_preset: Arc<StylePreset>,
    pub page_type: PageType,
    pub layout: Option<Arc<Layout>>,
    pub batch_fields: Arc<FieldValues>,
}

#[derive(Debug)]
pub(crate) struct RenderedItem {
    pub item_id: ItemId,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Wraps a provider and remembers every failure it returned, so a document
/// that silently degraded to a QR placeholder can be rejected afterwards.
#[derive(Debug)]
pub(crate) struct RecordingQrProvider {
    inner: Arc<dyn QrProvider>,
    failures: Mutex<Vec<QrError>>,
}

impl RecordingQrProvider {
    pub fn new(inner: Arc<dyn QrProvider>) -> Self {
        Self {
            inner,
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn first_failure(&self) -> Option<QrError> {
        match self.failures.lock() {
            Ok(failures) => failures.first().cloned(),
            Err(_) => Some(QrError::Unavailable("failure log poisoned".to_string())),
        }
    }
}

impl QrProvider for RecordingQrProvider {
    fn generate(&self, request: &QrRequest) -> Result<QrImage, QrError> {
        let result = self.inner.generate(request);
        if let Err(e) = &result
            && let Ok(mut failures) = self.failures.lock()
        {
            failures.push(e.clone());
        }
        result
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Item override first, else the batch default. An override that names a
/// preset the store does not have fails the item rather than falling back.
pub(crate) fn resolve_preset(
    item: &BatchItem,
    default_preset: &Arc<StylePreset>,
    store: &dyn ExportStore,
) -> Result<Arc<StylePreset>, ExportError> {
    match &item.style_preset_id {
        Some(id) if *id != default_preset.id => store
            .style_preset(id)?
            .map(Arc::new)
            .ok_or_else(|| ExportError::StylePresetNotFound(id.clone())),
        _ => Ok(Arc::clone(default_preset)),
    }
}

pub(crate) fn item_fields(item: &BatchItem, batch_fields: &FieldValues) -> FieldValues {
    let mut fields = FieldValues::new()
        .with(SemanticField::QrUrl, item.payload_url.trim())
        .with(SemanticField::ExportId, item.export_id.trim());
    if let Some(label) = item.label.as_deref().and_then(sanitize_label) {
        fields.insert(SemanticField::Label, label);
    }
    fields.merge_missing(batch_fields);
    fields
}

/// Renders one item to PDF bytes. Runs on a blocking thread.
pub(crate) fn render_item(
    job: &ItemJob,
    store: &dyn ExportStore,
    qr: &Arc<dyn QrProvider>,
    config: &ExportConfig,
) -> Result<RenderedItem, ExportError> {
    let start = Instant::now();
    let item = &job.item;
    if item.payload_url.trim().is_empty() {
        return Err(QrError::EmptyPayload.into());
    }

    let preset = resolve_preset(item, &job.default_preset, store)?;
    let fields = item_fields(item, &job.batch_fields);

    let generated;
    let layout: &Layout = match &job.layout {
        Some(layout) => layout.as_ref(),
        None => {
            generated = default_layout(job.page_type, fields.get(SemanticField::Label).is_some());
            &generated
        }
    };

    let title = config.title.clone().unwrap_or_else(|| item.export_id.clone());
    let mut options = RenderOptions::default()
        .with_missing_fields(config.missing_fields)
        .with_qr_preset((*preset).clone())
        .with_title(title);
    options.qr_pixel_size = config.qr_pixel_size;

    let recorder = Arc::new(RecordingQrProvider::new(Arc::clone(qr)));
    let bytes = render_pdf(layout, &fields, recorder.clone(), &options)?;
    if let Some(e) = recorder.first_failure() {
        warn!(
            "[WORKER-{}] Item '{}' rendered with a QR placeholder: {}",
            job.worker_id, item.export_id, e
        );
        return Err(e.into());
    }

    debug!(
        "[WORKER-{}] Rendered '{}' ({} bytes) in {:?}",
        job.worker_id,
        item.export_id,
        bytes.len(),
        start.elapsed()
    );
    Ok(RenderedItem {
        item_id: item.id.clone(),
        file_name: document_file_name(&item.export_id, &preset.name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_traits::InMemoryExportStore;
    use placard_traits::UnavailableQrProvider;

    fn item(payload: &str) -> BatchItem {
        BatchItem {
            id: "i1".into(),
            batch_id: "b1".into(),
            export_id: "QR-0001".to_string(),
            payload_url: payload.to_string(),
            style_preset_id: None,
            label: Some("  Table   4 ".to_string()),
            generated: false,
        }
    }

    fn job(item: BatchItem) -> ItemJob {
        ItemJob {
            worker_id: 0,
            item,
            default_preset: Arc::new(StylePreset::new("classic", "Classic Black")),
            page_type: PageType::A6Portrait,
            layout: None,
            batch_fields: Arc::new(FieldValues::new().with(SemanticField::BusinessName, "Cafe")),
        }
    }

    #[test]
    fn fields_carry_item_values_over_batch_values() {
        let batch = FieldValues::new()
            .with(SemanticField::ExportId, "ignored")
            .with(SemanticField::BusinessName, "Cafe");
        let fields = item_fields(&item("https://e.x/1"), &batch);
        assert_eq!(fields.get(SemanticField::ExportId), Some("QR-0001"));
        assert_eq!(fields.get(SemanticField::Label), Some("Table 4"));
        assert_eq!(fields.get(SemanticField::BusinessName), Some("Cafe"));
    }

    #[test]
    fn unknown_override_preset_fails_the_item() {
        let store = InMemoryExportStore::new();
        let mut it = item("https://e.x/1");
        it.style_preset_id = Some("neon".into());
        let err = resolve_preset(&it, &Arc::new(StylePreset::new("classic", "Classic")), &store).unwrap_err();
        assert!(matches!(err, ExportError::StylePresetNotFound(id) if id.as_str() == "neon"));
    }

    #[test]
    fn empty_payload_fails_before_rendering() {
        let store = InMemoryExportStore::new();
        let qr: Arc<dyn QrProvider> = Arc::new(crate::QrcodeProvider);
        let err = render_item(&job(item("  ")), &store, &qr, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Qr(QrError::EmptyPayload)));
    }

    #[test]
    fn degraded_qr_fails_the_item() {
        let store = InMemoryExportStore::new();
        let qr: Arc<dyn QrProvider> = Arc::new(UnavailableQrProvider);
        let err = render_item(&job(item("https://e.x/1")), &store, &qr, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Qr(QrError::Unavailable(_))));
    }

    #[test]
    fn renders_with_style_slug_in_file_name() {
        let store = InMemoryExportStore::new();
        let qr: Arc<dyn QrProvider> = Arc::new(crate::QrcodeProvider);
        let rendered = render_item(&job(item("https://e.x/1")), &store, &qr, &ExportConfig::default()).unwrap();
        assert_eq!(rendered.file_name, "QR-0001_classic-black.pdf");
        assert!(rendered.bytes.starts_with(b"%PDF-"));
    }
}
