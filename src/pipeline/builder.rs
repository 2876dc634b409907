use super::config::ExportConfig;
use super::orchestrator::BatchExporter;
use crate::error::ExportError;
use crate::qr::QrcodeProvider;
use placard_model::MissingFieldPolicy;
use placard_traits::{ExportStore, QrProvider};
use std::path::PathBuf;
use std::sync::Arc;

/// A builder for creating a `BatchExporter`.
pub struct BatchExporterBuilder {
    store: Option<Arc<dyn ExportStore>>,
    qr: Arc<dyn QrProvider>,
    config: ExportConfig,
}

impl Default for BatchExporterBuilder {
    fn default() -> Self {
        Self {
            store: None,
            qr: Arc::new(QrcodeProvider),
            config: ExportConfig::default(),
        }
    }
}

impl BatchExporterBuilder {
    /// Creates a builder with default settings and the bundled QR encoder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Supplies the records the exporter reads batches, items and presets from.
    pub fn with_store(mut self, store: Arc<dyn ExportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the bundled QR encoder.
    pub fn with_qr_provider(mut self, qr: Arc<dyn QrProvider>) -> Self {
        self.qr = qr;
        self
    }

    /// Replaces the whole configuration, e.g. one read with [`ExportConfig::from_env`].
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Limits how many items render at the same time.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.config.missing_fields = policy;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Consumes the builder and creates the `BatchExporter`.
    pub fn build(self) -> Result<BatchExporter, ExportError> {
        let store = self.store.ok_or_else(|| {
            ExportError::Config("No export store has been configured. Use `with_store`.".to_string())
        })?;
        if self.config.concurrency == 0 {
            return Err(ExportError::Config("Concurrency must be at least 1.".to_string()));
        }
        log::info!(
            "Building batch exporter: store={}, qr={}, concurrency={}.",
            store.name(),
            self.qr.name(),
            self.config.concurrency
        );
        Ok(BatchExporter::new(store, self.qr, self.config))
    }
}
