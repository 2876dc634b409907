use super::config::ExportConfig;
use super::worker::{ItemJob, RenderedItem, render_item};
use crate::archive::{ArchiveEntry, write_archive};
use crate::error::ExportError;
use crate::naming::archive_file_name;
use log::{debug, error, info, warn};
use placard_render_core::RenderError;
use placard_traits::{ExportStore, QrProvider};
use placard_types::{BatchId, ItemId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Builder;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

/// An item that produced no document, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub item_id: ItemId,
    pub export_id: String,
    pub reason: String,
}

/// Outcome of a batch export that produced an archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExportReport {
    pub batch_id: BatchId,
    pub archive_path: PathBuf,
    /// Number of items in the batch.
    pub requested: usize,
    /// Number of documents in the archive.
    pub produced: usize,
    /// Archive entry names in reservation order.
    pub files: Vec<String>,
    pub failures: Vec<ItemFailure>,
    /// Archived items the store could not mark as generated.
    pub unmarked: Vec<ItemFailure>,
}

/// Renders every item of a batch on blocking tasks and packages the
/// documents into one zip archive.
#[derive(Debug)]
pub struct BatchExporter {
    store: Arc<dyn ExportStore>,
    qr: Arc<dyn QrProvider>,
    config: Arc<ExportConfig>,
}

impl BatchExporter {
    pub fn new(store: Arc<dyn ExportStore>, qr: Arc<dyn QrProvider>, config: ExportConfig) -> Self {
        Self {
            store,
            qr,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Runs [`BatchExporter::export`] on a fresh multi-threaded runtime.
    pub fn export_blocking(&self, batch_id: &BatchId) -> Result<BatchExportReport, ExportError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(self.config.concurrency.clamp(1, 4))
            .enable_all()
            .build()?;
        runtime.block_on(self.export(batch_id))
    }

    /// Exports `batch_id`.
    ///
    /// The batch and its default style preset are checked before anything
    /// renders. Items that fail are logged and listed in the report; the
    /// export only fails as a whole when no item renders or the archive
    /// cannot be written.
    pub async fn export(&self, batch_id: &BatchId) -> Result<BatchExportReport, ExportError> {
        let start = Instant::now();
        let batch = self
            .store
            .batch(batch_id)?
            .ok_or_else(|| ExportError::BatchNotFound(batch_id.clone()))?;
        let default_preset = self
            .store
            .style_preset(&batch.default_style_preset_id)?
            .ok_or_else(|| ExportError::StylePresetNotFound(batch.default_style_preset_id.clone()))?;
        let layout = match &batch.layout {
            Some(layout) => {
                let layout = layout.with_page_type(batch.page_type);
                layout.validate()?;
                Some(Arc::new(layout))
            }
            None => None,
        };

        let items = self.store.items(batch_id)?;
        let requested = items.len();
        if requested == 0 {
            warn!("Batch '{}' has no items to export.", batch_id);
            return Err(ExportError::NothingToExport { requested });
        }

        let concurrency = self.config.concurrency.max(1);
        info!(
            "Exporting batch '{}' ({} items, {}) with {} concurrent workers via {}.",
            batch_id,
            requested,
            batch.page_type,
            concurrency,
            self.store.name()
        );

        let default_preset = Arc::new(default_preset);
        let batch_fields = Arc::new(batch.fields.clone());
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut set = JoinSet::new();
        let mut in_flight: HashMap<task::Id, (usize, ItemId, String)> = HashMap::new();

        for (index, item) in items.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| ExportError::Config(format!("worker semaphore closed: {}", e)))?;
            debug!("[PRODUCER] Dispatching item #{} ('{}').", index, item.export_id);

            let meta = (index, item.id.clone(), item.export_id.clone());
            let job = ItemJob {
                worker_id: index % concurrency,
                item,
                default_preset: Arc::clone(&default_preset),
                page_type: batch.page_type,
                layout: layout.clone(),
                batch_fields: Arc::clone(&batch_fields),
            };
            let store = Arc::clone(&self.store);
            let qr = Arc::clone(&self.qr);
            let config = Arc::clone(&self.config);
            let handle = set.spawn_blocking(move || {
                let _permit = permit;
                (index, render_item(&job, store.as_ref(), &qr, &config))
            });
            in_flight.insert(handle.id(), meta);
        }

        let mut slots: Vec<Option<Result<RenderedItem, ExportError>>> = (0..requested).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(join_err) => {
                    if let Some((index, _, export_id)) = in_flight.get(&join_err.id()) {
                        error!("[WORKER] Task for item '{}' did not complete: {}", export_id, join_err);
                        slots[*index] = Some(Err(RenderError::Other(format!("render task failed: {}", join_err)).into()));
                    }
                }
            }
        }
        let metas: HashMap<usize, (ItemId, String)> = in_flight
            .into_values()
            .map(|(index, id, export_id)| (index, (id, export_id)))
            .collect();

        let mut entries = Vec::new();
        let mut generated = Vec::new();
        let mut failures = Vec::new();
        let mut names = HashSet::new();
        for (index, slot) in slots.into_iter().enumerate() {
            let Some((item_id, export_id)) = metas.get(&index).cloned() else {
                continue;
            };
            match slot {
                Some(Ok(rendered)) => {
                    let name = unique_name(&mut names, &rendered.file_name);
                    generated.push((rendered.item_id, export_id));
                    entries.push(ArchiveEntry {
                        name,
                        bytes: rendered.bytes,
                    });
                }
                Some(Err(e)) => {
                    warn!("Skipping item '{}' ({}): {}", export_id, item_id, e);
                    failures.push(ItemFailure {
                        item_id,
                        export_id,
                        reason: e.to_string(),
                    });
                }
                None => failures.push(ItemFailure {
                    item_id,
                    export_id,
                    reason: "render task produced no result".to_string(),
                }),
            }
        }

        let produced = entries.len();
        if produced == 0 {
            error!("Batch '{}': none of {} items rendered.", batch_id, requested);
            return Err(ExportError::NothingToExport { requested });
        }

        fs::create_dir_all(&self.config.output_dir)?;
        let archive_path = self
            .config
            .output_dir
            .join(archive_file_name(&batch.batch_number, chrono::Local::now()));
        let files: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
        let target = archive_path.clone();
        task::spawn_blocking(move || write_archive(&target, &entries))
            .await
            .map_err(|e| ExportError::Archive(e.to_string()))??;

        let mut unmarked = Vec::new();
        for (item_id, export_id) in generated {
            if let Err(e) = self.store.mark_generated(&item_id) {
                warn!("Could not mark item '{}' as generated: {}", item_id, e);
                unmarked.push(ItemFailure {
                    item_id,
                    export_id,
                    reason: e.to_string(),
                });
            }
        }

        info!(
            "Batch '{}' exported: {}/{} documents in {} ({:.2?}).",
            batch_id,
            produced,
            requested,
            archive_path.display(),
            start.elapsed()
        );
        Ok(BatchExportReport {
            batch_id: batch_id.clone(),
            archive_path,
            requested,
            produced,
            files,
            failures,
            unmarked,
        })
    }
}

/// `name`, or `name` with `_2`, `_3`, ... before the extension when it is
/// already taken.
fn unique_name(taken: &mut HashSet<String>, name: &str) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{}", ext)),
        None => (name, String::new()),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}{}", stem, n, ext);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
