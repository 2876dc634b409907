//! ExportStore trait for abstracting batch, item and style-preset records.
//!
//! The batch exporter reads records by id and writes back a single
//! per-item "generated" flag. Nothing else about the backing store leaks
//! through this seam.

use crate::qr::StylePreset;
use log::debug;
use placard_model::{FieldValues, Layout, PageType};
use placard_types::{BatchId, ItemId, StylePresetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("Invalid store data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidData(err.to_string())
    }
}

/// A group of reserved items exported together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: BatchId,
    pub batch_number: String,
    pub default_style_preset_id: StylePresetId,
    #[serde(default)]
    pub page_type: PageType,
    /// Custom design for every item. When absent the exporter builds the
    /// default QR-plus-caption layout for `page_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Values shared by every item, e.g. the business name.
    #[serde(default)]
    pub fields: FieldValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub id: ItemId,
    pub batch_id: BatchId,
    /// Human-readable code rendered next to the QR image.
    pub export_id: String,
    pub payload_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset_id: Option<StylePresetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub generated: bool,
}

pub trait ExportStore: Send + Sync + Debug {
    fn batch(&self, id: &BatchId) -> Result<Option<Batch>, StoreError>;

    /// Items belonging to `batch_id`, in reservation order.
    fn items(&self, batch_id: &BatchId) -> Result<Vec<BatchItem>, StoreError>;

    fn style_preset(&self, id: &StylePresetId) -> Result<Option<StylePreset>, StoreError>;

    /// Sets the item's "generated" flag. Touches no other record.
    fn mark_generated(&self, item_id: &ItemId) -> Result<(), StoreError>;

    /// Returns a human-readable name for this store (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Serialized form of [`InMemoryExportStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSnapshot {
    pub batches: Vec<Batch>,
    pub items: Vec<BatchItem>,
    pub style_presets: Vec<StylePreset>,
}

#[derive(Debug, Default)]
struct StoreData {
    batches: HashMap<BatchId, Batch>,
    items: Vec<BatchItem>,
    style_presets: HashMap<StylePresetId, StylePreset>,
}

/// An in-memory export store.
///
/// Records must be pre-populated (directly or from a JSON snapshot) before
/// use.
#[derive(Debug, Default)]
pub struct InMemoryExportStore {
    data: RwLock<StoreData>,
}

impl InMemoryExportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let data = StoreData {
            batches: snapshot
                .batches
                .into_iter()
                .map(|b| (b.id.clone(), b))
                .collect(),
            items: snapshot.items,
            style_presets: snapshot
                .style_presets
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
        };
        debug!(
            "Loaded export store: {} batches, {} items, {} style presets",
            data.batches.len(),
            data.items.len(),
            data.style_presets.len()
        );
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Copies the current records out, batches and presets sorted by id.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned("snapshot"))?;
        let mut batches: Vec<Batch> = data.batches.values().cloned().collect();
        batches.sort_by(|a, b| a.id.cmp(&b.id));
        let mut style_presets: Vec<StylePreset> = data.style_presets.values().cloned().collect();
        style_presets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(StoreSnapshot {
            batches,
            items: data.items.clone(),
            style_presets,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.snapshot()?)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn add_batch(&self, batch: Batch) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned("add_batch"))?;
        data.batches.insert(batch.id.clone(), batch);
        Ok(())
    }

    /// Adds or replaces an item (matched by id).
    pub fn add_item(&self, item: BatchItem) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned("add_item"))?;
        match data.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => data.items.push(item),
        }
        Ok(())
    }

    pub fn add_style_preset(&self, preset: StylePreset) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("add_style_preset"))?;
        data.style_presets.insert(preset.id.clone(), preset);
        Ok(())
    }

    pub fn item(&self, id: &ItemId) -> Result<Option<BatchItem>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned("item"))?;
        Ok(data.items.iter().find(|i| &i.id == id).cloned())
    }
}

impl ExportStore for InMemoryExportStore {
    fn batch(&self, id: &BatchId) -> Result<Option<Batch>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned("batch"))?;
        Ok(data.batches.get(id).cloned())
    }

    fn items(&self, batch_id: &BatchId) -> Result<Vec<BatchItem>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned("items"))?;
        Ok(data
            .items
            .iter()
            .filter(|i| &i.batch_id == batch_id)
            .cloned()
            .collect())
    }

    fn style_preset(&self, id: &StylePresetId) -> Result<Option<StylePreset>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("style_preset"))?;
        Ok(data.style_presets.get(id).cloned())
    }

    fn mark_generated(&self, item_id: &ItemId) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("mark_generated"))?;
        let item = data
            .items
            .iter_mut()
            .find(|i| &i.id == item_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "item",
                id: item_id.to_string(),
            })?;
        item.generated = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryExportStore"
    }
}
