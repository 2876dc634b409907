use placard::{FieldValues, InMemoryExportStore, Layout, PageType, StylePreset};
use placard_model::{Element, ElementKind, Position, SemanticField, TextAlign, TextStyle};
use placard_traits::{Batch, BatchItem};
use placard_types::Color;

pub const BATCH_ID: &str = "batch-1";
pub const PRESET_ID: &str = "classic";

/// A business-card style layout: name, tagline, QR and a rotated badge
pub fn sample_layout(page_type: PageType) -> Layout {
    let center = Position { x: 50.0, y: 50.0 };
    Layout::new(page_type)
        .with_element(
            Element::new(ElementKind::Text, center)
                .with_id("name")
                .bound_to(SemanticField::BusinessName)
                .at(10.0, 5.0, 80.0, 15.0)
                .with_text_style(TextStyle {
                    font_size: 24.0,
                    text_align: TextAlign::Center,
                    ..TextStyle::default()
                }),
        )
        .with_element(
            Element::new(ElementKind::QrCode, center)
                .with_id("qr")
                .at(30.0, 30.0, 40.0, 40.0),
        )
        .with_element(
            Element::new(ElementKind::Text, center)
                .with_id("badge")
                .with_content("NEW")
                .at(75.0, 75.0, 20.0, 10.0),
        )
}

pub fn classic_preset() -> StylePreset {
    StylePreset::new(PRESET_ID, "Classic Black")
}

pub fn item(index: usize, payload: &str) -> BatchItem {
    BatchItem {
        id: format!("item-{}", index).into(),
        batch_id: BATCH_ID.into(),
        export_id: format!("QR-{:04}", index),
        payload_url: payload.to_string(),
        style_preset_id: None,
        label: None,
        generated: false,
    }
}

pub fn batch(layout: Option<Layout>) -> Batch {
    Batch {
        id: BATCH_ID.into(),
        batch_number: "B-17".to_string(),
        default_style_preset_id: PRESET_ID.into(),
        page_type: PageType::A6Portrait,
        layout,
        fields: FieldValues::new().with(SemanticField::BusinessName, "Corner Cafe"),
    }
}

/// A store with the default batch, the classic preset and `payloads.len()` items
pub fn store_with_items(payloads: &[&str]) -> InMemoryExportStore {
    let store = InMemoryExportStore::new();
    store.add_batch(batch(None)).unwrap();
    let mut preset = classic_preset();
    preset.foreground = Color::rgb(0x1a, 0x1a, 0x2e);
    store.add_style_preset(preset).unwrap();
    for (i, payload) in payloads.iter().enumerate() {
        store.add_item(item(i + 1, payload)).unwrap();
    }
    store
}
