//! QrProvider trait for abstracting QR payload image generation.
//!
//! The renderer hands a payload URL plus the style preset to a provider and
//! draws whatever comes back. Providers may fail per call; callers decide
//! whether that degrades or aborts.

use placard_types::{Color, StylePresetId};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrError {
    #[error("QR payload is empty")]
    EmptyPayload,

    #[error("QR payload too long for the requested error correction: {0} bytes")]
    PayloadTooLong(usize),

    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("QR generator unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

fn default_quiet_zone() -> u32 {
    2
}

/// A named bundle of QR visual styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub id: StylePresetId,
    pub name: String,
    #[serde(default)]
    pub foreground: Color,
    #[serde(default = "white")]
    pub background: Color,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
    /// Quiet zone width in modules.
    #[serde(default = "default_quiet_zone")]
    pub quiet_zone: u32,
}

fn white() -> Color {
    Color::WHITE
}

impl StylePreset {
    pub fn new(id: impl Into<StylePresetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            foreground: Color::BLACK,
            background: Color::WHITE,
            error_correction: ErrorCorrection::default(),
            quiet_zone: default_quiet_zone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QrRequest {
    pub url: String,
    pub preset: StylePreset,
    /// Target edge length of the rendered image in device pixels.
    pub pixel_size: u32,
}

/// A square grid of dark/light modules, row-major, quiet zone excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Returns `None` unless `modules.len() == width * width`.
    pub fn new(width: usize, modules: Vec<bool>) -> Option<Self> {
        (width > 0 && modules.len() == width * width).then_some(Self { width, modules })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}

/// What a provider hands back: vector markup or a module matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum QrImage {
    Svg(String),
    Modules(QrMatrix),
}

pub trait QrProvider: Send + Sync + Debug {
    fn generate(&self, request: &QrRequest) -> Result<QrImage, QrError>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A provider that always fails. Documents rendered with it show the QR
/// placeholder in every QR slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableQrProvider;

impl QrProvider for UnavailableQrProvider {
    fn generate(&self, _request: &QrRequest) -> Result<QrImage, QrError> {
        Err(QrError::Unavailable("no QR generator configured".to_string()))
    }

    fn name(&self) -> &'static str {
        "UnavailableQrProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_requires_square_module_count() {
        assert!(QrMatrix::new(2, vec![true; 3]).is_none());
        assert!(QrMatrix::new(0, vec![]).is_none());
        let m = QrMatrix::new(2, vec![true, false, false, true]).unwrap();
        assert!(m.is_dark(0, 0));
        assert!(!m.is_dark(1, 0));
        assert!(!m.is_dark(5, 5));
        assert_eq!(m.dark_count(), 2);
    }

    #[test]
    fn preset_defaults_from_json() {
        let preset: StylePreset = serde_json::from_str(r#"{"id": "classic", "name": "Classic Black"}"#).unwrap();
        assert_eq!(preset.foreground, Color::BLACK);
        assert_eq!(preset.background, Color::WHITE);
        assert_eq!(preset.error_correction, ErrorCorrection::M);
        assert_eq!(preset.quiet_zone, 2);
    }

    #[test]
    fn unavailable_provider_always_fails() {
        let req = QrRequest {
            url: "https://example.com".into(),
            preset: StylePreset::new("p", "Plain"),
            pixel_size: 300,
        };
        assert!(matches!(
            UnavailableQrProvider.generate(&req),
            Err(QrError::Unavailable(_))
        ));
    }
}
