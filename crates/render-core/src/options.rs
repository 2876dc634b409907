use placard_model::MissingFieldPolicy;
use placard_traits::StylePreset;

/// Edge length in device pixels requested from QR providers.
pub const DEFAULT_QR_PIXEL_SIZE: u32 = 600;

/// Per-document rendering choices.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub missing_fields: MissingFieldPolicy,
    /// Styling handed to the QR provider for every QR element.
    pub qr_preset: StylePreset,
    pub qr_pixel_size: u32,
    /// Written to the document info dictionary.
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            missing_fields: MissingFieldPolicy::Placeholder,
            qr_preset: StylePreset::new("default", "Default"),
            qr_pixel_size: DEFAULT_QR_PIXEL_SIZE,
            title: None,
        }
    }
}

impl RenderOptions {
    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    pub fn with_qr_preset(mut self, preset: StylePreset) -> Self {
        self.qr_preset = preset;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
