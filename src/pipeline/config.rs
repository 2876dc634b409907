use crate::error::ExportError;
use placard_model::MissingFieldPolicy;
use placard_render_core::DEFAULT_QR_PIXEL_SIZE;
use std::env;
use std::path::PathBuf;

/// Environment variable naming the archive output directory.
pub const OUTPUT_DIR_ENV: &str = "PLACARD_OUTPUT_DIR";
/// Environment variable limiting how many items render at once.
pub const CONCURRENCY_ENV: &str = "PLACARD_CONCURRENCY";

/// Settings for a batch export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory the archive is written to. Created if missing.
    pub output_dir: PathBuf,
    /// Maximum number of items rendering at the same time.
    pub concurrency: usize,
    /// Defaults to [`MissingFieldPolicy::Fail`] for batch documents.
    pub missing_fields: MissingFieldPolicy,
    /// Document title. Each document falls back to its export id.
    pub title: Option<String>,
    pub qr_pixel_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            concurrency: num_cpus::get().max(1),
            missing_fields: MissingFieldPolicy::Fail,
            title: None,
            qr_pixel_size: DEFAULT_QR_PIXEL_SIZE,
        }
    }
}

impl ExportConfig {
    /// Defaults overridden by `PLACARD_OUTPUT_DIR` and `PLACARD_CONCURRENCY`.
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ExportError> {
        let mut config = Self::default();
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup(CONCURRENCY_ENV) {
            config.concurrency = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ExportError::Config(format!("{} must be a positive integer, got '{}'", CONCURRENCY_ENV, raw))
                })?;
        }
        Ok(config)
    }
}
