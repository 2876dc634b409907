//! QR payload images produced with the `qrcode` crate.

use log::debug;
use placard_traits::{ErrorCorrection, QrError, QrImage, QrProvider, QrRequest};
use qrcode::types::QrError as EncodeError;
use qrcode::{EcLevel, QrCode};
use std::fmt::Write;

/// Encodes payloads locally and hands back SVG markup in the preset's
/// colors, one filled path of horizontal module runs over an optional
/// background square.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeProvider;

impl QrcodeProvider {
    pub fn new() -> Self {
        Self
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

impl QrProvider for QrcodeProvider {
    fn generate(&self, request: &QrRequest) -> Result<QrImage, QrError> {
        let payload = request.url.trim();
        if payload.is_empty() {
            return Err(QrError::EmptyPayload);
        }

        let code = QrCode::with_error_correction_level(payload, ec_level(request.preset.error_correction))
            .map_err(|e| match e {
                EncodeError::DataTooLong => QrError::PayloadTooLong(payload.len()),
                other => QrError::Encode(other.to_string()),
            })?;

        let width = code.width();
        let quiet = request.preset.quiet_zone as usize;
        let span = width + 2 * quiet;
        let colors = code.to_colors();

        let mut path = String::new();
        for (y, row) in colors.chunks(width).enumerate() {
            let mut x = 0;
            while x < width {
                if row[x] != qrcode::Color::Dark {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < width && row[x] == qrcode::Color::Dark {
                    x += 1;
                }
                let _ = write!(path, "M{} {}h{}v1h-{}z", start + quiet, y + quiet, x - start, x - start);
            }
        }

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{px}" height="{px}" viewBox="0 0 {span} {span}">"#,
            px = request.pixel_size,
            span = span
        );
        if !request.preset.background.is_transparent() {
            let _ = write!(
                svg,
                r#"<rect x="0" y="0" width="{span}" height="{span}" fill="{}"/>"#,
                request.preset.background.to_hex(),
                span = span
            );
        }
        let _ = write!(svg, r#"<path fill="{}" d="{}"/></svg>"#, request.preset.foreground.to_hex(), path);

        debug!(
            "Encoded {} byte payload as a {}x{} QR symbol for preset '{}'",
            payload.len(),
            width,
            width,
            request.preset.name
        );
        Ok(QrImage::Svg(svg))
    }

    fn name(&self) -> &'static str {
        "QrcodeProvider"
    }
}
