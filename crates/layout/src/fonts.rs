//! Font metrics for text measurement.
//!
//! Documents are drawn with the PDF base-14 fonts, measured with the built-in
//! AFM width tables in [`StandardFontMetrics`]. A host that draws with a real
//! font file can register it with [`FontLibrary`] so measurement matches
//! what it draws.

use crate::afm;
use crate::truetype::TrueTypeMetrics;
use log::debug;
use placard_model::{FontStyle, FontWeight, TextStyle};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Failed to parse font '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("Font library lock poisoned")]
    LockPoisoned,
}

pub trait FontMetrics: Send + Sync + Debug {
    /// Advance width of `c` in 1/1000 em.
    fn advance(&self, c: char) -> f32;

    /// Ascender height in 1/1000 em.
    fn ascent(&self) -> f32;

    /// Descender depth in 1/1000 em, negative below the baseline.
    fn descent(&self) -> f32;

    /// Width of `text` set on one line at `font_size`, with `letter_spacing`
    /// added between consecutive characters.
    fn measure(&self, text: &str, font_size: f32, letter_spacing: f32) -> f32 {
        let advances: f32 = text.chars().map(|c| self.advance(c)).sum();
        let gaps = text.chars().count().saturating_sub(1) as f32;
        advances * font_size / 1000.0 + letter_spacing * gaps
    }

    fn char_width(&self, c: char, font_size: f32) -> f32 {
        self.advance(c) * font_size / 1000.0
    }
}

/// The twelve text faces of the PDF base-14 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

impl StandardFont {
    /// Picks the closest base-14 face for a CSS-like family name. Unknown
    /// families fall back to Helvetica.
    pub fn resolve(family: &str, weight: FontWeight, style: FontStyle) -> StandardFont {
        let family = classify_family(family);
        let bold = weight.is_bold();
        let slanted = style.is_slanted();
        match (family, bold, slanted) {
            (Family::Helvetica, false, false) => StandardFont::Helvetica,
            (Family::Helvetica, true, false) => StandardFont::HelveticaBold,
            (Family::Helvetica, false, true) => StandardFont::HelveticaOblique,
            (Family::Helvetica, true, true) => StandardFont::HelveticaBoldOblique,
            (Family::Times, false, false) => StandardFont::TimesRoman,
            (Family::Times, true, false) => StandardFont::TimesBold,
            (Family::Times, false, true) => StandardFont::TimesItalic,
            (Family::Times, true, true) => StandardFont::TimesBoldItalic,
            (Family::Courier, false, false) => StandardFont::Courier,
            (Family::Courier, true, false) => StandardFont::CourierBold,
            (Family::Courier, false, true) => StandardFont::CourierOblique,
            (Family::Courier, true, true) => StandardFont::CourierBoldOblique,
        }
    }

    pub fn for_style(style: &TextStyle) -> StandardFont {
        Self::resolve(&style.font_family, style.font_weight, style.font_style)
    }

    /// The PostScript name used as the PDF `/BaseFont`.
    pub fn base_font_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn family(&self) -> Family {
        match self {
            StandardFont::Helvetica
            | StandardFont::HelveticaBold
            | StandardFont::HelveticaOblique
            | StandardFont::HelveticaBoldOblique => Family::Helvetica,
            StandardFont::TimesRoman
            | StandardFont::TimesBold
            | StandardFont::TimesItalic
            | StandardFont::TimesBoldItalic => Family::Times,
            _ => Family::Courier,
        }
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold
                | StandardFont::HelveticaBoldOblique
                | StandardFont::TimesBold
                | StandardFont::TimesBoldItalic
                | StandardFont::CourierBold
                | StandardFont::CourierBoldOblique
        )
    }
}

fn classify_family(family: &str) -> Family {
    let family = family.trim().trim_matches(['"', '\'']).to_ascii_lowercase();
    if family.contains("times") || family == "serif" || family.contains("georgia") || family.contains("garamond") {
        Family::Times
    } else if family.contains("courier") || family.contains("mono") {
        Family::Courier
    } else {
        Family::Helvetica
    }
}

/// Metrics of a base-14 face. Italic faces use the upright widths; outside
/// printable ASCII an average advance is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardFontMetrics {
    font: StandardFont,
}

impl StandardFontMetrics {
    pub fn new(font: StandardFont) -> Self {
        Self { font }
    }

    pub fn for_style(style: &TextStyle) -> Self {
        Self::new(StandardFont::for_style(style))
    }

    pub fn font(&self) -> StandardFont {
        self.font
    }

    fn fallback_advance(&self) -> u16 {
        match self.font.family() {
            Family::Helvetica => 556,
            Family::Times => 500,
            Family::Courier => afm::COURIER_ADVANCE,
        }
    }
}

impl FontMetrics for StandardFontMetrics {
    fn advance(&self, c: char) -> f32 {
        if c.is_control() {
            return 0.0;
        }
        let table = match (self.font.family(), self.font.is_bold()) {
            (Family::Helvetica, false) => &afm::HELVETICA,
            (Family::Helvetica, true) => &afm::HELVETICA_BOLD,
            (Family::Times, false) => &afm::TIMES_ROMAN,
            (Family::Times, true) => &afm::TIMES_BOLD,
            (Family::Courier, _) => return afm::COURIER_ADVANCE as f32,
        };
        afm::lookup(table, c).unwrap_or_else(|| self.fallback_advance()) as f32
    }

    fn ascent(&self) -> f32 {
        match self.font.family() {
            Family::Helvetica => 718.0,
            Family::Times => 683.0,
            Family::Courier => 629.0,
        }
    }

    fn descent(&self) -> f32 {
        match self.font.family() {
            Family::Helvetica => -207.0,
            Family::Times => -217.0,
            Family::Courier => -157.0,
        }
    }
}

/// Resolves the metrics to measure a text style with.
///
/// Registered TrueType families take precedence; everything else measures
/// with the matching base-14 face.
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    registered: Arc<RwLock<HashMap<String, Arc<TrueTypeMetrics>>>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `data` and registers it under `family` (case-insensitive).
    pub fn register(&self, family: &str, data: Vec<u8>) -> Result<(), FontError> {
        let metrics = TrueTypeMetrics::from_data(family, data)?;
        debug!(
            "Registered TrueType family '{}' ({} mapped chars)",
            family,
            metrics.mapped_chars()
        );
        let mut registered = self.registered.write().map_err(|_| FontError::LockPoisoned)?;
        registered.insert(family.to_lowercase(), Arc::new(metrics));
        Ok(())
    }

    pub fn metrics_for(&self, style: &TextStyle) -> Arc<dyn FontMetrics> {
        let key = style.font_family.to_lowercase();
        if let Ok(registered) = self.registered.read()
            && let Some(metrics) = registered.get(&key)
        {
            return metrics.clone();
        }
        Arc::new(StandardFontMetrics::for_style(style))
    }

    pub fn is_registered(&self, family: &str) -> bool {
        self.registered
            .read()
            .map(|r| r.contains_key(&family.to_lowercase()))
            .unwrap_or(false)
    }
}
