//! Physical page types.

use placard_types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Selects a fixed physical page size. Orientation is derived from the
/// dimensions rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageType {
    #[default]
    #[serde(rename = "A4_portrait")]
    A4Portrait,
    #[serde(rename = "A4_landscape")]
    A4Landscape,
    #[serde(rename = "A5_portrait")]
    A5Portrait,
    #[serde(rename = "A5_landscape")]
    A5Landscape,
    #[serde(rename = "A6_portrait")]
    A6Portrait,
    #[serde(rename = "A6_landscape")]
    A6Landscape,
    #[serde(rename = "Letter_portrait")]
    LetterPortrait,
    #[serde(rename = "Letter_landscape")]
    LetterLandscape,
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "business_card")]
    BusinessCard,
}

impl PageType {
    pub const ALL: [PageType; 10] = [
        PageType::A4Portrait,
        PageType::A4Landscape,
        PageType::A5Portrait,
        PageType::A5Landscape,
        PageType::A6Portrait,
        PageType::A6Landscape,
        PageType::LetterPortrait,
        PageType::LetterLandscape,
        PageType::Square,
        PageType::BusinessCard,
    ];

    /// Width and height in millimetres.
    pub fn dimensions_mm(&self) -> Size {
        let (w, h) = match self {
            PageType::A4Portrait => (210.0, 297.0),
            PageType::A4Landscape => (297.0, 210.0),
            PageType::A5Portrait => (148.0, 210.0),
            PageType::A5Landscape => (210.0, 148.0),
            PageType::A6Portrait => (105.0, 148.0),
            PageType::A6Landscape => (148.0, 105.0),
            PageType::LetterPortrait => (215.9, 279.4),
            PageType::LetterLandscape => (279.4, 215.9),
            PageType::Square => (200.0, 200.0),
            PageType::BusinessCard => (85.0, 55.0),
        };
        Size::new(w, h)
    }

    /// Landscape when the width is strictly larger than the height.
    pub fn orientation(&self) -> Orientation {
        let size = self.dimensions_mm();
        if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Caption font size (pt) used by generated batch templates.
    pub fn caption_font_size(&self) -> f32 {
        match self {
            PageType::A4Portrait | PageType::A4Landscape => 28.0,
            PageType::LetterPortrait | PageType::LetterLandscape => 28.0,
            PageType::A5Portrait | PageType::A5Landscape => 20.0,
            PageType::Square => 20.0,
            PageType::A6Portrait | PageType::A6Landscape => 14.0,
            PageType::BusinessCard => 8.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageType::A4Portrait => "A4_portrait",
            PageType::A4Landscape => "A4_landscape",
            PageType::A5Portrait => "A5_portrait",
            PageType::A5Landscape => "A5_landscape",
            PageType::A6Portrait => "A6_portrait",
            PageType::A6Landscape => "A6_landscape",
            PageType::LetterPortrait => "Letter_portrait",
            PageType::LetterLandscape => "Letter_landscape",
            PageType::Square => "square",
            PageType::BusinessCard => "business_card",
        }
    }

    /// Parse a page type name such as `A5_landscape` (case-insensitive).
    pub fn parse(s: &str) -> Option<PageType> {
        Self::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
