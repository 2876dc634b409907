use crate::fonts::{FontError, FontMetrics};
use std::collections::HashMap;

/// Metrics read from a TrueType/OpenType font file with `ttf-parser`.
///
/// Advances for every character in the font's Unicode cmap are read once up
/// front and normalized to 1/1000 em.
#[derive(Debug, Clone)]
pub struct TrueTypeMetrics {
    family: String,
    advances: HashMap<char, f32>,
    default_advance: f32,
    ascent: f32,
    descent: f32,
}

impl TrueTypeMetrics {
    pub fn from_data(family: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::Parse {
            name: family.to_string(),
            message: e.to_string(),
        })?;
        let units = face.units_per_em().max(1) as f32;
        let scale = 1000.0 / units;

        let mut codepoints = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }

        let mut advances = HashMap::with_capacity(codepoints.len());
        for c in codepoints.into_iter().filter_map(char::from_u32) {
            if let Some(advance) = face
                .glyph_index(c)
                .and_then(|gid| face.glyph_hor_advance(gid))
            {
                advances.insert(c, advance as f32 * scale);
            }
        }

        let default_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|a| a as f32 * scale)
            .unwrap_or(500.0);

        Ok(Self {
            family: family.to_string(),
            advances,
            default_advance,
            ascent: face.ascender() as f32 * scale,
            descent: face.descender() as f32 * scale,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn mapped_chars(&self) -> usize {
        self.advances.len()
    }
}

impl FontMetrics for TrueTypeMetrics {
    fn advance(&self, c: char) -> f32 {
        if c.is_control() {
            return 0.0;
        }
        self.advances.get(&c).copied().unwrap_or(self.default_advance)
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_a_parse_error() {
        let err = TrueTypeMetrics::from_data("Empty", Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Empty"));
    }
}
