use lopdf::{Dictionary, Object, dictionary};
use placard_layout::StandardFont;

/// Fonts and opacity states referenced by page content, named on first use.
#[derive(Debug, Default)]
pub(crate) struct PageResources {
    fonts: Vec<StandardFont>,
    /// Constant alpha in thousandths.
    opacities: Vec<u16>,
}

impl PageResources {
    /// Resource name (`F1`, `F2`, ...) of a standard font.
    pub fn font(&mut self, font: StandardFont) -> String {
        let index = match self.fonts.iter().position(|f| *f == font) {
            Some(index) => index,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        };
        format!("F{}", index + 1)
    }

    /// Resource name (`GS1`, `GS2`, ...) of an ExtGState with constant alpha
    /// `alpha` for both fill and stroke.
    pub fn opacity(&mut self, alpha: f32) -> String {
        let key = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
        let index = match self.opacities.iter().position(|a| *a == key) {
            Some(index) => index,
            None => {
                self.opacities.push(key);
                self.opacities.len() - 1
            }
        };
        format!("GS{}", index + 1)
    }

    pub fn to_dictionary(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        for (i, font) in self.fonts.iter().enumerate() {
            fonts.set(
                format!("F{}", i + 1).into_bytes(),
                Object::Dictionary(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_font_name(),
                    "Encoding" => "WinAnsiEncoding",
                }),
            );
        }
        let mut states = Dictionary::new();
        for (i, alpha) in self.opacities.iter().enumerate() {
            let alpha = *alpha as f32 / 1000.0;
            states.set(
                format!("GS{}", i + 1).into_bytes(),
                Object::Dictionary(dictionary! {
                    "Type" => "ExtGState",
                    "ca" => alpha,
                    "CA" => alpha,
                }),
            );
        }
        let mut resources = Dictionary::new();
        if !fonts.is_empty() {
            resources.set("Font", fonts);
        }
        if !states.is_empty() {
            resources.set("ExtGState", states);
        }
        resources
    }
}
