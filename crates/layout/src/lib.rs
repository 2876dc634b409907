//! Text measurement and layout for placard elements.
//!
//! Both the canvas and the document renderer lay text out through
//! [`layout_text`], so the preview and the exported document break and
//! place lines identically.

mod afm;
pub mod fonts;
pub mod text;
pub mod truetype;

pub use fonts::{FontError, FontLibrary, FontMetrics, StandardFont, StandardFontMetrics};
pub use text::{
    DecorationSegment, PlacedLine, PlacedRun, TextBlockLayout, layout_text, optimal_font_size, wrap_text,
};
pub use truetype::TrueTypeMetrics;
