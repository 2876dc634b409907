//! PDF document renderer using lopdf.
//!
//! Each layout becomes one page. Content streams are written as soon as they
//! are painted; fonts are the PDF standard Type1 faces, so no font data is
//! embedded.

mod painter;
mod renderer;
mod resources;
mod writer;

pub use painter::QR_UNAVAILABLE_LABEL;
pub use renderer::{LopdfRenderer, render_pdf};
pub use writer::StreamingPdfWriter;
