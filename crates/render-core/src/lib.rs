//! Core rendering abstractions for placard document export.
//!
//! This crate provides what every document backend shares:
//! - `DocumentRenderer` trait for abstracting PDF writing operations
//! - `ElementGeometry`, the percent to millimetre to point conversion
//! - `GraphicsStateStack` for balanced `q`/`Q` drawing scopes
//! - `MarkupConverter` for vector markup handed back by QR providers

mod error;
pub mod geometry;
pub mod graphics;
pub mod markup;
mod options;
mod traits;
pub mod utils;

pub use error::RenderError;
pub use geometry::ElementGeometry;
pub use graphics::{GraphicsState, GraphicsStateStack};
pub use markup::{MarkupConverter, PathSegment, SvgMarkupConverter, VectorGraphic, VectorPath};
pub use options::{DEFAULT_QR_PIXEL_SIZE, RenderOptions};
pub use traits::DocumentRenderer;
