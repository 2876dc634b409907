//! Foundation types shared across the placard workspace: colors, geometry
//! primitives with unit conversion, and typed record identifiers.

pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{MM_PER_PT, Point, Rect, Size, mm_to_pt, pt_to_mm};
pub use ids::{BatchId, ElementId, ItemId, StylePresetId};
