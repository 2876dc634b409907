pub mod block;
pub mod fit;
pub mod transform;
pub mod wrapper;

pub use block::{
    BASELINE_RATIO, DecorationSegment, ELLIPSIS, PlacedLine, PlacedRun, TextBlockLayout, layout_text,
};
pub use fit::{FONT_SIZE_STEP, MIN_FONT_SIZE, optimal_font_size};
pub use transform::apply_transform;
pub use wrapper::{WrappedLine, wrap_text};
