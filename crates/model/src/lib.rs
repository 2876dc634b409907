//! Resolution-independent layout model.
//!
//! Elements live in percentage page-space; [`PageType`] pins that space to a
//! physical size. The spacing and alignment resolvers in [`resolve`] are the
//! single source both the canvas and the document renderers read from.

pub mod element;
pub mod error;
pub mod field;
pub mod layout;
pub mod page;
pub mod resolve;
pub mod style;

pub use element::{Dimensions, Element, ElementKind, MIN_ELEMENT_PERCENT, Position, SpacingSpec};
pub use error::ModelError;
pub use field::{FieldValues, MissingFieldPolicy, SemanticField};
pub use layout::Layout;
pub use page::{Orientation, PageType};
pub use resolve::{ElementBoxes, HorizontalAlign, Spacing, resolve_alignment, resolve_boxes, resolve_spacing};
pub use style::{
    BorderStyle, BoxStyle, FontStyle, FontWeight, TextAlign, TextDecoration, TextOverflow, TextShadow,
    TextStyle, TextTransform, VerticalAlign, WordWrap,
};

pub use placard_types::{Color, ElementId, Rect, Size};
