//! Style resolution shared by the canvas and document renderers.
//!
//! Both renderers call these functions instead of re-deriving the defaults
//! themselves, so a preview and its export agree on spacing and alignment.

use crate::element::{Element, SpacingSpec};
use crate::style::TextAlign;
use placard_types::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Fully resolved per-side spacing, percent of the element's own size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Spacing {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Horizontal alignment a renderer without justification support can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Fills in missing sides with 0.
pub fn resolve_spacing(partial: &SpacingSpec) -> Spacing {
    Spacing {
        top: partial.top.unwrap_or(0.0),
        right: partial.right.unwrap_or(0.0),
        bottom: partial.bottom.unwrap_or(0.0),
        left: partial.left.unwrap_or(0.0),
    }
}

/// Maps the element's text alignment onto left/center/right. `justify`
/// degrades to left.
pub fn resolve_alignment(element: &Element) -> HorizontalAlign {
    match element.text_style.text_align {
        TextAlign::Left | TextAlign::Justify => HorizontalAlign::Left,
        TextAlign::Center => HorizontalAlign::Center,
        TextAlign::Right => HorizontalAlign::Right,
    }
}

/// An element's boxes in the unit of the page size they were resolved
/// against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBoxes {
    /// Position and size as authored.
    pub frame: Rect,
    /// Frame inset by the margin. Background and border are drawn here.
    pub border_box: Rect,
    /// Border box inset by the padding. Content is drawn here.
    pub content_box: Rect,
}

/// Converts an element's percentages into boxes on a page of `page` units.
///
/// Margin and padding are percentages of the element's own size:
/// left/right of its width, top/bottom of its height. Margin is applied
/// first to place the border box, padding after to get the content box.
pub fn resolve_boxes(element: &Element, page: Size) -> ElementBoxes {
    let frame = Rect::new(
        element.position.x / 100.0 * page.width,
        element.position.y / 100.0 * page.height,
        element.size.width / 100.0 * page.width,
        element.size.height / 100.0 * page.height,
    );
    let inset = |rect: Rect, spacing: Spacing| {
        rect.inset(
            spacing.top / 100.0 * frame.height,
            spacing.right / 100.0 * frame.width,
            spacing.bottom / 100.0 * frame.height,
            spacing.left / 100.0 * frame.width,
        )
    };
    let border_box = inset(frame, resolve_spacing(&element.margin));
    let content_box = inset(border_box, resolve_spacing(&element.padding));
    ElementBoxes {
        frame,
        border_box,
        content_box,
    }
}
