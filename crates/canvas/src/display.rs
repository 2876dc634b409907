//! The display list a host toolkit draws, in canvas pixels.

use crate::mapping::CanvasMapping;
use crate::snap::Guide;
use log::debug;
use placard_layout::{FontLibrary, PlacedLine, layout_text};
use placard_model::{
    BorderStyle, BoxStyle, Color, Element, ElementKind, FieldValues, MissingFieldPolicy, TextOverflow, resolve_boxes,
};
use placard_types::{ElementId, Point, Rect, Size};
use serde::Serialize;

/// Distance of the rotate handle above the selection box.
pub const ROTATE_HANDLE_OFFSET_PX: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
    /// Empty for solid lines.
    pub dash: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextVisual {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    /// Line and run positions are relative to the content box.
    pub lines: Vec<PlacedLine>,
    pub shadow: Option<(Point, Color)>,
    /// Clip drawing to the content box.
    pub clip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ElementContent {
    Text(TextVisual),
    QrPlaceholder { payload: String },
    ImagePlaceholder { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementVisual {
    pub id: ElementId,
    pub frame: Rect,
    pub border_box: Rect,
    pub content_box: Rect,
    /// Degrees around the frame center.
    pub rotation: f32,
    pub opacity: f32,
    pub background: Option<Color>,
    pub border: Option<Stroke>,
    pub corner_radius: f32,
    pub content: ElementContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleKind {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Rotate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum CanvasShape {
    Element(ElementVisual),
    SelectionOutline { id: ElementId, rect: Rect, rotation: f32 },
    Handle { kind: HandleKind, center: Point },
    GuideLine { from: Point, to: Point },
}

pub(crate) fn border_stroke(style: &BoxStyle, scale: f32) -> Option<Stroke> {
    if !style.has_border() {
        return None;
    }
    let width = style.border_width * scale;
    let dash = match style.border_style {
        BorderStyle::Dashed => vec![width * 3.0, width * 2.0],
        BorderStyle::Dotted => vec![width, width],
        _ => Vec::new(),
    };
    Some(Stroke {
        width,
        color: style.border_color.clone(),
        dash,
    })
}

pub(crate) fn element_visual(
    element: &Element,
    mapping: &CanvasMapping,
    fields: &FieldValues,
    fonts: &FontLibrary,
) -> ElementVisual {
    let boxes = resolve_boxes(element, mapping.canvas_size());
    let px_per_pt = mapping.px_per_pt();
    let text = element
        .resolve_text(fields, MissingFieldPolicy::Placeholder)
        .unwrap_or_default();

    let content = match element.kind {
        ElementKind::Text => {
            let style = &element.text_style;
            let metrics = fonts.metrics_for(style);
            let content_pt = Size::new(
                boxes.content_box.width / px_per_pt,
                boxes.content_box.height / px_per_pt,
            );
            let block = layout_text(element, &text, content_pt, metrics.as_ref());
            if block.shrunk {
                debug!(
                    "Text in '{}' shrunk from {}pt to {}pt to fit",
                    element.id, style.font_size, block.font_size
                );
            }
            let block = block.scaled(px_per_pt);
            ElementContent::Text(TextVisual {
                font_family: style.font_family.clone(),
                font_size: block.font_size,
                bold: style.font_weight.is_bold(),
                italic: style.font_style.is_slanted(),
                color: style.color.clone(),
                lines: block.lines,
                shadow: style.text_shadow.as_ref().map(|s| {
                    (
                        Point::new(s.offset_x * px_per_pt, s.offset_y * px_per_pt),
                        s.color.clone(),
                    )
                }),
                clip: style.overflow != TextOverflow::Visible,
            })
        }
        ElementKind::QrCode => ElementContent::QrPlaceholder { payload: text },
        ElementKind::Image => ElementContent::ImagePlaceholder { label: text },
    };

    let radius = boxes.border_box.width.min(boxes.border_box.height) * element.box_style.border_radius / 100.0;
    ElementVisual {
        id: element.id.clone(),
        frame: boxes.frame,
        border_box: boxes.border_box,
        content_box: boxes.content_box,
        rotation: element.rotation,
        opacity: element.opacity,
        background: element
            .box_style
            .background_color
            .clone()
            .filter(|c| !c.is_transparent()),
        border: border_stroke(&element.box_style, px_per_pt),
        corner_radius: radius,
        content,
    }
}

/// Eight resize handles on the box edges plus one rotate handle above it.
pub(crate) fn handles(bounds: Rect) -> Vec<CanvasShape> {
    let (l, c, r) = (bounds.x, bounds.x + bounds.width / 2.0, bounds.right());
    let (t, m, b) = (bounds.y, bounds.y + bounds.height / 2.0, bounds.bottom());
    [
        (HandleKind::TopLeft, l, t),
        (HandleKind::TopCenter, c, t),
        (HandleKind::TopRight, r, t),
        (HandleKind::MiddleLeft, l, m),
        (HandleKind::MiddleRight, r, m),
        (HandleKind::BottomLeft, l, b),
        (HandleKind::BottomCenter, c, b),
        (HandleKind::BottomRight, r, b),
        (HandleKind::Rotate, c, t - ROTATE_HANDLE_OFFSET_PX),
    ]
    .into_iter()
    .map(|(kind, x, y)| CanvasShape::Handle {
        kind,
        center: Point::new(x, y),
    })
    .collect()
}

pub(crate) fn guide_line(guide: &Guide, canvas: Size) -> CanvasShape {
    let (from, to) = guide.segment(canvas);
    CanvasShape::GuideLine { from, to }
}

/// Smallest rectangle containing all of `rects`.
pub(crate) fn union(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|a, b| {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Rect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
    })
}
