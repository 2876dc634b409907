//! Physical geometry of an element on a document page.

use placard_model::{Element, PageType, resolve_boxes};
use crate::utils::flip_y;
use placard_types::{Point, Rect, Size, mm_to_pt};

/// An element's boxes on the page, both in millimetres and in PDF points.
///
/// Rectangles use a top-left origin with y growing downwards, like the
/// layout model. [`ElementGeometry::pdf_rect`] flips them for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub page: Size,
    pub frame_mm: Rect,
    pub frame: Rect,
    pub border_box: Rect,
    pub content_box: Rect,
}

impl ElementGeometry {
    /// `mm = percent / 100 * page_mm`, with margin applied before the
    /// element origin is taken and padding after.
    pub fn resolve(element: &Element, page_type: PageType) -> Self {
        let page_mm = page_type.dimensions_mm();
        let boxes = resolve_boxes(element, page_mm);
        let factor = mm_to_pt(1.0);
        Self {
            page: Size::new(mm_to_pt(page_mm.width), mm_to_pt(page_mm.height)),
            frame_mm: boxes.frame,
            frame: boxes.frame.scale(factor),
            border_box: boxes.border_box.scale(factor),
            content_box: boxes.content_box.scale(factor),
        }
    }

    /// Center of the authored frame in PDF coordinates.
    pub fn pdf_center(&self) -> Point {
        let center = self.frame.center();
        Point::new(center.x, flip_y(center.y, self.page.height))
    }

    /// Lower-left corner and size of `rect` in PDF coordinates.
    pub fn pdf_rect(&self, rect: Rect) -> Rect {
        Rect::new(rect.x, flip_y(rect.bottom(), self.page.height), rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_model::{ElementKind, Position, SpacingSpec};

    #[test]
    fn percent_maps_to_page_millimetres() {
        let el = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).at(10.0, 20.0, 50.0, 25.0);
        let geom = ElementGeometry::resolve(&el, PageType::A4Portrait);
        assert!((geom.frame_mm.x - 21.0).abs() < 1e-3);
        assert!((geom.frame_mm.y - 59.4).abs() < 1e-3);
        assert!((geom.frame_mm.width - 105.0).abs() < 1e-3);
        assert!((geom.frame_mm.height - 74.25).abs() < 1e-3);
        assert!((geom.frame.width - mm_to_pt(105.0)).abs() < 1e-2);
    }

    #[test]
    fn margin_then_padding_shrink_the_boxes() {
        let mut el = Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 }).at(0.0, 0.0, 50.0, 50.0);
        el.margin = SpacingSpec::all(10.0);
        el.padding = SpacingSpec {
            left: Some(10.0),
            ..Default::default()
        };
        let geom = ElementGeometry::resolve(&el, PageType::Square);
        let frame = geom.frame;
        assert!((geom.border_box.x - frame.width * 0.1).abs() < 1e-3);
        assert!((geom.border_box.width - frame.width * 0.8).abs() < 1e-3);
        assert!((geom.content_box.x - frame.width * 0.2).abs() < 1e-3);
        assert!((geom.content_box.height - geom.border_box.height).abs() < 1e-3);
    }

    #[test]
    fn pdf_rect_flips_the_y_axis() {
        let el = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).at(0.0, 0.0, 50.0, 10.0);
        let geom = ElementGeometry::resolve(&el, PageType::Square);
        let flipped = geom.pdf_rect(geom.frame);
        assert!((flipped.y - geom.page.height * 0.9).abs() < 1e-2);
        assert!((geom.pdf_center().y - geom.page.height * 0.95).abs() < 1e-2);
    }
}
