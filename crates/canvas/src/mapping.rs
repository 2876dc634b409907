//! Percent <-> canvas pixel conversion.

use placard_model::{Dimensions, Element, PageType, Position};
use placard_types::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Maps a page type onto a canvas of `page_mm * scale_factor` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMapping {
    page_type: PageType,
    scale_factor: f32,
}

impl CanvasMapping {
    /// `scale_factor` is canvas pixels per millimetre.
    pub fn new(page_type: PageType, scale_factor: f32) -> Self {
        Self {
            page_type,
            scale_factor: scale_factor.max(f32::EPSILON),
        }
    }

    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn canvas_width(&self) -> f32 {
        self.page_type.dimensions_mm().width * self.scale_factor
    }

    pub fn canvas_height(&self) -> f32 {
        self.page_type.dimensions_mm().height * self.scale_factor
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width(), self.canvas_height())
    }

    fn dimension(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.canvas_width(),
            Axis::Vertical => self.canvas_height(),
        }
    }

    pub fn to_px(&self, percent: f32, axis: Axis) -> f32 {
        percent / 100.0 * self.dimension(axis)
    }

    pub fn to_percent(&self, px: f32, axis: Axis) -> f32 {
        px / self.dimension(axis) * 100.0
    }

    pub fn point_to_percent(&self, point: Point) -> Position {
        Position {
            x: self.to_percent(point.x, Axis::Horizontal),
            y: self.to_percent(point.y, Axis::Vertical),
        }
    }

    pub fn position_to_px(&self, position: Position) -> Point {
        Point::new(
            self.to_px(position.x, Axis::Horizontal),
            self.to_px(position.y, Axis::Vertical),
        )
    }

    /// The element's unrotated frame in canvas pixels.
    pub fn element_rect(&self, element: &Element) -> Rect {
        Rect::new(
            self.to_px(element.position.x, Axis::Horizontal),
            self.to_px(element.position.y, Axis::Vertical),
            self.to_px(element.size.width, Axis::Horizontal),
            self.to_px(element.size.height, Axis::Vertical),
        )
    }

    pub fn rect_to_percent(&self, rect: Rect) -> (Position, Dimensions) {
        (
            Position {
                x: self.to_percent(rect.x, Axis::Horizontal),
                y: self.to_percent(rect.y, Axis::Vertical),
            },
            Dimensions {
                width: self.to_percent(rect.width, Axis::Horizontal),
                height: self.to_percent(rect.height, Axis::Vertical),
            },
        )
    }

    /// Pixels per typographic point at this zoom.
    pub fn px_per_pt(&self) -> f32 {
        self.scale_factor * placard_types::MM_PER_PT
    }
}
