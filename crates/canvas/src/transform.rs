//! Committing resize/rotate gestures back into percentage space.

use crate::mapping::{Axis, CanvasMapping};
use placard_model::{Element, MIN_ELEMENT_PERCENT};
use placard_types::{ElementId, Point};

/// Live, uncommitted state of a node on the surface while a gesture runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
}

impl NodeState {
    pub fn identity(rotation: f32) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            rotation,
        }
    }

    pub fn is_scaled(&self) -> bool {
        self.scale_x != 1.0 || self.scale_y != 1.0
    }
}

/// A node's state at the end of a transform gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransform {
    pub id: ElementId,
    /// Top-left of the node in canvas pixels.
    pub position: Point,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Degrees, stored as-is.
    pub rotation: f32,
}

/// Applies one node's final transform to its element.
///
/// The new size is the node's base pixel size times its scale, converted
/// to percent and held at [`MIN_ELEMENT_PERCENT`] or more. The position is
/// then clamped so the element stays on the page. Rotation is not clamped.
pub fn commit_transform(element: &Element, node: &NodeTransform, mapping: &CanvasMapping) -> Element {
    let node_width = mapping.to_px(element.size.width, Axis::Horizontal);
    let node_height = mapping.to_px(element.size.height, Axis::Vertical);

    let width = (node_width * node.scale_x.abs() / mapping.canvas_width() * 100.0).clamp(MIN_ELEMENT_PERCENT, 100.0);
    let height = (node_height * node.scale_y.abs() / mapping.canvas_height() * 100.0).clamp(MIN_ELEMENT_PERCENT, 100.0);
    let x = mapping.to_percent(node.position.x, Axis::Horizontal).clamp(0.0, 100.0 - width);
    let y = mapping.to_percent(node.position.y, Axis::Vertical).clamp(0.0, 100.0 - height);

    let mut next = element.clone();
    next.position.x = x;
    next.position.y = y;
    next.size.width = width;
    next.size.height = height;
    next.rotation = node.rotation;
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_model::{ElementKind, PageType, Position};

    fn mapping() -> CanvasMapping {
        CanvasMapping::new(PageType::Square, 2.0)
    }

    fn node(el: &Element, sx: f32, sy: f32, rotation: f32) -> NodeTransform {
        NodeTransform {
            id: el.id.clone(),
            position: mapping().position_to_px(el.position),
            scale_x: sx,
            scale_y: sy,
            rotation,
        }
    }

    #[test]
    fn scale_converts_to_percent_size() {
        let el = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).at(10.0, 10.0, 40.0, 20.0);
        let next = commit_transform(&el, &node(&el, 0.5, 2.0, 0.0), &mapping());
        assert!((next.size.width - 20.0).abs() < 1e-4);
        assert!((next.size.height - 40.0).abs() < 1e-4);
        assert!((next.position.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn enforces_minimum_size() {
        let el = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).at(10.0, 10.0, 20.0, 20.0);
        let next = commit_transform(&el, &node(&el, 0.01, 0.01, 0.0), &mapping());
        assert_eq!(next.size.width, MIN_ELEMENT_PERCENT);
        assert_eq!(next.size.height, MIN_ELEMENT_PERCENT);
    }

    #[test]
    fn clamps_position_into_page() {
        let el = Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 }).at(70.0, 80.0, 20.0, 10.0);
        let next = commit_transform(&el, &node(&el, 2.0, 3.0, 0.0), &mapping());
        assert!((next.position.x - 60.0).abs() < 1e-4);
        assert!((next.position.y - 70.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_is_stored_unclamped() {
        let el = Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 });
        let next = commit_transform(&el, &node(&el, 1.0, 1.0, 405.0), &mapping());
        assert_eq!(next.rotation, 405.0);
    }
}
