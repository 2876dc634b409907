//! Editing state driven by discrete pointer and keyboard events.
//!
//! Every mutation replaces the owned [`Layout`] with a new value. Nothing
//! here locks; the host event loop serializes calls.

use crate::display::{CanvasShape, element_visual, guide_line, handles, union};
use crate::mapping::{Axis, CanvasMapping};
use crate::snap::{Guide, SnapResult, snap};
use crate::transform::{NodeState, NodeTransform, commit_transform};
use log::{debug, info};
use placard_layout::FontLibrary;
use placard_model::{ElementKind, FieldValues, Layout, ModelError, PageType};
use placard_types::{ElementId, Point, Rect};
use std::collections::HashMap;
use thiserror::Error;

/// Smallest width/height in canvas pixels a live resize may produce.
pub const MIN_NODE_PX: f32 = 10.0;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    /// Ctrl/Cmd + A.
    SelectAll,
}

#[derive(Debug, Clone)]
pub struct CanvasState {
    mapping: CanvasMapping,
    layout: Layout,
    selection: Vec<ElementId>,
    nodes: HashMap<ElementId, NodeState>,
    guides: Vec<Guide>,
    transforming: bool,
    fields: FieldValues,
    fonts: FontLibrary,
}

impl CanvasState {
    pub fn new(layout: Layout, scale_factor: f32) -> Self {
        Self {
            mapping: CanvasMapping::new(layout.page_type, scale_factor),
            layout,
            selection: Vec::new(),
            nodes: HashMap::new(),
            guides: Vec::new(),
            transforming: false,
            fields: FieldValues::new(),
            fonts: FontLibrary::new(),
        }
    }

    /// Live values shown instead of placeholders in the preview.
    pub fn with_fields(mut self, fields: FieldValues) -> Self {
        self.fields = fields;
        self
    }

    /// Measures text with `fonts`, e.g. after registering the font files
    /// the host draws with.
    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn mapping(&self) -> &CanvasMapping {
        &self.mapping
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Live node state; identity when no gesture touched the node.
    pub fn node_state(&self, id: &ElementId) -> NodeState {
        self.nodes.get(id).copied().unwrap_or_else(|| {
            NodeState::identity(self.layout.get(id).map(|el| el.rotation).unwrap_or(0.0))
        })
    }

    pub fn set_zoom(&mut self, scale_factor: f32) {
        self.mapping = CanvasMapping::new(self.layout.page_type, scale_factor);
    }

    pub fn set_page_type(&mut self, page_type: PageType) {
        self.layout = self.layout.with_page_type(page_type);
        self.mapping = CanvasMapping::new(page_type, self.mapping.scale_factor());
    }

    /// Replaces the whole layout, dropping selection entries that no longer
    /// exist.
    pub fn set_layout(&mut self, layout: Layout) {
        self.mapping = CanvasMapping::new(layout.page_type, self.mapping.scale_factor());
        self.layout = layout;
        let layout = &self.layout;
        self.selection.retain(|id| layout.contains(id));
        self.nodes.retain(|id, _| layout.contains(id));
    }

    // ---- selection ----

    /// Selects `id`. `additive` (shift-click) toggles it within the current
    /// selection instead of replacing it. Returns false for unknown ids.
    pub fn select(&mut self, id: &ElementId, additive: bool) -> bool {
        if !self.layout.contains(id) {
            return false;
        }
        if additive {
            if self.is_selected(id) {
                self.selection.retain(|s| s != id);
            } else {
                self.selection.push(id.clone());
            }
        } else {
            self.selection = vec![id.clone()];
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self.layout.ids();
    }

    /// Removes every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let before = self.layout.elements.len();
        self.layout = self.layout.remove(&self.selection);
        for id in &self.selection {
            self.nodes.remove(id);
        }
        self.selection.clear();
        let removed = before - self.layout.elements.len();
        info!("Deleted {} element(s)", removed);
        removed
    }

    /// Returns true when the key was handled.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Delete | Key::Backspace => self.delete_selected() > 0,
            Key::Escape => {
                let had = !self.selection.is_empty();
                self.clear_selection();
                had
            }
            Key::SelectAll => {
                self.select_all();
                true
            }
        }
    }

    // ---- creation ----

    /// Adds an element of `kind` centered on `drop_point` (canvas pixels),
    /// kept inside the page, and selects it.
    pub fn add_element(&mut self, kind: ElementKind, drop_point: Point) -> ElementId {
        let center = self.mapping.point_to_percent(drop_point);
        let (layout, id) = self.layout.add(kind, center);
        self.layout = layout;
        self.selection = vec![id.clone()];
        id
    }

    // ---- drag ----

    fn frame_px(&self, id: &ElementId) -> Result<Rect, CanvasError> {
        self.layout
            .get(id)
            .map(|el| self.mapping.element_rect(el))
            .ok_or_else(|| CanvasError::UnknownElement(id.clone()))
    }

    /// Clamps a candidate top-left so the element stays on the canvas.
    pub fn drag_bound(&self, id: &ElementId, candidate: Point) -> Result<Point, CanvasError> {
        let frame = self.frame_px(id)?;
        let canvas = self.mapping.canvas_size();
        Ok(Point::new(
            candidate.x.clamp(0.0, (canvas.width - frame.width).max(0.0)),
            candidate.y.clamp(0.0, (canvas.height - frame.height).max(0.0)),
        ))
    }

    /// Live drag step. With `snap_enabled` the bounded position snaps to
    /// the page and to other elements, and the guides that fired are kept
    /// for the display list.
    pub fn drag_move(&mut self, id: &ElementId, candidate: Point, snap_enabled: bool) -> Result<SnapResult, CanvasError> {
        let bounded = self.drag_bound(id, candidate)?;
        let frame = self.frame_px(id)?;
        let result = if snap_enabled {
            let frames: Vec<(ElementId, Rect)> = self
                .layout
                .elements
                .iter()
                .map(|el| (el.id.clone(), self.mapping.element_rect(el)))
                .collect();
            let snapped = snap(
                Rect::new(bounded.x, bounded.y, frame.width, frame.height),
                id,
                &frames,
                self.mapping.canvas_size(),
            );
            SnapResult {
                position: self.drag_bound(id, snapped.position)?,
                guides: snapped.guides,
            }
        } else {
            SnapResult {
                position: bounded,
                guides: Vec::new(),
            }
        };
        self.guides = result.guides.clone();
        Ok(result)
    }

    /// Commits the drop position in percent and clears guides.
    pub fn drag_end(&mut self, id: &ElementId, final_position: Point) -> Result<(), CanvasError> {
        let bounded = self.drag_bound(id, final_position)?;
        let element = self
            .layout
            .get(id)
            .ok_or_else(|| CanvasError::UnknownElement(id.clone()))?;
        let mut moved = element.clone();
        moved.position = self.mapping.point_to_percent(bounded);
        self.layout = self.layout.replace(moved.clamped())?;
        self.guides.clear();
        debug!("Moved '{}' to {:?}", id, bounded);
        Ok(())
    }

    // ---- resize / rotate ----

    /// Live resize bound: keeps `old` when `new` would be smaller than
    /// [`MIN_NODE_PX`] or leave the canvas.
    pub fn bound_box(&self, old: Rect, new: Rect) -> Rect {
        let canvas = self.mapping.canvas_size();
        let eps = 1e-3;
        let too_small = new.width < MIN_NODE_PX || new.height < MIN_NODE_PX;
        let outside = new.x < -eps || new.y < -eps || new.right() > canvas.width + eps || new.bottom() > canvas.height + eps;
        if too_small || outside { old } else { new }
    }

    /// Starts a gesture on the selection with identity live state.
    pub fn begin_transform(&mut self) {
        self.transforming = true;
        for id in &self.selection {
            let rotation = self.layout.get(id).map(|el| el.rotation).unwrap_or(0.0);
            self.nodes.insert(id.clone(), NodeState::identity(rotation));
        }
    }

    pub fn is_transforming(&self) -> bool {
        self.transforming
    }

    /// Multiplies the node's live scale by `(sx, sy)`.
    pub fn apply_scale(&mut self, id: &ElementId, sx: f32, sy: f32) -> Result<(), CanvasError> {
        let mut node = self.node_state(id);
        if !self.layout.contains(id) {
            return Err(CanvasError::UnknownElement(id.clone()));
        }
        node.scale_x *= sx;
        node.scale_y *= sy;
        self.nodes.insert(id.clone(), node);
        Ok(())
    }

    pub fn set_rotation(&mut self, id: &ElementId, degrees: f32) -> Result<(), CanvasError> {
        if !self.layout.contains(id) {
            return Err(CanvasError::UnknownElement(id.clone()));
        }
        let mut node = self.node_state(id);
        node.rotation = degrees;
        self.nodes.insert(id.clone(), node);
        Ok(())
    }

    /// Commits each node's final transform independently, then resets each
    /// committed node's scale to 1.
    pub fn transform_end(&mut self, transforms: &[NodeTransform]) -> Result<(), CanvasError> {
        let mut layout = self.layout.clone();
        for node in transforms {
            let element = layout
                .get(&node.id)
                .ok_or_else(|| CanvasError::UnknownElement(node.id.clone()))?;
            let updated = commit_transform(element, node, &self.mapping);
            layout = layout.replace(updated)?;
        }
        self.layout = layout;
        for node in transforms {
            self.nodes.insert(node.id.clone(), NodeState::identity(node.rotation));
        }
        self.transforming = false;
        Ok(())
    }

    /// Builds the final transforms from the live node state of every selected
    /// element and commits them.
    pub fn commit_selection_transform(&mut self) -> Result<(), CanvasError> {
        let transforms: Vec<NodeTransform> = self
            .selection
            .iter()
            .filter_map(|id| {
                let el = self.layout.get(id)?;
                let node = self.node_state(id);
                Some(NodeTransform {
                    id: id.clone(),
                    position: self.mapping.position_to_px(el.position),
                    scale_x: node.scale_x,
                    scale_y: node.scale_y,
                    rotation: node.rotation,
                })
            })
            .collect();
        self.transform_end(&transforms)
    }

    // ---- drawing ----

    /// Everything the host draws, back to front: elements in z-order, then
    /// selection outlines, transformer handles and active guides.
    pub fn display_list(&self) -> Vec<CanvasShape> {
        let mut shapes: Vec<CanvasShape> = self
            .layout
            .elements
            .iter()
            .map(|el| CanvasShape::Element(element_visual(el, &self.mapping, &self.fields, &self.fonts)))
            .collect();

        let selected: Vec<(ElementId, Rect, f32)> = self
            .selection
            .iter()
            .filter_map(|id| {
                let el = self.layout.get(id)?;
                let node = self.node_state(id);
                let frame = self.mapping.element_rect(el);
                let live = Rect::new(frame.x, frame.y, frame.width * node.scale_x, frame.height * node.scale_y);
                Some((id.clone(), live, node.rotation))
            })
            .collect();

        for (id, rect, rotation) in &selected {
            shapes.push(CanvasShape::SelectionOutline {
                id: id.clone(),
                rect: *rect,
                rotation: *rotation,
            });
        }
        if let Some(bounds) = union(selected.iter().map(|(_, rect, _)| *rect)) {
            shapes.extend(handles(bounds));
        }

        let canvas = self.mapping.canvas_size();
        shapes.extend(self.guides.iter().map(|g| guide_line(g, canvas)));
        shapes
    }

    /// Width of an element in canvas pixels, including any live scale.
    pub fn live_width_px(&self, id: &ElementId) -> Option<f32> {
        let el = self.layout.get(id)?;
        Some(self.mapping.to_px(el.size.width, Axis::Horizontal) * self.node_state(id).scale_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{ElementContent, HandleKind};
    use placard_model::{Element, Position, SemanticField};

    fn element(id: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::new(ElementKind::Image, Position { x: 50.0, y: 50.0 })
            .with_id(id)
            .at(x, y, w, h)
    }

    fn state() -> CanvasState {
        let layout = Layout::new(PageType::Square)
            .with_element(element("a", 10.0, 10.0, 20.0, 20.0))
            .with_element(element("b", 60.0, 60.0, 30.0, 10.0));
        CanvasState::new(layout, 2.0)
    }

    fn id(s: &str) -> ElementId {
        ElementId::new(s)
    }

    #[test]
    fn select_replaces_or_toggles() {
        let mut s = state();
        assert!(s.select(&id("a"), false));
        assert!(s.select(&id("b"), true));
        assert_eq!(s.selection(), &[id("a"), id("b")]);
        s.select(&id("a"), true);
        assert_eq!(s.selection(), &[id("b")]);
        s.select(&id("a"), false);
        assert_eq!(s.selection(), &[id("a")]);
        assert!(!s.select(&id("ghost"), false));
    }

    #[test]
    fn keys_drive_selection_and_deletion() {
        let mut s = state();
        assert!(s.handle_key(Key::SelectAll));
        assert_eq!(s.selection().len(), 2);
        assert!(s.handle_key(Key::Escape));
        assert!(s.selection().is_empty());
        assert!(!s.handle_key(Key::Delete));

        s.select(&id("b"), false);
        assert!(s.handle_key(Key::Backspace));
        assert_eq!(s.layout().ids(), vec![id("a")]);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn added_elements_are_selected_and_on_page() {
        let mut s = state();
        let new_id = s.add_element(ElementKind::Text, Point::new(399.0, 399.0));
        assert_eq!(s.selection(), &[new_id.clone()]);
        let el = s.layout().get(&new_id).unwrap();
        assert!(el.position.x + el.size.width <= 100.0 + 1e-4);
        assert!(el.position.y + el.size.height <= 100.0 + 1e-4);
    }

    #[test]
    fn drag_bound_keeps_element_on_canvas() {
        let s = state();
        // canvas is 400x400, "a" is 80x80 px
        let p = s.drag_bound(&id("a"), Point::new(-30.0, 390.0)).unwrap();
        assert_eq!(p.x, 0.0);
        assert!((p.y - 320.0).abs() < 1e-3);
        assert!(matches!(
            s.drag_bound(&id("zz"), Point::new(0.0, 0.0)),
            Err(CanvasError::UnknownElement(_))
        ));
    }

    #[test]
    fn drag_with_snap_reports_guides_and_drag_end_clears_them() {
        let mut s = state();
        // "b" left edge is 240px; drop "a" so its right edge lands at 237
        let result = s.drag_move(&id("a"), Point::new(157.0, 21.0), true).unwrap();
        assert!((result.position.x - 160.0).abs() < 1e-3);
        assert!(!s.guides().is_empty());
        assert!(
            s.display_list()
                .iter()
                .any(|shape| matches!(shape, CanvasShape::GuideLine { .. }))
        );

        s.drag_end(&id("a"), result.position).unwrap();
        assert!(s.guides().is_empty());
        let a = s.layout().get(&id("a")).unwrap();
        assert!((a.position.x - 40.0).abs() < 1e-3);
    }

    #[test]
    fn bound_box_rejects_tiny_or_offcanvas_boxes() {
        let s = state();
        let old = Rect::new(10.0, 10.0, 50.0, 50.0);
        assert_eq!(s.bound_box(old, Rect::new(10.0, 10.0, 5.0, 50.0)), old);
        assert_eq!(s.bound_box(old, Rect::new(380.0, 10.0, 50.0, 50.0)), old);
        let ok = Rect::new(12.0, 12.0, 60.0, 40.0);
        assert_eq!(s.bound_box(old, ok), ok);
    }

    #[test]
    fn scale_resets_after_each_commit() {
        let mut s = state();
        s.select(&id("a"), false);
        let original = s.live_width_px(&id("a")).unwrap();

        for _ in 0..2 {
            s.begin_transform();
            s.apply_scale(&id("a"), 0.5, 0.5).unwrap();
            s.commit_selection_transform().unwrap();
            assert_eq!(s.node_state(&id("a")).scale_x, 1.0);
        }

        let width = s.live_width_px(&id("a")).unwrap();
        assert!((width / original - 0.25).abs() < 1e-4);
        assert!((s.layout().get(&id("a")).unwrap().size.width - 5.0).abs() < 1e-4);
    }

    #[test]
    fn multi_selection_updates_each_node_independently() {
        let mut s = state();
        s.select_all();
        s.begin_transform();
        s.apply_scale(&id("a"), 2.0, 1.0).unwrap();
        s.apply_scale(&id("b"), 2.0, 1.0).unwrap();
        s.set_rotation(&id("b"), -30.0).unwrap();
        s.commit_selection_transform().unwrap();

        let a = s.layout().get(&id("a")).unwrap();
        let b = s.layout().get(&id("b")).unwrap();
        assert!((a.size.width - 40.0).abs() < 1e-3);
        assert!((b.size.width - 60.0).abs() < 1e-3);
        // "b" would overflow at x=60, so it is pulled back to 40
        assert!((b.position.x - 40.0).abs() < 1e-3);
        assert_eq!(a.rotation, 0.0);
        assert_eq!(b.rotation, -30.0);
        assert!(!s.is_transforming());
    }

    #[test]
    fn display_list_orders_elements_then_chrome() {
        let mut s = state();
        let label = Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 })
            .with_id("title")
            .bound_to(SemanticField::BusinessName);
        s.set_layout(s.layout().clone().with_element(label));
        s.select(&id("a"), false);

        let shapes = s.display_list();
        let ids: Vec<String> = shapes
            .iter()
            .filter_map(|shape| match shape {
                CanvasShape::Element(v) => Some(v.id.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["a", "b", "title"]);

        let text = shapes
            .iter()
            .find_map(|shape| match shape {
                CanvasShape::Element(v) => match &v.content {
                    ElementContent::Text(t) => Some(t),
                    _ => None,
                },
                _ => None,
            })
            .unwrap();
        assert_eq!(text.lines[0].text, "Your Business Name");

        let handle_count = shapes
            .iter()
            .filter(|shape| matches!(shape, CanvasShape::Handle { .. }))
            .count();
        assert_eq!(handle_count, 9);
        assert!(shapes.iter().any(|shape| matches!(
            shape,
            CanvasShape::Handle {
                kind: HandleKind::Rotate,
                ..
            }
        )));
        assert!(matches!(shapes[3], CanvasShape::SelectionOutline { .. }));
    }

    #[test]
    fn display_list_serializes_for_the_host() {
        let s = state();
        let json = serde_json::to_value(s.display_list()).unwrap();
        assert_eq!(json[0]["shape"], "element");
        assert_eq!(json[0]["content"]["kind"], "imagePlaceholder");
    }
}
