//! The page-type selection plus the ordered element collection.
//!
//! Every mutating operation returns a new `Layout` rather than editing in
//! place, so a value handed to a renderer never changes underneath it.

use crate::element::{Element, ElementKind, Position};
use crate::error::ModelError;
use crate::page::PageType;
use log::debug;
use placard_types::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub page_type: PageType,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Layout {
    pub fn new(page_type: PageType) -> Self {
        Self {
            page_type,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|el| el.id.clone()).collect()
    }

    /// Appends a freshly created element of `kind` centered on `center` and
    /// returns the new layout together with the new element's id.
    pub fn add(&self, kind: ElementKind, center: Position) -> (Layout, ElementId) {
        let element = Element::new(kind, center);
        let id = element.id.clone();
        debug!("Adding {:?} element '{}'", kind, id);
        let mut next = self.clone();
        next.elements.push(element);
        (next, id)
    }

    /// Replaces the element with the same id, keeping its z-order slot.
    pub fn replace(&self, element: Element) -> Result<Layout, ModelError> {
        let index = self
            .elements
            .iter()
            .position(|el| el.id == element.id)
            .ok_or_else(|| ModelError::ElementNotFound(element.id.to_string()))?;
        let mut next = self.clone();
        next.elements[index] = element;
        Ok(next)
    }

    /// Filters out every element whose id is in `ids`. Unknown ids are ignored.
    pub fn remove(&self, ids: &[ElementId]) -> Layout {
        let doomed: HashSet<&ElementId> = ids.iter().collect();
        Layout {
            page_type: self.page_type,
            elements: self
                .elements
                .iter()
                .filter(|el| !doomed.contains(&el.id))
                .cloned()
                .collect(),
        }
    }

    pub fn bring_to_front(&self, id: &ElementId) -> Result<Layout, ModelError> {
        self.reorder(id, true)
    }

    pub fn send_to_back(&self, id: &ElementId) -> Result<Layout, ModelError> {
        self.reorder(id, false)
    }

    fn reorder(&self, id: &ElementId, to_front: bool) -> Result<Layout, ModelError> {
        let index = self
            .elements
            .iter()
            .position(|el| &el.id == id)
            .ok_or_else(|| ModelError::ElementNotFound(id.to_string()))?;
        let mut next = self.clone();
        let element = next.elements.remove(index);
        if to_front {
            next.elements.push(element);
        } else {
            next.elements.insert(0, element);
        }
        Ok(next)
    }

    pub fn with_page_type(&self, page_type: PageType) -> Layout {
        Layout {
            page_type,
            elements: self.elements.clone(),
        }
    }

    /// Checks id uniqueness and that every element has a positive size.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for el in &self.elements {
            if !seen.insert(&el.id) {
                return Err(ModelError::DuplicateElement(el.id.to_string()));
            }
            if !(el.size.width > 0.0 && el.size.height > 0.0) {
                return Err(ModelError::InvalidElement {
                    id: el.id.to_string(),
                    reason: format!("size must be positive, got {}x{}", el.size.width, el.size.height),
                });
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Layout, ModelError> {
        let layout: Layout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str) -> Element {
        Element::new(ElementKind::Text, Position { x: 50.0, y: 50.0 }).with_id(id)
    }

    fn sample() -> Layout {
        Layout::new(PageType::A5Landscape)
            .with_element(text("a"))
            .with_element(text("b"))
            .with_element(text("c"))
    }

    fn order(layout: &Layout) -> Vec<String> {
        layout.elements.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn add_appends_on_top_with_fresh_id() {
        let layout = sample();
        let (next, id) = layout.add(ElementKind::QrCode, Position { x: 20.0, y: 20.0 });
        assert_eq!(layout.elements.len(), 3);
        assert_eq!(next.elements.len(), 4);
        assert_eq!(next.elements.last().map(|e| &e.id), Some(&id));
    }

    #[test]
    fn replace_keeps_slot_and_leaves_original_untouched() {
        let layout = sample();
        let mut b = layout.get(&ElementId::new("b")).cloned().unwrap();
        b.rotation = 45.0;
        let next = layout.replace(b).unwrap();
        assert_eq!(order(&next), vec!["a", "b", "c"]);
        assert_eq!(next.elements[1].rotation, 45.0);
        assert_eq!(layout.elements[1].rotation, 0.0);
    }

    #[test]
    fn replace_unknown_id_fails() {
        let err = sample().replace(text("zzz")).unwrap_err();
        assert!(matches!(err, ModelError::ElementNotFound(id) if id == "zzz"));
    }

    #[test]
    fn remove_filters_by_id() {
        let next = sample().remove(&[ElementId::new("a"), ElementId::new("missing")]);
        assert_eq!(order(&next), vec!["b", "c"]);
    }

    #[test]
    fn reordering_changes_z_order() {
        let layout = sample();
        let front = layout.bring_to_front(&ElementId::new("a")).unwrap();
        assert_eq!(order(&front), vec!["b", "c", "a"]);
        let back = layout.send_to_back(&ElementId::new("c")).unwrap();
        assert_eq!(order(&back), vec!["c", "a", "b"]);
    }

    #[test]
    fn json_round_trip_rejects_duplicates() {
        let layout = sample();
        let json = layout.to_json().unwrap();
        assert_eq!(Layout::from_json(&json).unwrap(), layout);

        let dup = Layout::new(PageType::Square)
            .with_element(text("x"))
            .with_element(text("x"));
        let json = serde_json::to_string(&dup).unwrap();
        assert!(matches!(
            Layout::from_json(&json),
            Err(ModelError::DuplicateElement(_))
        ));
    }
}
