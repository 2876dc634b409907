//! Positioned elements in percentage page-space.

use crate::error::ModelError;
use crate::field::{FieldValues, MissingFieldPolicy, SemanticField};
use crate::style::{BoxStyle, TextStyle};
use placard_types::ElementId;
use serde::{Deserialize, Serialize};

/// Smallest width/height (percent of the page) an element may have after an
/// interactive transform.
pub const MIN_ELEMENT_PERCENT: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Text,
    QrCode,
    Image,
}

/// Top-left corner, percent of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Width and height, percent of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

/// Per-side spacing as authored: any side may be left out. Values are
/// percentages of the element's own size. See
/// [`resolve_spacing`](crate::resolve_spacing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f32>,
}

impl SpacingSpec {
    pub fn all(value: f32) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<SemanticField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub position: Position,
    pub size: Dimensions,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub padding: SpacingSpec,
    #[serde(default)]
    pub margin: SpacingSpec,
    #[serde(default)]
    pub text_style: TextStyle,
    #[serde(default)]
    pub box_style: BoxStyle,
}

impl Element {
    /// Creates an element of `kind` with a fresh id and the default size for
    /// that kind, centered on `center` (percent of page) and kept on the page.
    pub fn new(kind: ElementKind, center: Position) -> Self {
        let size = match kind {
            ElementKind::Text => Dimensions {
                width: 60.0,
                height: 10.0,
            },
            ElementKind::QrCode => Dimensions {
                width: 30.0,
                height: 30.0,
            },
            ElementKind::Image => Dimensions {
                width: 30.0,
                height: 20.0,
            },
        };
        let content = match kind {
            ElementKind::Text => Some("Text".to_string()),
            ElementKind::QrCode => None,
            ElementKind::Image => Some("Image".to_string()),
        };
        Element {
            id: ElementId::generate(),
            kind,
            field: if kind == ElementKind::QrCode {
                Some(SemanticField::QrUrl)
            } else {
                None
            },
            content,
            position: Position {
                x: center.x - size.width / 2.0,
                y: center.y - size.height / 2.0,
            },
            size,
            rotation: 0.0,
            opacity: 1.0,
            padding: SpacingSpec::default(),
            margin: SpacingSpec::default(),
            text_style: TextStyle::default(),
            box_style: BoxStyle::default(),
        }
        .clamped()
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn at(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.position = Position { x, y };
        self.size = Dimensions { width, height };
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn bound_to(mut self, field: SemanticField) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    pub fn with_box_style(mut self, style: BoxStyle) -> Self {
        self.box_style = style;
        self
    }

    /// The text this element displays: the live value of its bound field,
    /// else what `policy` dictates, else its static content.
    pub fn resolve_text(&self, fields: &FieldValues, policy: MissingFieldPolicy) -> Result<String, ModelError> {
        if let Some(field) = self.field {
            if let Some(value) = fields.get(field) {
                return Ok(value.to_string());
            }
            return match policy {
                MissingFieldPolicy::Placeholder => Ok(field.placeholder().to_string()),
                MissingFieldPolicy::Fail => Err(ModelError::MissingField {
                    element: self.id.to_string(),
                    field: field.name().to_string(),
                }),
            };
        }
        let fallback = match self.kind {
            ElementKind::Image => "Image",
            _ => "",
        };
        Ok(self.content.clone().unwrap_or_else(|| fallback.to_string()))
    }

    /// Returns a copy whose size is at least [`MIN_ELEMENT_PERCENT`] and at
    /// most the page, and whose box lies inside `[0, 100]` on both axes.
    pub fn clamped(mut self) -> Self {
        self.size.width = self.size.width.clamp(MIN_ELEMENT_PERCENT, 100.0);
        self.size.height = self.size.height.clamp(MIN_ELEMENT_PERCENT, 100.0);
        self.position.x = self.position.x.clamp(0.0, 100.0 - self.size.width);
        self.position.y = self.position.y.clamp(0.0, 100.0 - self.size.height);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self
    }
}
