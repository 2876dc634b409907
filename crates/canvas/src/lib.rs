//! Headless editing surface for layouts.
//!
//! The host toolkit owns the window and pointer events; this crate owns the
//! percentage/pixel mapping, selection, snapping and transform commits, and
//! hands back a serializable display list to draw.

pub mod display;
pub mod mapping;
pub mod snap;
pub mod state;
pub mod transform;

pub use display::{CanvasShape, ElementContent, ElementVisual, HandleKind, Stroke, TextVisual};
pub use mapping::{Axis, CanvasMapping};
pub use snap::{Guide, GuideOrientation, GuideSource, SNAP_THRESHOLD_PX, SnapEdge, SnapResult, snap};
pub use state::{CanvasError, CanvasState, Key, MIN_NODE_PX};
pub use transform::{NodeState, NodeTransform, commit_transform};
