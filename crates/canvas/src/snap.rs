//! Snap-to-guide for dragged elements.

use placard_types::{ElementId, Point, Rect, Size};
use serde::Serialize;

/// Maximum distance in canvas pixels at which an edge or center snaps.
pub const SNAP_THRESHOLD_PX: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at some x.
    Vertical,
    /// A horizontal line at some y.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapEdge {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideSource {
    Page,
    Element(ElementId),
}

/// A guide line that produced a snap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal ones.
    pub offset: f32,
    /// Which edge of the dragged element snapped.
    pub snapped: SnapEdge,
    pub source: GuideSource,
}

impl Guide {
    /// End points spanning the whole canvas.
    pub fn segment(&self, canvas: Size) -> (Point, Point) {
        match self.orientation {
            GuideOrientation::Vertical => (Point::new(self.offset, 0.0), Point::new(self.offset, canvas.height)),
            GuideOrientation::Horizontal => (Point::new(0.0, self.offset), Point::new(canvas.width, self.offset)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapResult {
    /// Top-left of the dragged element after snapping.
    pub position: Point,
    pub guides: Vec<Guide>,
}

struct Stop {
    offset: f32,
    source: GuideSource,
}

/// Snaps the candidate's edges and center to the page and to every element
/// in `elements` except `exclude`, the one being dragged.
///
/// Only the position moves, never the size. Each axis snaps independently
/// to its nearest stop, and only within [`SNAP_THRESHOLD_PX`].
pub fn snap(candidate: Rect, exclude: &ElementId, elements: &[(ElementId, Rect)], canvas: Size) -> SnapResult {
    let page_stops = |extent: f32| {
        [0.0, extent / 2.0, extent]
            .into_iter()
            .map(|offset| Stop {
                offset,
                source: GuideSource::Page,
            })
            .collect::<Vec<_>>()
    };

    let mut vertical = page_stops(canvas.width);
    let mut horizontal = page_stops(canvas.height);
    for (id, rect) in elements.iter().filter(|(id, _)| id != exclude) {
        for offset in [rect.x, rect.x + rect.width / 2.0, rect.right()] {
            vertical.push(Stop {
                offset,
                source: GuideSource::Element(id.clone()),
            });
        }
        for offset in [rect.y, rect.y + rect.height / 2.0, rect.bottom()] {
            horizontal.push(Stop {
                offset,
                source: GuideSource::Element(id.clone()),
            });
        }
    }

    let mut position = Point::new(candidate.x, candidate.y);
    let mut guides = Vec::new();

    if let Some((delta, guide)) = nearest(candidate.x, candidate.width, &vertical, GuideOrientation::Vertical) {
        position.x += delta;
        guides.push(guide);
    }
    if let Some((delta, guide)) = nearest(candidate.y, candidate.height, &horizontal, GuideOrientation::Horizontal) {
        position.y += delta;
        guides.push(guide);
    }

    SnapResult { position, guides }
}

fn nearest(start: f32, extent: f32, stops: &[Stop], orientation: GuideOrientation) -> Option<(f32, Guide)> {
    let edges = [
        (SnapEdge::Start, start),
        (SnapEdge::Center, start + extent / 2.0),
        (SnapEdge::End, start + extent),
    ];
    let mut best: Option<(f32, Guide)> = None;
    for stop in stops {
        for (edge, value) in edges {
            let delta = stop.offset - value;
            if delta.abs() > SNAP_THRESHOLD_PX {
                continue;
            }
            if best.as_ref().is_none_or(|(d, _)| delta.abs() < d.abs()) {
                best = Some((
                    delta,
                    Guide {
                        orientation,
                        offset: stop.offset,
                        snapped: edge,
                        source: stop.source.clone(),
                    },
                ));
            }
        }
    }
    best
}
