// Event bar hit testing
//
// Resolves a press on a rendered event bar into a body press or one of the
// two edge handles that resize the span.

use super::machine::PressTarget;
use crate::grid::{GridGeometry, GridRect, Point};
use crate::layout::PositionedEvent;

/// Width of the edge handle hit area
pub const HANDLE_SIZE: f32 = 12.0;

/// Hit areas of the resize handles on one bar segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRects {
    pub start: Option<GridRect>,
    pub end: Option<GridRect>,
}

impl HandleRects {
    /// Handles for a bar segment. A segment that continues into a neighbouring
    /// week has no handle on that side, since the real edge is not visible.
    pub fn for_segment(bar: GridRect, positioned: &PositionedEvent<'_>) -> Self {
        let width = HANDLE_SIZE.min(bar.width / 2.0);
        Self {
            start: (!positioned.continues_from_previous)
                .then(|| GridRect::new(bar.x, bar.y, width, bar.height)),
            end: (!positioned.continues_to_next)
                .then(|| GridRect::new(bar.x + bar.width - width, bar.y, width, bar.height)),
        }
    }

    /// Check if a point hits a handle and return which one
    pub fn hit_test(&self, point: Point) -> Option<PressTarget> {
        if self.start.map_or(false, |rect| contains(rect, point)) {
            Some(PressTarget::StartHandle)
        } else if self.end.map_or(false, |rect| contains(rect, point)) {
            Some(PressTarget::EndHandle)
        } else {
            None
        }
    }
}

/// Vertical placement of event bars inside a week row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarMetrics {
    /// Space above the first bar (day number header)
    pub top_inset: f32,
    pub bar_height: f32,
    pub bar_gap: f32,
}

impl Default for BarMetrics {
    fn default() -> Self {
        Self {
            top_inset: 20.0,
            bar_height: 16.0,
            bar_gap: 2.0,
        }
    }
}

/// Screen rectangle of a positioned bar on grid row `week_row`
pub fn bar_rect(
    geometry: &GridGeometry,
    week_row: usize,
    positioned: &PositionedEvent<'_>,
    metrics: BarMetrics,
) -> GridRect {
    let origin = geometry.bounds().origin();
    let cell = geometry.cell_size();
    let columns = (positioned.end_column - positioned.start_column + 1) as f32;

    GridRect::new(
        origin.x + positioned.start_column as f32 * cell.width,
        origin.y
            + week_row as f32 * cell.height
            + metrics.top_inset
            + positioned.row as f32 * (metrics.bar_height + metrics.bar_gap),
        columns * cell.width,
        metrics.bar_height,
    )
}

/// What a press at `point` lands on, if it hits the bar at all
pub fn press_target(bar: GridRect, positioned: &PositionedEvent<'_>, point: Point) -> Option<PressTarget> {
    if !contains(bar, point) {
        return None;
    }
    Some(
        HandleRects::for_segment(bar, positioned)
            .hit_test(point)
            .unwrap_or(PressTarget::Body),
    )
}

fn contains(rect: GridRect, point: Point) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}
