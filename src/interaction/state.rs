use chrono::NaiveDate;

use crate::grid::Point;
use crate::layout::PreviewSpan;
use crate::models::event::Event;

/// Phase of the one gesture that may be in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    #[default]
    None,
    /// Pressed on an event body, not yet moved past the drag threshold
    Pending,
    Dragging,
    ResizingStart,
    ResizingEnd,
}

impl GestureMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureMode::None)
    }

    /// Modes whose preview may differ from the stored dates
    pub fn is_manipulating(&self) -> bool {
        matches!(
            self,
            GestureMode::Dragging | GestureMode::ResizingStart | GestureMode::ResizingEnd
        )
    }
}

/// The in-progress gesture, owned by the state machine and updated in place.
///
/// Layout reads it through [`GestureState::preview`]; nothing else mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    pub(super) mode: GestureMode,
    /// Snapshot of the event taken at pointer-down
    pub(super) target: Option<Event>,
    pub(super) press_point: Point,
    pub(super) preview_start: Option<NaiveDate>,
    pub(super) preview_end: Option<NaiveDate>,
}

impl GestureState {
    pub(super) fn begin(mode: GestureMode, event: &Event, press_point: Point) -> Self {
        Self {
            mode,
            press_point,
            preview_start: Some(event.start_date()),
            preview_end: Some(event.end_date()),
            target: Some(event.clone()),
        }
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_active()
    }

    pub fn target(&self) -> Option<&Event> {
        self.target.as_ref()
    }

    pub fn target_event_id(&self) -> Option<&str> {
        self.target.as_ref().map(|event| event.id.as_str())
    }

    pub fn press_point(&self) -> Point {
        self.press_point
    }

    /// Tentative start date; `None` when no gesture is active
    pub fn preview_start(&self) -> Option<NaiveDate> {
        self.preview_start.filter(|_| self.is_active())
    }

    pub fn preview_end(&self) -> Option<NaiveDate> {
        self.preview_end.filter(|_| self.is_active())
    }

    /// Span the layout should use for the target while it is being moved or
    /// resized. A pending press shows the stored dates, so it yields `None`.
    pub fn preview(&self) -> Option<PreviewSpan<'_>> {
        if !self.mode.is_manipulating() {
            return None;
        }
        Some(PreviewSpan {
            event: self.target.as_ref()?,
            start: self.preview_start?,
            end: self.preview_end?,
        })
    }

    /// True when the preview differs from the snapshot's stored dates
    pub fn preview_changed(&self) -> bool {
        match (&self.target, self.preview_start, self.preview_end) {
            (Some(event), Some(start), Some(end)) => {
                start != event.start_date() || end != event.end_date()
            }
            _ => false,
        }
    }
}
