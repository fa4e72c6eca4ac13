use chrono::{Duration, NaiveDate};

use super::state::{GestureMode, GestureState};
use crate::grid::{DayList, GridGeometry, Point};
use crate::models::event::{DateChange, Event};
use crate::models::settings::DEFAULT_DRAG_THRESHOLD_PX;

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Body,
    /// Left edge handle, moves the start date
    StartHandle,
    /// Right edge handle, moves the end date
    EndHandle,
}

/// Effect of a pointer-move on the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// The press just turned into a drag
    pub threshold_crossed: bool,
    /// Preview dates differ from before the move
    pub preview_changed: bool,
}

/// A finished move or resize that needs to be written to the store
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRequest {
    /// The event as it was when the gesture started
    pub event: Event,
    pub change: DateChange,
}

/// How a gesture ended
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// No gesture was active
    Ignored,
    /// Released below the drag threshold; the event is now selected
    Selected(String),
    /// Moved or resized back onto the original dates
    Unchanged,
    Commit(CommitRequest),
    Cancelled,
}

/// Turns pointer input into gesture previews and commit requests.
///
/// Exactly one gesture can be active; it lives in a single [`GestureState`]
/// that is updated in place and reset on release or cancel.
#[derive(Debug, Clone)]
pub struct InteractionStateMachine {
    gesture: GestureState,
    selected: Option<String>,
    drag_threshold: f32,
}

impl Default for InteractionStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD_PX)
    }
}

impl InteractionStateMachine {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            gesture: GestureState::default(),
            selected: None,
            drag_threshold,
        }
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, event_id: impl Into<String>) {
        self.selected = Some(event_id.into());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Start a gesture on `event`.
    ///
    /// Returns `false` and leaves everything untouched while another gesture
    /// is in progress. Handle presses only resize the selected event; on any
    /// other event they behave like a body press.
    pub fn pointer_down(&mut self, event: &Event, target: PressTarget, point: Point) -> bool {
        if self.gesture.is_active() {
            log::debug!(
                "Ignoring press on {} while gesture on {:?} is active",
                event.id,
                self.gesture.target_event_id()
            );
            return false;
        }

        let is_selected = self.selected.as_deref() == Some(event.id.as_str());
        let mode = match target {
            PressTarget::StartHandle if is_selected => GestureMode::ResizingStart,
            PressTarget::EndHandle if is_selected => GestureMode::ResizingEnd,
            _ => GestureMode::Pending,
        };

        log::debug!("Gesture {:?} started on event {}", mode, event.id);
        self.gesture = GestureState::begin(mode, event, point);
        true
    }

    /// Feed a pointer position. `geometry` and `days` describe the grid the
    /// pointer is over.
    pub fn pointer_move(&mut self, point: Point, geometry: &GridGeometry, days: &DayList) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        if !point.x.is_finite() || !point.y.is_finite() {
            log::debug!("Ignoring non-finite pointer position {:?}", point);
            return outcome;
        }

        if self.gesture.mode == GestureMode::Pending {
            let dx = point.x - self.gesture.press_point.x;
            let dy = point.y - self.gesture.press_point.y;
            if dx.abs() <= self.drag_threshold && dy.abs() <= self.drag_threshold {
                return outcome;
            }
            log::debug!("Drag threshold crossed for {:?}", self.gesture.target_event_id());
            self.gesture.mode = GestureMode::Dragging;
            outcome.threshold_crossed = true;
        }

        let Some(event) = self.gesture.target.as_ref() else {
            return outcome;
        };
        let (Some(current_start), Some(current_end)) =
            (self.gesture.preview_start, self.gesture.preview_end)
        else {
            return outcome;
        };

        let pointed = geometry.date_at(point, days);
        let original_start = event.start_date();
        let original_end = event.end_date();

        let (start, end) = match self.gesture.mode {
            GestureMode::Dragging => rigid_span(pointed, event.duration_days(), days),
            GestureMode::ResizingStart => (pointed.min(original_end), original_end),
            GestureMode::ResizingEnd => (original_start, pointed.max(original_start)),
            GestureMode::None | GestureMode::Pending => return outcome,
        };

        if start != current_start || end != current_end {
            self.gesture.preview_start = Some(start);
            self.gesture.preview_end = Some(end);
            outcome.preview_changed = true;
        }
        outcome
    }

    /// Finish the gesture. The state is always reset, whatever the outcome.
    pub fn pointer_up(&mut self) -> GestureOutcome {
        let gesture = std::mem::take(&mut self.gesture);
        let Some(event) = gesture.target.as_ref() else {
            return GestureOutcome::Ignored;
        };

        match gesture.mode {
            GestureMode::None => GestureOutcome::Ignored,
            GestureMode::Pending => {
                log::debug!("Tap selected event {}", event.id);
                self.selected = Some(event.id.clone());
                GestureOutcome::Selected(event.id.clone())
            }
            GestureMode::Dragging | GestureMode::ResizingStart | GestureMode::ResizingEnd => {
                let (Some(start), Some(end)) = (gesture.preview_start, gesture.preview_end) else {
                    return GestureOutcome::Unchanged;
                };
                if !gesture.preview_changed() {
                    return GestureOutcome::Unchanged;
                }
                GestureOutcome::Commit(CommitRequest {
                    change: event.rescheduled(start, end),
                    event: event.clone(),
                })
            }
        }
    }

    /// Abandon the gesture without committing anything
    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        let gesture = std::mem::take(&mut self.gesture);
        if !gesture.is_active() {
            return GestureOutcome::Ignored;
        }
        log::debug!("Gesture on {:?} cancelled", gesture.target_event_id());
        GestureOutcome::Cancelled
    }
}

/// Place a span of `duration_days` starting at `pointed`, shifted as a whole
/// so it stays inside the visible days. A span longer than the grid pins to
/// the first day and keeps its length.
fn rigid_span(pointed: NaiveDate, duration_days: i64, days: &DayList) -> (NaiveDate, NaiveDate) {
    let duration = Duration::days(duration_days.max(0));
    let latest_start = days.last() - duration;
    let start = if latest_start < days.first() {
        days.first()
    } else {
        pointed.clamp(days.first(), latest_start)
    };
    (start, start + duration)
}
