use super::feedback::{FeedbackCue, FeedbackSink, NoFeedback};
use super::machine::{CommitRequest, GestureOutcome, InteractionStateMachine, MoveOutcome, PressTarget};
use super::state::GestureState;
use crate::grid::{DayList, GridGeometry, Point, Week};
use crate::layout::{layout_week_with_rows, PreviewSpan, WeekLayout};
use crate::models::event::Event;
use crate::models::settings::Settings;
use crate::services::store::{EventStore, StoreError};

/// A date change the store refused. The cached events are left as they were,
/// so the bar snaps back to its stored dates.
#[derive(Debug, thiserror::Error)]
#[error("could not save new dates for event {event_id}")]
pub struct CommitError {
    pub event_id: String,
    #[source]
    pub source: StoreError,
}

/// Drives one calendar view: owns the gesture machine, the cached event list
/// and the store commits go to.
pub struct InteractionController<S: EventStore, F: FeedbackSink = NoFeedback> {
    machine: InteractionStateMachine,
    store: S,
    feedback: F,
    events: Vec<Event>,
    /// Commit handed out by `release` and not yet completed
    saving: Option<CommitRequest>,
    last_error: Option<String>,
    max_rows: usize,
}

impl<S: EventStore> InteractionController<S, NoFeedback> {
    /// Create a controller and load the current events from `store`
    pub fn new(store: S, settings: &Settings) -> Result<Self, StoreError> {
        Self::with_feedback(store, settings, NoFeedback)
    }
}

impl<S: EventStore, F: FeedbackSink> InteractionController<S, F> {
    pub fn with_feedback(store: S, settings: &Settings, feedback: F) -> Result<Self, StoreError> {
        let events = store.list()?;
        log::info!("Loaded {} events", events.len());
        Ok(Self {
            machine: InteractionStateMachine::new(settings.drag_threshold_px),
            store,
            feedback,
            events,
            saving: None,
            last_error: None,
            max_rows: settings.max_rows,
        })
    }

    /// Reload the event list. Refused while a gesture or commit is in flight.
    pub fn refresh(&mut self) -> Result<bool, StoreError> {
        if self.machine.gesture().is_active() || self.saving.is_some() {
            log::debug!("Skipping refresh while a gesture is in progress");
            return Ok(false);
        }
        self.events = self.store.list()?;
        Ok(true)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn gesture(&self) -> &GestureState {
        self.machine.gesture()
    }

    pub fn selected(&self) -> Option<&str> {
        self.machine.selected()
    }

    pub fn clear_selection(&mut self) {
        self.machine.clear_selection();
    }

    /// True while a commit is being written
    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pointer_down(&mut self, event_id: &str, target: PressTarget, point: Point) -> bool {
        if let Some(saving) = &self.saving {
            log::debug!("Ignoring press on {} while {} is saving", event_id, saving.event.id);
            return false;
        }
        let Some(event) = self.events.iter().find(|event| event.id == event_id) else {
            log::warn!("Press on unknown event {}", event_id);
            return false;
        };

        let started = self.machine.pointer_down(event, target, point);
        if started {
            self.feedback.notify(FeedbackCue::GestureStarted);
        }
        started
    }

    pub fn pointer_move(&mut self, point: Point, geometry: &GridGeometry, days: &DayList) -> MoveOutcome {
        let outcome = self.machine.pointer_move(point, geometry, days);
        if outcome.threshold_crossed {
            self.feedback.notify(FeedbackCue::ThresholdCrossed);
        }
        outcome
    }

    /// End the gesture without writing anything. A resulting commit request
    /// marks the event as saving until [`complete_commit`](Self::complete_commit)
    /// is called with it; until then the layout keeps showing the new dates.
    pub fn release(&mut self) -> GestureOutcome {
        let outcome = self.machine.pointer_up();
        if let GestureOutcome::Commit(request) = &outcome {
            self.saving = Some(request.clone());
        }
        outcome
    }

    /// Write a commit request to the store.
    ///
    /// On success the cached event is replaced with the stored one. On
    /// failure the cache is untouched and the error is kept for display.
    pub fn complete_commit(&mut self, request: CommitRequest) -> Result<Event, CommitError> {
        let id = request.event.id.clone();
        let result = self.store.update(&id, request.change);
        self.saving = None;

        match result {
            Ok(stored) => {
                log::info!("Moved event {} to {} .. {}", id, stored.start_date(), stored.end_date());
                if let Some(cached) = self.events.iter_mut().find(|event| event.id == id) {
                    *cached = stored.clone();
                }
                self.last_error = None;
                self.feedback.notify(FeedbackCue::CommitSucceeded);
                Ok(stored)
            }
            Err(source) => {
                log::error!("Failed to save new dates for event {}: {}", id, source);
                self.last_error = Some(source.to_string());
                Err(CommitError { event_id: id, source })
            }
        }
    }

    /// Release the pointer and write any resulting change straight away
    pub fn pointer_up(&mut self) -> Result<GestureOutcome, CommitError> {
        match self.release() {
            GestureOutcome::Commit(request) => {
                self.complete_commit(request.clone())?;
                Ok(GestureOutcome::Commit(request))
            }
            outcome => Ok(outcome),
        }
    }

    pub fn pointer_cancel(&mut self) -> GestureOutcome {
        self.machine.pointer_cancel()
    }

    /// Layout of `week` including the live preview of the active gesture, or
    /// of the commit still being saved
    pub fn layout_week(&self, week: &Week) -> WeekLayout<'_> {
        let preview = self.machine.gesture().preview().or_else(|| {
            self.saving.as_ref().map(|request| PreviewSpan {
                event: &request.event,
                start: request.change.start_date(),
                end: request.change.end_date(),
            })
        });
        layout_week_with_rows(week, &self.events, preview, self.max_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{week_containing, GridRect};
    use crate::interaction::GestureMode;
    use crate::services::store::MockEventStore;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn at(day: u32) -> NaiveDateTime {
        date(day).and_hms_opt(8, 0, 0).unwrap()
    }

    fn planting() -> Event {
        Event::builder()
            .id("plant")
            .title("Plant garlic")
            .start(at(10))
            .end(at(12))
            .build()
            .unwrap()
    }

    /// One week row (Jan 6 - Jan 12), 700 x 100, so each day is 100px wide
    fn view() -> (GridGeometry, DayList) {
        let geometry = GridGeometry::new(GridRect::new(0.0, 0.0, 700.0, 100.0), 1).unwrap();
        let days = DayList::from_week(&week_containing(date(10), 1));
        (geometry, days)
    }

    fn store_with(events: Vec<Event>) -> MockEventStore {
        let mut store = MockEventStore::new();
        store.expect_list().returning(move || Ok(events.clone()));
        store
    }

    #[derive(Default)]
    struct Recorder(Vec<FeedbackCue>);

    impl FeedbackSink for Recorder {
        fn notify(&mut self, cue: FeedbackCue) {
            self.0.push(cue);
        }
    }

    #[test]
    fn test_drag_commits_exactly_once() {
        let week = week_containing(date(13), 1);
        let days = DayList::from_week(&week);
        let geometry = GridGeometry::new(GridRect::new(0.0, 0.0, 700.0, 100.0), 1).unwrap();

        let mut store = store_with(vec![planting()]);
        let expected = planting().rescheduled(date(15), date(17));
        let stored = planting().with_dates(&expected);
        store
            .expect_update()
            .withf(move |id, change| id == "plant" && *change == expected)
            .times(1)
            .returning(move |_, _| Ok(stored.clone()));

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        assert!(controller.pointer_down("plant", PressTarget::Body, Point::new(50.0, 50.0)));
        // Jan 15 is the Wednesday column of the week of Jan 13
        controller.pointer_move(Point::new(250.0, 50.0), &geometry, &days);
        let outcome = controller.pointer_up().unwrap();

        assert!(matches!(outcome, GestureOutcome::Commit(_)));
        assert_eq!(controller.event("plant").unwrap().start_date(), date(15));
        assert_eq!(controller.event("plant").unwrap().end_date(), date(17));
        assert!(!controller.is_saving());
    }

    #[test]
    fn test_tap_selects_without_writing() {
        let mut store = store_with(vec![planting()]);
        store.expect_update().times(0);
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(450.0, 50.0));
        controller.pointer_move(Point::new(451.0, 50.0), &geometry, &days);

        assert_eq!(controller.pointer_up().unwrap(), GestureOutcome::Selected("plant".into()));
        assert_eq!(controller.selected(), Some("plant"));
    }

    #[test]
    fn test_cancel_writes_nothing() {
        let mut store = store_with(vec![planting()]);
        store.expect_update().times(0);
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(350.0, 50.0));
        controller.pointer_move(Point::new(550.0, 50.0), &geometry, &days);
        assert_eq!(controller.gesture().mode(), GestureMode::Dragging);

        assert_eq!(controller.pointer_cancel(), GestureOutcome::Cancelled);
        assert_eq!(controller.gesture().mode(), GestureMode::None);
        assert_eq!(controller.event("plant").unwrap().start_date(), date(10));
    }

    #[test]
    fn test_failed_commit_reverts_and_reports() {
        let mut store = store_with(vec![planting()]);
        store
            .expect_update()
            .times(1)
            .returning(|_, _| Err(StoreError::Rejected { status: 500, message: "boom".into() }));
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(350.0, 50.0));
        controller.pointer_move(Point::new(150.0, 50.0), &geometry, &days);

        let error = controller.pointer_up().unwrap_err();
        assert_eq!(error.event_id, "plant");
        assert!(controller.last_error().is_some());
        assert!(!controller.is_saving());

        let week = week_containing(date(10), 1);
        let layout = controller.layout_week(&week);
        let bar = layout.find("plant").unwrap();
        assert_eq!((bar.start_column, bar.end_column), (4, 6));
        assert!(!bar.is_preview);
    }

    #[test]
    fn test_press_refused_while_saving() {
        let store = store_with(vec![planting()]);
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(350.0, 50.0));
        controller.pointer_move(Point::new(150.0, 50.0), &geometry, &days);
        let GestureOutcome::Commit(_) = controller.release() else {
            panic!("expected a commit request");
        };

        assert!(controller.is_saving());
        assert!(!controller.pointer_down("plant", PressTarget::Body, Point::new(350.0, 50.0)));
    }

    #[test]
    fn test_press_on_unknown_event() {
        let store = store_with(vec![planting()]);
        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        assert!(!controller.pointer_down("ghost", PressTarget::Body, Point::default()));
        assert!(!controller.gesture().is_active());
    }

    #[test]
    fn test_layout_shows_live_preview() {
        let store = store_with(vec![planting()]);
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(350.0, 50.0));
        controller.pointer_move(Point::new(50.0, 50.0), &geometry, &days);

        let week = week_containing(date(10), 1);
        let layout = controller.layout_week(&week);
        let bar = layout.find("plant").unwrap();
        assert!(bar.is_preview);
        assert_eq!((bar.start_column, bar.end_column), (0, 2));
    }

    #[test]
    fn test_feedback_cues() {
        let mut store = store_with(vec![planting()]);
        let stored = planting().with_dates(&planting().rescheduled(date(7), date(9)));
        store.expect_update().returning(move |_, _| Ok(stored.clone()));
        let (geometry, days) = view();

        let mut controller =
            InteractionController::with_feedback(store, &Settings::default(), Recorder::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(450.0, 50.0));
        controller.pointer_move(Point::new(150.0, 50.0), &geometry, &days);
        controller.pointer_move(Point::new(155.0, 50.0), &geometry, &days);
        controller.pointer_up().unwrap();

        assert_eq!(
            controller.feedback.0,
            vec![
                FeedbackCue::GestureStarted,
                FeedbackCue::ThresholdCrossed,
                FeedbackCue::CommitSucceeded
            ]
        );
    }

    #[test]
    fn test_refresh_skipped_during_gesture() {
        let store = store_with(vec![planting()]);
        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();

        controller.pointer_down("plant", PressTarget::Body, Point::default());
        assert!(!controller.refresh().unwrap());
        controller.pointer_cancel();
        assert!(controller.refresh().unwrap());
    }

    #[test]
    fn test_saving_keeps_new_dates_until_commit_completes() {
        let mut store = store_with(vec![planting()]);
        store
            .expect_update()
            .times(1)
            .returning(|_, _| Err(StoreError::Rejected { status: 503, message: "offline".into() }));
        let (geometry, days) = view();

        let mut controller = InteractionController::new(store, &Settings::default()).unwrap();
        controller.pointer_down("plant", PressTarget::Body, Point::new(450.0, 50.0));
        controller.pointer_move(Point::new(150.0, 50.0), &geometry, &days);
        let GestureOutcome::Commit(request) = controller.release() else {
            panic!("expected a commit request");
        };

        let week = week_containing(date(10), 1);
        {
            let layout = controller.layout_week(&week);
            let bar = layout.find("plant").unwrap();
            assert_eq!((bar.start_column, bar.end_column), (1, 3));
            assert!(bar.is_preview);
        }

        assert!(controller.complete_commit(request).is_err());
        let layout = controller.layout_week(&week);
        let bar = layout.find("plant").unwrap();
        assert_eq!((bar.start_column, bar.end_column), (4, 6));
        assert!(!bar.is_preview);
    }
}
