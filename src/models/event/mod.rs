// Event module
// Garden-work calendar event as held by the event store

use chrono::{NaiveDate, NaiveDateTime};

/// Lifecycle status of a piece of garden work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStatus {
    #[default]
    Planned,
    Done,
    Skipped,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planned => "planned",
            EventStatus::Done => "done",
            EventStatus::Skipped => "skipped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(EventStatus::Planned),
            "done" => Some(EventStatus::Done),
            "skipped" => Some(EventStatus::Skipped),
            _ => None,
        }
    }
}

/// Calendar event.
///
/// Only the date parts of `start` and `end` drive layout and gestures. The
/// time-of-day is carried through moves and resizes untouched. A missing
/// `end` means a single-day event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub event_type: Option<String>,
    pub status: EventStatus,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// New start/end pair for an event, produced by a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChange {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl DateChange {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.map(|end| end.date()).unwrap_or_else(|| self.start.date())
    }
}

impl Event {
    /// Create a single-day event with the required fields
    ///
    /// # Examples
    /// ```
    /// use garden_calendar::models::event::Event;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let event = Event::new("evt-1", "Prune roses", start).unwrap();
    /// assert_eq!(event.end_date(), start.date());
    /// ```
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
    ) -> Result<Self, String> {
        let event = Self {
            id: id.into(),
            title: title.into(),
            start,
            end: None,
            all_day: false,
            event_type: None,
            status: EventStatus::Planned,
            description: None,
            color: None,
            created_at: None,
            updated_at: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Event id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end.map_or(false, |end| end.date() < self.start.date()) {
            return Err("Event end date must not be before start date".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// End date, falling back to the start date for single-day events. An
    /// end stored before the start reads as the start date.
    pub fn end_date(&self) -> NaiveDate {
        self.end
            .map(|end| end.date())
            .unwrap_or_else(|| self.start.date())
            .max(self.start.date())
    }

    /// Whole days between the start and end date (0 for a single-day event)
    pub fn duration_days(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days()
    }

    /// Number of calendar days the event covers, inclusive
    pub fn span_days(&self) -> i64 {
        self.duration_days() + 1
    }

    /// True when the event's span shares at least one day with `[from, to]`
    pub fn intersects(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date() <= to && self.end_date() >= from
    }

    /// Move the event onto new dates, keeping each endpoint's time-of-day.
    ///
    /// An event without an explicit end keeps having none as long as it stays
    /// a single-day event; once it spans several days the end inherits the
    /// start's time-of-day.
    pub fn rescheduled(&self, start_date: NaiveDate, end_date: NaiveDate) -> DateChange {
        let start = start_date.and_time(self.start.time());
        let end = match self.end {
            Some(end) => Some(end_date.and_time(end.time())),
            None if end_date == start_date => None,
            None => Some(end_date.and_time(self.start.time())),
        };
        DateChange { start, end }
    }

    /// Copy of this event with the given dates applied
    pub fn with_dates(&self, change: &DateChange) -> Event {
        let mut event = self.clone();
        event.start = change.start;
        event.end = change.end;
        event
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<String>,
    title: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    all_day: bool,
    event_type: Option<String>,
    status: EventStatus,
    description: Option<String>,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            start: None,
            end: None,
            all_day: false,
            event_type: None,
            status: EventStatus::Planned,
            description: None,
            color: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the kind of work (watering, planting, ...)
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn build(self) -> Result<Event, String> {
        let id = self.id.ok_or("Event id is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;

        let event = Event {
            id,
            title,
            start,
            end: self.end,
            all_day: self.all_day,
            event_type: self.event_type,
            status: self.status,
            description: self.description,
            color: self.color,
            created_at: None,
            updated_at: None,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
