//! Week layout.
//!
//! Packs the events of one week into stacking rows so no two bars overlap.
//! Longer events claim rows first, then earlier ones; the pass is a pure
//! function of its inputs and is recomputed from scratch on every change
//! (events, visible week, or gesture preview).

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::grid::{clipped_column, Week, DAYS_PER_WEEK};
use crate::models::event::Event;
use crate::models::settings::DEFAULT_MAX_ROWS;

/// Tentative span of the event under an active gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSpan<'a> {
    pub event: &'a Event,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// An event placed on a week row
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent<'a> {
    pub event: &'a Event,
    pub start_column: usize,
    pub end_column: usize,
    pub row: usize,
    pub continues_from_previous: bool,
    pub continues_to_next: bool,
    /// Placed from a gesture preview rather than the stored dates
    pub is_preview: bool,
}

impl PositionedEvent<'_> {
    pub fn columns(&self) -> std::ops::RangeInclusive<usize> {
        self.start_column..=self.end_column
    }

    pub fn overlaps(&self, other: &PositionedEvent<'_>) -> bool {
        self.row == other.row
            && self.start_column <= other.end_column
            && other.start_column <= self.end_column
    }
}

/// Result of laying out one week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout<'a> {
    pub week: Week,
    pub events: Vec<PositionedEvent<'a>>,
    /// Events that intersect the week but found no free row
    pub overflow: Vec<&'a Event>,
    hidden_per_column: [usize; DAYS_PER_WEEK],
}

impl<'a> WeekLayout<'a> {
    /// Number of rows in use
    pub fn row_count(&self) -> usize {
        self.events
            .iter()
            .map(|positioned| positioned.row + 1)
            .max()
            .unwrap_or(0)
    }

    /// Count of events hidden on `column`, rendered as "+N more"
    pub fn more_count(&self, column: usize) -> usize {
        self.hidden_per_column.get(column).copied().unwrap_or(0)
    }

    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn find(&self, event_id: &str) -> Option<&PositionedEvent<'a>> {
        self.events.iter().find(|positioned| positioned.event.id == event_id)
    }

    /// Events occupying `row`, left to right
    pub fn row(&self, row: usize) -> Vec<&PositionedEvent<'a>> {
        let mut on_row: Vec<_> = self.events.iter().filter(|p| p.row == row).collect();
        on_row.sort_by_key(|p| p.start_column);
        on_row
    }
}

struct Candidate<'a> {
    event: &'a Event,
    start: NaiveDate,
    span_days: i64,
    start_column: usize,
    end_column: usize,
    continues_from_previous: bool,
    continues_to_next: bool,
    is_preview: bool,
}

impl<'a> Candidate<'a> {
    fn clip(event: &'a Event, start: NaiveDate, end: NaiveDate, week: &Week, is_preview: bool) -> Option<Self> {
        let end = end.max(start);
        let week_start = week[0];
        let week_end = week[DAYS_PER_WEEK - 1];
        if start > week_end || end < week_start {
            return None;
        }

        let clamped_start = start.max(week_start);
        let clamped_end = end.min(week_end);

        Some(Self {
            event,
            start,
            span_days: (end - start).num_days() + 1,
            start_column: clipped_column(clamped_start, week),
            end_column: clipped_column(clamped_end, week),
            continues_from_previous: start < week_start,
            continues_to_next: end > week_end,
            is_preview,
        })
    }
}

/// Lay out `events` on `week` with the default row bound.
pub fn layout_week<'a>(
    week: &Week,
    events: &'a [Event],
    preview: Option<PreviewSpan<'a>>,
) -> WeekLayout<'a> {
    layout_week_with_rows(week, events, preview, DEFAULT_MAX_ROWS)
}

/// Lay out `events` on `week`, stacking at most `max_rows` rows.
///
/// Events not intersecting the week are skipped, so callers may pass the
/// full event list. When `preview` is set its event is placed at the preview
/// span instead of its stored dates, whether or not the stored dates touch
/// this week.
pub fn layout_week_with_rows<'a>(
    week: &Week,
    events: &'a [Event],
    preview: Option<PreviewSpan<'a>>,
    max_rows: usize,
) -> WeekLayout<'a> {
    let preview_id = preview.map(|span| span.event.id.as_str());

    let mut candidates: Vec<Candidate<'a>> = events
        .iter()
        .filter(|event| Some(event.id.as_str()) != preview_id)
        .filter_map(|event| Candidate::clip(event, event.start_date(), event.end_date(), week, false))
        .collect();

    if let Some(span) = preview {
        if let Some(candidate) = Candidate::clip(span.event, span.start, span.end, week, true) {
            candidates.push(candidate);
        }
    }

    candidates.sort_by(|a, b| {
        (Reverse(a.span_days), a.start, a.event.id.as_str())
            .cmp(&(Reverse(b.span_days), b.start, b.event.id.as_str()))
    });

    let mut occupancy: Vec<[Option<&'a str>; DAYS_PER_WEEK]> = Vec::new();
    let mut placed = Vec::with_capacity(candidates.len());
    let mut overflow = Vec::new();
    let mut hidden_per_column = [0usize; DAYS_PER_WEEK];

    for candidate in candidates {
        let columns = candidate.start_column..=candidate.end_column;
        let free_row = (0..max_rows).find(|&row| {
            occupancy
                .get(row)
                .map_or(true, |cells| cells[columns.clone()].iter().all(Option::is_none))
        });

        let Some(row) = free_row else {
            log::debug!(
                "Week of {}: no free row for event {} (limit {})",
                week[0],
                candidate.event.id,
                max_rows
            );
            for column in columns {
                hidden_per_column[column] += 1;
            }
            overflow.push(candidate.event);
            continue;
        };

        if row == occupancy.len() {
            occupancy.push([None; DAYS_PER_WEEK]);
        }
        for cell in &mut occupancy[row][columns] {
            *cell = Some(candidate.event.id.as_str());
        }

        placed.push(PositionedEvent {
            event: candidate.event,
            start_column: candidate.start_column,
            end_column: candidate.end_column,
            row,
            continues_from_previous: candidate.continues_from_previous,
            continues_to_next: candidate.continues_to_next,
            is_preview: candidate.is_preview,
        });
    }

    WeekLayout {
        week: *week,
        events: placed,
        overflow,
        hidden_per_column,
    }
}
