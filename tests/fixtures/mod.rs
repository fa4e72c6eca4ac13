// Test fixtures - reusable test data
// Provides consistent events and grid geometry across all test files

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use garden_calendar::grid::{month_grid, DayList, GridGeometry, GridRect, Point};
use garden_calendar::models::event::Event;

/// Width and height of one day cell in [`january_view`]
pub const CELL: f32 = 100.0;

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

pub fn jan_at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    jan(day).and_hms_opt(hour, minute, 0).unwrap()
}

/// January 2025 month grid, Monday first: Dec 30 2024 .. Feb 2 2025 in 5 rows
/// of 100 x 100 px cells.
pub fn january_view() -> (GridGeometry, DayList) {
    let days = month_grid(jan(1), 1);
    let geometry =
        GridGeometry::new(GridRect::new(0.0, 0.0, 7.0 * CELL, days.rows() as f32 * CELL), days.rows())
            .unwrap();
    (geometry, days)
}

/// Centre of the cell showing `date` in [`january_view`]
pub fn cell_centre(days: &DayList, date: NaiveDate) -> Point {
    let (row, column) = days.position(date).unwrap();
    Point::new(
        column as f32 * CELL + CELL / 2.0,
        row as f32 * CELL + CELL / 2.0,
    )
}

pub mod events {
    use super::*;

    /// Single-day watering at 07:30 on Jan 10
    pub fn watering() -> Event {
        Event::builder()
            .id("water")
            .title("Water seedlings")
            .start(jan_at(10, 7, 30))
            .event_type("watering")
            .build()
            .unwrap()
    }

    /// All-day harvest window Jan 8 .. Jan 14
    pub fn harvest() -> Event {
        Event::builder()
            .id("harvest")
            .title("Harvest kale")
            .start(jan_at(8, 0, 0))
            .end(jan_at(14, 0, 0))
            .all_day(true)
            .event_type("harvesting")
            .build()
            .unwrap()
    }

    /// Event spanning exactly `from` .. `to` in January
    pub fn span(id: &str, from: u32, to: u32) -> Event {
        Event::builder()
            .id(id)
            .title(id)
            .start(jan_at(from, 9, 0))
            .end(jan_at(to, 9, 0))
            .build()
            .unwrap()
    }
}
