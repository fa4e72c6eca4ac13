use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Row};

use super::{apply_change, EventStore, StoreError};
use crate::models::event::{DateChange, Event, EventStatus};
use crate::services::database::Database;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SELECT_COLUMNS: &str = "SELECT id, title, start_datetime, end_datetime, is_all_day,
        event_type, status, description, color, created_at, updated_at
     FROM events";

/// Event store kept in a local SQLite file
pub struct SqliteEventStore {
    db: Database,
}

impl SqliteEventStore {
    /// Open (or create) the database at `path` and make sure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Ok(Self { db })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(Path::new(":memory:"))
    }

    /// Insert a new event. Fails if the id is already taken.
    pub fn insert(&self, event: &Event) -> Result<Event, StoreError> {
        event.validate().map_err(StoreError::Validation)?;

        let now = Local::now().naive_local();
        self.db.connection().execute(
            "INSERT INTO events (
                id, title, start_datetime, end_datetime, is_all_day,
                event_type, status, description, color, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                event.id,
                event.title,
                format_datetime(event.start),
                event.end.map(format_datetime),
                event.all_day as i32,
                event.event_type,
                event.status.as_str(),
                event.description,
                event.color,
                format_datetime(now),
                format_datetime(now),
            ],
        )?;

        let mut created = event.clone();
        created.created_at = Some(now);
        created.updated_at = Some(now);
        Ok(created)
    }

    pub fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let row = self
            .db
            .connection()
            .query_row(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id], read_row)
            .optional()?;
        row.map(EventRow::into_event).transpose()
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM events WHERE id = ?", [id])?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl EventStore for SqliteEventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(&format!("{} ORDER BY start_datetime, id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], read_row)?;

        let mut events = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id.clone();
            match row.into_event() {
                Ok(event) => events.push(event),
                Err(err) => log::warn!("Skipping unreadable event {}: {}", id, err),
            }
        }
        Ok(events)
    }

    fn update(&mut self, id: &str, change: DateChange) -> Result<Event, StoreError> {
        let current = self
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut updated = apply_change(&current, &change)?;
        let now = Local::now().naive_local();

        let rows_affected = self.db.connection().execute(
            "UPDATE events SET start_datetime = ?, end_datetime = ?, updated_at = ? WHERE id = ?",
            params![
                format_datetime(updated.start),
                updated.end.map(format_datetime),
                format_datetime(now),
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        log::debug!("Stored new dates for event {}: {:?}", id, change);
        updated.updated_at = Some(now);
        Ok(updated)
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(column: &str, value: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|err| StoreError::Decode(format!("{} = {:?}: {}", column, value, err)))
}

/// Raw column values of one `events` row, decoded separately so a bad value
/// reports which column it came from.
struct EventRow {
    id: String,
    title: String,
    start: String,
    end: Option<String>,
    all_day: bool,
    event_type: Option<String>,
    status: String,
    description: Option<String>,
    color: Option<String>,
    created_at: String,
    updated_at: String,
}

impl EventRow {
    fn into_event(self) -> Result<Event, StoreError> {
        let end = match self.end.as_deref() {
            Some(value) => Some(parse_datetime("end_datetime", value)?),
            None => None,
        };
        let status = EventStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Decode(format!("unknown status {:?}", self.status)))?;

        let event = Event {
            start: parse_datetime("start_datetime", &self.start)?,
            end,
            status,
            created_at: Some(parse_datetime("created_at", &self.created_at)?),
            updated_at: Some(parse_datetime("updated_at", &self.updated_at)?),
            id: self.id,
            title: self.title,
            all_day: self.all_day,
            event_type: self.event_type,
            description: self.description,
            color: self.color,
        };
        event.validate().map_err(StoreError::Decode)?;
        Ok(event)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        start: row.get(2)?,
        end: row.get(3)?,
        all_day: row.get::<_, i32>(4)? != 0,
        event_type: row.get(5)?,
        status: row.get(6)?,
        description: row.get(7)?,
        color: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
