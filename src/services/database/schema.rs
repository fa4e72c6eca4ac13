use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_events_table(conn)?;
    run_event_migrations(conn)?;
    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            start_datetime TEXT NOT NULL,
            end_datetime TEXT,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            event_type TEXT,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create events table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_start ON events (start_datetime)",
        [],
    )
    .context("Failed to create events start index")?;

    Ok(())
}

// Columns added after the first release of the events table
fn run_event_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "status",
        "ALTER TABLE events ADD COLUMN status TEXT NOT NULL DEFAULT 'planned'",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "color",
        "ALTER TABLE events ADD COLUMN color TEXT",
    )?;

    Ok(())
}
