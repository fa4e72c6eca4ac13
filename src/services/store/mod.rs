//! Event store adapters.
//!
//! The interaction layer only ever reads the full event list and writes new
//! dates for one event at a time; creation and deletion belong to whoever
//! owns the store.

use crate::models::event::{DateChange, Event};
use crate::models::settings::{Settings, StoreBackend};
use crate::services::settings::SettingsService;
use anyhow::{Context, Result};

mod memory;
mod remote;
mod sqlite;

pub use memory::InMemoryEventStore;
pub use remote::RemoteEventStore;
pub use sqlite::SqliteEventStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    NotFound(String),
    #[error("invalid event: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("could not decode stored event: {0}")]
    Decode(String),
}

/// Read/write access to the user's events
#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError>;

    /// Write new dates for event `id` and return the stored event
    fn update(&mut self, id: &str, change: DateChange) -> Result<Event, StoreError>;
}

impl<S: EventStore + ?Sized> EventStore for Box<S> {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        (**self).list()
    }

    fn update(&mut self, id: &str, change: DateChange) -> Result<Event, StoreError> {
        (**self).update(id, change)
    }
}

/// Open the store selected in `settings`
pub fn open_store(settings: &Settings) -> Result<Box<dyn EventStore>> {
    let store: Box<dyn EventStore> = match settings.store.backend {
        StoreBackend::Memory => Box::new(InMemoryEventStore::new()),
        StoreBackend::Sqlite => {
            let path = match settings.store.database_path.clone() {
                Some(path) => path,
                None => SettingsService::default_database_path()?,
            };
            log::info!("Opening event database at {:?}", path);
            Box::new(SqliteEventStore::open(&path)?)
        }
        StoreBackend::Remote => {
            let base_url = settings
                .store
                .api_base_url
                .as_deref()
                .context("store.api_base_url is not set")?;
            log::info!("Using remote event store at {}", base_url);
            Box::new(RemoteEventStore::new(
                base_url,
                settings.store.init_data.clone(),
                settings.store.timeout_secs,
            )?)
        }
    };
    Ok(store)
}

/// Apply `change` to `event` and check the result is still a valid event
pub(crate) fn apply_change(event: &Event, change: &DateChange) -> Result<Event, StoreError> {
    let updated = event.with_dates(change);
    updated.validate().map_err(StoreError::Validation)?;
    Ok(updated)
}
