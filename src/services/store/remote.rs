use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{apply_change, EventStore, StoreError};
use crate::models::event::{DateChange, Event, EventStatus};

const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Event store behind the mini-app's REST API.
///
/// Updates fetch the current record, swap its dates and `PUT` the whole
/// record back, since the API replaces every nullable field it is sent.
/// Nothing here retries: a failed commit goes straight back to the caller.
pub struct RemoteEventStore {
    client: Client,
    base_url: String,
    init_data: Option<String>,
}

/// Wire format of an event. Fields this crate does not model (culture code,
/// plot, tags, ...) ride along in `extra` so a date update never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: String,
    title: String,
    start_date_time: String,
    end_date_time: Option<String>,
    #[serde(default)]
    all_day: bool,
    #[serde(rename = "type")]
    event_type: Option<String>,
    status: Option<String>,
    description: Option<String>,
    color: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RemoteEventStore {
    pub fn new(base_url: &str, init_data: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build event API HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            init_data,
        })
    }

    fn events_url(&self) -> String {
        format!("{}/api/events", self.base_url)
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/api/events/{}", self.base_url, urlencoding::encode(id))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.init_data {
            Some(init_data) => request.header(INIT_DATA_HEADER, init_data),
            None => request,
        }
    }

    fn fetch(&self, id: &str) -> Result<ApiEvent, StoreError> {
        let response = self.authorized(self.client.get(self.event_url(id))).send()?;
        let response = check_status(response, id)?;
        Ok(response.json()?)
    }
}

impl EventStore for RemoteEventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        let response = self.authorized(self.client.get(self.events_url())).send()?;
        let response = check_status(response, "")?;
        let records: Vec<ApiEvent> = response.json()?;

        let mut events = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match record.into_event() {
                Ok(event) => events.push(event),
                Err(err) => log::warn!("Skipping event {} from the API: {}", id, err),
            }
        }
        Ok(events)
    }

    fn update(&mut self, id: &str, change: DateChange) -> Result<Event, StoreError> {
        let mut record = self.fetch(id)?;
        // Validate locally before anything is sent
        apply_change(&record.clone().into_event()?, &change)?;
        record.apply(&change);

        let response = self
            .authorized(self.client.put(self.event_url(id)))
            .json(&record)
            .send()?;
        let response = check_status(response, id)?;
        let stored: ApiEvent = response.json()?;
        log::debug!("Remote store accepted new dates for event {}", id);
        stored.into_event()
    }
}

fn check_status(response: Response, id: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND && !id.is_empty() {
        return Err(StoreError::NotFound(id.to_string()));
    }
    let message = response.text().unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl ApiEvent {
    fn into_event(self) -> Result<Event, StoreError> {
        let status = match self.status.as_deref() {
            Some(value) => EventStatus::parse(value)
                .ok_or_else(|| StoreError::Decode(format!("unknown status {:?}", value)))?,
            None => EventStatus::Planned,
        };

        let event = Event {
            start: parse_wire_datetime(&self.start_date_time)?,
            end: self
                .end_date_time
                .as_deref()
                .map(parse_wire_datetime)
                .transpose()?,
            created_at: self.created_at.as_deref().map(parse_wire_datetime).transpose()?,
            updated_at: self.updated_at.as_deref().map(parse_wire_datetime).transpose()?,
            status,
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

    fn apply(&mut self, change: &DateChange) {
        self.start_date_time = format_like(&self.start_date_time, change.start);
        self.end_date_time = change.end.map(|end| {
            let template = self.end_date_time.as_deref().unwrap_or(&self.start_date_time);
            format_like(template, end)
        });
    }
}

/// Parse an ISO 8601 timestamp as wall-clock time. An offset, if present, is
/// ignored rather than converted.
fn parse_wire_datetime(value: &str) -> Result<NaiveDateTime, StoreError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|err| StoreError::Decode(format!("timestamp {:?}: {}", value, err)))
}

/// Format `value` with the same offset `template` carried, if it had one
fn format_like(template: &str, value: NaiveDateTime) -> String {
    if let Ok(original) = DateTime::parse_from_rfc3339(template) {
        if let Some(with_offset) = original.offset().from_local_datetime(&value).single() {
            return with_offset.to_rfc3339();
        }
    }
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}
