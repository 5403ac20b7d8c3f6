//! Binding to the lab's remote calendar API.
//!
//! `CalendarApi` is the seam between the calendar engine and the backend:
//! the store only talks to this trait, `RestCalendarApi` implements it over
//! HTTP, and tests substitute mocks or in-memory fakes.

use chrono::NaiveDateTime;
use std::sync::Arc;
use thiserror::Error;

use crate::models::category::{CalendarCategory, CategoryDraft};
use crate::models::deadline::DeadlineEvent;
use crate::models::event::{CalendarEvent, EventDraft, EventScope, RsvpStatus};
use crate::models::ui::DateRange;

mod client;

pub use client::RestCalendarApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized – check the configured API token")]
    Unauthorized,
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Event listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub scope: EventScope,
}

impl EventQuery {
    pub fn for_range(range: &DateRange, scope: EventScope) -> Self {
        Self {
            start: range.start_instant(),
            end: range.end_instant(),
            scope,
        }
    }
}

/// Remote collaborator that persists events, categories and deadlines.
///
/// Calls block; the store runs them off the UI thread.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarApi {
    fn list_events(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, ApiError>;
    fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ApiError>;
    fn update_event(&self, id: &str, draft: &EventDraft) -> Result<CalendarEvent, ApiError>;
    fn delete_event(&self, id: &str) -> Result<(), ApiError>;
    fn move_event(
        &self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, ApiError>;
    fn list_categories(&self, scope: EventScope) -> Result<Vec<CalendarCategory>, ApiError>;
    fn create_category(&self, draft: &CategoryDraft) -> Result<CalendarCategory, ApiError>;
    fn list_deadlines(&self, range: &DateRange) -> Result<Vec<DeadlineEvent>, ApiError>;
    fn rsvp(&self, id: &str, status: RsvpStatus) -> Result<CalendarEvent, ApiError>;
}

/// Shared handle passed into the store.
pub type SharedApi = Arc<dyn CalendarApi + Send + Sync>;
