// Test fixtures - reusable test data
// Shared by the integration tests through `mod fixtures;`

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use lab_calendar::models::category::{CalendarCategory, CategoryDraft};
use lab_calendar::models::deadline::DeadlineEvent;
use lab_calendar::models::event::{CalendarEvent, EventDraft, EventScope, RsvpStatus};
use lab_calendar::models::settings::{AppConfig, UserRole};
use lab_calendar::models::ui::DateRange;
use lab_calendar::services::api::{ApiError, CalendarApi, EventQuery};
use lab_calendar::services::store::{CalendarStore, InlineRunner};
use lab_calendar::ui_egui::CalendarViewContainer;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday 10 March 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Friday 14 March 2025
    pub fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample events
pub mod events {
    use super::*;

    pub fn personal(id: &str, title: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        EventDraft::new(title, start, end)
            .with_scope(EventScope::Personal)
            .into_event(id)
    }

    pub fn lab(id: &str, title: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        EventDraft::new(title, start, end)
            .with_scope(EventScope::Lab)
            .into_event(id)
    }

    pub fn deadline(id: &str, title: &str, due: NaiveDate) -> DeadlineEvent {
        DeadlineEvent {
            id: id.to_string(),
            title: title.to_string(),
            due_date: due,
            project_id: "proj-1".to_string(),
            project_name: Some("Spectroscopy".to_string()),
            completed: false,
        }
    }
}

/// In-memory stand-in for the lab API.
#[derive(Default)]
pub struct FakeCalendarApi {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub categories: Mutex<Vec<CalendarCategory>>,
    pub deadlines: Mutex<Vec<DeadlineEvent>>,
    pub fail_moves: AtomicBool,
    pub list_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeCalendarApi {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn failing_moves(self) -> Self {
        self.fail_moves.store(true, Ordering::SeqCst);
        self
    }

    pub fn stored(&self, id: &str) -> Option<CalendarEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|event| event.id == id)
            .cloned()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("event {} not found", id),
    }
}

impl CalendarApi for FakeCalendarApi {
    fn list_events(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.scope == query.scope)
            .filter(|event| event.start < query.end && event.end > query.start)
            .cloned()
            .collect())
    }

    fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ApiError> {
        let event = draft.clone().into_event(self.next_id("evt"));
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    fn update_event(&self, id: &str, draft: &EventDraft) -> Result<CalendarEvent, ApiError> {
        let mut events = self.events.lock().unwrap();
        let existing = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found(id))?;
        *existing = draft.clone().into_event(id);
        Ok(existing.clone())
    }

    fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.events.lock().unwrap().retain(|event| event.id != id);
        Ok(())
    }

    fn move_event(
        &self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, ApiError> {
        if self.fail_moves.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 500,
                message: "move rejected".to_string(),
            });
        }
        let mut events = self.events.lock().unwrap();
        let existing = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found(id))?;
        existing.start = start;
        existing.end = end;
        Ok(existing.clone())
    }

    fn list_categories(&self, scope: EventScope) -> Result<Vec<CalendarCategory>, ApiError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|category| category.scope == scope)
            .cloned()
            .collect())
    }

    fn create_category(&self, draft: &CategoryDraft) -> Result<CalendarCategory, ApiError> {
        let category = CalendarCategory {
            id: self.next_id("cat"),
            name: draft.name.clone(),
            color: draft.color.clone(),
            scope: draft.scope,
            created_by: None,
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    fn list_deadlines(&self, range: &DateRange) -> Result<Vec<DeadlineEvent>, ApiError> {
        Ok(self
            .deadlines
            .lock()
            .unwrap()
            .iter()
            .filter(|deadline| range.contains(deadline.due_date))
            .cloned()
            .collect())
    }

    fn rsvp(&self, id: &str, status: RsvpStatus) -> Result<CalendarEvent, ApiError> {
        let mut events = self.events.lock().unwrap();
        let existing = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found(id))?;
        for attendee in existing.attendees.iter_mut() {
            attendee.status = status;
        }
        Ok(existing.clone())
    }
}

pub fn config_for(role: UserRole) -> AppConfig {
    let mut config = AppConfig::default();
    config.user.role = role;
    config.user.id = Some("user-1".to_string());
    config
}

/// Container over the fake API with synchronous calls, showing the week of
/// Monday 10 March 2025 in the personal calendar.
pub fn container(api: Arc<FakeCalendarApi>, role: UserRole) -> CalendarViewContainer {
    let store = CalendarStore::new(api, Arc::new(InlineRunner));
    CalendarViewContainer::new(store, &config_for(role)).with_date(dates::monday())
}

/// Same as `container`, with the first fetch already applied.
pub fn loaded_container(api: Arc<FakeCalendarApi>, role: UserRole) -> CalendarViewContainer {
    let mut container = container(api, role);
    container.refresh_if_needed();
    container.poll();
    container
}
