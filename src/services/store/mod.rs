//! Single-writer repository for events, categories and deadlines.
//!
//! Every mutation of the collections happens on the owning (UI) thread: API
//! calls run through a `TaskRunner`, their results come back as
//! `StoreMessage`s over a channel, and `poll()` applies them. Moves are
//! optimistic and roll back to the pre-move snapshot when the call fails,
//! unless a fetch has replaced the collection in the meantime.
//! Fetches carry a generation number so that responses superseded by a newer
//! range/scope request can be dropped.

use chrono::NaiveDateTime;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::models::category::{CalendarCategory, CategoryDraft};
use crate::models::deadline::DeadlineEvent;
use crate::models::event::{CalendarEvent, EventDraft, EventScope, RsvpStatus};
use crate::models::ui::DateRange;
use crate::services::api::{ApiError, CalendarApi, EventQuery, SharedApi};

mod runner;

pub use runner::{InlineRunner, Job, TaskRunner, ThreadRunner};

/// Completed API call, delivered back to the owning thread.
pub enum StoreMessage {
    EventsLoaded {
        generation: u64,
        result: Result<Vec<CalendarEvent>, ApiError>,
    },
    CategoriesLoaded {
        generation: u64,
        result: Result<Vec<CalendarCategory>, ApiError>,
    },
    DeadlinesLoaded {
        generation: u64,
        result: Result<Vec<DeadlineEvent>, ApiError>,
    },
    EventCreated(Result<CalendarEvent, ApiError>),
    EventUpdated(Result<CalendarEvent, ApiError>),
    EventDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    EventMoved {
        id: String,
        /// Collection revision the snapshot was taken at
        revision: u64,
        snapshot: Vec<CalendarEvent>,
        result: Result<CalendarEvent, ApiError>,
    },
    CategoryCreated(Result<CalendarCategory, ApiError>),
    RsvpUpdated(Result<CalendarEvent, ApiError>),
}

pub struct CalendarStore {
    api: SharedApi,
    runner: Arc<dyn TaskRunner>,
    sender: Sender<StoreMessage>,
    receiver: Receiver<StoreMessage>,
    events: Vec<CalendarEvent>,
    categories: Vec<CalendarCategory>,
    deadlines: Vec<DeadlineEvent>,
    error: Option<String>,
    generation: u64,
    /// Bumped whenever a fetch replaces `events`
    revision: u64,
    /// Scope and range of the latest fetch request
    loaded: Option<(EventScope, DateRange)>,
    in_flight: usize,
    discard_stale: bool,
}

impl CalendarStore {
    pub fn new(api: SharedApi, runner: Arc<dyn TaskRunner>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            runner,
            sender,
            receiver,
            events: Vec::new(),
            categories: Vec::new(),
            deadlines: Vec::new(),
            error: None,
            generation: 0,
            revision: 0,
            loaded: None,
            in_flight: 0,
            discard_stale: true,
        }
    }

    /// With `false`, every fetch response is applied in arrival order and the
    /// last one to land wins, even if it answers an older request.
    pub fn with_stale_policy(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn event(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn categories(&self) -> &[CalendarCategory] {
        &self.categories
    }

    pub fn deadlines(&self) -> &[DeadlineEvent] {
        &self.deadlines
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false when the runner refused the job.
    fn dispatch<F>(&mut self, job: F) -> bool
    where
        F: FnOnce(&dyn CalendarApi) -> StoreMessage + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        self.in_flight += 1;
        let spawned = self.runner.spawn(Box::new(move || {
            let message = job(api.as_ref());
            if sender.send(message).is_err() {
                log::debug!("Calendar store dropped before API response arrived");
            }
        }));

        match spawned {
            Ok(()) => true,
            Err(err) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                log::error!("Failed to start lab API request: {}", err);
                self.error = Some(format!("Failed to start request: {}", err));
                false
            }
        }
    }

    /// Fetch events, deadlines and categories for a scope and range.
    pub fn fetch(&mut self, scope: EventScope, range: DateRange) {
        self.generation += 1;
        self.loaded = Some((scope, range));
        let generation = self.generation;
        log::debug!(
            "Fetching {} calendar {}..{} (generation {})",
            scope.as_str(),
            range.start,
            range.end,
            generation
        );

        let query = EventQuery::for_range(&range, scope);
        self.dispatch(move |api| StoreMessage::EventsLoaded {
            generation,
            result: api.list_events(&query),
        });
        self.dispatch(move |api| StoreMessage::DeadlinesLoaded {
            generation,
            result: api.list_deadlines(&range),
        });
        self.dispatch(move |api| StoreMessage::CategoriesLoaded {
            generation,
            result: api.list_categories(scope),
        });
    }

    pub fn create_event(&mut self, draft: EventDraft) {
        log::info!("Creating event '{}'", draft.title);
        self.dispatch(move |api| StoreMessage::EventCreated(api.create_event(&draft)));
    }

    pub fn update_event(&mut self, id: String, draft: EventDraft) {
        log::info!("Updating event {}", id);
        self.dispatch(move |api| StoreMessage::EventUpdated(api.update_event(&id, &draft)));
    }

    pub fn delete_event(&mut self, id: String) {
        log::info!("Deleting event {}", id);
        self.dispatch(move |api| {
            let result = api.delete_event(&id);
            StoreMessage::EventDeleted { id, result }
        });
    }

    /// Apply the new times locally right away, then confirm remotely.
    /// Returns false when the event is not in the loaded collection or the
    /// call could not be started.
    pub fn move_event(&mut self, id: &str, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let Some(index) = self.events.iter().position(|event| event.id == id) else {
            log::warn!("Ignoring move of unknown event {}", id);
            return false;
        };

        let snapshot = self.events.clone();
        let previous = self.events[index].clone();
        self.events[index] = self.events[index].with_times(start, end);
        sort_events(&mut self.events);
        log::info!("Moving event {} to {} - {}", id, start, end);

        let revision = self.revision;
        let moved_id = id.to_string();
        let started = self.dispatch(move |api| {
            let result = api.move_event(&moved_id, start, end);
            StoreMessage::EventMoved {
                id: moved_id,
                revision,
                snapshot,
                result,
            }
        });
        if !started {
            self.replace(previous);
        }
        started
    }

    pub fn create_category(&mut self, draft: CategoryDraft) {
        log::info!("Creating category '{}'", draft.name);
        self.dispatch(move |api| StoreMessage::CategoryCreated(api.create_category(&draft)));
    }

    pub fn rsvp(&mut self, id: String, status: RsvpStatus) {
        log::info!("RSVP {:?} for event {}", status, id);
        self.dispatch(move |api| StoreMessage::RsvpUpdated(api.rsvp(&id, status)));
    }

    /// Apply every completed call. Returns how many messages were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply(message);
            applied += 1;
        }
        applied
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.discard_stale && generation != self.generation
    }

    /// Whether an event belongs in the collection of the latest fetch.
    /// Before any fetch everything does.
    fn in_view(&self, event: &CalendarEvent) -> bool {
        self.loaded.map_or(true, |(scope, range)| {
            event.scope == scope
                && event.start < range.end_instant()
                && event.end > range.start_instant()
        })
    }

    fn apply(&mut self, message: StoreMessage) {
        match message {
            StoreMessage::EventsLoaded { generation, result } => {
                if self.is_stale(generation) {
                    log::debug!("Dropping stale events response (generation {})", generation);
                    return;
                }
                match result {
                    Ok(mut events) => {
                        sort_events(&mut events);
                        log::debug!("Loaded {} events", events.len());
                        self.events = events;
                        self.revision += 1;
                        self.error = None;
                    }
                    Err(err) => self.fail("Failed to load events", err),
                }
            }
            StoreMessage::CategoriesLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return;
                }
                match result {
                    Ok(categories) => self.categories = categories,
                    Err(err) => log::warn!("Failed to load categories: {}", err),
                }
            }
            StoreMessage::DeadlinesLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return;
                }
                match result {
                    Ok(deadlines) => self.deadlines = deadlines,
                    Err(err) => log::warn!("Failed to load deadlines: {}", err),
                }
            }
            StoreMessage::EventCreated(result) => match result {
                Ok(event) => self.accept(event),
                Err(err) => self.fail("Failed to create event", err),
            },
            StoreMessage::EventUpdated(result) | StoreMessage::RsvpUpdated(result) => {
                match result {
                    Ok(event) => self.accept(event),
                    Err(err) => self.fail("Failed to save event", err),
                }
            }
            StoreMessage::EventDeleted { id, result } => match result {
                Ok(()) => self.events.retain(|event| event.id != id),
                Err(err) => self.fail("Failed to delete event", err),
            },
            StoreMessage::EventMoved {
                id,
                revision,
                snapshot,
                result,
            } => match result {
                Ok(event) => self.accept(event),
                Err(err) => {
                    if revision == self.revision {
                        log::warn!("Rolling back move of event {}", id);
                        self.events = snapshot;
                    } else {
                        // a newer fetch already replaced the optimistic copy
                        log::warn!("Move of event {} failed after a refresh; keeping fetched data", id);
                    }
                    self.fail("Failed to move event", err);
                }
            },
            StoreMessage::CategoryCreated(result) => match result {
                Ok(category) => {
                    self.categories.retain(|existing| existing.id != category.id);
                    self.categories.push(category);
                }
                Err(err) => self.fail("Failed to create category", err),
            },
        }
    }

    /// Upsert a saved event, or drop it when it falls outside the scope and
    /// range currently loaded.
    fn accept(&mut self, event: CalendarEvent) {
        if self.in_view(&event) {
            self.upsert(event);
        } else {
            log::debug!("Saved event {} is outside the loaded view", event.id);
            self.events.retain(|existing| existing.id != event.id);
        }
    }

    fn upsert(&mut self, event: CalendarEvent) {
        match self.events.iter_mut().find(|existing| existing.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
        sort_events(&mut self.events);
    }

    fn replace(&mut self, event: CalendarEvent) {
        if let Some(existing) = self.events.iter_mut().find(|existing| existing.id == event.id) {
            *existing = event;
            sort_events(&mut self.events);
        }
    }

    fn fail(&mut self, context: &str, err: ApiError) {
        log::error!("{}: {}", context, err);
        self.error = Some(format!("{}: {}", context, err));
    }
}

fn sort_events(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.title.cmp(&b.title))
    });
}
