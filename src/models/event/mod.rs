// Event module
// Calendar event model as served by the lab API. Times are naive wall-clock.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::recurrence::RepeatRule;
use super::validation::ValidationError;

/// Which calendar an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventScope {
    Lab,
    #[default]
    Personal,
}

impl EventScope {
    pub const ALL: [EventScope; 2] = [EventScope::Personal, EventScope::Lab];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventScope::Lab => "lab",
            EventScope::Personal => "personal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventScope::Lab => "Lab calendar",
            EventScope::Personal => "My calendar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Accepted,
    Tentative,
    Declined,
}

impl RsvpStatus {
    pub const RESPONSES: [RsvpStatus; 3] = [Self::Accepted, Self::Tentative, Self::Declined];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Going",
            Self::Tentative => "Maybe",
            Self::Declined => "Not going",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: RsvpStatus,
}

impl Attendee {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.user_id)
    }
}

/// Calendar event owned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub scope: EventScope,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub repeat: Option<RepeatRule>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CalendarEvent {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat.is_some()
    }

    /// Copy of the event with new times. No validation: used for previews
    /// and optimistic updates.
    pub fn with_times(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// Whether any part of the event falls on `date`.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.segment_for_date(date).is_some()
    }

    /// Returns the start/end timestamps for the portion of the event that
    /// appears on `date`. Multi-day events are cut at midnight.
    pub fn segment_for_date(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = day_start + Duration::days(1);

        let segment_start = self.start.max(day_start);
        let segment_end = self.end.min(day_end);

        if segment_start < segment_end {
            Some((segment_start, segment_end))
        } else if self.start == self.end && self.start.date() == date {
            // zero-length markers still show on their day
            Some((self.start, self.end))
        } else {
            None
        }
    }

    pub fn rsvp_for(&self, user_id: &str) -> Option<RsvpStatus> {
        self.attendees
            .iter()
            .find(|attendee| attendee.user_id == user_id)
            .map(|attendee| attendee.status)
    }

    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            all_day: self.all_day,
            scope: self.scope,
            category_id: self.category_id.clone(),
            project_id: self.project_id.clone(),
            repeat: self.repeat.clone(),
            attendees: self.attendees.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Create/update payload: every event field except the server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub scope: EventScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EventDraft {
    /// Minimal draft for a time range; the editor fills the rest.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            start,
            end,
            all_day: false,
            scope: EventScope::default(),
            category_id: None,
            project_id: None,
            repeat: None,
            attendees: Vec::new(),
            notes: None,
        }
    }

    pub fn with_scope(mut self, scope: EventScope) -> Self {
        self.scope = scope;
        self
    }

    /// Checked when a draft is committed, never during interactive previews.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.end <= self.start {
            return Err(ValidationError::EndNotAfterStart);
        }
        if let Some(rule) = &self.repeat {
            rule.validate()?;
        }
        Ok(())
    }

    /// Materialize the draft with an id, as the store does after a create.
    pub fn into_event(self, id: impl Into<String>) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            all_day: self.all_day,
            scope: self.scope,
            category_id: self.category_id,
            project_id: self.project_id,
            repeat: self.repeat,
            attendees: self.attendees,
            notes: self.notes,
        }
    }
}
