use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::category::{CategoryDraft, CATEGORY_PALETTE};
use crate::models::event::{Attendee, CalendarEvent, EventDraft, EventScope, RsvpStatus};
use crate::models::recurrence::{RepeatFrequency, RepeatRule};
use crate::models::validation::ValidationError;
use crate::utils::date::{snap_minutes, start_of_day, SNAP_MINUTES};

/// Whether the editor creates a new event or edits an existing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit {
        event_id: String,
        /// Calendar the event lived in when the editor opened
        original_scope: EventScope,
    },
}

/// Plain form state behind the event editor window.
#[derive(Clone, Debug)]
pub struct EventForm {
    pub mode: EditorMode,
    pub title: String,
    pub description: String,
    pub scope: EventScope,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub all_day: bool,
    pub category_id: Option<String>,
    pub project_id: Option<String>,
    pub repeat_enabled: bool,
    pub frequency: RepeatFrequency,
    pub interval: u32,
    /// Indexed 0 = Sunday .. 6 = Saturday
    pub weekdays: [bool; 7],
    pub notes: String,
    pub attendees: Vec<Attendee>,
    /// RSVP of the configured user, when they are an attendee
    pub rsvp: Option<RsvpStatus>,

    pub new_category_open: bool,
    pub new_category_name: String,
    pub new_category_color: String,

    pub error: Option<String>,
    pub confirm_delete: bool,
}

/// Snap a time of day onto the quarter-hour slots offered by the pickers.
fn snap_time(time: NaiveTime) -> NaiveTime {
    let minutes = snap_minutes(f64::from(time.num_seconds_from_midnight()) / 60.0, SNAP_MINUTES);
    NaiveTime::MIN + Duration::minutes(minutes.min(24 * 60 - SNAP_MINUTES))
}

impl EventForm {
    pub fn for_create(start: NaiveDateTime, end: NaiveDateTime, scope: EventScope) -> Self {
        Self {
            mode: EditorMode::Create,
            title: String::new(),
            description: String::new(),
            scope,
            start_date: start.date(),
            start_time: snap_time(start.time()),
            end_date: end.date(),
            end_time: snap_time(end.time()),
            all_day: false,
            category_id: None,
            project_id: None,
            repeat_enabled: false,
            frequency: RepeatFrequency::Weekly,
            interval: 1,
            weekdays: Self::weekday_flags(&[start.date().weekday().num_days_from_sunday() as u8]),
            notes: String::new(),
            attendees: Vec::new(),
            rsvp: None,
            new_category_open: false,
            new_category_name: String::new(),
            new_category_color: CATEGORY_PALETTE[0].to_string(),
            error: None,
            confirm_delete: false,
        }
    }

    pub fn for_edit(event: &CalendarEvent, user_id: Option<&str>) -> Self {
        let mut form = Self::for_create(event.start, event.end, event.scope);
        form.mode = EditorMode::Edit {
            event_id: event.id.clone(),
            original_scope: event.scope,
        };
        form.title = event.title.clone();
        form.description = event.description.clone().unwrap_or_default();
        form.start_time = event.start.time();
        form.end_time = event.end.time();
        form.all_day = event.all_day;
        if event.all_day && event.end.time() == NaiveTime::MIN && event.end.date() > event.start.date() {
            // stored end is exclusive midnight
            form.end_date = event.end.date() - Duration::days(1);
        }
        form.category_id = event.category_id.clone();
        form.project_id = event.project_id.clone();
        if let Some(rule) = &event.repeat {
            form.repeat_enabled = true;
            form.frequency = rule.frequency;
            form.interval = rule.interval();
            if !rule.weekdays.is_empty() {
                form.weekdays = Self::weekday_flags(&rule.weekdays);
            }
        }
        form.notes = event.notes.clone().unwrap_or_default();
        form.attendees = event.attendees.clone();
        form.rsvp = user_id.and_then(|id| event.rsvp_for(id));
        form
    }

    fn weekday_flags(days: &[u8]) -> [bool; 7] {
        let mut flags = [false; 7];
        for &day in days {
            if let Some(flag) = flags.get_mut(day as usize) {
                *flag = true;
            }
        }
        flags
    }

    pub fn event_id(&self) -> Option<&str> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit { event_id, .. } => Some(event_id),
        }
    }

    pub fn original_scope(&self) -> Option<EventScope> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit { original_scope, .. } => Some(*original_scope),
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit { .. })
    }

    pub fn start(&self) -> NaiveDateTime {
        if self.all_day {
            start_of_day(self.start_date)
        } else {
            self.start_date.and_time(self.start_time)
        }
    }

    /// All-day events end at the exclusive midnight after `end_date`.
    pub fn end(&self) -> NaiveDateTime {
        if self.all_day {
            start_of_day(self.end_date + Duration::days(1))
        } else {
            self.end_date.and_time(self.end_time)
        }
    }

    pub fn repeat_rule(&self) -> Option<RepeatRule> {
        if !self.repeat_enabled {
            return None;
        }
        Some(match self.frequency {
            RepeatFrequency::Daily => RepeatRule::daily(),
            RepeatFrequency::Weekly => RepeatRule::weekly(self.interval),
            RepeatFrequency::Custom => RepeatRule::custom(
                self.weekdays
                    .iter()
                    .enumerate()
                    .filter(|(_, on)| **on)
                    .map(|(day, _)| day as u8),
            ),
        })
    }

    fn optional(text: &str) -> Option<String> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.trim().to_string(),
            description: Self::optional(&self.description),
            start: self.start(),
            end: self.end(),
            all_day: self.all_day,
            scope: self.scope,
            category_id: self.category_id.clone(),
            project_id: self.project_id.clone(),
            repeat: self.repeat_rule(),
            attendees: self.attendees.clone(),
            notes: Self::optional(&self.notes),
        }
    }

    /// Validated payload, or the first validation failure.
    pub fn validated_draft(&self) -> Result<EventDraft, ValidationError> {
        let draft = self.to_draft();
        draft.validate()?;
        Ok(draft)
    }

    pub fn category_draft(&self) -> CategoryDraft {
        CategoryDraft::new(
            self.new_category_name.trim(),
            self.new_category_color.clone(),
            self.scope,
        )
    }

    pub fn reset_new_category(&mut self) {
        self.new_category_open = false;
        self.new_category_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventDraft;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_create_form_round_trips_range() {
        let form = EventForm::for_create(at(10, 6, 0), at(10, 7, 30), EventScope::Personal);
        assert_eq!(form.start(), at(10, 6, 0));
        assert_eq!(form.end(), at(10, 7, 30));
        assert!(!form.is_edit());
        // Monday preselected for custom repeats
        assert_eq!(form.weekdays, [false, true, false, false, false, false, false]);
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let form = EventForm::for_create(at(10, 9, 0), at(10, 10, 0), EventScope::Personal);
        assert_eq!(form.validated_draft(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_end_before_start_fails_validation() {
        let mut form = EventForm::for_create(at(10, 9, 0), at(10, 10, 0), EventScope::Personal);
        form.title = "Seminar".into();
        form.end_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(form.validated_draft(), Err(ValidationError::EndNotAfterStart));
    }

    #[test]
    fn test_custom_repeat_needs_weekdays() {
        let mut form = EventForm::for_create(at(10, 9, 0), at(10, 10, 0), EventScope::Lab);
        form.title = "Reading group".into();
        form.repeat_enabled = true;
        form.frequency = RepeatFrequency::Custom;
        form.weekdays = [false; 7];
        assert_eq!(form.validated_draft(), Err(ValidationError::EmptyCustomWeekdays));

        form.weekdays[2] = true;
        form.weekdays[4] = true;
        let draft = form.validated_draft().unwrap();
        assert_eq!(draft.repeat, Some(RepeatRule::custom([2, 4])));
    }

    #[test]
    fn test_all_day_edit_uses_inclusive_end_date() {
        let mut draft = EventDraft::new("Conference", at(10, 0, 0), at(12, 0, 0));
        draft.all_day = true;
        let event = draft.into_event("evt-9");

        let form = EventForm::for_edit(&event, None);
        assert_eq!(form.end_date, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert_eq!(form.end(), at(12, 0, 0));
        assert_eq!(form.event_id(), Some("evt-9"));
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut form = EventForm::for_create(at(10, 9, 0), at(10, 10, 0), EventScope::Personal);
        form.title = "  Journal club ".into();
        form.notes = "   ".into();
        let draft = form.to_draft();
        assert_eq!(draft.title, "Journal club");
        assert_eq!(draft.notes, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_snap_time_rounds_to_quarter() {
        assert_eq!(snap_time(NaiveTime::from_hms_opt(9, 7, 0).unwrap()), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(snap_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap()), NaiveTime::from_hms_opt(23, 45, 0).unwrap());
    }
}
