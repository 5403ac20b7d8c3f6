//! Who may write to which calendar.
//!
//! Personal calendars are always writable by their owner; the shared lab
//! calendar needs an elevated role.

use crate::models::event::{CalendarEvent, EventScope};
use crate::models::settings::UserRole;

pub fn can_create(scope: EventScope, role: UserRole) -> bool {
    match scope {
        EventScope::Personal => true,
        EventScope::Lab => role.is_elevated(),
    }
}

/// Moving, resizing, editing and deleting follow the creation rule.
pub fn can_modify(event: &CalendarEvent, role: UserRole) -> bool {
    can_create(event.scope, role)
}

/// Scopes offered in the editor's scope picker.
pub fn creatable_scopes(role: UserRole) -> Vec<EventScope> {
    EventScope::ALL
        .into_iter()
        .filter(|scope| can_create(*scope, role))
        .collect()
}
