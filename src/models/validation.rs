//! Validation failures raised before anything is sent to the lab API.
//!
//! These block the local action only: the editor stays open and shows the
//! message, nothing is dispatched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event end time must be after start time")]
    EndNotAfterStart,
    #[error("Custom repeat needs at least one weekday")]
    EmptyCustomWeekdays,
    #[error("Weekday index {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u8),
    #[error("Repeat interval must be at least 1")]
    InvalidInterval,
    #[error("Category name cannot be empty")]
    EmptyCategoryName,
    #[error("Invalid color '{0}' (use hex like #3B82F6)")]
    InvalidColor(String),
}

/// Check if a string is a `#RRGGBB` or `#RGB` hex color.
pub fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.trim().strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}
