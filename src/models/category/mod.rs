//! Category model for organizing events.
//!
//! Categories are created ad hoc from the event editor and are never
//! updated or deleted from the client.

use serde::{Deserialize, Serialize};

use super::event::EventScope;
use super::validation::{is_valid_hex_color, ValidationError};

/// Fallback color for events without a category.
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

/// Palette offered when creating a category inline.
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#64748B",
];

/// A category for organizing events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCategory {
    pub id: String,
    pub name: String,
    /// Hex color code for rendering (e.g., "#3B82F6")
    pub color: String,
    #[serde(default)]
    pub scope: EventScope,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
    pub scope: EventScope,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>, scope: EventScope) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            scope,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        if !is_valid_hex_color(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

/// Resolve the display color for an optional category id.
pub fn color_for<'a>(categories: &'a [CalendarCategory], category_id: Option<&str>) -> &'a str {
    category_id
        .and_then(|id| categories.iter().find(|category| category.id == id))
        .map(|category| category.color.as_str())
        .unwrap_or(DEFAULT_EVENT_COLOR)
}
