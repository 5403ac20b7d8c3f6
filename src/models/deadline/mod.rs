//! Project task due dates projected onto the calendar. Read-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineEvent {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl DeadlineEvent {
    pub fn label(&self) -> String {
        match &self.project_name {
            Some(project) => format!("{} ({})", self.title, project),
            None => self.title.clone(),
        }
    }
}

/// Deadlines due on `date`, open ones first.
pub fn due_on(deadlines: &[DeadlineEvent], date: NaiveDate) -> Vec<&DeadlineEvent> {
    let mut due: Vec<&DeadlineEvent> = deadlines
        .iter()
        .filter(|deadline| deadline.due_date == date)
        .collect();
    due.sort_by_key(|deadline| deadline.completed);
    due
}
