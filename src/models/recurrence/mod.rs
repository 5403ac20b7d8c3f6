// Recurrence module
// Repeat rules attached to calendar events. The lab API expands occurrences;
// the client only validates rules and answers "does it repeat on this day".

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;
use crate::utils::date::week_start;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl RepeatFrequency {
    pub const ALL: [RepeatFrequency; 3] = [Self::Daily, Self::Weekly, Self::Custom];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Custom => "Custom days",
        }
    }
}

/// How an event repeats.
///
/// `interval` means "every N weeks" and is ignored for daily rules.
/// `weekdays` uses 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepeatRule {
    pub frequency: RepeatFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<u8>,
}

impl RepeatRule {
    pub fn daily() -> Self {
        Self {
            frequency: RepeatFrequency::Daily,
            interval: None,
            weekdays: Vec::new(),
        }
    }

    pub fn weekly(interval: u32) -> Self {
        Self {
            frequency: RepeatFrequency::Weekly,
            interval: Some(interval),
            weekdays: Vec::new(),
        }
    }

    pub fn custom(weekdays: impl IntoIterator<Item = u8>) -> Self {
        let mut weekdays: Vec<u8> = weekdays.into_iter().collect();
        weekdays.sort_unstable();
        weekdays.dedup();
        Self {
            frequency: RepeatFrequency::Custom,
            interval: None,
            weekdays,
        }
    }

    /// Effective week interval (defaults to 1).
    pub fn interval(&self) -> u32 {
        self.interval.unwrap_or(1)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval == Some(0) {
            return Err(ValidationError::InvalidInterval);
        }
        if let Some(&bad) = self.weekdays.iter().find(|&&day| day > 6) {
            return Err(ValidationError::InvalidWeekday(bad));
        }
        if self.frequency == RepeatFrequency::Custom && self.weekdays.is_empty() {
            return Err(ValidationError::EmptyCustomWeekdays);
        }
        Ok(())
    }

    /// Whether an event anchored on `anchor` has an occurrence on `date`.
    pub fn matches(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if date < anchor {
            return false;
        }

        let weekday = date.weekday().num_days_from_sunday() as u8;
        let weeks_apart = (week_start(date) - week_start(anchor)).num_days() / 7;
        let on_interval = weeks_apart % i64::from(self.interval().max(1)) == 0;

        match self.frequency {
            RepeatFrequency::Daily => true,
            RepeatFrequency::Weekly => {
                on_interval && weekday == anchor.weekday().num_days_from_sunday() as u8
            }
            RepeatFrequency::Custom => on_interval && self.weekdays.contains(&weekday),
        }
    }

    /// Short human description, e.g. "Every 2 weeks on Mon, Wed".
    pub fn describe(&self) -> String {
        let every = match self.interval() {
            1 => "Every week".to_string(),
            n => format!("Every {} weeks", n),
        };
        match self.frequency {
            RepeatFrequency::Daily => "Every day".to_string(),
            RepeatFrequency::Weekly => every,
            RepeatFrequency::Custom => {
                let days: Vec<&str> = self
                    .weekdays
                    .iter()
                    .filter_map(|&day| WEEKDAY_LABELS.get(day as usize).copied())
                    .collect();
                format!("{} on {}", every, days.join(", "))
            }
        }
    }
}

pub fn weekday_label(index: u8) -> &'static str {
    WEEKDAY_LABELS.get(index as usize).copied().unwrap_or("?")
}
