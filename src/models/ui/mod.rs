// UI models module
// View mode, visible range and zoom level owned by the view container.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::utils::date::{
    days_between, month_start, next_month_start, shift_month_preserving_day, start_of_day,
    week_start,
};

/// Half-open `[start, end)` range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start_instant(&self) -> NaiveDateTime {
        start_of_day(self.start)
    }

    pub fn end_instant(&self) -> NaiveDateTime {
        start_of_day(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        days_between(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
        }
    }

    /// Range fetched and displayed for `date`: a single day, the Sunday-start
    /// calendar week, or the calendar month.
    pub fn range_for(&self, date: NaiveDate) -> DateRange {
        match self {
            ViewMode::Day => DateRange::new(date, date + Duration::days(1)),
            ViewMode::Week => {
                let start = week_start(date);
                DateRange::new(start, start + Duration::days(7))
            }
            ViewMode::Month => DateRange::new(month_start(date), next_month_start(date)),
        }
    }

    /// Shift `date` by one unit of this mode.
    pub fn step(&self, date: NaiveDate, forward: bool) -> NaiveDate {
        let sign = if forward { 1 } else { -1 };
        match self {
            ViewMode::Day => date + Duration::days(sign),
            ViewMode::Week => date + Duration::weeks(sign),
            ViewMode::Month => shift_month_preserving_day(date, sign as i32),
        }
    }

    /// Heading shown in the toolbar.
    pub fn title_for(&self, date: NaiveDate) -> String {
        match self {
            ViewMode::Day => date.format("%A, %B %-d, %Y").to_string(),
            ViewMode::Week => {
                let range = self.range_for(date);
                let last = range.end - Duration::days(1);
                format!("{} – {}", range.start.format("%b %-d"), last.format("%b %-d, %Y"))
            }
            ViewMode::Month => date.format("%B %Y").to_string(),
        }
    }

    pub fn days_in_range(&self, date: NaiveDate) -> Vec<NaiveDate> {
        self.range_for(date).days()
    }

    /// Day/Week draw a time grid; Month draws day cells.
    pub fn uses_time_grid(&self) -> bool {
        !matches!(self, ViewMode::Month)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "day" => Some(ViewMode::Day),
            "week" => Some(ViewMode::Week),
            "month" => Some(ViewMode::Month),
            _ => None,
        }
    }
}

/// Vertical density of the time grid, in pixels per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoomLevel(u32);

impl ZoomLevel {
    pub const MIN: u32 = 30;
    pub const MAX: u32 = 120;
    pub const STEP: u32 = 15;

    /// Clamp into bounds and round to the nearest step.
    pub fn new(pixels_per_hour: u32) -> Self {
        let clamped = pixels_per_hour.clamp(Self::MIN, Self::MAX);
        let steps = ((clamped - Self::MIN) as f32 / Self::STEP as f32).round() as u32;
        Self((Self::MIN + steps * Self::STEP).min(Self::MAX))
    }

    pub fn pixels_per_hour(&self) -> f32 {
        self.0 as f32
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn zoom_in(&mut self) -> bool {
        let next = (self.0 + Self::STEP).min(Self::MAX);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let next = self.0.saturating_sub(Self::STEP).max(Self::MIN);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn can_zoom_in(&self) -> bool {
        self.0 < Self::MAX
    }

    pub fn can_zoom_out(&self) -> bool {
        self.0 > Self::MIN
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(60)
    }
}
