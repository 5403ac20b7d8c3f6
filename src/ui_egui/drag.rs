use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::event::CalendarEvent;
use crate::utils::date::{snap_minutes, SNAP_MINUTES};

/// New times for an event produced by a finished move or resize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCommit {
    pub event_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Vertical drag of a timed event block.
#[derive(Clone, Debug)]
pub struct MoveGesture {
    pub event_id: String,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    origin_y: f32,
    current_y: f32,
    snap: bool,
}

impl MoveGesture {
    pub fn begin(event: &CalendarEvent, pointer_y: f32, snap: bool) -> Self {
        Self {
            event_id: event.id.clone(),
            original_start: event.start,
            original_end: event.end,
            origin_y: pointer_y,
            current_y: pointer_y,
            snap,
        }
    }

    pub fn update(&mut self, pointer_y: f32) {
        self.current_y = pointer_y;
    }

    pub fn delta_pixels(&self) -> f32 {
        self.current_y - self.origin_y
    }

    /// Pointer travel converted to minutes at the given density.
    pub fn delta_minutes(&self, pixels_per_hour: f32) -> i64 {
        let minutes = f64::from(self.delta_pixels()) / f64::from(pixels_per_hour) * 60.0;
        if self.snap {
            snap_minutes(minutes, SNAP_MINUTES)
        } else {
            minutes.round() as i64
        }
    }

    /// Shifted `(start, end)`; the duration never changes.
    pub fn preview(&self, pixels_per_hour: f32) -> (NaiveDateTime, NaiveDateTime) {
        let delta = Duration::minutes(self.delta_minutes(pixels_per_hour));
        (self.original_start + delta, self.original_end + delta)
    }

    /// Returns `None` when the block did not move.
    pub fn finish(self, pixels_per_hour: f32) -> Option<MoveCommit> {
        if self.delta_minutes(pixels_per_hour) == 0 {
            return None;
        }
        let (start, end) = self.preview(pixels_per_hour);
        Some(MoveCommit {
            event_id: self.event_id,
            start,
            end,
        })
    }
}

/// Day-cell drag in the month grid. The drop target is a date and the time of
/// day is kept.
#[derive(Clone, Debug)]
pub struct MonthDrag {
    pub event_id: String,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    pub hovered_date: Option<NaiveDate>,
}

impl MonthDrag {
    pub fn begin(event: &CalendarEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            original_start: event.start,
            original_end: event.end,
            hovered_date: Some(event.start.date()),
        }
    }

    pub fn hover(&mut self, date: NaiveDate) {
        self.hovered_date = Some(date);
    }

    pub fn target_times(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.original_start.time());
        (start, start + (self.original_end - self.original_start))
    }

    /// Drop on the hovered cell. Dropping back on the original day is a no-op.
    pub fn finish(self) -> Option<MoveCommit> {
        let date = self.hovered_date?;
        if date == self.original_start.date() {
            return None;
        }
        let (start, end) = self.target_times(date);
        Some(MoveCommit {
            event_id: self.event_id,
            start,
            end,
        })
    }
}
