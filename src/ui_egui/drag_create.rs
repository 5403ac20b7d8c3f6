//! Drag-to-create on empty time-grid background.
//!
//! Positions are grid-local: `y` is the offset from the top of the grid and
//! `x` is relative to the day column the gesture started in.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use egui::Pos2;

use super::time_grid::TimeGrid;

/// Pointer travel (px) before an armed press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;
/// Shortest range a drag may create.
pub const MIN_CREATE_MINUTES: i64 = 15;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Armed {
        origin: Pos2,
        day: NaiveDate,
    },
    Dragging {
        origin: Pos2,
        current: Pos2,
        day: NaiveDate,
    },
}

#[derive(Clone, Debug)]
pub struct CreateGesture {
    phase: Phase,
    /// Last frame on which clicks are swallowed after a drag ended.
    suppress_until: Option<u64>,
}

impl Default for CreateGesture {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            suppress_until: None,
        }
    }
}

impl CreateGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::Armed { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Day column the current gesture belongs to.
    pub fn day(&self) -> Option<NaiveDate> {
        match self.phase {
            Phase::Idle => None,
            Phase::Armed { day, .. } | Phase::Dragging { day, .. } => Some(day),
        }
    }

    /// Arms the gesture. Presses on an existing event are ignored.
    pub fn pointer_down(&mut self, pos: Pos2, day: NaiveDate, on_event: bool) {
        if on_event || !self.is_idle() {
            return;
        }
        self.phase = Phase::Armed { origin: pos, day };
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        match self.phase {
            Phase::Idle => {}
            Phase::Armed { origin, day } => {
                if origin.distance(pos) > DRAG_THRESHOLD {
                    self.phase = Phase::Dragging {
                        origin,
                        current: pos,
                        day,
                    };
                }
            }
            Phase::Dragging { origin, day, .. } => {
                self.phase = Phase::Dragging {
                    origin,
                    current: pos,
                    day,
                };
            }
        }
    }

    /// Ends the gesture. Returns the selected range when a drag covered at
    /// least the minimum duration.
    pub fn pointer_up(
        &mut self,
        pos: Pos2,
        grid: &TimeGrid,
        frame: u64,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.pointer_move(pos);
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);

        let Phase::Dragging {
            origin,
            current,
            day,
        } = phase
        else {
            return None;
        };

        self.suppress_until = Some(frame + 1);

        let (start, end) = Self::map_range(origin, current, day, grid);
        if end - start >= Duration::minutes(MIN_CREATE_MINUTES) {
            Some((start, end))
        } else {
            log::debug!("discarding drag-create shorter than {MIN_CREATE_MINUTES} minutes");
            None
        }
    }

    /// True on the frame a drag ended and the one after it.
    pub fn suppresses_click(&self, frame: u64) -> bool {
        self.suppress_until.map_or(false, |until| frame <= until)
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Provisional range while dragging, as `(day, start, end)`.
    pub fn preview(&self, grid: &TimeGrid) -> Option<(NaiveDate, NaiveDateTime, NaiveDateTime)> {
        match self.phase {
            Phase::Dragging {
                origin,
                current,
                day,
            } => {
                let (start, end) = Self::map_range(origin, current, day, grid);
                Some((day, start, end))
            }
            _ => None,
        }
    }

    fn map_range(
        a: Pos2,
        b: Pos2,
        day: NaiveDate,
        grid: &TimeGrid,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let top = a.y.min(b.y);
        let bottom = a.y.max(b.y);
        (grid.instant_at(top, day), grid.instant_at(bottom, day))
    }
}
