// Event Resize
//
// Timed events grow or shrink from a handle on their bottom edge. The start
// never moves; the preview snaps to quarter-hour rows.

use chrono::{Duration, NaiveDateTime};
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use super::drag::MoveCommit;
use super::time_grid::TimeGrid;
use crate::models::event::CalendarEvent;

/// Height of the bottom-edge hit zone on tall blocks.
pub const HANDLE_ZONE: f32 = 8.0;
/// Width of the drawn handle bar.
pub const HANDLE_BAR_WIDTH: f32 = 28.0;

/// Context for an active resize
#[derive(Clone, Debug)]
pub struct ResizeGesture {
    pub event_id: String,
    pub original_start: NaiveDateTime,
    pub original_end: NaiveDateTime,
    origin_y: f32,
    current_y: f32,
}

impl ResizeGesture {
    pub fn begin(event: &CalendarEvent, pointer_y: f32) -> Self {
        Self {
            event_id: event.id.clone(),
            original_start: event.start,
            original_end: event.end,
            origin_y: pointer_y,
            current_y: pointer_y,
        }
    }

    pub fn update(&mut self, pointer_y: f32) {
        self.current_y = pointer_y;
    }

    /// Pointer travel rounded to the nearest quarter-hour row.
    pub fn snapped_delta(&self, grid: &TimeGrid) -> f32 {
        let step = grid.snap_pixels();
        if step <= 0.0 {
            return 0.0;
        }
        ((self.current_y - self.origin_y) / step).round() * step
    }

    /// Height of the preview block given its height when the drag began.
    pub fn preview_height(&self, base_height: f32, grid: &TimeGrid) -> f32 {
        (base_height + self.snapped_delta(grid)).max(0.0)
    }

    /// Resized end, clamped to where the grid closes on the day being resized.
    /// An end already past the closing hour is never pulled back by a drag
    /// downwards.
    pub fn new_end(&self, grid: &TimeGrid) -> NaiveDateTime {
        let minutes = grid.pixels_to_minutes(self.snapped_delta(grid)).round() as i64;
        let end = self.original_end + Duration::minutes(minutes);
        let ceiling = grid
            .closing_instant(self.original_end.date())
            .max(self.original_end);
        end.min(ceiling)
    }

    /// Commits only when the new end is after the start and differs from the
    /// original end.
    pub fn finish(self, grid: &TimeGrid) -> Option<MoveCommit> {
        let end = self.new_end(grid);
        if end <= self.original_start || end == self.original_end {
            return None;
        }
        Some(MoveCommit {
            event_id: self.event_id,
            start: self.original_start,
            end,
        })
    }
}

/// Hit zones for a timed event block
pub struct HandleRects {
    pub bottom: Rect,
}

impl HandleRects {
    pub fn for_timed_event(event_rect: Rect) -> Self {
        // short blocks get their lower half so the body stays draggable
        let zone_height = (event_rect.height() / 2.0).min(HANDLE_ZONE);
        Self {
            bottom: Rect::from_min_size(
                Pos2::new(event_rect.left(), event_rect.bottom() - zone_height),
                Vec2::new(event_rect.width(), zone_height),
            ),
        }
    }

    pub fn hit_test(&self, pos: Pos2) -> bool {
        self.bottom.contains(pos)
    }
}

/// Draw the bottom handle bar on an event block.
pub fn draw_handles(ui: &egui::Ui, handles: &HandleRects, hovered: bool) {
    let rect = handles.bottom;
    let bar_width = rect.width().min(HANDLE_BAR_WIDTH);
    let bar_y = rect.bottom() - 3.0;
    let center_x = rect.center().x;

    ui.painter().line_segment(
        [
            Pos2::new(center_x - bar_width / 2.0, bar_y),
            Pos2::new(center_x + bar_width / 2.0, bar_y),
        ],
        Stroke::new(
            if hovered { 3.0 } else { 2.0 },
            if hovered {
                Color32::WHITE
            } else {
                Color32::from_rgba_unmultiplied(255, 255, 255, 180)
            },
        ),
    );
}
