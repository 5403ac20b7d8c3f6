//! Day and week views: a header row, an all-day strip with deadline markers,
//! and the scrollable hour grid with event blocks laid out in lanes.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Weekday};
use egui::{Align2, CursorIcon, FontId, Id, Pos2, Rect, Rounding, Sense, Stroke, Vec2};

use super::event_rendering::{paint_deadline_marker, paint_event_block, paint_event_chip};
use super::palette::TimeGridPalette;
use super::{layout_lanes, CalendarView, GestureState, ViewAction, ViewInput};
use crate::models::deadline::due_on;
use crate::models::event::CalendarEvent;
use crate::ui_egui::drag::MoveGesture;
use crate::ui_egui::resize::{draw_handles, HandleRects, ResizeGesture};
use crate::ui_egui::time_grid::TimeGrid;

pub const TIME_LABEL_WIDTH: f32 = 52.0;
const HEADER_HEIGHT: f32 = 26.0;
const STRIP_ROW_HEIGHT: f32 = 20.0;
const COLUMN_GAP: f32 = 2.0;
const MIN_BLOCK_HEIGHT: f32 = 12.0;

/// A laid-out event block for the current frame.
struct Block<'a> {
    event: &'a CalendarEvent,
    day: NaiveDate,
    rect: Rect,
}

#[derive(Default)]
pub struct TimeGridView {
    grid_rect: Option<Rect>,
    columns: Vec<(NaiveDate, Rect)>,
    grid: TimeGrid,
}

impl TimeGridView {
    pub fn new() -> Self {
        Self::default()
    }

    fn column_at(&self, x: f32) -> Option<(NaiveDate, Rect)> {
        self.columns
            .iter()
            .copied()
            .find(|(_, rect)| rect.x_range().contains(x))
    }

    fn layout_columns(area: Rect, days: &[NaiveDate]) -> Vec<(NaiveDate, Rect)> {
        if days.is_empty() {
            return Vec::new();
        }
        let left = area.left() + TIME_LABEL_WIDTH;
        let width = ((area.right() - left) / days.len() as f32).max(1.0);
        days.iter()
            .enumerate()
            .map(|(i, day)| {
                let x = left + i as f32 * width;
                (
                    *day,
                    Rect::from_min_max(
                        Pos2::new(x, area.top()),
                        Pos2::new(x + width - COLUMN_GAP, area.bottom()),
                    ),
                )
            })
            .collect()
    }

    fn show_header(&self, ui: &mut egui::Ui, input: &ViewInput<'_>, palette: &TimeGridPalette) {
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), HEADER_HEIGHT),
            Sense::hover(),
        );
        for (day, column) in Self::layout_columns(rect, &input.days) {
            let label = format!("{} {}", day.format("%a"), day.day());
            let is_today = day == input.today;
            if is_today {
                ui.painter()
                    .rect_filled(column.shrink(1.0), Rounding::same(6.0), palette.today_bg);
            }
            ui.painter().text(
                column.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(if is_today { 14.0 } else { 13.0 }),
                palette.header_text,
            );
        }
    }

    /// All-day events and deadlines above the grid.
    fn show_all_day_strip(
        &self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        palette: &TimeGridPalette,
        actions: &mut Vec<ViewAction>,
    ) {
        let rows_per_day: Vec<(Vec<&CalendarEvent>, usize)> = input
            .days
            .iter()
            .map(|day| {
                let all_day: Vec<&CalendarEvent> = input
                    .events
                    .iter()
                    .filter(|event| event.all_day && event.occurs_on(*day))
                    .collect();
                let deadlines = due_on(input.deadlines, *day).len();
                (all_day, deadlines)
            })
            .collect();
        let rows = rows_per_day
            .iter()
            .map(|(events, deadlines)| events.len() + deadlines)
            .max()
            .unwrap_or(0);
        if rows == 0 {
            return;
        }

        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), rows as f32 * STRIP_ROW_HEIGHT + 4.0),
            Sense::hover(),
        );
        ui.painter().text(
            Pos2::new(rect.left() + 4.0, rect.top() + 2.0),
            Align2::LEFT_TOP,
            "all-day",
            FontId::proportional(10.0),
            palette.label,
        );

        for ((day, column), (events, _)) in Self::layout_columns(rect, &input.days)
            .into_iter()
            .zip(rows_per_day.iter())
        {
            let mut y = column.top() + 2.0;
            for deadline in due_on(input.deadlines, day) {
                let chip = Rect::from_min_size(
                    Pos2::new(column.left(), y),
                    Vec2::new(column.width(), STRIP_ROW_HEIGHT - 2.0),
                );
                paint_deadline_marker(ui, chip, deadline, palette.deadline, palette.deadline_done);
                ui.interact(chip, Id::new(("deadline", &deadline.id, day)), Sense::hover())
                    .on_hover_text(deadline.label());
                y += STRIP_ROW_HEIGHT;
            }
            for event in events {
                let chip = Rect::from_min_size(
                    Pos2::new(column.left(), y),
                    Vec2::new(column.width(), STRIP_ROW_HEIGHT - 2.0),
                );
                paint_event_chip(ui, chip, &event.title, input.color_of(event));
                let response = ui.interact(chip, Id::new(("all_day", &event.id, day)), Sense::click());
                if response.clicked() {
                    actions.push(ViewAction::EditEvent((*event).clone()));
                }
                y += STRIP_ROW_HEIGHT;
            }
        }
    }

    fn layout_blocks<'a>(&self, input: &ViewInput<'a>, grid_rect: Rect) -> Vec<Block<'a>> {
        let mut blocks = Vec::new();
        for (day, column) in &self.columns {
            let segments: Vec<(&CalendarEvent, (NaiveDateTime, NaiveDateTime))> = input
                .events
                .iter()
                .filter(|event| !event.all_day)
                .filter_map(|event| event.segment_for_date(*day).map(|segment| (event, segment)))
                .collect();
            let spans: Vec<(NaiveDateTime, NaiveDateTime)> =
                segments.iter().map(|(_, segment)| *segment).collect();
            let placements = layout_lanes(&spans);

            for ((event, (start, end)), placement) in segments.into_iter().zip(placements) {
                let top = self.grid.offset_on(start, *day);
                let bottom = self.grid.offset_on(end, *day);
                let height = (bottom - top).max(MIN_BLOCK_HEIGHT);
                let top = top.min(self.grid.height() - height).max(0.0);
                let lane_width = column.width() / placement.lanes as f32;
                let rect = Rect::from_min_size(
                    Pos2::new(
                        column.left() + placement.lane as f32 * lane_width,
                        grid_rect.top() + top,
                    ),
                    Vec2::new((lane_width - 1.0).max(4.0), height - 1.0),
                );
                blocks.push(Block {
                    event,
                    day: *day,
                    rect,
                });
            }
        }
        blocks
    }

    fn paint_background(
        &self,
        ui: &egui::Ui,
        grid_rect: Rect,
        today: NaiveDate,
        palette: &TimeGridPalette,
    ) {
        let painter = ui.painter();
        let label_rect = Rect::from_min_max(
            grid_rect.min,
            Pos2::new(grid_rect.left() + TIME_LABEL_WIDTH, grid_rect.bottom()),
        );
        painter.rect_filled(label_rect, Rounding::ZERO, palette.hour_bg);

        for (day, column) in &self.columns {
            let fill = if *day == today {
                palette.today_bg
            } else if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                palette.weekend_bg
            } else {
                palette.regular_bg
            };
            painter.rect_filled(*column, Rounding::ZERO, fill);
        }

        let quarter = self.grid.snap_pixels();
        for row in 0..=(self.grid.hour_rows() * 4) {
            let y = grid_rect.top() + row as f32 * quarter;
            if row % 4 == 0 {
                painter.hline(
                    (grid_rect.left() + TIME_LABEL_WIDTH)..=grid_rect.right(),
                    y,
                    Stroke::new(1.0, palette.hour_line),
                );
                let hour = self.grid.start_hour + row / 4;
                if hour <= self.grid.closing_hour() {
                    painter.text(
                        Pos2::new(grid_rect.left() + TIME_LABEL_WIDTH - 6.0, y + 2.0),
                        Align2::RIGHT_TOP,
                        format!("{:02}:00", hour),
                        FontId::proportional(11.0),
                        palette.label,
                    );
                }
            } else if quarter >= 10.0 {
                painter.hline(
                    (grid_rect.left() + TIME_LABEL_WIDTH)..=grid_rect.right(),
                    y,
                    Stroke::new(0.5, palette.slot_line),
                );
            }
        }

        let now = Local::now().naive_local();
        if let Some((_, column)) = self.columns.iter().find(|(day, _)| *day == now.date()) {
            let offset = self.grid.offset_of(now.time());
            if (0.0..=self.grid.height()).contains(&offset) {
                let y = grid_rect.top() + offset;
                let color = egui::Color32::from_rgb(255, 100, 100);
                painter.circle_filled(Pos2::new(column.left(), y), 3.0, color);
                painter.hline(column.x_range(), y, Stroke::new(2.0, color));
            }
        }
    }

    fn show_grid(
        &mut self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
        palette: &TimeGridPalette,
        actions: &mut Vec<ViewAction>,
    ) {
        let (grid_rect, background) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), self.grid.height()),
            Sense::click(),
        );
        self.grid_rect = Some(grid_rect);
        self.columns = Self::layout_columns(grid_rect, &input.days);
        self.paint_background(ui, grid_rect, input.today, palette);

        let blocks = self.layout_blocks(input, grid_rect);
        let active_id = gestures.active_event_id().map(str::to_owned);

        for block in &blocks {
            let being_dragged = active_id.as_deref() == Some(block.event.id.as_str());
            let color = input.color_of(block.event);
            if being_dragged {
                paint_event_block(ui, block.rect, block.event, color.linear_multiply(0.35), false);
            } else {
                paint_event_block(ui, block.rect, block.event, color, false);
            }

            let id = Id::new(("event_block", &block.event.id, block.day));
            let editable = input.can_modify(block.event);
            let sense = if editable {
                Sense::click_and_drag()
            } else {
                Sense::click()
            };
            let response = ui.interact(block.rect, id, sense);
            let handles = HandleRects::for_timed_event(block.rect);
            let on_handle = editable
                && response
                    .hover_pos()
                    .map_or(false, |pos| handles.hit_test(pos));

            if editable && response.hovered() && !gestures.is_active() {
                draw_handles(ui, &handles, on_handle);
            }
            let response = if on_handle {
                response.on_hover_cursor(CursorIcon::ResizeVertical)
            } else {
                response.on_hover_text(block.event.title.clone())
            };

            if response.drag_started() && editable {
                let pointer_y = response
                    .interact_pointer_pos()
                    .map_or(block.rect.top(), |pos| pos.y);
                let press_on_handle = response
                    .interact_pointer_pos()
                    .map_or(false, |pos| handles.hit_test(pos));
                gestures.create.cancel();
                if press_on_handle {
                    gestures.resizing = Some(ResizeGesture::begin(block.event, pointer_y));
                } else {
                    gestures.moving =
                        Some(MoveGesture::begin(block.event, pointer_y, input.snap_moves));
                }
            } else if response.clicked() {
                actions.push(ViewAction::EditEvent(block.event.clone()));
            }
        }

        self.drive_create(ui, input, gestures, &background, &blocks, actions);
        self.drive_block_gestures(ui, input, gestures, &blocks, actions);
    }

    /// Drag-to-create on empty background, fed from raw pointer input.
    fn drive_create(
        &self,
        ui: &egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
        background: &egui::Response,
        blocks: &[Block<'_>],
        actions: &mut Vec<ViewAction>,
    ) {
        let Some(grid_rect) = self.grid_rect else {
            return;
        };
        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        let block_gesture = gestures.moving.is_some() || gestures.resizing.is_some();
        if pressed && gestures.create.is_idle() && !block_gesture {
            let inside = pointer.filter(|pos| ui.rect_contains_pointer(grid_rect) && grid_rect.contains(*pos));
            if let Some(pos) = inside {
                if let Some((day, column)) = self.column_at(pos.x) {
                    let on_event = blocks.iter().any(|block| block.rect.contains(pos));
                    let local = Pos2::new(pos.x - column.left(), pos.y - grid_rect.top());
                    gestures.create.pointer_down(local, day, on_event);
                }
            }
        }

        if let Some(day) = gestures.create.day() {
            let column_left = self
                .columns
                .iter()
                .find(|(d, _)| *d == day)
                .map_or(grid_rect.left(), |(_, rect)| rect.left());
            if let Some(pos) = pointer {
                let local = Pos2::new(pos.x - column_left, pos.y - grid_rect.top());
                if released {
                    let range = gestures.create.pointer_up(local, &input.grid, input.frame);
                    if let Some((start, end)) = range {
                        actions.push(ViewAction::TimeRangeSelect(start, end));
                    }
                } else {
                    gestures.create.pointer_move(local);
                }
            } else if released {
                gestures.create.cancel();
            }
        }

        if let Some((day, start, end)) = gestures.create.preview(&input.grid) {
            if let Some((_, column)) = self.columns.iter().find(|(d, _)| *d == day) {
                let top = grid_rect.top() + input.grid.offset_on(start, day);
                let bottom = grid_rect.top() + input.grid.offset_on(end, day);
                let rect = Rect::from_min_max(
                    Pos2::new(column.left(), top),
                    Pos2::new(column.right(), bottom.max(top + 2.0)),
                );
                let palette = TimeGridPalette::from_visuals(ui.visuals());
                ui.painter().rect_filled(rect, Rounding::same(4.0), palette.preview_fill);
                ui.painter().rect_stroke(
                    rect,
                    Rounding::same(4.0),
                    Stroke::new(1.0, palette.preview_stroke),
                );
                ui.painter().text(
                    rect.min + Vec2::new(6.0, 3.0),
                    Align2::LEFT_TOP,
                    format!("{} – {}", start.format("%H:%M"), end.format("%H:%M")),
                    FontId::proportional(11.0),
                    palette.header_text,
                );
            }
        }

        if background.clicked() && !gestures.create.suppresses_click(input.frame) {
            if let Some(instant) = background
                .interact_pointer_pos()
                .and_then(|pos| self.pointer_to_instant(pos))
            {
                actions.push(ViewAction::TimeClick(instant));
            }
        }
    }

    fn drive_block_gestures(
        &self,
        ui: &egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
        blocks: &[Block<'_>],
        actions: &mut Vec<ViewAction>,
    ) {
        let (released, pointer) =
            ui.input(|i| (i.pointer.primary_released(), i.pointer.interact_pos()));

        if let Some(gesture) = gestures.moving.as_mut() {
            if let Some(pos) = pointer {
                gesture.update(pos.y);
            }
            let pph = self.grid.pixels_per_hour;
            let (start, end) = gesture.preview(pph);
            if let Some(block) = blocks.iter().find(|block| block.event.id == gesture.event_id) {
                let ghost = block.event.with_times(start, end);
                let shift = self.grid.minutes_to_pixels(gesture.delta_minutes(pph) as f64);
                let rect = block.rect.translate(Vec2::new(0.0, shift));
                paint_event_block(ui, rect, &ghost, input.color_of(&ghost), true);
            }
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            if released {
                if let Some(commit) = gestures.moving.take().and_then(|g| g.finish(pph)) {
                    actions.push(commit.into());
                }
            }
        }

        if let Some(gesture) = gestures.resizing.as_mut() {
            if let Some(pos) = pointer {
                gesture.update(pos.y);
            }
            if let Some(block) = blocks.iter().find(|block| block.event.id == gesture.event_id) {
                let height = gesture.preview_height(block.rect.height(), &self.grid);
                let rect = Rect::from_min_size(
                    block.rect.min,
                    Vec2::new(block.rect.width(), height.max(2.0)),
                );
                let ghost = block
                    .event
                    .with_times(gesture.original_start, gesture.new_end(&self.grid));
                paint_event_block(ui, rect, &ghost, input.color_of(&ghost), true);
            }
            ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
            if released {
                if let Some(commit) = gestures.resizing.take().and_then(|g| g.finish(&self.grid)) {
                    actions.push(commit.into());
                }
            }
        }
    }
}

impl CalendarView for TimeGridView {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
    ) -> Vec<ViewAction> {
        let palette = TimeGridPalette::from_visuals(ui.visuals());
        let mut actions = Vec::new();
        // the live density is read every frame, including mid-gesture
        self.grid = input.grid;

        ui.spacing_mut().item_spacing.y = 0.0;
        self.show_header(ui, input, &palette);
        self.show_all_day_strip(ui, input, &palette, &mut actions);
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .id_source("time_grid_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.show_grid(ui, input, gestures, &palette, &mut actions);
            });

        actions
    }

    fn pointer_to_instant(&self, pos: Pos2) -> Option<NaiveDateTime> {
        let grid_rect = self.grid_rect?;
        let (day, _) = self.column_at(pos.x)?;
        Some(self.grid.instant_at(pos.y - grid_rect.top(), day))
    }
}
