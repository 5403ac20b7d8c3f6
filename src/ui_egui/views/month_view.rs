use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use egui::{Align2, CursorIcon, FontId, Id, Pos2, Rect, Rounding, Sense, Stroke, Vec2};

use super::event_rendering::{paint_deadline_marker, paint_event_chip};
use super::palette::{CalendarCellPalette, TimeGridPalette};
use super::{repeat_hints, CalendarView, GestureState, ViewAction, ViewInput};
use crate::models::deadline::due_on;
use crate::models::event::CalendarEvent;
use crate::ui_egui::drag::MonthDrag;
use crate::utils::date::{month_start, week_start};

/// Six Sunday-start weeks
pub const MONTH_CELLS: usize = 42;
/// Clicking a day cell proposes an event at this hour.
pub const MONTH_CLICK_HOUR: u32 = 9;

const WEEKDAY_HEADER_HEIGHT: f32 = 22.0;
const DAY_NUMBER_HEIGHT: f32 = 18.0;
const CHIP_HEIGHT: f32 = 17.0;

/// First cell of the 6x7 grid shown for the month containing `date`.
pub fn grid_start(date: NaiveDate) -> NaiveDate {
    week_start(month_start(date))
}

pub fn grid_days(date: NaiveDate) -> Vec<NaiveDate> {
    let first = grid_start(date);
    (0..MONTH_CELLS as i64)
        .map(|offset| first + Duration::days(offset))
        .collect()
}

#[derive(Default)]
pub struct MonthView {
    cells: Vec<(NaiveDate, Rect)>,
}

impl MonthView {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_at(&self, pos: Pos2) -> Option<NaiveDate> {
        self.cells
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(date, _)| *date)
    }

    fn layout_cells(area: Rect, date: NaiveDate) -> Vec<(NaiveDate, Rect)> {
        let cell_size = Vec2::new(area.width() / 7.0, area.height() / 6.0);
        grid_days(date)
            .into_iter()
            .enumerate()
            .map(|(i, day)| {
                let min = Pos2::new(
                    area.left() + (i % 7) as f32 * cell_size.x,
                    area.top() + (i / 7) as f32 * cell_size.y,
                );
                (day, Rect::from_min_size(min, cell_size))
            })
            .collect()
    }

    fn events_on<'a>(events: &'a [CalendarEvent], day: NaiveDate) -> Vec<&'a CalendarEvent> {
        let mut on_day: Vec<&CalendarEvent> = events.iter().filter(|e| e.occurs_on(day)).collect();
        // all-day first, then by start
        on_day.sort_by_key(|event| (!event.all_day, event.start));
        on_day
    }

    #[allow(clippy::too_many_arguments)]
    fn show_cell(
        &self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
        day: NaiveDate,
        rect: Rect,
        palette: &CalendarCellPalette,
        markers: &TimeGridPalette,
        actions: &mut Vec<ViewAction>,
    ) {
        let in_month = day.month() == input.date.month() && day.year() == input.date.year();
        let is_today = day == input.today;
        let fill = if is_today {
            palette.today_bg
        } else if !in_month {
            palette.outside_bg
        } else if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            palette.weekend_bg
        } else {
            palette.regular_bg
        };

        let background = ui.interact(rect, Id::new(("month_cell", day)), Sense::click());
        ui.painter().rect_filled(rect.shrink(0.5), Rounding::ZERO, fill);
        ui.painter().rect_stroke(
            rect.shrink(0.5),
            Rounding::ZERO,
            Stroke::new(
                if is_today { 1.5 } else { 0.5 },
                if is_today { palette.today_border } else { palette.border },
            ),
        );
        if gestures
            .month
            .as_ref()
            .map_or(false, |drag| drag.hovered_date == Some(day))
        {
            ui.painter().rect_filled(rect.shrink(1.0), Rounding::same(2.0), palette.drop_target);
        }
        ui.painter().text(
            rect.min + Vec2::new(5.0, 3.0),
            Align2::LEFT_TOP,
            day.day().to_string(),
            FontId::proportional(12.0),
            if in_month { palette.text } else { palette.muted_text },
        );

        let hints = repeat_hints(input.events, day);
        if !hints.is_empty() {
            let hint_rect = Rect::from_min_max(
                Pos2::new(rect.right() - 28.0, rect.top() + 2.0),
                Pos2::new(rect.right() - 2.0, rect.top() + DAY_NUMBER_HEIGHT),
            );
            ui.painter().text(
                hint_rect.right_top(),
                Align2::RIGHT_TOP,
                format!("⟳{}", hints.len()),
                FontId::proportional(10.0),
                palette.muted_text,
            );
            let titles: Vec<&str> = hints.iter().map(|event| event.title.as_str()).collect();
            ui.interact(hint_rect, Id::new(("repeat_hint", day)), Sense::hover())
                .on_hover_text(format!("Repeats here: {}", titles.join(", ")));
        }

        let capacity = ((rect.height() - DAY_NUMBER_HEIGHT) / CHIP_HEIGHT).floor().max(0.0) as usize;
        let deadlines = due_on(input.deadlines, day);
        let events = Self::events_on(input.events, day);
        let total = deadlines.len() + events.len();
        let shown = if total > capacity {
            capacity.saturating_sub(1)
        } else {
            total
        };

        let chip_rect = |row: usize| {
            Rect::from_min_size(
                Pos2::new(rect.left() + 2.0, rect.top() + DAY_NUMBER_HEIGHT + row as f32 * CHIP_HEIGHT),
                Vec2::new(rect.width() - 4.0, CHIP_HEIGHT - 2.0),
            )
        };

        let mut row = 0;
        for deadline in deadlines.iter().take(shown) {
            paint_deadline_marker(ui, chip_rect(row), deadline, markers.deadline, markers.deadline_done);
            row += 1;
        }
        for event in events.iter().take(shown.saturating_sub(row)) {
            let chip = chip_rect(row);
            row += 1;
            let dragging = gestures.month.as_ref().map_or(false, |drag| drag.event_id == event.id);
            let color = input.color_of(event);
            let label = if event.all_day {
                event.title.clone()
            } else {
                format!("{} {}", event.start.format("%H:%M"), event.title)
            };
            paint_event_chip(
                ui,
                chip,
                &label,
                if dragging { color.linear_multiply(0.35) } else { color },
            );

            let editable = input.can_modify(event);
            let sense = if editable {
                Sense::click_and_drag()
            } else {
                Sense::click()
            };
            let response = ui.interact(chip, Id::new(("month_chip", &event.id, day)), sense);
            if response.drag_started() && editable {
                gestures.month = Some(MonthDrag::begin(event));
            } else if response.clicked() {
                actions.push(ViewAction::EditEvent((*event).clone()));
            }
        }
        if total > shown {
            ui.painter().text(
                chip_rect(row).left_center() + Vec2::new(4.0, 0.0),
                Align2::LEFT_CENTER,
                format!("+{} more", total - shown),
                FontId::proportional(10.0),
                palette.muted_text,
            );
        }

        if background.clicked() && gestures.month.is_none() {
            if let Some(instant) = day.and_hms_opt(MONTH_CLICK_HOUR, 0, 0) {
                actions.push(ViewAction::TimeClick(instant));
            }
        }
    }

    fn drive_drag(&self, ui: &egui::Ui, gestures: &mut GestureState, actions: &mut Vec<ViewAction>) {
        let Some(drag) = gestures.month.as_mut() else {
            return;
        };
        let (released, pointer) =
            ui.input(|i| (i.pointer.primary_released(), i.pointer.interact_pos()));
        if let Some(date) = pointer.and_then(|pos| self.cell_at(pos)) {
            drag.hover(date);
        }
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        if released {
            if let Some(commit) = gestures.month.take().and_then(MonthDrag::finish) {
                actions.push(commit.into());
            }
        }
    }
}

impl CalendarView for MonthView {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        input: &ViewInput<'_>,
        gestures: &mut GestureState,
    ) -> Vec<ViewAction> {
        let palette = CalendarCellPalette::from_visuals(ui.visuals());
        let markers = TimeGridPalette::from_visuals(ui.visuals());
        let mut actions = Vec::new();

        let (header, _) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), WEEKDAY_HEADER_HEIGHT),
            Sense::hover(),
        );
        let column_width = header.width() / 7.0;
        for (i, name) in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"].iter().enumerate() {
            ui.painter().text(
                Pos2::new(header.left() + (i as f32 + 0.5) * column_width, header.center().y),
                Align2::CENTER_CENTER,
                *name,
                FontId::proportional(12.0),
                palette.muted_text,
            );
        }

        let size = ui.available_size().max(Vec2::new(7.0 * 40.0, 6.0 * 40.0));
        let (area, _) = ui.allocate_exact_size(size, Sense::hover());
        self.cells = Self::layout_cells(area, input.date);

        let cells = self.cells.clone();
        for (day, rect) in cells {
            self.show_cell(ui, input, gestures, day, rect, &palette, &markers, &mut actions);
        }
        self.drive_drag(ui, gestures, &mut actions);

        actions
    }

    fn pointer_to_instant(&self, pos: Pos2) -> Option<NaiveDateTime> {
        self.cell_at(pos)?.and_hms_opt(MONTH_CLICK_HOUR, 0, 0)
    }
}
