//! Low-level painting of event blocks, chips and deadline markers.

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::models::deadline::DeadlineEvent;
use crate::models::event::{CalendarEvent, EventScope};

fn text_color_on(fill: Color32) -> Color32 {
    let luminance = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luminance > 160.0 {
        Color32::from_rgb(30, 30, 30)
    } else {
        Color32::WHITE
    }
}

/// Paint a timed event block. `ghost` draws the translucent drag preview.
pub fn paint_event_block(
    ui: &egui::Ui,
    rect: Rect,
    event: &CalendarEvent,
    color: Color32,
    ghost: bool,
) {
    let fill = if ghost {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 110)
    } else {
        color
    };
    let painter = ui.painter_at(rect.expand(1.0));
    painter.rect_filled(rect, Rounding::same(4.0), fill);
    if ghost {
        painter.rect_stroke(rect, Rounding::same(4.0), Stroke::new(1.5, color));
    }
    if event.scope == EventScope::Lab {
        // lab events carry a left accent bar
        let bar = Rect::from_min_size(rect.min, Vec2::new(3.0, rect.height()));
        painter.rect_filled(bar, Rounding::same(2.0), color.linear_multiply(0.6));
    }

    let text_color = text_color_on(color);
    let mut title = event.title.clone();
    if event.is_recurring() {
        title.push_str(" ⟳");
    }
    painter.text(
        rect.min + Vec2::new(6.0, 3.0),
        Align2::LEFT_TOP,
        title,
        FontId::proportional(12.0),
        text_color,
    );
    if rect.height() >= 34.0 {
        let times = format!(
            "{} – {}",
            event.start.format("%H:%M"),
            event.end.format("%H:%M")
        );
        painter.text(
            rect.min + Vec2::new(6.0, 18.0),
            Align2::LEFT_TOP,
            times,
            FontId::proportional(10.0),
            text_color.linear_multiply(0.85),
        );
    }
}

/// One-line chip used in the all-day strip and the month cells.
pub fn paint_event_chip(ui: &egui::Ui, rect: Rect, label: &str, color: Color32) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, Rounding::same(3.0), color);
    painter.text(
        Pos2::new(rect.left() + 4.0, rect.center().y),
        Align2::LEFT_CENTER,
        label,
        FontId::proportional(11.0),
        text_color_on(color),
    );
}

pub fn paint_deadline_marker(
    ui: &egui::Ui,
    rect: Rect,
    deadline: &DeadlineEvent,
    open_color: Color32,
    done_color: Color32,
) {
    let color = if deadline.completed {
        done_color
    } else {
        open_color
    };
    let painter = ui.painter_at(rect);
    painter.rect_stroke(rect, Rounding::same(3.0), Stroke::new(1.0, color));
    painter.text(
        Pos2::new(rect.left() + 4.0, rect.center().y),
        Align2::LEFT_CENTER,
        format!("⚑ {}", deadline.label()),
        FontId::proportional(11.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_color_contrasts_fill() {
        assert_eq!(text_color_on(Color32::from_rgb(250, 250, 210)), Color32::from_rgb(30, 30, 30));
        assert_eq!(text_color_on(Color32::from_rgb(30, 64, 175)), Color32::WHITE);
    }
}
