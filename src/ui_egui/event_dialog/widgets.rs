use chrono::NaiveTime;
use egui::Color32;

use crate::utils::date::quarter_hour_slots;

pub const FORM_LABEL_WIDTH: f32 = 110.0;

/// Time picker offering the 96 quarter-hour slots of a day.
pub fn render_time_picker(ui: &mut egui::Ui, id_source: &str, time: &mut NaiveTime) {
    egui::ComboBox::from_id_source(id_source)
        .width(80.0)
        .selected_text(time.format("%H:%M").to_string())
        .show_ui(ui, |ui| {
            for slot in quarter_hour_slots() {
                ui.selectable_value(time, slot, slot.format("%H:%M").to_string());
            }
        });
}

pub fn labeled_row<F>(ui: &mut egui::Ui, label: &str, add_contents: F)
where
    F: FnOnce(&mut egui::Ui),
{
    ui.horizontal(|ui| {
        ui.allocate_ui_with_layout(
            egui::Vec2::new(FORM_LABEL_WIDTH, 24.0),
            egui::Layout::right_to_left(egui::Align::Center),
            |ui| {
                ui.label(label);
            },
        );
        add_contents(ui);
    });
}

/// Small filled square used as a colour swatch.
pub fn color_swatch(ui: &mut egui::Ui, color: Color32, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::Vec2::splat(18.0), egui::Sense::click());
    ui.painter().rect_filled(rect, egui::Rounding::same(3.0), color);
    if selected {
        ui.painter().rect_stroke(
            rect.expand(1.5),
            egui::Rounding::same(4.0),
            egui::Stroke::new(2.0, ui.visuals().strong_text_color()),
        );
    }
    response
}
