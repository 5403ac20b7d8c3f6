use egui::{Color32, RichText};
use egui_extras::DatePickerButton;

use crate::models::category::{CalendarCategory, CategoryDraft, CATEGORY_PALETTE};
use crate::models::event::{EventScope, RsvpStatus};
use crate::models::recurrence::{weekday_label, RepeatFrequency};
use crate::ui_egui::views::parse_color;

use super::state::EventForm;
use super::widgets::{color_swatch, labeled_row, render_time_picker};

/// Data the editor shows but does not own.
pub struct DialogContext<'a> {
    pub categories: &'a [CalendarCategory],
    /// Scopes the user may pick for a new event
    pub scopes: Vec<EventScope>,
    /// False for lab events the user cannot modify
    pub editable: bool,
    pub user_id: Option<&'a str>,
}

/// Requests raised by the editor; the container applies them.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    Save,
    Cancel,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    CreateCategory(CategoryDraft),
    Rsvp(RsvpStatus),
}

pub fn render_event_dialog(
    ctx: &egui::Context,
    form: &mut EventForm,
    context: &DialogContext<'_>,
) -> Vec<DialogAction> {
    let mut actions = Vec::new();
    let mut open = true;

    egui::Window::new(if form.is_edit() { "Edit Event" } else { "New Event" })
        .id(egui::Id::new("event_editor"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("event_editor_scroll")
                .max_height(560.0)
                .show(ui, |ui| {
                    render_error_banner(ui, form);
                    ui.add_enabled_ui(context.editable, |ui| {
                        render_basic_section(ui, form, context);
                        ui.separator();
                        render_date_time_section(ui, form);
                        ui.separator();
                        render_category_section(ui, form, context, &mut actions);
                        ui.separator();
                        render_repeat_section(ui, form);
                        ui.separator();
                        labeled_row(ui, "Notes:", |ui| {
                            ui.add(
                                egui::TextEdit::multiline(&mut form.notes)
                                    .desired_rows(3)
                                    .desired_width(f32::INFINITY),
                            );
                        });
                    });
                    render_rsvp_section(ui, form, context, &mut actions);
                });
            ui.separator();
            render_action_buttons(ui, form, context, &mut actions);
        });

    if !open {
        actions.push(DialogAction::Cancel);
    }
    actions
}

fn render_error_banner(ui: &mut egui::Ui, form: &EventForm) {
    if let Some(error) = &form.error {
        ui.colored_label(Color32::from_rgb(220, 53, 69), format!("⚠ {}", error));
        ui.add_space(6.0);
    }
}

fn render_basic_section(ui: &mut egui::Ui, form: &mut EventForm, context: &DialogContext<'_>) {
    labeled_row(ui, "Title:", |ui| {
        ui.add(
            egui::TextEdit::singleline(&mut form.title)
                .hint_text("Event title")
                .desired_width(f32::INFINITY),
        );
    });
    labeled_row(ui, "Description:", |ui| {
        ui.add(
            egui::TextEdit::multiline(&mut form.description)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
    });
    labeled_row(ui, "Calendar:", |ui| {
        if form.is_edit() {
            // scope is fixed once the event exists
            ui.label(form.scope.label());
            return;
        }
        for scope in &context.scopes {
            ui.radio_value(&mut form.scope, *scope, scope.label());
        }
    });
}

fn render_date_time_section(ui: &mut egui::Ui, form: &mut EventForm) {
    labeled_row(ui, "All day:", |ui| {
        ui.checkbox(&mut form.all_day, "");
    });
    labeled_row(ui, "Starts:", |ui| {
        ui.add(DatePickerButton::new(&mut form.start_date).id_source("event_start_date"));
        if !form.all_day {
            render_time_picker(ui, "event_start_time", &mut form.start_time);
        }
    });
    labeled_row(ui, "Ends:", |ui| {
        ui.add(DatePickerButton::new(&mut form.end_date).id_source("event_end_date"));
        if !form.all_day {
            render_time_picker(ui, "event_end_time", &mut form.end_time);
        }
    });
}

fn render_category_section(
    ui: &mut egui::Ui,
    form: &mut EventForm,
    context: &DialogContext<'_>,
    actions: &mut Vec<DialogAction>,
) {
    let selected = form
        .category_id
        .as_deref()
        .and_then(|id| context.categories.iter().find(|c| c.id == id))
        .map_or("None", |c| c.name.as_str())
        .to_string();

    labeled_row(ui, "Category:", |ui| {
        egui::ComboBox::from_id_source("event_category")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut form.category_id, None, "None");
                for category in context.categories.iter().filter(|c| c.scope == form.scope) {
                    let color = parse_color(&category.color).unwrap_or(Color32::GRAY);
                    ui.selectable_value(
                        &mut form.category_id,
                        Some(category.id.clone()),
                        RichText::new(format!("● {}", category.name)).color(color),
                    );
                }
            });
        if ui.small_button("+ New").clicked() {
            form.new_category_open = !form.new_category_open;
        }
    });

    if !form.new_category_open {
        return;
    }
    labeled_row(ui, "Name:", |ui| {
        ui.text_edit_singleline(&mut form.new_category_name);
    });
    labeled_row(ui, "Colour:", |ui| {
        for hex in CATEGORY_PALETTE {
            let color = parse_color(hex).unwrap_or(Color32::GRAY);
            if color_swatch(ui, color, form.new_category_color == hex).clicked() {
                form.new_category_color = hex.to_string();
            }
        }
    });
    labeled_row(ui, "", |ui| {
        if ui.button("Create category").clicked() {
            let draft = form.category_draft();
            match draft.validate() {
                Ok(()) => {
                    actions.push(DialogAction::CreateCategory(draft));
                    form.reset_new_category();
                    form.error = None;
                }
                Err(err) => form.error = Some(err.to_string()),
            }
        }
    });
}

fn render_repeat_section(ui: &mut egui::Ui, form: &mut EventForm) {
    labeled_row(ui, "Repeat:", |ui| {
        ui.checkbox(&mut form.repeat_enabled, "");
        if form.repeat_enabled {
            egui::ComboBox::from_id_source("event_repeat_frequency")
                .selected_text(form.frequency.label())
                .show_ui(ui, |ui| {
                    for frequency in RepeatFrequency::ALL {
                        ui.selectable_value(&mut form.frequency, frequency, frequency.label());
                    }
                });
        }
    });
    if !form.repeat_enabled {
        return;
    }

    match form.frequency {
        RepeatFrequency::Daily => {}
        RepeatFrequency::Weekly => {
            labeled_row(ui, "Every:", |ui| {
                ui.add(egui::DragValue::new(&mut form.interval).range(1..=52));
                ui.label(if form.interval == 1 { "week" } else { "weeks" });
            });
        }
        RepeatFrequency::Custom => {
            labeled_row(ui, "On:", |ui| {
                for (day, flag) in form.weekdays.iter_mut().enumerate() {
                    ui.toggle_value(flag, weekday_label(day as u8));
                }
            });
        }
    }
    if let Some(rule) = form.repeat_rule() {
        labeled_row(ui, "", |ui| {
            ui.label(RichText::new(rule.describe()).italics().weak());
        });
    }
}

fn render_rsvp_section(
    ui: &mut egui::Ui,
    form: &mut EventForm,
    context: &DialogContext<'_>,
    actions: &mut Vec<DialogAction>,
) {
    if form.attendees.is_empty() {
        return;
    }
    ui.separator();
    ui.label(RichText::new("Attendees").strong());
    for attendee in &form.attendees {
        ui.horizontal(|ui| {
            ui.label(attendee.display_name());
            ui.label(RichText::new(attendee.status.label()).weak());
        });
    }

    let (Some(_), Some(current)) = (context.user_id, form.rsvp) else {
        return;
    };
    labeled_row(ui, "Your reply:", |ui| {
        for status in RsvpStatus::RESPONSES {
            if ui.selectable_label(current == status, status.label()).clicked() && current != status {
                form.rsvp = Some(status);
                actions.push(DialogAction::Rsvp(status));
            }
        }
    });
}

fn render_action_buttons(
    ui: &mut egui::Ui,
    form: &EventForm,
    context: &DialogContext<'_>,
    actions: &mut Vec<DialogAction>,
) {
    ui.horizontal(|ui| {
        if form.confirm_delete {
            ui.label(RichText::new("Delete this event?").color(Color32::from_rgb(220, 53, 69)));
            if ui.button("Delete").clicked() {
                actions.push(DialogAction::ConfirmDelete);
            }
            if ui.button("Keep").clicked() {
                actions.push(DialogAction::CancelDelete);
            }
            return;
        }

        if context.editable && ui.button("Save").clicked() {
            actions.push(DialogAction::Save);
        }
        if ui.button("Cancel").clicked() {
            actions.push(DialogAction::Cancel);
        }
        if form.is_edit() && context.editable {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🗑 Delete").clicked() {
                    actions.push(DialogAction::RequestDelete);
                }
            });
        }
    });
}
