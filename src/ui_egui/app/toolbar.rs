//! Toolbar, error banner and status line around the active view.

use egui::{Color32, RichText};

use super::CalendarApp;
use crate::models::event::EventScope;
use crate::models::ui::ViewMode;
use crate::services::permissions;

impl CalendarApp {
    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context) {
        let container = &mut self.container;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("◀").on_hover_text("Previous").clicked() {
                    container.navigate_previous();
                }
                if ui.button("Today").clicked() {
                    container.jump_to_today();
                }
                if ui.button("▶").on_hover_text("Next").clicked() {
                    container.navigate_next();
                }
                ui.add_space(8.0);
                ui.heading(container.mode().title_for(container.date()));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⟳").on_hover_text("Reload").clicked() {
                        container.refresh();
                    }
                    if container.store().is_busy() {
                        ui.spinner();
                    }
                    ui.separator();

                    if container.mode().uses_time_grid() {
                        let zoom = container.zoom();
                        if ui
                            .add_enabled(zoom.can_zoom_in(), egui::Button::new("+"))
                            .on_hover_text("Zoom in")
                            .clicked()
                        {
                            container.zoom_in();
                        }
                        ui.label(format!("{} px/h", zoom.value()));
                        if ui
                            .add_enabled(zoom.can_zoom_out(), egui::Button::new("−"))
                            .on_hover_text("Zoom out")
                            .clicked()
                        {
                            container.zoom_out();
                        }
                        ui.separator();
                    }

                    for mode in ViewMode::ALL.iter().rev() {
                        if ui
                            .selectable_label(container.mode() == *mode, mode.label())
                            .clicked()
                        {
                            container.set_mode(*mode);
                        }
                    }
                    ui.separator();

                    for scope in EventScope::ALL.iter().rev() {
                        let label = if permissions::can_create(*scope, container.role()) {
                            scope.label().to_string()
                        } else {
                            format!("{} (read-only)", scope.label())
                        };
                        if ui
                            .selectable_label(container.scope() == *scope, label)
                            .clicked()
                        {
                            container.set_scope(*scope);
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    pub(super) fn render_error_banner(&mut self, ctx: &egui::Context) {
        let Some(message) = self.container.error().map(str::to_owned) else {
            return;
        };
        let mut dismissed = false;
        egui::TopBottomPanel::top("error_banner")
            .frame(
                egui::Frame::none()
                    .fill(Color32::from_rgb(254, 226, 226))
                    .inner_margin(egui::Margin::symmetric(12.0, 6.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {}", message))
                            .color(Color32::from_rgb(153, 27, 27)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            dismissed = true;
                        }
                    });
                });
            });
        if dismissed {
            self.container.dismiss_error();
        }
    }

    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let container = &self.container;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let range = container.visible_range();
                let visible = container
                    .store()
                    .events()
                    .iter()
                    .filter(|event| {
                        event.start < range.end_instant() && event.end > range.start_instant()
                    })
                    .count();
                ui.label(RichText::new(format!("{} calendar", container.scope().label())).weak());
                ui.separator();
                ui.label(RichText::new(format!("{} events", visible)).weak());
                let open_deadlines = container
                    .store()
                    .deadlines()
                    .iter()
                    .filter(|deadline| !deadline.completed)
                    .count();
                if open_deadlines > 0 {
                    ui.separator();
                    ui.label(RichText::new(format!("{} open deadlines", open_deadlines)).weak());
                }
                if !container.can_create() {
                    ui.separator();
                    ui.label(RichText::new("read-only").italics().weak());
                }
            });
        });
    }
}
