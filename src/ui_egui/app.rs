mod container;
mod navigation;
mod shortcuts;
mod toolbar;

pub use self::container::{CalendarViewContainer, ModalState, CLICK_EVENT_MINUTES};

use chrono::Local;
use std::time::Duration;

const MIN_ROOT_WIDTH: f32 = 640.0;
const MIN_ROOT_HEIGHT: f32 = 480.0;
/// Repaint cadence while API calls are in flight.
const BUSY_REPAINT: Duration = Duration::from_millis(150);

pub struct CalendarApp {
    container: CalendarViewContainer,
}

impl eframe::App for CalendarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.container.poll();
        self.container.refresh_if_needed();
        self.handle_keyboard_shortcuts(ctx);

        self.render_toolbar(ctx);
        self.render_error_banner(ctx);
        self.render_status_bar(ctx);

        let today = Local::now().date_naive();
        let frame_nr = ctx.frame_nr();
        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| self.container.show_view(ui, today, frame_nr))
            .inner;
        for action in actions {
            self.container.handle_action(action);
        }

        let dialog_actions = self.container.show_editor(ctx);
        self.container.apply_dialog_actions(dialog_actions);

        if self.container.store().is_busy() || self.container.gestures().is_active() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

impl CalendarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, container: CalendarViewContainer) -> Self {
        cc.egui_ctx.send_viewport_cmd(egui::ViewportCommand::MinInnerSize(egui::vec2(
            MIN_ROOT_WIDTH,
            MIN_ROOT_HEIGHT,
        )));
        Self { container }
    }
}
