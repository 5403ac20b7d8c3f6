use super::CalendarApp;
use crate::models::ui::ViewMode;

struct Keys {
    escape: bool,
    previous: bool,
    next: bool,
    today: bool,
    zoom_in: bool,
    zoom_out: bool,
    mode: Option<ViewMode>,
}

impl CalendarApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        // text fields in the editor own the keyboard
        let typing = ctx.wants_keyboard_input();
        let keys = ctx.input(|i| Keys {
            escape: i.key_pressed(egui::Key::Escape),
            previous: !typing && i.key_pressed(egui::Key::ArrowLeft),
            next: !typing && i.key_pressed(egui::Key::ArrowRight),
            today: i.modifiers.ctrl && i.key_pressed(egui::Key::T),
            zoom_in: i.modifiers.ctrl && i.key_pressed(egui::Key::Plus),
            zoom_out: i.modifiers.ctrl && i.key_pressed(egui::Key::Minus),
            mode: if typing || i.modifiers.ctrl {
                None
            } else if i.key_pressed(egui::Key::D) {
                Some(ViewMode::Day)
            } else if i.key_pressed(egui::Key::W) {
                Some(ViewMode::Week)
            } else if i.key_pressed(egui::Key::M) {
                Some(ViewMode::Month)
            } else {
                None
            },
        });

        let container = &mut self.container;
        if keys.escape {
            if container.modal().is_open() {
                container.cancel_editor();
            } else {
                container.gestures.cancel_all();
            }
        }
        if container.modal().is_open() {
            return;
        }
        if keys.previous {
            container.navigate_previous();
        }
        if keys.next {
            container.navigate_next();
        }
        if keys.today {
            container.jump_to_today();
        }
        if keys.zoom_in {
            container.zoom_in();
        }
        if keys.zoom_out {
            container.zoom_out();
        }
        if let Some(mode) = keys.mode {
            container.set_mode(mode);
        }
    }
}
