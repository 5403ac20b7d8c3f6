//! Modal event editor: a plain `EventForm` plus the egui window that edits it.

mod render;
mod state;
mod widgets;

pub use render::{render_event_dialog, DialogAction, DialogContext};
pub use state::{EditorMode, EventForm};
