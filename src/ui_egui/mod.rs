mod app;
pub mod drag;
pub mod drag_create;
pub mod event_dialog;
pub mod resize;
pub mod time_grid;
pub mod views;

pub use app::{CalendarApp, CalendarViewContainer, ModalState, CLICK_EVENT_MINUTES};
