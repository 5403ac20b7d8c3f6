// Module exports for models

pub mod category;
pub mod deadline;
pub mod event;
pub mod recurrence;
pub mod settings;
pub mod ui;
pub mod validation;
