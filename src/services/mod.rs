// Service module exports

pub mod api;
pub mod permissions;
pub mod settings;
pub mod store;
