// Calendar Grid Library
// Time grid layout, drag/resize interaction and remote-synced event store

pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
