pub mod app_state;
pub mod commands;
pub mod events;
pub mod render_model;
pub mod renderer;
