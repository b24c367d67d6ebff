// Presentation layer - HTTP handlers and display rendering
pub mod app_state;
pub mod display;
pub mod monitor_handlers;
pub mod node_handlers;
