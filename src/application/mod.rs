// Application layer - Services and the seams to outside collaborators
pub mod acquisition;
pub mod fallback_resolver;
pub mod monitor_service;
pub mod node_service;
pub mod reading_store;
pub mod sensor_bus;
pub mod snapshot_source;
