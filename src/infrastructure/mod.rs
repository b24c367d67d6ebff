// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_snapshot_source;
pub mod indicator_output;
pub mod simulated_bus;
pub mod snapshot_codec;
