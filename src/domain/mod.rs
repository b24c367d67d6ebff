// Domain layer - Telemetry types and the pure algorithms over them
pub mod flight;
pub mod history;
pub mod indicator;
pub mod liveness;
pub mod measurement;
pub mod overheat;
pub mod physics;
pub mod snapshot;
pub mod units;
