// Composes a snapshot from the store, picking the ambient temperature source
use crate::application::reading_store::SensorReadingStore;
use crate::domain::snapshot::{AmbientSource, TelemetrySnapshot};
use crate::domain::units::Celsius;

/// Hygrometer first, barometer second. Evaluated on every call so a source
/// that recovers is used on the very next snapshot.
pub fn resolve_ambient(store: &SensorReadingStore) -> Option<(Celsius, AmbientSource)> {
    store
        .hygrometer_temperature()
        .map(|t| (t, AmbientSource::Hygrometer))
        .or_else(|| {
            store
                .barometer_temperature()
                .map(|t| (t, AmbientSource::Barometer))
        })
}

pub fn build_snapshot(store: &SensorReadingStore, captured_at_ms: u64) -> TelemetrySnapshot {
    let ambient = resolve_ambient(store);
    TelemetrySnapshot {
        envelope_temp: store.envelope_temperature(),
        ambient_temp: ambient.map(|(t, _)| t),
        ambient_source: ambient.map(|(_, source)| source),
        humidity: store.humidity(),
        pressure: store.pressure(),
        altitude: store.altitude(),
        captured_at_ms,
    }
}
