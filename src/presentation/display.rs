// Text rendering for the local display surface
use crate::application::node_service::SnapshotDisplay;
use crate::domain::snapshot::TelemetrySnapshot;

pub const ABSENT: &str = "--";

/// Fixed-precision value with unit, or `--` when absent.
pub fn format_reading(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => ABSENT.to_string(),
    }
}

pub fn render_snapshot(snapshot: &TelemetrySnapshot) -> String {
    format!(
        "env {} | amb {} ({}) | rh {} | {} | alt {}",
        format_reading(snapshot.envelope_temp.map(|t| t.to_fahrenheit().0), 1, "°F"),
        format_reading(snapshot.ambient_temp.map(|t| t.to_fahrenheit().0), 1, "°F"),
        snapshot.ambient_source.map_or(ABSENT, |s| s.as_str()),
        format_reading(snapshot.humidity.map(|h| h.0), 0, "%"),
        format_reading(snapshot.pressure.map(|p| p.0), 1, " hPa"),
        format_reading(snapshot.altitude.map(|a| a.0), 1, " m"),
    )
}

/// Display refresh that writes each frame to the log.
#[derive(Debug, Default)]
pub struct LogDisplay;

impl SnapshotDisplay for LogDisplay {
    fn show(&mut self, snapshot: &TelemetrySnapshot) {
        tracing::debug!("{}", render_snapshot(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::AmbientSource;
    use crate::domain::units::{Celsius, Meters};

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(Some(12.345), 1, " m/s"), "12.3 m/s");
        assert_eq!(format_reading(Some(45.6), 0, "%"), "46%");
        assert_eq!(format_reading(None, 1, "°F"), "--");
    }

    #[test]
    fn test_render_snapshot_marks_absent_fields() {
        let snapshot = TelemetrySnapshot {
            ambient_temp: Some(Celsius(20.0)),
            ambient_source: Some(AmbientSource::Barometer),
            altitude: Some(Meters(152.0)),
            ..TelemetrySnapshot::empty(0)
        };
        assert_eq!(
            render_snapshot(&snapshot),
            "env -- | amb 68.0°F (barometer) | rh -- | -- | alt 152.0 m"
        );
    }
}
