// Telemetry snapshot domain model
use super::units::{Celsius, Hectopascal, Meters, Percent};

/// Which sensor supplied the ambient temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientSource {
    Hygrometer,
    Barometer,
}

impl AmbientSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AmbientSource::Hygrometer => "hygrometer",
            AmbientSource::Barometer => "barometer",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "hygrometer" => Some(AmbientSource::Hygrometer),
            "barometer" => Some(AmbientSource::Barometer),
            _ => None,
        }
    }
}

/// One fully composed telemetry record. Built once per acquisition tick and
/// shared by value (or behind an `Arc`); nobody mutates it after that.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub envelope_temp: Option<Celsius>,
    pub ambient_temp: Option<Celsius>,
    pub ambient_source: Option<AmbientSource>,
    pub humidity: Option<Percent>,
    pub pressure: Option<Hectopascal>,
    pub altitude: Option<Meters>,
    /// Monotonic milliseconds since node start.
    pub captured_at_ms: u64,
}

impl TelemetrySnapshot {
    /// A snapshot with every instrument absent.
    #[cfg(test)]
    pub fn empty(captured_at_ms: u64) -> Self {
        Self {
            envelope_temp: None,
            ambient_temp: None,
            ambient_source: None,
            humidity: None,
            pressure: None,
            altitude: None,
            captured_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tags() {
        for source in [AmbientSource::Hygrometer, AmbientSource::Barometer] {
            assert_eq!(AmbientSource::parse(source.as_str()), Some(source));
        }
        assert_eq!(AmbientSource::parse("thermistor"), None);
    }
}
