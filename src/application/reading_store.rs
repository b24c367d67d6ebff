// Last-known-good reading per measured quantity
use crate::domain::measurement::Measurement;
use crate::domain::units::{Celsius, Hectopascal, Meters, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    EnvelopeTemperature,
    HygrometerTemperature,
    BarometerTemperature,
    Humidity,
    Pressure,
    Altitude,
}

/// One incoming measurement tagged with the quantity it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    EnvelopeTemperature(Measurement<Celsius>),
    HygrometerTemperature(Measurement<Celsius>),
    BarometerTemperature(Measurement<Celsius>),
    Humidity(Measurement<Percent>),
    Pressure(Measurement<Hectopascal>),
    Altitude(Measurement<Meters>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot<T> {
    value: T,
    updated_at_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SensorReadingStore {
    envelope_temperature: Option<Slot<Celsius>>,
    hygrometer_temperature: Option<Slot<Celsius>>,
    barometer_temperature: Option<Slot<Celsius>>,
    humidity: Option<Slot<Percent>>,
    pressure: Option<Slot<Hectopascal>>,
    altitude: Option<Slot<Meters>>,
}

fn store<T: Copy>(slot: &mut Option<Slot<T>>, measurement: Measurement<T>, now_ms: u64) -> bool {
    match measurement.get() {
        Some(value) => {
            *slot = Some(Slot {
                value,
                updated_at_ms: now_ms,
            });
            true
        }
        None => false,
    }
}

impl SensorReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement. Invalid measurements leave the previous value
    /// in place. Returns whether the store changed.
    pub fn update(&mut self, reading: Reading, now_ms: u64) -> bool {
        match reading {
            Reading::EnvelopeTemperature(m) => store(&mut self.envelope_temperature, m, now_ms),
            Reading::HygrometerTemperature(m) => store(&mut self.hygrometer_temperature, m, now_ms),
            Reading::BarometerTemperature(m) => store(&mut self.barometer_temperature, m, now_ms),
            Reading::Humidity(m) => store(&mut self.humidity, m, now_ms),
            Reading::Pressure(m) => store(&mut self.pressure, m, now_ms),
            Reading::Altitude(m) => store(&mut self.altitude, m, now_ms),
        }
    }

    pub fn envelope_temperature(&self) -> Option<Celsius> {
        self.envelope_temperature.map(|s| s.value)
    }

    pub fn hygrometer_temperature(&self) -> Option<Celsius> {
        self.hygrometer_temperature.map(|s| s.value)
    }

    pub fn barometer_temperature(&self) -> Option<Celsius> {
        self.barometer_temperature.map(|s| s.value)
    }

    pub fn humidity(&self) -> Option<Percent> {
        self.humidity.map(|s| s.value)
    }

    pub fn pressure(&self) -> Option<Hectopascal> {
        self.pressure.map(|s| s.value)
    }

    pub fn altitude(&self) -> Option<Meters> {
        self.altitude.map(|s| s.value)
    }

    /// Milliseconds since the quantity last received a valid value.
    pub fn age_ms(&self, quantity: Quantity, now_ms: u64) -> Option<u64> {
        let updated_at_ms = match quantity {
            Quantity::EnvelopeTemperature => self.envelope_temperature.map(|s| s.updated_at_ms),
            Quantity::HygrometerTemperature => self.hygrometer_temperature.map(|s| s.updated_at_ms),
            Quantity::BarometerTemperature => self.barometer_temperature.map(|s| s.updated_at_ms),
            Quantity::Humidity => self.humidity.map(|s| s.updated_at_ms),
            Quantity::Pressure => self.pressure.map(|s| s.updated_at_ms),
            Quantity::Altitude => self.altitude.map(|s| s.updated_at_ms),
        }?;
        Some(now_ms.saturating_sub(updated_at_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_observed_is_absent() {
        let store = SensorReadingStore::new();
        assert_eq!(store.altitude(), None);
        assert_eq!(store.age_ms(Quantity::Altitude, 100), None);
    }

    #[test]
    fn test_invalid_reading_keeps_last_good() {
        let mut store = SensorReadingStore::new();
        let sequence = [
            (Measurement::Invalid, None),
            (Measurement::Valid(Celsius(20.0)), Some(Celsius(20.0))),
            (Measurement::Invalid, Some(Celsius(20.0))),
            (Measurement::Valid(Celsius(21.5)), Some(Celsius(21.5))),
            (Measurement::Invalid, Some(Celsius(21.5))),
        ];

        for (i, (measurement, expected)) in sequence.into_iter().enumerate() {
            store.update(Reading::HygrometerTemperature(measurement), i as u64);
            assert_eq!(store.hygrometer_temperature(), expected);
        }
    }

    #[test]
    fn test_age_grows_until_next_valid_value() {
        let mut store = SensorReadingStore::new();
        assert!(store.update(Reading::Pressure(Measurement::Valid(Hectopascal(1000.0))), 1000));
        assert!(!store.update(Reading::Pressure(Measurement::Invalid), 2000));
        assert_eq!(store.age_ms(Quantity::Pressure, 2500), Some(1500));

        store.update(Reading::Pressure(Measurement::Valid(Hectopascal(999.0))), 3000);
        assert_eq!(store.age_ms(Quantity::Pressure, 3000), Some(0));
    }

    #[test]
    fn test_quantities_are_independent() {
        let mut store = SensorReadingStore::new();
        store.update(Reading::Humidity(Measurement::Valid(Percent(40.0))), 0);
        store.update(Reading::Altitude(Measurement::Valid(Meters(120.0))), 0);
        assert_eq!(store.humidity(), Some(Percent(40.0)));
        assert_eq!(store.altitude(), Some(Meters(120.0)));
        assert_eq!(store.pressure(), None);
        assert_eq!(store.envelope_temperature(), None);
    }
}
