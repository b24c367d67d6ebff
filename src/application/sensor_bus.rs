// Sensor driver seams - implemented by bus drivers outside the core
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    #[error("sensor not present on the bus")]
    NotPresent,
    #[error("bus transaction failed: {0}")]
    Bus(String),
    #[error("implausible {quantity} reading: {value}")]
    Implausible { quantity: &'static str, value: f64 },
}

/// Barometer output. `raw_pressure` is in whatever unit the part reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarometricReading {
    pub altitude_m: f64,
    pub raw_pressure: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HygrometerReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

#[async_trait]
pub trait BarometricSensor: Send {
    /// Startup liveness probe; called once.
    async fn probe(&mut self) -> bool;
    async fn read(&mut self) -> Result<BarometricReading, SensorError>;
}

#[async_trait]
pub trait HumidityTempSensor: Send {
    async fn probe(&mut self) -> bool;
    async fn read(&mut self) -> Result<HygrometerReading, SensorError>;
}

/// Non-contact thermometer aimed at the envelope.
#[async_trait]
pub trait ObjectTempSensor: Send {
    async fn probe(&mut self) -> bool;
    async fn read(&mut self) -> Result<f64, SensorError>;
}

/// Plausibility windows; anything outside is a failed read.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const AIR_TEMPERATURE_C: RangeInclusive<f64> = -40.0..=85.0;
    pub const OBJECT_TEMPERATURE_C: RangeInclusive<f64> = -70.0..=380.0;
    pub const HUMIDITY_PCT: RangeInclusive<f64> = 0.0..=100.0;
    /// Standard atmosphere at the altitude ceiling is roughly 193 hPa.
    pub const PRESSURE_HPA: RangeInclusive<f64> = 150.0..=1100.0;
    pub const ALTITUDE_M: RangeInclusive<f64> = -500.0..=12_000.0;
}

pub fn check_plausible(
    quantity: &'static str,
    value: f64,
    range: &std::ops::RangeInclusive<f64>,
) -> Result<f64, SensorError> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(SensorError::Implausible { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_plausible() {
        assert_eq!(check_plausible("humidity", 45.0, &limits::HUMIDITY_PCT), Ok(45.0));
        assert!(check_plausible("humidity", 101.0, &limits::HUMIDITY_PCT).is_err());
        assert!(check_plausible("temperature", f64::NAN, &limits::AIR_TEMPERATURE_C).is_err());
    }

    #[test]
    fn test_pressure_window_covers_altitude_window() {
        // ISA pressure at the top of the altitude window must still be plausible.
        let ceiling_m = *limits::ALTITUDE_M.end();
        let pressure_hpa = 1013.25 * (1.0 - 2.255_77e-5 * ceiling_m).powf(5.255_88);
        assert!(check_plausible("pressure", pressure_hpa, &limits::PRESSURE_HPA).is_ok());
        assert!(check_plausible("pressure", 120.0, &limits::PRESSURE_HPA).is_err());
    }
}
