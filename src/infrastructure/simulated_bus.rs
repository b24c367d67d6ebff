// Simulated sensor drivers so the node runs without hardware attached
use crate::application::acquisition::SensorSet;
use crate::application::sensor_bus::{
    BarometricReading, BarometricSensor, HumidityTempSensor, HygrometerReading, ObjectTempSensor,
    SensorError,
};
use crate::infrastructure::config::SimulationConfig;
use async_trait::async_trait;
use std::f64::consts::TAU;
use std::time::Instant;

const LAUNCH_ALTITUDE_M: f64 = 120.0;
const CLIMB_RATE_MPS: f64 = 0.5;
const CEILING_M: f64 = 3000.0;
const SEA_LEVEL_PA: f64 = 101_325.0;
/// Envelope burner cycle: swings between 60 °C and 100 °C.
const BURNER_PERIOD_S: f64 = 240.0;
const ENVELOPE_MEAN_C: f64 = 80.0;
const ENVELOPE_SWING_C: f64 = 20.0;

fn altitude_at(elapsed_s: f64) -> f64 {
    (LAUNCH_ALTITUDE_M + CLIMB_RATE_MPS * elapsed_s).min(CEILING_M)
}

/// International standard atmosphere, troposphere only.
fn pressure_pa_at(altitude_m: f64) -> f64 {
    SEA_LEVEL_PA * (1.0 - 2.255_77e-5 * altitude_m).powf(5.255_88)
}

pub struct SimulatedBarometer {
    present: bool,
    started: Instant,
    reads: u64,
}

#[async_trait]
impl BarometricSensor for SimulatedBarometer {
    async fn probe(&mut self) -> bool {
        self.present
    }

    async fn read(&mut self) -> Result<BarometricReading, SensorError> {
        if !self.present {
            return Err(SensorError::NotPresent);
        }
        self.reads += 1;
        if self.reads % 13 == 0 {
            return Err(SensorError::Bus("arbitration lost".to_string()));
        }

        let altitude_m = altitude_at(self.started.elapsed().as_secs_f64());
        Ok(BarometricReading {
            altitude_m,
            raw_pressure: pressure_pa_at(altitude_m),
            temperature_c: 15.0 - 0.0065 * altitude_m,
        })
    }
}

pub struct SimulatedHygrometer {
    present: bool,
    started: Instant,
    reads: u64,
}

#[async_trait]
impl HumidityTempSensor for SimulatedHygrometer {
    async fn probe(&mut self) -> bool {
        self.present
    }

    async fn read(&mut self) -> Result<HygrometerReading, SensorError> {
        if !self.present {
            return Err(SensorError::NotPresent);
        }
        self.reads += 1;
        // CRC mismatch on every fifth transaction
        if self.reads % 5 == 0 {
            return Err(SensorError::Bus("checksum mismatch".to_string()));
        }

        let elapsed_s = self.started.elapsed().as_secs_f64();
        Ok(HygrometerReading {
            temperature_c: 18.0 + 0.5 * (TAU * elapsed_s / 600.0).sin(),
            humidity_pct: 45.0 + 5.0 * (TAU * elapsed_s / 900.0).cos(),
        })
    }
}

pub struct SimulatedEnvelopeThermometer {
    present: bool,
    started: Instant,
}

#[async_trait]
impl ObjectTempSensor for SimulatedEnvelopeThermometer {
    async fn probe(&mut self) -> bool {
        self.present
    }

    async fn read(&mut self) -> Result<f64, SensorError> {
        if !self.present {
            return Err(SensorError::NotPresent);
        }
        let phase = TAU * self.started.elapsed().as_secs_f64() / BURNER_PERIOD_S;
        Ok(ENVELOPE_MEAN_C + ENVELOPE_SWING_C * phase.sin())
    }
}

/// All three simulated parts. Parts disabled in config stay wired but fail
/// their probe, exactly like a missing chip.
pub fn simulated_sensors(config: &SimulationConfig) -> SensorSet {
    let started = Instant::now();
    SensorSet {
        barometer: Some(Box::new(SimulatedBarometer {
            present: config.barometer,
            started,
            reads: 0,
        })),
        hygrometer: Some(Box::new(SimulatedHygrometer {
            present: config.hygrometer,
            started,
            reads: 0,
        })),
        thermometer: Some(Box::new(SimulatedEnvelopeThermometer {
            present: config.thermometer,
            started,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::normalize_pressure;

    #[test]
    fn test_pressure_profile_normalizes_to_hpa() {
        let hpa = normalize_pressure(pressure_pa_at(0.0));
        assert!((hpa.0 - 1013.25).abs() < 1e-9);
        let at_altitude = normalize_pressure(pressure_pa_at(1000.0));
        assert!((at_altitude.0 - 898.7).abs() < 0.5);
    }

    #[test]
    fn test_altitude_profile_is_capped() {
        assert_eq!(altitude_at(0.0), LAUNCH_ALTITUDE_M);
        assert_eq!(altitude_at(1.0e6), CEILING_M);
    }

    #[tokio::test]
    async fn test_disabled_parts_are_not_present() {
        let SensorSet {
            barometer,
            hygrometer,
            thermometer,
        } = simulated_sensors(&SimulationConfig {
            barometer: false,
            hygrometer: true,
            thermometer: false,
        });

        let mut barometer = barometer.expect("wired");
        let mut hygrometer = hygrometer.expect("wired");
        let mut thermometer = thermometer.expect("wired");
        assert!(!barometer.probe().await);
        assert!(hygrometer.probe().await);
        assert!(!thermometer.probe().await);
        assert_eq!(barometer.read().await, Err(SensorError::NotPresent));
        assert_eq!(thermometer.read().await, Err(SensorError::NotPresent));
    }

    #[tokio::test]
    async fn test_hygrometer_fails_every_fifth_read() {
        let mut hygrometer = SimulatedHygrometer {
            present: true,
            started: Instant::now(),
            reads: 0,
        };
        let mut failures = 0;
        for _ in 0..10 {
            if hygrometer.read().await.is_err() {
                failures += 1;
            }
        }
        assert_eq!(failures, 2);
    }
}
