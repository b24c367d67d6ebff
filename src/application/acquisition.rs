// Acquisition scheduler - independently paced polling of each sensor source
use crate::application::reading_store::{Reading, SensorReadingStore};
use crate::application::sensor_bus::{
    BarometricReading, BarometricSensor, HumidityTempSensor, HygrometerReading, ObjectTempSensor,
    SensorError, check_plausible, limits,
};
use crate::domain::measurement::Measurement;
use crate::domain::units::{Celsius, Meters, Percent, normalize_pressure};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorSource {
    Barometric,
    HumidityTemp,
    ObjectTemp,
}

#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub barometric_interval: Duration,
    pub humidity_interval: Duration,
    pub object_interval: Duration,
    pub humidity_attempts: u32,
    pub humidity_backoff: Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            barometric_interval: Duration::from_millis(1000),
            humidity_interval: Duration::from_millis(2000),
            object_interval: Duration::from_millis(500),
            humidity_attempts: 3,
            humidity_backoff: Duration::from_millis(20),
        }
    }
}

/// The drivers handed to the scheduler at boot. `None` means the driver
/// was never wired up at all.
#[derive(Default)]
pub struct SensorSet {
    pub barometer: Option<Box<dyn BarometricSensor>>,
    pub hygrometer: Option<Box<dyn HumidityTempSensor>>,
    pub thermometer: Option<Box<dyn ObjectTempSensor>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourcePresence {
    pub barometric: bool,
    pub humidity_temp: bool,
    pub object_temp: bool,
}

impl SourcePresence {
    pub fn any(&self) -> bool {
        self.barometric || self.humidity_temp || self.object_temp
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub polled: Vec<SensorSource>,
    /// Set when this tick stored a fresh valid envelope temperature.
    pub envelope: Option<Celsius>,
}

struct Cadence {
    interval_ms: u64,
    next_due_ms: u64,
}

impl Cadence {
    fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            next_due_ms: 0,
        }
    }

    fn take_due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms + self.interval_ms;
        true
    }
}

pub struct AcquisitionScheduler {
    settings: AcquisitionSettings,
    barometer: Option<Box<dyn BarometricSensor>>,
    hygrometer: Option<Box<dyn HumidityTempSensor>>,
    thermometer: Option<Box<dyn ObjectTempSensor>>,
    barometric_cadence: Cadence,
    humidity_cadence: Cadence,
    object_cadence: Cadence,
}

impl AcquisitionScheduler {
    /// Probe every wired driver once. Sources that fail the probe are
    /// dropped and never polled or probed again.
    pub async fn initialize(settings: AcquisitionSettings, sensors: SensorSet) -> Self {
        let SensorSet {
            mut barometer,
            mut hygrometer,
            mut thermometer,
        } = sensors;

        if let Some(driver) = barometer.as_mut() {
            if !driver.probe().await {
                tracing::warn!("Barometric sensor not detected; skipping for this session");
                barometer = None;
            }
        }
        if let Some(driver) = hygrometer.as_mut() {
            if !driver.probe().await {
                tracing::warn!("Humidity/temperature sensor not detected; skipping for this session");
                hygrometer = None;
            }
        }
        if let Some(driver) = thermometer.as_mut() {
            if !driver.probe().await {
                tracing::warn!("Object temperature sensor not detected; skipping for this session");
                thermometer = None;
            }
        }

        let scheduler = Self {
            barometric_cadence: Cadence::new(settings.barometric_interval),
            humidity_cadence: Cadence::new(settings.humidity_interval),
            object_cadence: Cadence::new(settings.object_interval),
            settings,
            barometer,
            hygrometer,
            thermometer,
        };

        tracing::info!("Sensor presence: {:?}", scheduler.presence());
        scheduler
    }

    pub fn presence(&self) -> SourcePresence {
        SourcePresence {
            barometric: self.barometer.is_some(),
            humidity_temp: self.hygrometer.is_some(),
            object_temp: self.thermometer.is_some(),
        }
    }

    /// Poll every source whose cadence is due. Failed reads leave the
    /// store untouched for that quantity.
    pub async fn tick(&mut self, store: &mut SensorReadingStore, now_ms: u64) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.barometer.is_some() && self.barometric_cadence.take_due(now_ms) {
            outcome.polled.push(SensorSource::Barometric);
            self.poll_barometer(store, now_ms).await;
        }

        if self.hygrometer.is_some() && self.humidity_cadence.take_due(now_ms) {
            outcome.polled.push(SensorSource::HumidityTemp);
            self.poll_hygrometer(store, now_ms).await;
        }

        if self.thermometer.is_some() && self.object_cadence.take_due(now_ms) {
            outcome.polled.push(SensorSource::ObjectTemp);
            outcome.envelope = self.poll_thermometer(store, now_ms).await;
        }

        outcome
    }

    async fn poll_barometer(&mut self, store: &mut SensorReadingStore, now_ms: u64) {
        let Some(driver) = self.barometer.as_mut() else {
            return;
        };

        match driver.read().await {
            Ok(reading) => {
                for r in barometric_readings(reading) {
                    store.update(r, now_ms);
                }
            }
            Err(e) => tracing::debug!("Barometric read failed: {}", e),
        }
    }

    async fn poll_hygrometer(&mut self, store: &mut SensorReadingStore, now_ms: u64) {
        let attempts = self.settings.humidity_attempts.max(1);
        let backoff = self.settings.humidity_backoff;
        let Some(driver) = self.hygrometer.as_mut() else {
            return;
        };

        for attempt in 1..=attempts {
            match driver.read().await.and_then(validate_hygrometer) {
                Ok((temperature, humidity)) => {
                    store.update(Reading::HygrometerTemperature(Measurement::Valid(temperature)), now_ms);
                    store.update(Reading::Humidity(Measurement::Valid(humidity)), now_ms);
                    return;
                }
                Err(e) => {
                    tracing::debug!("Humidity read attempt {}/{} failed: {}", attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }
    }

    async fn poll_thermometer(&mut self, store: &mut SensorReadingStore, now_ms: u64) -> Option<Celsius> {
        let driver = self.thermometer.as_mut()?;

        let result = driver
            .read()
            .await
            .and_then(|t| check_plausible("object temperature", t, &limits::OBJECT_TEMPERATURE_C));
        match result {
            Ok(t) => {
                let envelope = Celsius(t);
                store.update(Reading::EnvelopeTemperature(Measurement::Valid(envelope)), now_ms);
                Some(envelope)
            }
            Err(e) => {
                tracing::debug!("Object temperature read failed: {}", e);
                None
            }
        }
    }
}

/// Each barometer quantity is checked on its own; one implausible value
/// does not discard the others.
fn barometric_readings(reading: BarometricReading) -> [Reading; 3] {
    let pressure = normalize_pressure(reading.raw_pressure);
    [
        Reading::Altitude(Measurement::from(
            check_plausible("altitude", reading.altitude_m, &limits::ALTITUDE_M)
                .ok()
                .map(Meters),
        )),
        Reading::Pressure(Measurement::from(
            check_plausible("pressure", pressure.0, &limits::PRESSURE_HPA)
                .ok()
                .map(|_| pressure),
        )),
        Reading::BarometerTemperature(Measurement::from(
            check_plausible("temperature", reading.temperature_c, &limits::AIR_TEMPERATURE_C)
                .ok()
                .map(Celsius),
        )),
    ]
}

fn validate_hygrometer(reading: HygrometerReading) -> Result<(Celsius, Percent), SensorError> {
    let temperature = check_plausible("temperature", reading.temperature_c, &limits::AIR_TEMPERATURE_C)?;
    let humidity = check_plausible("humidity", reading.humidity_pct, &limits::HUMIDITY_PCT)?;
    Ok((Celsius(temperature), Percent(humidity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::Hectopascal;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted driver: returns queued results in order, then bus errors.
    struct Scripted<T> {
        present: bool,
        results: VecDeque<Result<T, SensorError>>,
        probes: Arc<Mutex<u32>>,
        reads: Arc<Mutex<u32>>,
    }

    impl<T> Scripted<T> {
        fn new(present: bool, results: Vec<Result<T, SensorError>>) -> Self {
            Self {
                present,
                results: results.into(),
                probes: Arc::new(Mutex::new(0)),
                reads: Arc::new(Mutex::new(0)),
            }
        }

        async fn probe_inner(&mut self) -> bool {
            *self.probes.lock().unwrap() += 1;
            self.present
        }

        async fn next(&mut self) -> Result<T, SensorError> {
            *self.reads.lock().unwrap() += 1;
            self.results
                .pop_front()
                .unwrap_or_else(|| Err(SensorError::Bus("script exhausted".to_string())))
        }
    }

    #[async_trait]
    impl BarometricSensor for Scripted<BarometricReading> {
        async fn probe(&mut self) -> bool {
            self.probe_inner().await
        }
        async fn read(&mut self) -> Result<BarometricReading, SensorError> {
            self.next().await
        }
    }

    #[async_trait]
    impl HumidityTempSensor for Scripted<HygrometerReading> {
        async fn probe(&mut self) -> bool {
            self.probe_inner().await
        }
        async fn read(&mut self) -> Result<HygrometerReading, SensorError> {
            self.next().await
        }
    }

    #[async_trait]
    impl ObjectTempSensor for Scripted<f64> {
        async fn probe(&mut self) -> bool {
            self.probe_inner().await
        }
        async fn read(&mut self) -> Result<f64, SensorError> {
            self.next().await
        }
    }

    fn settings(attempts: u32) -> AcquisitionSettings {
        AcquisitionSettings {
            barometric_interval: Duration::from_millis(1000),
            humidity_interval: Duration::from_millis(2000),
            object_interval: Duration::from_millis(500),
            humidity_attempts: attempts,
            humidity_backoff: Duration::ZERO,
        }
    }

    fn bus_error() -> SensorError {
        SensorError::Bus("nack".to_string())
    }

    fn baro(altitude_m: f64, raw_pressure: f64, temperature_c: f64) -> BarometricReading {
        BarometricReading {
            altitude_m,
            raw_pressure,
            temperature_c,
        }
    }

    #[tokio::test]
    async fn test_absent_sources_are_probed_once_and_skipped() {
        let thermometer = Scripted::<f64>::new(false, vec![Ok(90.0)]);
        let probes = thermometer.probes.clone();
        let reads = thermometer.reads.clone();

        let mut scheduler = AcquisitionScheduler::initialize(
            settings(3),
            SensorSet {
                thermometer: Some(Box::new(thermometer)),
                ..SensorSet::default()
            },
        )
        .await;
        assert!(!scheduler.presence().any());

        let mut store = SensorReadingStore::new();
        for now in [0, 500, 1000, 1500] {
            let outcome = scheduler.tick(&mut store, now).await;
            assert!(outcome.polled.is_empty());
        }
        assert_eq!(*probes.lock().unwrap(), 1);
        assert_eq!(*reads.lock().unwrap(), 0);
        assert_eq!(store.envelope_temperature(), None);
    }

    #[tokio::test]
    async fn test_humidity_retries_until_success() {
        let hygrometer = Scripted::new(
            true,
            vec![
                Err(bus_error()),
                Err(bus_error()),
                Ok(HygrometerReading {
                    temperature_c: 22.0,
                    humidity_pct: 41.0,
                }),
            ],
        );
        let reads = hygrometer.reads.clone();

        let mut scheduler = AcquisitionScheduler::initialize(
            settings(3),
            SensorSet {
                hygrometer: Some(Box::new(hygrometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        scheduler.tick(&mut store, 0).await;
        assert_eq!(*reads.lock().unwrap(), 3);
        assert_eq!(store.hygrometer_temperature(), Some(Celsius(22.0)));
        assert_eq!(store.humidity(), Some(Percent(41.0)));
    }

    #[tokio::test]
    async fn test_humidity_exhaustion_keeps_prior_value() {
        let hygrometer = Scripted::new(
            true,
            vec![
                Ok(HygrometerReading {
                    temperature_c: 22.0,
                    humidity_pct: 41.0,
                }),
                Err(bus_error()),
                Ok(HygrometerReading {
                    temperature_c: 22.0,
                    humidity_pct: 140.0,
                }),
                Err(bus_error()),
            ],
        );
        let reads = hygrometer.reads.clone();

        let mut scheduler = AcquisitionScheduler::initialize(
            settings(3),
            SensorSet {
                hygrometer: Some(Box::new(hygrometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        scheduler.tick(&mut store, 0).await;
        scheduler.tick(&mut store, 2000).await;
        assert_eq!(*reads.lock().unwrap(), 4);
        assert_eq!(store.humidity(), Some(Percent(41.0)));
    }

    #[tokio::test]
    async fn test_cadences_are_independent() {
        let barometer = Scripted::new(
            true,
            (0..10).map(|i| Ok(baro(i as f64, 101_325.0, 15.0))).collect(),
        );
        let thermometer = Scripted::new(true, (0..10).map(|i| Ok(80.0 + i as f64)).collect());
        let baro_reads = barometer.reads.clone();
        let object_reads = thermometer.reads.clone();

        let mut scheduler = AcquisitionScheduler::initialize(
            settings(1),
            SensorSet {
                barometer: Some(Box::new(barometer)),
                thermometer: Some(Box::new(thermometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        for now in (0..2000).step_by(250) {
            scheduler.tick(&mut store, now).await;
        }
        assert_eq!(*baro_reads.lock().unwrap(), 2);
        assert_eq!(*object_reads.lock().unwrap(), 4);
        assert_eq!(store.pressure(), Some(Hectopascal(1013.25)));
    }

    #[tokio::test]
    async fn test_barometer_failure_is_skipped() {
        let barometer = Scripted::new(true, vec![Ok(baro(100.0, 1000.0, 15.0)), Err(bus_error())]);
        let mut scheduler = AcquisitionScheduler::initialize(
            settings(1),
            SensorSet {
                barometer: Some(Box::new(barometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        scheduler.tick(&mut store, 0).await;
        let outcome = scheduler.tick(&mut store, 1000).await;
        assert_eq!(outcome.polled, vec![SensorSource::Barometric]);
        assert_eq!(store.altitude(), Some(Meters(100.0)));
        assert_eq!(store.age_ms(crate::application::reading_store::Quantity::Altitude, 1000), Some(1000));
    }

    #[tokio::test]
    async fn test_implausible_barometer_quantity_is_dropped_alone() {
        let barometer = Scripted::new(true, vec![Ok(baro(100.0, 1000.0, 300.0))]);
        let mut scheduler = AcquisitionScheduler::initialize(
            settings(1),
            SensorSet {
                barometer: Some(Box::new(barometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        scheduler.tick(&mut store, 0).await;
        assert_eq!(store.barometer_temperature(), None);
        assert_eq!(store.altitude(), Some(Meters(100.0)));
        assert_eq!(store.pressure(), Some(Hectopascal(1000.0)));
    }

    #[tokio::test]
    async fn test_envelope_reported_only_when_fresh() {
        let thermometer = Scripted::new(true, vec![Ok(95.0), Err(bus_error()), Ok(500.0)]);
        let mut scheduler = AcquisitionScheduler::initialize(
            settings(1),
            SensorSet {
                thermometer: Some(Box::new(thermometer)),
                ..SensorSet::default()
            },
        )
        .await;

        let mut store = SensorReadingStore::new();
        assert_eq!(scheduler.tick(&mut store, 0).await.envelope, Some(Celsius(95.0)));
        assert_eq!(scheduler.tick(&mut store, 500).await.envelope, None);
        assert_eq!(scheduler.tick(&mut store, 1000).await.envelope, None);
        assert_eq!(store.envelope_temperature(), Some(Celsius(95.0)));
    }
}
