// Node service - owns the sensor store and drives acquisition and the indicator
use crate::application::acquisition::{
    AcquisitionScheduler, AcquisitionSettings, SensorSet, SourcePresence,
};
use crate::application::fallback_resolver::build_snapshot;
use crate::application::reading_store::{Quantity, SensorReadingStore};
use crate::domain::indicator::{IndicatorMode, level};
use crate::domain::overheat::{OverheatHysteresis, OverheatState, OverheatThresholds};
use crate::domain::snapshot::TelemetrySnapshot;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

/// Physical indicator driver (LED, lamp, ...).
pub trait IndicatorOutput: Send {
    fn set_level(&mut self, high: bool);
}

/// Local display surface refreshed once per snapshot.
pub trait SnapshotDisplay: Send {
    fn show(&mut self, snapshot: &TelemetrySnapshot);
}

/// Milliseconds since each quantity last had a valid reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadingAges {
    pub envelope_temp: Option<u64>,
    pub hygrometer_temp: Option<u64>,
    pub barometer_temp: Option<u64>,
    pub humidity: Option<u64>,
    pub pressure: Option<u64>,
    pub altitude: Option<u64>,
}

impl ReadingAges {
    fn from_store(store: &SensorReadingStore, now_ms: u64) -> Self {
        Self {
            envelope_temp: store.age_ms(Quantity::EnvelopeTemperature, now_ms),
            hygrometer_temp: store.age_ms(Quantity::HygrometerTemperature, now_ms),
            barometer_temp: store.age_ms(Quantity::BarometerTemperature, now_ms),
            humidity: store.age_ms(Quantity::Humidity, now_ms),
            pressure: store.age_ms(Quantity::Pressure, now_ms),
            altitude: store.age_ms(Quantity::Altitude, now_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStatus {
    pub overheat: OverheatState,
    pub indicator: IndicatorMode,
    pub presence: SourcePresence,
    pub ready: bool,
    pub reading_age_ms: ReadingAges,
}

impl Default for NodeStatus {
    fn default() -> Self {
        Self {
            overheat: OverheatState::Normal,
            indicator: IndicatorMode::DoublePulse,
            presence: SourcePresence::default(),
            ready: false,
            reading_age_ms: ReadingAges::default(),
        }
    }
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<TelemetrySnapshot>>>;

#[derive(Debug, Clone)]
pub struct NodeSettings {
    pub tick_interval: Duration,
    pub indicator_interval: Duration,
    pub acquisition: AcquisitionSettings,
    pub overheat: OverheatThresholds,
}

/// Acquisition-side state. Single owner; nothing here is shared except the
/// snapshots and status it publishes.
pub struct NodeCore {
    scheduler: AcquisitionScheduler,
    store: SensorReadingStore,
    hysteresis: OverheatHysteresis,
    status: NodeStatus,
}

impl NodeCore {
    pub fn new(scheduler: AcquisitionScheduler, thresholds: OverheatThresholds) -> Self {
        let presence = scheduler.presence();
        let ready_mode = if presence.any() {
            IndicatorMode::Solid
        } else {
            IndicatorMode::SlowBlink
        };

        Self {
            scheduler,
            store: SensorReadingStore::new(),
            hysteresis: OverheatHysteresis::new(thresholds),
            status: NodeStatus {
                overheat: OverheatState::Normal,
                indicator: ready_mode,
                presence,
                ready: true,
                reading_age_ms: ReadingAges::default(),
            },
        }
    }

    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Run one acquisition tick and compose the snapshot for it.
    pub async fn acquire(&mut self, now_ms: u64) -> TelemetrySnapshot {
        let outcome = self.scheduler.tick(&mut self.store, now_ms).await;

        if let Some(envelope) = outcome.envelope {
            if let Some(mode) = self.hysteresis.update(envelope.to_fahrenheit()) {
                self.status.overheat = self.hysteresis.state();
                tracing::info!(
                    "Envelope {:.1}°F: overheat state now {:?}",
                    envelope.to_fahrenheit().0,
                    self.status.overheat
                );
                self.request_mode(mode);
            }
        }

        self.status.reading_age_ms = ReadingAges::from_store(&self.store, now_ms);
        build_snapshot(&self.store, now_ms)
    }

    pub fn shut_down(&mut self) {
        self.status.ready = false;
        self.request_mode(IndicatorMode::Off);
    }

    fn request_mode(&mut self, mode: IndicatorMode) {
        if self.status.indicator != mode {
            tracing::info!("Indicator mode {:?} -> {:?}", self.status.indicator, mode);
            self.status.indicator = mode;
        }
    }
}

/// Handles for the HTTP layer.
#[derive(Clone)]
pub struct NodeHandle {
    pub snapshots: SnapshotReceiver,
    pub status: watch::Receiver<NodeStatus>,
}

pub struct NodeService {
    settings: NodeSettings,
    snapshot_tx: watch::Sender<Option<Arc<TelemetrySnapshot>>>,
    status_tx: watch::Sender<NodeStatus>,
}

impl NodeService {
    pub fn new(settings: NodeSettings) -> (Self, NodeHandle) {
        let (snapshot_tx, snapshots) = watch::channel(None);
        let (status_tx, status) = watch::channel(NodeStatus::default());
        (
            Self {
                settings,
                snapshot_tx,
                status_tx,
            },
            NodeHandle { snapshots, status },
        )
    }

    /// Boot and then loop on one task until `shutdown` resolves. The
    /// indicator keeps being refreshed while sensors are probed.
    pub async fn run(
        self,
        sensors: SensorSet,
        mut indicator: Box<dyn IndicatorOutput>,
        mut display: Box<dyn SnapshotDisplay>,
        shutdown: impl Future<Output = ()> + Send,
    ) {
        tokio::pin!(shutdown);
        let started = Instant::now();
        let elapsed_ms = || started.elapsed().as_millis() as u64;

        let mut indicator_ticks = tokio::time::interval(self.settings.indicator_interval);
        indicator_ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let boot_mode = IndicatorMode::DoublePulse;
        tracing::info!("Node booting; probing sensors");
        let init = AcquisitionScheduler::initialize(self.settings.acquisition.clone(), sensors);
        tokio::pin!(init);
        let scheduler = loop {
            tokio::select! {
                scheduler = &mut init => break scheduler,
                _ = indicator_ticks.tick() => indicator.set_level(level(boot_mode, elapsed_ms())),
                _ = &mut shutdown => {
                    indicator.set_level(level(IndicatorMode::Off, elapsed_ms()));
                    return;
                }
            }
        };

        let mut core = NodeCore::new(scheduler, self.settings.overheat);
        self.status_tx.send_replace(core.status());
        tracing::info!("Node ready; indicator {:?}", core.status().indicator);

        let mut acquisition_ticks = tokio::time::interval(self.settings.tick_interval);
        acquisition_ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = acquisition_ticks.tick() => {
                    let snapshot = core.acquire(elapsed_ms()).await;
                    display.show(&snapshot);
                    self.snapshot_tx.send_replace(Some(Arc::new(snapshot)));
                    self.status_tx.send_replace(core.status());
                }
                _ = indicator_ticks.tick() => {
                    indicator.set_level(level(core.status().indicator, elapsed_ms()));
                }
                _ = &mut shutdown => {
                    core.shut_down();
                    indicator.set_level(level(core.status().indicator, elapsed_ms()));
                    self.status_tx.send_replace(core.status());
                    tracing::info!("Node stopped");
                    break;
                }
            }
        }
    }
}
