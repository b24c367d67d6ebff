// Monitor service - consumer-side actor owning the derived flight metrics
use crate::application::snapshot_source::{FetchedSnapshot, SnapshotSource};
use crate::domain::flight::{FlightMetrics, FlightMetricsEngine, IngestOutcome};
use crate::domain::history::{HistoryHorizon, HistorySample, TemperatureHistoryWindow};
use crate::domain::liveness::{LivenessClassifier, LivenessState};
use crate::domain::snapshot::TelemetrySnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorCommand {
    ResetBaseline,
    SetDiameter(f64),
    SetWindow(HistoryHorizon),
}

#[derive(Debug, Clone)]
pub struct MonitorView {
    pub latest: Option<TelemetrySnapshot>,
    pub metrics: FlightMetrics,
    pub liveness: LivenessState,
    pub average_round_trip_ms: Option<f64>,
    pub last_contact: Option<DateTime<Utc>>,
    pub horizon: HistoryHorizon,
    pub history: Vec<HistorySample>,
}

/// All consumer-side state. One writer: the actor task.
pub struct Monitor {
    engine: FlightMetricsEngine,
    history: TemperatureHistoryWindow,
    liveness: LivenessClassifier,
    last_contact: Option<DateTime<Utc>>,
}

impl Monitor {
    pub fn new(diameter_ft: f64, horizon: HistoryHorizon) -> Self {
        Self {
            engine: FlightMetricsEngine::new(diameter_ft),
            history: TemperatureHistoryWindow::new(horizon),
            liveness: LivenessClassifier::new(),
            last_contact: None,
        }
    }

    pub fn on_fetch(&mut self, fetched: FetchedSnapshot, now_ms: u64) {
        self.liveness
            .record_success(now_ms, fetched.round_trip.as_millis() as u64);
        self.last_contact = Some(Utc::now());

        // A jump back by more than the history horizon means the node
        // rebooted and its clock started over.
        let horizon_ms = self.history.horizon().as_millis();
        let restarted = self.engine.latest().is_some_and(|latest| {
            fetched.snapshot.captured_at_ms + horizon_ms < latest.captured_at_ms
        });
        if restarted {
            tracing::info!(
                "Node clock went back to {}ms; starting a new session",
                fetched.snapshot.captured_at_ms
            );
            self.engine.begin_session();
            self.history.clear();
        }

        let is_new = self
            .engine
            .latest()
            .is_none_or(|latest| fetched.snapshot.captured_at_ms > latest.captured_at_ms);
        let sample = HistorySample::from_snapshot(&fetched.snapshot);

        match self.engine.ingest(fetched.snapshot) {
            IngestOutcome::Accepted if is_new => self.history.ingest(sample),
            IngestOutcome::Accepted => {}
            IngestOutcome::Stale => {
                tracing::debug!("Dropping out-of-order snapshot captured at {}ms", sample.at_ms)
            }
        }
    }

    pub fn apply(&mut self, command: MonitorCommand) {
        match command {
            MonitorCommand::ResetBaseline => self.engine.reset_baseline(),
            MonitorCommand::SetDiameter(feet) => self.engine.set_diameter_ft(feet),
            MonitorCommand::SetWindow(horizon) => {
                let now_ms = self.engine.latest().map_or(0, |s| s.captured_at_ms);
                self.history.set_horizon(horizon, now_ms);
            }
        }
        tracing::info!("Applied {:?}", command);
    }

    pub fn view(&self, now_ms: u64) -> MonitorView {
        MonitorView {
            latest: self.engine.latest().cloned(),
            metrics: self.engine.metrics().clone(),
            liveness: self.liveness.state(now_ms),
            average_round_trip_ms: self.liveness.average_round_trip_ms(),
            last_contact: self.last_contact,
            horizon: self.history.horizon(),
            history: self.history.samples().copied().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub diameter_ft: f64,
    pub horizon: HistoryHorizon,
}

#[derive(Clone)]
pub struct MonitorHandle {
    pub commands: mpsc::Sender<MonitorCommand>,
    pub view: watch::Receiver<MonitorView>,
}

pub struct MonitorService {
    settings: MonitorSettings,
    source: Arc<dyn SnapshotSource>,
    commands: mpsc::Receiver<MonitorCommand>,
    view_tx: watch::Sender<MonitorView>,
}

impl MonitorService {
    pub fn new(source: Arc<dyn SnapshotSource>, settings: MonitorSettings) -> (Self, MonitorHandle) {
        let (command_tx, commands) = mpsc::channel(16);
        let initial = Monitor::new(settings.diameter_ft, settings.horizon).view(0);
        let (view_tx, view) = watch::channel(initial);
        (
            Self {
                settings,
                source,
                commands,
                view_tx,
            },
            MonitorHandle {
                commands: command_tx,
                view,
            },
        )
    }

    pub async fn run(mut self) {
        let started = Instant::now();
        let elapsed_ms = || started.elapsed().as_millis() as u64;
        let mut monitor = Monitor::new(self.settings.diameter_ft, self.settings.horizon);

        let mut polls = tokio::time::interval(self.settings.poll_interval);
        polls.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = polls.tick() => {
                    match self.source.fetch().await {
                        Ok(fetched) => monitor.on_fetch(fetched, elapsed_ms()),
                        Err(e) => tracing::debug!("Snapshot fetch failed: {}", e),
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => monitor.apply(command),
                    None => {
                        tracing::info!("Monitor command channel closed; stopping");
                        break;
                    }
                },
            }
            self.view_tx.send_replace(monitor.view(elapsed_ms()));
        }
    }
}
