// Flight metrics derived from received snapshots
use super::physics::{cubic_feet, envelope_lift, sphere_volume_m3};
use super::snapshot::TelemetrySnapshot;
use super::units::{Meters, feet_to_meters};
use serde::Serialize;

pub const DEFAULT_ENVELOPE_DIAMETER_FT: f64 = 20.0;
/// Weight given to the previous vertical speed estimate.
const VERTICAL_SPEED_RETAIN: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    /// Older than the latest snapshot already ingested.
    Stale,
}

/// Everything the engine derives. `None` renders as "--".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightMetrics {
    pub altitude_m: Option<f64>,
    pub baseline_m: Option<f64>,
    pub altitude_delta_m: Option<f64>,
    pub vertical_speed_mps: f64,
    pub diameter_ft: f64,
    pub volume_m3: f64,
    pub volume_ft3: f64,
    pub lift_n: Option<f64>,
    pub lift_lbf: Option<f64>,
    pub would_rise: Option<bool>,
}

/// Consumer-side engine. Every mutator recomputes `metrics` before it returns.
#[derive(Debug, Clone)]
pub struct FlightMetricsEngine {
    diameter_ft: f64,
    latest: Option<TelemetrySnapshot>,
    baseline: Option<Meters>,
    vertical_speed_mps: f64,
    metrics: FlightMetrics,
}

impl FlightMetricsEngine {
    pub fn new(diameter_ft: f64) -> Self {
        let mut engine = Self {
            diameter_ft,
            latest: None,
            baseline: None,
            vertical_speed_mps: 0.0,
            metrics: FlightMetrics::default(),
        };
        engine.recompute();
        engine
    }

    pub fn metrics(&self) -> &FlightMetrics {
        &self.metrics
    }

    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.latest.as_ref()
    }

    pub fn ingest(&mut self, snapshot: TelemetrySnapshot) -> IngestOutcome {
        if let Some(previous) = &self.latest {
            if snapshot.captured_at_ms < previous.captured_at_ms {
                return IngestOutcome::Stale;
            }

            let dt_s = (snapshot.captured_at_ms - previous.captured_at_ms) as f64 / 1000.0;
            if let (Some(now), Some(prev)) = (snapshot.altitude, previous.altitude) {
                if dt_s > 0.0 {
                    let instantaneous = (now.0 - prev.0) / dt_s;
                    self.vertical_speed_mps = VERTICAL_SPEED_RETAIN * self.vertical_speed_mps
                        + (1.0 - VERTICAL_SPEED_RETAIN) * instantaneous;
                }
            }
        }

        if self.baseline.is_none() {
            self.baseline = snapshot.altitude;
        }
        self.latest = Some(snapshot);
        self.recompute();
        IngestOutcome::Accepted
    }

    /// Forget the previous snapshot and the speed estimate, e.g. after the
    /// node restarted its clock. The baseline is kept.
    pub fn begin_session(&mut self) {
        self.latest = None;
        self.vertical_speed_mps = 0.0;
        self.recompute();
    }

    /// Take the current altitude as the new baseline, or clear it when no
    /// altitude is available.
    pub fn reset_baseline(&mut self) {
        self.baseline = self.latest.as_ref().and_then(|s| s.altitude);
        self.recompute();
    }

    pub fn set_diameter_ft(&mut self, diameter_ft: f64) {
        self.diameter_ft = diameter_ft;
        self.recompute();
    }

    fn recompute(&mut self) {
        let altitude = self.latest.as_ref().and_then(|s| s.altitude);
        let lift = self.latest.as_ref().and_then(|s| {
            Some(envelope_lift(
                self.diameter_ft,
                s.pressure?,
                s.ambient_temp?,
                s.envelope_temp?,
            ))
        });
        let volume_m3 = sphere_volume_m3(feet_to_meters(self.diameter_ft));

        self.metrics = FlightMetrics {
            altitude_m: altitude.map(|a| a.0),
            baseline_m: self.baseline.map(|b| b.0),
            altitude_delta_m: altitude.zip(self.baseline).map(|(a, b)| a.0 - b.0),
            vertical_speed_mps: self.vertical_speed_mps,
            diameter_ft: self.diameter_ft,
            volume_m3,
            volume_ft3: cubic_feet(volume_m3),
            lift_n: lift.map(|l| l.newtons),
            lift_lbf: lift.map(|l| l.pounds_force()),
            would_rise: lift.map(|l| l.would_rise()),
        };
    }
}

impl Default for FlightMetricsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENVELOPE_DIAMETER_FT)
    }
}
