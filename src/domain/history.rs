// Time-windowed temperature history for charting
use super::snapshot::TelemetrySnapshot;
use super::units::Fahrenheit;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u32")]
pub enum HistoryHorizon {
    Two,
    #[default]
    Five,
    Ten,
    Fifteen,
}

impl HistoryHorizon {
    pub fn minutes(self) -> u32 {
        match self {
            HistoryHorizon::Two => 2,
            HistoryHorizon::Five => 5,
            HistoryHorizon::Ten => 10,
            HistoryHorizon::Fifteen => 15,
        }
    }

    pub fn as_millis(self) -> u64 {
        u64::from(self.minutes()) * 60_000
    }
}

impl From<HistoryHorizon> for u32 {
    fn from(horizon: HistoryHorizon) -> Self {
        horizon.minutes()
    }
}

impl TryFrom<u32> for HistoryHorizon {
    type Error = u32;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        match minutes {
            2 => Ok(HistoryHorizon::Two),
            5 => Ok(HistoryHorizon::Five),
            10 => Ok(HistoryHorizon::Ten),
            15 => Ok(HistoryHorizon::Fifteen),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySample {
    pub at_ms: u64,
    pub ambient: Option<Fahrenheit>,
    pub envelope: Option<Fahrenheit>,
}

impl HistorySample {
    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        Self {
            at_ms: snapshot.captured_at_ms,
            ambient: snapshot.ambient_temp.map(|c| c.to_fahrenheit()),
            envelope: snapshot.envelope_temp.map(|c| c.to_fahrenheit()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemperatureHistoryWindow {
    horizon: HistoryHorizon,
    samples: VecDeque<HistorySample>,
}

impl TemperatureHistoryWindow {
    pub fn new(horizon: HistoryHorizon) -> Self {
        Self {
            horizon,
            samples: VecDeque::new(),
        }
    }

    pub fn horizon(&self) -> HistoryHorizon {
        self.horizon
    }

    /// Append a sample and evict everything older than the horizon,
    /// measured from the new sample's capture time.
    pub fn ingest(&mut self, sample: HistorySample) {
        let now_ms = sample.at_ms;
        self.samples.push_back(sample);
        self.trim(now_ms);
    }

    /// Changing the horizon only evicts; samples still inside the new
    /// horizon are kept.
    pub fn set_horizon(&mut self, horizon: HistoryHorizon, now_ms: u64) {
        self.horizon = horizon;
        self.trim(now_ms);
    }

    pub fn trim(&mut self, now_ms: u64) {
        let cutoff = now_ms.saturating_sub(self.horizon.as_millis());
        while self.samples.front().is_some_and(|s| s.at_ms < cutoff) {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = &HistorySample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
