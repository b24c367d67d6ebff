// Connectivity liveness from time since the last successful fetch
use serde::Serialize;
use std::collections::VecDeque;

pub const LIVE_BELOW_MS: u64 = 3000;
pub const DEGRADED_BELOW_MS: u64 = 8000;
pub const RTT_SAMPLE_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LivenessState {
    Live,
    Degraded,
    Offline,
}

pub fn classify(age_ms: u64) -> LivenessState {
    if age_ms < LIVE_BELOW_MS {
        LivenessState::Live
    } else if age_ms < DEGRADED_BELOW_MS {
        LivenessState::Degraded
    } else {
        LivenessState::Offline
    }
}

#[derive(Debug, Clone, Default)]
pub struct LivenessClassifier {
    last_success_ms: Option<u64>,
    round_trips_ms: VecDeque<u64>,
}

impl LivenessClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, now_ms: u64, round_trip_ms: u64) {
        self.last_success_ms = Some(now_ms);
        if self.round_trips_ms.len() == RTT_SAMPLE_CAPACITY {
            self.round_trips_ms.pop_front();
        }
        self.round_trips_ms.push_back(round_trip_ms);
    }

    /// Offline until the first success.
    pub fn state(&self, now_ms: u64) -> LivenessState {
        match self.last_success_ms {
            Some(at) => classify(now_ms.saturating_sub(at)),
            None => LivenessState::Offline,
        }
    }

    pub fn average_round_trip_ms(&self) -> Option<f64> {
        if self.round_trips_ms.is_empty() {
            return None;
        }
        let total: u64 = self.round_trips_ms.iter().sum();
        Some(total as f64 / self.round_trips_ms.len() as f64)
    }

    #[cfg(test)]
    pub fn sample_count(&self) -> usize {
        self.round_trips_ms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0), LivenessState::Live);
        assert_eq!(classify(2999), LivenessState::Live);
        assert_eq!(classify(3000), LivenessState::Degraded);
        assert_eq!(classify(7999), LivenessState::Degraded);
        assert_eq!(classify(8000), LivenessState::Offline);
    }

    #[test]
    fn test_offline_before_first_contact() {
        let classifier = LivenessClassifier::new();
        assert_eq!(classifier.state(0), LivenessState::Offline);
        assert_eq!(classifier.average_round_trip_ms(), None);
    }

    #[test]
    fn test_state_tracks_last_success() {
        let mut classifier = LivenessClassifier::new();
        classifier.record_success(10_000, 40);
        assert_eq!(classifier.state(12_999), LivenessState::Live);
        assert_eq!(classifier.state(13_000), LivenessState::Degraded);
        assert_eq!(classifier.state(18_000), LivenessState::Offline);
    }

    #[test]
    fn test_round_trip_buffer_is_fifo_bounded() {
        let mut classifier = LivenessClassifier::new();
        for i in 0..25 {
            classifier.record_success(i, i * 10);
        }
        assert_eq!(classifier.sample_count(), RTT_SAMPLE_CAPACITY);
        // Remaining samples are 50..=240 step 10
        let expected = (5..25).map(|i| (i * 10) as f64).sum::<f64>() / 20.0;
        assert_eq!(classifier.average_round_trip_ms(), Some(expected));
    }
}
