// Indicator modes and the waveform each one drives
use serde::Serialize;

const SLOW_BLINK_HALF_PERIOD_MS: u64 = 500;
const FAST_BLINK_HALF_PERIOD_MS: u64 = 50;
const DOUBLE_PULSE_CYCLE_MS: u64 = 1200;
const DOUBLE_PULSE_WIDTH_MS: u64 = 120;
const DOUBLE_PULSE_SECOND_OFFSET_MS: u64 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    Off,
    Solid,
    SlowBlink,
    FastBlink,
    /// Reserved for "initializing, not ready yet".
    DoublePulse,
}

/// Output level for `mode` at `elapsed_ms` since the driving loop started.
///
/// Pure function of its arguments. The caller must sample it at 20 Hz or
/// faster to resolve the fast blink.
pub fn level(mode: IndicatorMode, elapsed_ms: u64) -> bool {
    match mode {
        IndicatorMode::Off => false,
        IndicatorMode::Solid => true,
        IndicatorMode::SlowBlink => square_wave(elapsed_ms, SLOW_BLINK_HALF_PERIOD_MS),
        IndicatorMode::FastBlink => square_wave(elapsed_ms, FAST_BLINK_HALF_PERIOD_MS),
        IndicatorMode::DoublePulse => {
            let phase = elapsed_ms % DOUBLE_PULSE_CYCLE_MS;
            phase < DOUBLE_PULSE_WIDTH_MS
                || (DOUBLE_PULSE_SECOND_OFFSET_MS..DOUBLE_PULSE_SECOND_OFFSET_MS + DOUBLE_PULSE_WIDTH_MS)
                    .contains(&phase)
        }
    }
}

fn square_wave(elapsed_ms: u64, half_period_ms: u64) -> bool {
    (elapsed_ms / half_period_ms) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_modes() {
        for t in [0, 49, 50, 499, 500, 1199, 123_456] {
            assert!(!level(IndicatorMode::Off, t));
            assert!(level(IndicatorMode::Solid, t));
        }
    }

    #[test]
    fn test_slow_blink() {
        assert!(level(IndicatorMode::SlowBlink, 0));
        assert!(level(IndicatorMode::SlowBlink, 499));
        assert!(!level(IndicatorMode::SlowBlink, 500));
        assert!(!level(IndicatorMode::SlowBlink, 999));
        assert!(level(IndicatorMode::SlowBlink, 1000));
    }

    #[test]
    fn test_fast_blink() {
        assert!(level(IndicatorMode::FastBlink, 0));
        assert!(level(IndicatorMode::FastBlink, 49));
        assert!(!level(IndicatorMode::FastBlink, 50));
        assert!(!level(IndicatorMode::FastBlink, 99));
        assert!(level(IndicatorMode::FastBlink, 100));
    }

    #[test]
    fn test_double_pulse() {
        let high: Vec<u64> = (0..1200).filter(|t| level(IndicatorMode::DoublePulse, *t)).collect();
        assert_eq!(high.len(), 240);
        assert!(level(IndicatorMode::DoublePulse, 119));
        assert!(!level(IndicatorMode::DoublePulse, 120));
        assert!(!level(IndicatorMode::DoublePulse, 239));
        assert!(level(IndicatorMode::DoublePulse, 240));
        assert!(level(IndicatorMode::DoublePulse, 359));
        assert!(!level(IndicatorMode::DoublePulse, 360));
        assert!(level(IndicatorMode::DoublePulse, 1200));
    }
}
