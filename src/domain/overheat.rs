// Overheat detection with a hysteresis band on envelope temperature
use super::indicator::IndicatorMode;
use super::units::Fahrenheit;
use serde::Serialize;

pub const DEFAULT_OVERHEAT_ENTER_F: f64 = 200.0;
pub const DEFAULT_OVERHEAT_EXIT_F: f64 = 195.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverheatState {
    Normal,
    Overheated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverheatThresholds {
    pub enter: Fahrenheit,
    pub exit: Fahrenheit,
}

impl Default for OverheatThresholds {
    fn default() -> Self {
        Self {
            enter: Fahrenheit(DEFAULT_OVERHEAT_ENTER_F),
            exit: Fahrenheit(DEFAULT_OVERHEAT_EXIT_F),
        }
    }
}

/// Two-threshold overheat detector. Emits an indicator mode request on each
/// transition and nothing while the temperature sits inside the band.
#[derive(Debug, Clone)]
pub struct OverheatHysteresis {
    thresholds: OverheatThresholds,
    state: OverheatState,
}

impl OverheatHysteresis {
    /// `thresholds.enter` must be above `thresholds.exit`; config loading
    /// rejects anything else.
    pub fn new(thresholds: OverheatThresholds) -> Self {
        Self {
            thresholds,
            state: OverheatState::Normal,
        }
    }

    pub fn state(&self) -> OverheatState {
        self.state
    }

    pub fn update(&mut self, envelope: Fahrenheit) -> Option<IndicatorMode> {
        match self.state {
            OverheatState::Normal if envelope.0 >= self.thresholds.enter.0 => {
                self.state = OverheatState::Overheated;
                Some(IndicatorMode::FastBlink)
            }
            OverheatState::Overheated if envelope.0 <= self.thresholds.exit.0 => {
                self.state = OverheatState::Normal;
                Some(IndicatorMode::Solid)
            }
            _ => None,
        }
    }
}

impl Default for OverheatHysteresis {
    fn default() -> Self {
        Self::new(OverheatThresholds::default())
    }
}
