use crate::application::acquisition::AcquisitionSettings;
use crate::application::monitor_service::MonitorSettings;
use crate::application::node_service::NodeSettings;
use crate::domain::flight::DEFAULT_ENVELOPE_DIAMETER_FT;
use crate::domain::history::HistoryHorizon;
use crate::domain::overheat::{DEFAULT_OVERHEAT_ENTER_F, DEFAULT_OVERHEAT_EXIT_F, OverheatThresholds};
use crate::domain::units::Fahrenheit;
use anyhow::{Context, ensure};
use serde::Deserialize;
use std::time::Duration;

/// Slowest indicator refresh that still resolves the fast blink.
const MAX_INDICATOR_INTERVAL_MS: u64 = 50;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Node,
    Monitor,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub role: Role,
    pub node: NodeConfig,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NodeConfig {
    pub bind_addr: String,
    pub tick_interval_ms: u64,
    pub indicator_interval_ms: u64,
    pub barometric_interval_ms: u64,
    pub humidity_interval_ms: u64,
    pub object_interval_ms: u64,
    pub humidity_attempts: u32,
    pub humidity_backoff_ms: u64,
    pub overheat_enter_f: f64,
    pub overheat_exit_f: f64,
    pub simulation: SimulationConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            tick_interval_ms: 250,
            indicator_interval_ms: 25,
            barometric_interval_ms: 1000,
            humidity_interval_ms: 2000,
            object_interval_ms: 500,
            humidity_attempts: 3,
            humidity_backoff_ms: 20,
            overheat_enter_f: DEFAULT_OVERHEAT_ENTER_F,
            overheat_exit_f: DEFAULT_OVERHEAT_EXIT_F,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Which simulated parts answer their startup probe.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub barometer: bool,
    pub hygrometer: bool,
    pub thermometer: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            barometer: true,
            hygrometer: true,
            thermometer: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MonitorConfig {
    pub bind_addr: String,
    pub node_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub diameter_ft: f64,
    pub window_minutes: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_string(),
            node_url: "http://127.0.0.1:8080/telemetry".to_string(),
            poll_interval_ms: 1000,
            request_timeout_ms: 2000,
            diameter_ft: DEFAULT_ENVELOPE_DIAMETER_FT,
            window_minutes: HistoryHorizon::default().minutes(),
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.overheat_enter_f > self.overheat_exit_f,
            "overheat_enter_f ({}) must be above overheat_exit_f ({})",
            self.overheat_enter_f,
            self.overheat_exit_f
        );
        ensure!(
            (1..=MAX_INDICATOR_INTERVAL_MS).contains(&self.indicator_interval_ms),
            "indicator_interval_ms must be between 1 and {}",
            MAX_INDICATOR_INTERVAL_MS
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(self.humidity_attempts > 0, "humidity_attempts must be at least 1");
        Ok(())
    }

    pub fn settings(&self) -> NodeSettings {
        NodeSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            indicator_interval: Duration::from_millis(self.indicator_interval_ms),
            acquisition: AcquisitionSettings {
                barometric_interval: Duration::from_millis(self.barometric_interval_ms),
                humidity_interval: Duration::from_millis(self.humidity_interval_ms),
                object_interval: Duration::from_millis(self.object_interval_ms),
                humidity_attempts: self.humidity_attempts,
                humidity_backoff: Duration::from_millis(self.humidity_backoff_ms),
            },
            overheat: OverheatThresholds {
                enter: Fahrenheit(self.overheat_enter_f),
                exit: Fahrenheit(self.overheat_exit_f),
            },
        }
    }
}

impl MonitorConfig {
    pub fn settings(&self) -> anyhow::Result<MonitorSettings> {
        ensure!(
            self.diameter_ft.is_finite() && self.diameter_ft > 0.0,
            "diameter_ft must be a positive number"
        );
        ensure!(self.poll_interval_ms > 0, "poll_interval_ms must be positive");
        let horizon = HistoryHorizon::try_from(self.window_minutes)
            .map_err(|m| anyhow::anyhow!("window_minutes must be 2, 5, 10 or 15 (got {})", m))?;

        Ok(MonitorSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            diameter_ft: self.diameter_ft,
            horizon,
        })
    }
}

/// `config/telemetry.toml` if present, overridden by `BALLOON__*` variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/telemetry").required(false))
        .add_source(
            config::Environment::with_prefix("BALLOON")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = settings
        .try_deserialize()
        .context("invalid telemetry configuration")?;
    app.node.validate()?;
    Ok(app)
}
