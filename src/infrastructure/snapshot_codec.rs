// Wire codec for telemetry snapshots
use crate::domain::snapshot::{AmbientSource, TelemetrySnapshot};
use crate::domain::units::{Fahrenheit, Hectopascal, Meters, Percent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("unknown ambient source tag {0:?}")]
    UnknownSource(String),
    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Flat wire record. Absent instruments are `null`, never zero or missing.
/// Precision: temperatures, pressure and altitude to 0.1, humidity to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRecord {
    pub envelope_temp_f: Option<f64>,
    pub ambient_temp_f: Option<f64>,
    pub humidity_pct: Option<i64>,
    pub pressure_hpa: Option<f64>,
    pub altitude_m: Option<f64>,
    pub ambient_source: Option<String>,
    pub timestamp_ms: u64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn encode(snapshot: &TelemetrySnapshot) -> WireRecord {
    WireRecord {
        envelope_temp_f: snapshot.envelope_temp.map(|t| round1(t.to_fahrenheit().0)),
        ambient_temp_f: snapshot.ambient_temp.map(|t| round1(t.to_fahrenheit().0)),
        humidity_pct: snapshot.humidity.map(|h| h.0.round() as i64),
        pressure_hpa: snapshot.pressure.map(|p| round1(p.0)),
        altitude_m: snapshot.altitude.map(|a| round1(a.0)),
        ambient_source: snapshot.ambient_source.map(|s| s.as_str().to_string()),
        timestamp_ms: snapshot.captured_at_ms,
    }
}

/// Decode a received record. Missing fields decode as absent rather than
/// failing the whole record.
pub fn decode(record: WireRecord) -> Result<TelemetrySnapshot, CodecError> {
    let ambient_source = record
        .ambient_source
        .map(|tag| AmbientSource::parse(&tag).ok_or(CodecError::UnknownSource(tag)))
        .transpose()?;

    Ok(TelemetrySnapshot {
        envelope_temp: record.envelope_temp_f.map(|f| Fahrenheit(f).to_celsius()),
        ambient_temp: record.ambient_temp_f.map(|f| Fahrenheit(f).to_celsius()),
        ambient_source,
        humidity: record.humidity_pct.map(|h| Percent(h as f64)),
        pressure: record.pressure_hpa.map(Hectopascal),
        altitude: record.altitude_m.map(Meters),
        captured_at_ms: record.timestamp_ms,
    })
}

pub fn decode_json(bytes: &[u8]) -> Result<TelemetrySnapshot, CodecError> {
    let record: WireRecord =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Json(e.to_string()))?;
    decode(record)
}
