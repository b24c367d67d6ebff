// Buoyancy physics for a spherical hot-air envelope
use super::units::{Celsius, Hectopascal, feet_to_meters};
use std::f64::consts::PI;

/// Specific gas constant for dry air, J/(kg·K).
pub const DRY_AIR_GAS_CONSTANT: f64 = 287.058;
/// Standard gravity, m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;
pub const NEWTONS_PER_POUND_FORCE: f64 = 4.448_221_615_260_5;
pub const CUBIC_FEET_PER_CUBIC_METER: f64 = 35.314_666_721_488_59;

pub fn sphere_volume_m3(diameter_m: f64) -> f64 {
    let radius = diameter_m / 2.0;
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Ideal-gas air density in kg/m³.
pub fn air_density(pressure: Hectopascal, temperature: Celsius) -> f64 {
    pressure.to_pascals() / (DRY_AIR_GAS_CONSTANT * temperature.to_kelvin())
}

pub fn cubic_feet(cubic_meters: f64) -> f64 {
    cubic_meters * CUBIC_FEET_PER_CUBIC_METER
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lift {
    /// Net upward force; negative when the envelope is colder than ambient.
    pub newtons: f64,
}

impl Lift {
    pub fn pounds_force(&self) -> f64 {
        self.newtons / NEWTONS_PER_POUND_FORCE
    }

    pub fn would_rise(&self) -> bool {
        self.newtons > 0.0
    }
}

pub fn envelope_lift(diameter_ft: f64, pressure: Hectopascal, ambient: Celsius, envelope: Celsius) -> Lift {
    let volume_m3 = sphere_volume_m3(feet_to_meters(diameter_ft));
    let outside = air_density(pressure, ambient);
    let inside = air_density(pressure, envelope);
    Lift {
        newtons: (outside - inside) * volume_m3 * STANDARD_GRAVITY,
    }
}
