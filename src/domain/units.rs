// Semantic unit types and unit conversions
use serde::Serialize;

const PA_PER_HPA: f64 = 100.0;
const KELVIN_OFFSET: f64 = 273.15;
const METERS_PER_FOOT: f64 = 0.3048;

/// Raw pressure above this is taken to be Pa.
const PASCAL_FLOOR: f64 = 2000.0;
/// Raw pressure below this is taken to be kPa.
const KILOPASCAL_CEILING: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Celsius(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Fahrenheit(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Hectopascal(pub f64);

/// Relative humidity in percent.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Percent(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Meters(pub f64);

impl Celsius {
    pub fn to_fahrenheit(self) -> Fahrenheit {
        Fahrenheit(self.0 * 9.0 / 5.0 + 32.0)
    }

    pub fn to_kelvin(self) -> f64 {
        self.0 + KELVIN_OFFSET
    }
}

impl Fahrenheit {
    pub fn to_celsius(self) -> Celsius {
        Celsius((self.0 - 32.0) * 5.0 / 9.0)
    }
}

impl Hectopascal {
    pub fn to_pascals(self) -> f64 {
        self.0 * PA_PER_HPA
    }
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

/// Canonicalize a pressure reading of unknown unit to hPa.
///
/// The unit is guessed from magnitude alone: above 2000 is Pa, below 50 is
/// kPa, anything else is already hPa. A sensor whose output straddles either
/// boundary will be misread; the thresholds are kept as-is for compatibility
/// with existing firmware output.
pub fn normalize_pressure(raw: f64) -> Hectopascal {
    if raw > PASCAL_FLOOR {
        Hectopascal(raw / PA_PER_HPA)
    } else if raw < KILOPASCAL_CEILING {
        Hectopascal(raw * PA_PER_HPA)
    } else {
        Hectopascal(raw)
    }
}
