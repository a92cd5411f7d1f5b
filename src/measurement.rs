//! Physical readings and the raw-count conversions that produce them.
//!
//! Values are kept in fixed point so the conversions are exact: temperature in nano-degrees
//! Celsius, pressure in nanopascal.

use core::fmt;

const NANO: i64 = 1_000_000_000;

/// A temperature in nano-degrees Celsius.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature(i64);

impl Temperature {
    pub const fn from_nano_celsius(nano: i64) -> Self {
        Self(nano)
    }

    pub const fn nano_celsius(&self) -> i64 {
        self.0
    }

    pub const fn millicelsius(&self) -> i64 {
        self.0 / 1_000_000
    }

    pub fn as_celsius(&self) -> f32 {
        (self.0 / NANO) as f32 + (self.0 % NANO) as f32 / NANO as f32
    }

    /// `counts / counts_per_degree` degrees Celsius above `offset`.
    pub(crate) const fn from_counts(offset: Temperature, counts: i16, counts_per_degree: i64) -> Self {
        Self(offset.0 + counts as i64 * NANO / counts_per_degree)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let milli = self.millicelsius();
        let sign = if milli < 0 { "-" } else { "" };
        let milli = milli.unsigned_abs();
        write!(f, "{}{}.{:03}°C", sign, milli / 1000, milli % 1000)
    }
}

/// A pressure in nanopascal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressure(u64);

impl Pressure {
    pub const fn from_nano_pascal(nano: u64) -> Self {
        Self(nano)
    }

    pub const fn nano_pascal(&self) -> u64 {
        self.0
    }

    /// Whole pascal, truncated.
    pub const fn pascal(&self) -> u64 {
        self.0 / NANO as u64
    }

    pub fn as_pascal(&self) -> f32 {
        let nano = NANO as u64;
        (self.0 / nano) as f32 + (self.0 % nano) as f32 / nano as f32
    }

    pub fn as_hectopascal(&self) -> f32 {
        self.as_pascal() / 100.0
    }
}

impl fmt::Display for Pressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pa = self.pascal();
        write!(f, "{}.{:02}hPa", pa / 100, pa % 100)
    }
}

/// Converts a raw PRESS_OUT count (1/4096 hPa) to pressure.
///
/// 1 hPa = 10^11 nPa, so one count is 10^11 / 4096 nPa. The constant is split as
/// `(10^11 / 2048) / 2` to stay exact in integer arithmetic.
pub const fn pressure_from_raw(raw: u32) -> Pressure {
    const HPA_IN_NPA_PER_2048: u64 = 100_000_000_000 / 2048;
    Pressure(raw as u64 * HPA_IN_NPA_PER_2048 / 2)
}

/// Raw TEMP_OUT_L/TEMP_OUT_H as a signed count.
pub const fn raw_temperature(b: [u8; 2]) -> i16 {
    (b[1] as i16) << 8 | b[0] as i16
}

/// Raw PRESS_OUT_XL/L/H as a 24-bit count, not sign-extended.
pub const fn raw_pressure(b: [u8; 3]) -> u32 {
    (b[2] as u32) << 16 | (b[1] as u32) << 8 | b[0] as u32
}

/// One temperature/pressure pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub temperature: Temperature,
    pub pressure: Pressure,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temperature: {}, Pressure: {}", self.temperature, self.pressure)
    }
}

#[cfg(feature = "uom")]
impl Reading {
    pub fn pressure_uom(&self) -> uom::si::f32::Pressure {
        uom::si::pressure::Pressure::new::<uom::si::pressure::pascal>(self.pressure.as_pascal())
    }

    pub fn temperature_uom(&self) -> uom::si::f32::ThermodynamicTemperature {
        uom::si::thermodynamic_temperature::ThermodynamicTemperature::new::<uom::si::thermodynamic_temperature::degree_celsius>(self.temperature.as_celsius())
    }
}
