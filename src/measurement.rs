use crate::altitude::AltitudeEstimator;

/// Compensated temperature in hundredths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Temperature(i32);

/// Compensated pressure in hundredths of a millibar (i.e. pascal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pressure(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub temperature: Temperature,
    pub pressure: Pressure,
}

impl Temperature {
    /// Rated operating range of the sensor, -40 °C to 85 °C.
    pub const MIN: Temperature = Temperature(-4000);
    pub const MAX: Temperature = Temperature(8500);

    pub const fn from_centidegrees(centidegrees: i32) -> Self {
        Self(centidegrees)
    }

    pub const fn centidegrees(self) -> i32 {
        self.0
    }

    pub fn celsius(self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub const fn is_in_range(self) -> bool {
        self.0 >= Self::MIN.0 && self.0 <= Self::MAX.0
    }
}

impl Pressure {
    /// Rated pressure span, 10 mbar to 1200 mbar.
    pub const MIN: Pressure = Pressure(1_000);
    pub const MAX: Pressure = Pressure(120_000);

    pub const fn from_centimillibar(centimillibar: i32) -> Self {
        Self(centimillibar)
    }

    pub const fn centimillibar(self) -> i32 {
        self.0
    }

    pub fn millibar(self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub const fn pascal(self) -> i32 {
        self.0
    }

    pub const fn is_in_range(self) -> bool {
        self.0 >= Self::MIN.0 && self.0 <= Self::MAX.0
    }
}

impl Measurement {
    /// Altitude of this reading with the given model.
    pub fn altitude(&self, estimator: &impl AltitudeEstimator) -> f32 {
        estimator.altitude(self.temperature.celsius(), self.pressure.millibar())
    }
}
