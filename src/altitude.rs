//! Altitude estimation from a compensated reading.
//!
//! These are approximations of the barometric formula, outside of what the sensor's rated
//! accuracy covers. Pick a model through [`AltitudeEstimator`].

use micromath::F32Ext;

/// Mean sea level pressure of the standard atmosphere, in mbar.
pub const STANDARD_SEA_LEVEL_MBAR: f32 = 1013.25;

/// Inverse of the standard temperature lapse rate, 1 / 0.0065 K/m.
const INVERSE_LAPSE_RATE: f32 = 153.846_15;

pub trait AltitudeEstimator {
    /// Altitude in meters for a temperature in °C and a pressure in mbar.
    ///
    /// A pressure that is not positive has no altitude and gives NaN.
    fn altitude(&self, temperature_c: f32, pressure_mbar: f32) -> f32;
}

/// Hypsometric formula, uses the measured temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hypsometric {
    pub sea_level_mbar: f32,
}

/// International barometric formula, ignores temperature (assumes 15 °C at sea level).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InternationalStandard {
    pub sea_level_mbar: f32,
}

impl Default for Hypsometric {
    fn default() -> Self {
        Self { sea_level_mbar: STANDARD_SEA_LEVEL_MBAR }
    }
}

impl Default for InternationalStandard {
    fn default() -> Self {
        Self { sea_level_mbar: STANDARD_SEA_LEVEL_MBAR }
    }
}

impl AltitudeEstimator for Hypsometric {
    fn altitude(&self, temperature_c: f32, pressure_mbar: f32) -> f32 {
        if pressure_mbar <= 0.0 {
            return f32::NAN;
        }
        let ratio = pressure_ratio_pow(self.sea_level_mbar, pressure_mbar, 1.0 / 5.257);
        INVERSE_LAPSE_RATE * (ratio - 1.0) * (temperature_c + 273.15)
    }
}

impl AltitudeEstimator for InternationalStandard {
    fn altitude(&self, _temperature_c: f32, pressure_mbar: f32) -> f32 {
        international_standard(pressure_mbar, self.sea_level_mbar)
    }
}

/// Hypsometric altitude against the standard sea level pressure.
pub fn hypsometric(temperature_c: f32, pressure_mbar: f32) -> f32 {
    Hypsometric::default().altitude(temperature_c, pressure_mbar)
}

pub fn international_standard(pressure_mbar: f32, sea_level_mbar: f32) -> f32 {
    if pressure_mbar <= 0.0 {
        return f32::NAN;
    }
    44_330.0 * (1.0 - pressure_ratio_pow(pressure_mbar, sea_level_mbar, 1.0 / 5.255))
}

/// `(a / b)^exponent`.
///
/// `micromath`'s `powf` loses most of its precision when the base is below one, so the power is
/// always taken of the ratio that is at least one.
fn pressure_ratio_pow(a: f32, b: f32, exponent: f32) -> f32 {
    if a >= b {
        F32Ext::powf(a / b, exponent)
    } else {
        1.0 / F32Ext::powf(b / a, exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f32, expected: f32, tolerance: f32) -> bool {
        (actual - expected).abs() <= tolerance
    }

    #[test]
    fn sea_level_is_zero() {
        assert!(close(hypsometric(15.0, STANDARD_SEA_LEVEL_MBAR), 0.0, 2.0));
        let p0 = STANDARD_SEA_LEVEL_MBAR;
        assert!(close(international_standard(p0, p0), 0.0, 2.0));
    }

    #[test]
    fn models_agree_in_standard_atmosphere() {
        // 898.76 mbar is 1000 m in the standard atmosphere, where it is 8.5 °C.
        let h = hypsometric(8.5, 898.76);
        let i = international_standard(898.76, STANDARD_SEA_LEVEL_MBAR);

        assert!(close(h, 1000.0, 5.0), "hypsometric {h}");
        assert!(close(i, 1000.0, 5.0), "international {i}");
    }

    #[test]
    fn international_standard_reference_points() {
        let cases = [(950.0, 540.4), (800.0, 1949.3), (1050.0, -301.6)];

        for (pressure, expected) in cases {
            let altitude = international_standard(pressure, STANDARD_SEA_LEVEL_MBAR);
            assert!(close(altitude, expected, 5.0), "{pressure} mbar gave {altitude} m");
        }
    }

    #[test]
    fn hypsometric_below_sea_level() {
        // 1050 mbar at 15 °C is roughly 300 m below the standard sea level.
        let h = hypsometric(15.0, 1050.0);
        assert!(close(h, -300.0, 10.0), "hypsometric {h}");
    }

    #[test]
    fn non_positive_pressure_has_no_altitude() {
        assert!(hypsometric(15.0, 0.0).is_nan());
        assert!(hypsometric(15.0, -1.0).is_nan());
        assert!(international_standard(0.0, STANDARD_SEA_LEVEL_MBAR).is_nan());
        assert!(InternationalStandard::default().altitude(15.0, 0.0).is_nan());
    }

    #[test]
    fn altitude_falls_with_pressure() {
        let low = hypsometric(20.0, 1000.0);
        let high = hypsometric(20.0, 800.0);
        assert!(high > low + 1000.0);
    }

    #[test]
    fn reference_pressure_shifts_zero() {
        let model = InternationalStandard { sea_level_mbar: 1000.0 };
        assert!(close(model.altitude(0.0, 1000.0), 0.0, 2.0));
    }
}
