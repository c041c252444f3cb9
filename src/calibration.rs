//! Factory calibration and the compensation math.
//!
//! The PROM holds eight 16-bit words: a reserved/factory word, the six coefficients C1..C6 and
//! a word whose low nibble is a CRC-4 over the whole table. Compensation follows the MS5607
//! datasheet using 64-bit integer arithmetic, `2^n` factors are applied as shifts.

use crate::registers::{PROM_CRC_SLOT, PROM_WORDS};

/// Scale factors of C1..C6 as powers of two (positive multiplies, negative divides).
const SCALE_EXPONENTS: [i32; 6] = [16, 17, -7, -6, 8, -23];

/// PROM calibration data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    prom: [u16; PROM_WORDS],
}

/// C1..C6 multiplied by their datasheet scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledCoefficients {
    /// Pressure sensitivity, C1 * 2^16
    pub sens_t1: f64,
    /// Pressure offset, C2 * 2^17
    pub off_t1: f64,
    /// Temperature coefficient of pressure sensitivity, C3 / 2^7
    pub tcs: f64,
    /// Temperature coefficient of pressure offset, C4 / 2^6
    pub tco: f64,
    /// Reference temperature, C5 * 2^8
    pub t_ref: f64,
    /// Temperature coefficient of the temperature, C6 / 2^23
    pub tempsens: f64,
}

/// Whether the low temperature correction of the datasheet is applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compensation {
    #[default]
    FirstOrder,
    /// Adds the T2/OFF2/SENS2 correction below 20 °C (and the extra term below -15 °C).
    SecondOrder,
}

/// Offset and sensitivity at the temperature of the last compensated reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressureFactors {
    pub offset: i64,
    pub sensitivity: i64,
}

/// Outcome of compensating one raw temperature, before any range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureCompensation {
    /// Difference between actual and reference temperature (dT).
    pub deviation: i64,
    /// Hundredths of a degree Celsius.
    pub temperature: i32,
    pub factors: PressureFactors,
}

impl Calibration {
    /// Wrap a full PROM image as read from slots 0..=7.
    pub const fn from_prom(prom: [u16; PROM_WORDS]) -> Self {
        Self { prom }
    }

    /// Build a table from C1..C6 alone, reserved word and CRC word zeroed.
    pub const fn from_coefficients(c: [u16; 6]) -> Self {
        Self { prom: [0, c[0], c[1], c[2], c[3], c[4], c[5], 0] }
    }

    pub const fn prom(&self) -> &[u16; PROM_WORDS] {
        &self.prom
    }

    /// Raw coefficient `n`, or `None` outside of C1..C6.
    pub fn coefficient(&self, n: usize) -> Option<u16> {
        match n {
            1..=6 => Some(self.prom[n]),
            _ => None,
        }
    }

    /// C1..C6 as read from PROM.
    pub fn coefficients(&self) -> [u16; 6] {
        let mut c = [0u16; 6];
        c.copy_from_slice(&self.prom[1..7]);
        c
    }

    pub fn scaled(&self) -> ScaledCoefficients {
        let c = self.coefficients();
        let scale = |i: usize| c[i] as f64 * pow2(SCALE_EXPONENTS[i]);

        ScaledCoefficients {
            sens_t1: scale(0),
            off_t1: scale(1),
            tcs: scale(2),
            tco: scale(3),
            t_ref: scale(4),
            tempsens: scale(5),
        }
    }

    /// CRC nibble stored in the low bits of PROM word 7.
    pub fn stored_crc(&self) -> u8 {
        (self.prom[PROM_CRC_SLOT] & 0x000F) as u8
    }

    pub fn computed_crc(&self) -> u8 {
        crc4(&self.prom)
    }

    pub fn crc_is_valid(&self) -> bool {
        self.stored_crc() == self.computed_crc()
    }

    /// dT, TEMP, OFF and SENS for a raw D2 reading.
    pub fn compensate_temperature(
        &self,
        raw_temperature: u32,
        compensation: Compensation,
    ) -> TemperatureCompensation {
        let c = self.coefficients().map(i64::from);

        let delta_t = raw_temperature as i64 - (c[4] << 8);
        let mut temp = 2000 + delta_t * c[5] / (1 << 23);

        let mut off = (c[1] << 17) + c[3] * delta_t / (1 << 6);
        let mut sens = (c[0] << 16) + c[2] * delta_t / (1 << 7);

        if compensation == Compensation::SecondOrder && temp < 2000 {
            let t2 = delta_t * delta_t / (1 << 31);
            let low = (temp - 2000) * (temp - 2000);
            let mut off2 = 61 * low / (1 << 4);
            let mut sens2 = 2 * low;

            if temp < -1500 {
                let very_low = (temp + 1500) * (temp + 1500);
                off2 += 15 * very_low;
                sens2 += 8 * very_low;
            }

            temp -= t2;
            off -= off2;
            sens -= sens2;
        }

        TemperatureCompensation {
            deviation: delta_t,
            temperature: temp as i32,
            factors: PressureFactors { offset: off, sensitivity: sens },
        }
    }
}

impl PressureFactors {
    /// Hundredths of a millibar for a raw D1 reading.
    pub fn compensate(&self, raw_pressure: u32) -> i32 {
        let p = (raw_pressure as i64 * self.sensitivity / (1 << 21) - self.offset) / (1 << 15);
        p as i32
    }
}

/// CRC-4 over the PROM image, following the manufacturer's AN520 reference code.
///
/// The low byte of word 7 (which holds the CRC itself) is treated as zero.
pub fn crc4(prom: &[u16; PROM_WORDS]) -> u8 {
    let mut n_rem: u16 = 0x00;

    let mut prom_bytes = [0u8; PROM_WORDS * 2];
    for (i, word) in prom.iter().enumerate() {
        prom_bytes[2 * i..2 * i + 2].copy_from_slice(&word.to_be_bytes());
    }
    prom_bytes[2 * PROM_CRC_SLOT + 1] = 0;

    for byte in prom_bytes {
        n_rem ^= byte as u16;
        for _ in 0..8 {
            if (n_rem & 0x8000) != 0 {
                n_rem = (n_rem << 1) ^ 0x3000;
            } else {
                n_rem <<= 1;
            }
        }
    }

    ((n_rem >> 12) & 0xF) as u8
}

fn pow2(exp: i32) -> f64 {
    if exp >= 0 {
        (1u64 << exp) as f64
    } else {
        1.0 / (1u64 << -exp) as f64
    }
}
