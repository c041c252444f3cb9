use crate::calibration::Compensation;
use crate::registers::Oversampling;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub(crate) oversampling: Oversampling,
    pub(crate) compensation: Compensation,
    pub(crate) validate_crc: bool,
    pub(crate) prom_read_pacing_us: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            oversampling: Oversampling::Osr256,
            compensation: Compensation::FirstOrder,
            validate_crc: true,
            prom_read_pacing_us: 0,
        }
    }
}

impl Config {
    pub fn oversampling(mut self, oversampling: Oversampling) -> Self {
        self.oversampling = oversampling;

        self
    }

    pub fn compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = compensation;

        self
    }

    /// Check the PROM CRC-4 during `initialize`. Enabled by default.
    pub fn validate_crc(mut self, validate: bool) -> Self {
        self.validate_crc = validate;

        self
    }

    /// Delay inserted after each PROM word read. Some buses (long wires, slow level shifters)
    /// need a short pause between back to back transactions.
    pub fn prom_read_pacing_us(mut self, us: u32) -> Self {
        self.prom_read_pacing_us = us;

        self
    }
}
