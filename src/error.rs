//! Errors that can occur when using the MS5607.
//!
//! [`Error`] is generic over the error type of the underlying SPI device.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusError> {
    /// An error has occurred in the SPI driver
    Bus(BusError),

    /// The ADC returned data before any conversion was started.
    ///
    /// After a reset the ADC register reads as zero. Anything else usually means a wiring
    /// problem (MISO floating or shorted) or a wrong SPI mode.
    SelfTest { adc: u32 },

    /// The CRC-4 stored in PROM does not match the coefficients that were read.
    Crc { stored: u8, computed: u8 },

    /// Calibration has not been loaded, call `initialize` first.
    NotInitialized,

    /// The ADC read returned zero: the conversion was not started or has not finished.
    EmptyConversion,

    /// Compensated temperature (hundredths of °C) outside of -40..=85 °C.
    TemperatureOutOfRange(i32),

    /// Compensated pressure (hundredths of mbar) outside of 10..=1200 mbar.
    PressureOutOfRange(i32),

    /// Pressure compensation needs a successfully compensated temperature first.
    NotReady,
}

pub type Ms5607Result<T, BusError> = Result<T, Error<BusError>>;

impl<BusError: fmt::Debug> fmt::Display for Error<BusError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {e:?}"),
            Error::SelfTest { adc } => {
                write!(f, "self test failed, ADC read 0x{adc:06X} before any conversion")
            }
            Error::Crc { stored, computed } => {
                write!(f, "PROM CRC mismatch (stored 0x{stored:X}, computed 0x{computed:X})")
            }
            Error::NotInitialized => f.write_str("sensor not initialized"),
            Error::EmptyConversion => f.write_str("ADC conversion empty or not finished"),
            Error::TemperatureOutOfRange(t) => write!(f, "temperature {t} out of range"),
            Error::PressureOutOfRange(p) => write!(f, "pressure {p} out of range"),
            Error::NotReady => f.write_str("no compensated temperature available"),
        }
    }
}

impl<BusError: fmt::Debug> core::error::Error for Error<BusError> {}
