//! Driver for the MS5607 barometric pressure and temperature sensor over SPI.
//!
//! The sensor is used in a fixed sequence: [`initialize`](Ms5607::initialize) once, then for
//! every reading convert and compensate the temperature first, and the pressure second. Pressure
//! compensation depends on the offset and sensitivity derived from the last temperature.
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use ms5607::{Error, Ms5607, Oversampling};
//!
//! fn read<S: SpiDevice, D: DelayNs>(spi: S, delay: D) -> Result<(), Error<S::Error>> {
//!     let mut baro = Ms5607::new(spi, delay, Oversampling::Osr512);
//!     baro.initialize()?;
//!
//!     let raw = baro.read_raw_temperature()?;
//!     let temperature = baro.compensate_temperature(raw)?;
//!     let raw = baro.read_raw_pressure()?;
//!     let pressure = baro.compensate_pressure(raw)?;
//!
//!     let altitude = ms5607::estimate_altitude(temperature, pressure);
//!     let _ = (temperature.celsius(), pressure.millibar(), altitude);
//!     Ok(())
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod altitude;
pub mod bus;
mod calibration;
mod config;
mod error;
mod measurement;
mod ms5607;
pub mod registers;

#[cfg(test)]
mod testing;

pub use calibration::{
    crc4, Calibration, Compensation, PressureFactors, ScaledCoefficients, TemperatureCompensation,
};
pub use config::Config;
pub use error::{Error, Ms5607Result};
pub use measurement::{Measurement, Pressure, Temperature};
pub use ms5607::Ms5607;
pub use registers::Oversampling;

/// Altitude in meters for a compensated reading, using the hypsometric formula against the
/// standard sea level pressure. A pressure that is not positive gives NaN.
pub fn estimate_altitude(temperature: Temperature, pressure: Pressure) -> f32 {
    altitude::hypsometric(temperature.celsius(), pressure.millibar())
}
