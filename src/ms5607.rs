use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::bus::{Bus, Spi};
use crate::calibration::{Calibration, Compensation, PressureFactors, TemperatureCompensation};
use crate::config::Config;
use crate::error::{Error, Ms5607Result};
use crate::measurement::{Measurement, Pressure, Temperature};
use crate::registers::{
    prom_read_cmd, Oversampling, ADC_READ_CMD, PROM_CRC_SLOT, PROM_RESERVED_SLOT, PROM_WORDS,
    RESET_CMD, RESET_WAIT_US,
};

/// What the driver knows about the sensor.
#[derive(Debug, Clone, Copy)]
enum State {
    Uninitialized,
    Calibrated(Calibration),
    /// A temperature was compensated successfully, pressure can be compensated.
    TemperatureKnown(Calibration, TemperatureCompensation),
}

/// MS5607 on a SPI bus.
///
/// All operations block for the bus exchange and any conversion wait. The driver never
/// retries; an error leaves it ready for the caller to start the sequence again.
pub struct Ms5607<B, D> {
    bus: B,
    delay: D,
    config: Config,
    state: State,
}

impl<SpiType, D> Ms5607<Spi<SpiType>, D>
where
    SpiType: SpiDevice,
    D: DelayNs,
{
    /// The SPI device must run in [`SPI_MODE`](crate::registers::SPI_MODE), MSB first, at no more
    /// than [`MAX_SPI_FREQUENCY_HZ`](crate::registers::MAX_SPI_FREQUENCY_HZ). Its chip select is
    /// the sensor's CSB line.
    pub fn new(spi: SpiType, delay: D, oversampling: Oversampling) -> Self {
        Self::with_config(spi, delay, Config::default().oversampling(oversampling))
    }

    pub fn with_config(spi: SpiType, delay: D, config: Config) -> Self {
        Self::from_bus(Spi::new(spi), delay, config)
    }

    /// Give back the SPI device and the delay.
    pub fn release(self) -> (SpiType, D) {
        (self.bus.release(), self.delay)
    }
}

impl<B, D> Ms5607<B, D>
where
    B: Bus,
    D: DelayNs,
{
    pub fn from_bus(bus: B, delay: D, config: Config) -> Self {
        Self { bus, delay, config, state: State::Uninitialized }
    }

    /// Reset the sensor and load its calibration.
    ///
    /// Any previously loaded calibration and temperature are discarded first, so a failed
    /// initialization leaves the driver uninitialized.
    pub fn initialize(&mut self) -> Ms5607Result<(), B::Error> {
        self.state = State::Uninitialized;

        self.bus.send_command(RESET_CMD).map_err(Error::Bus)?;
        // The sensor copies PROM into its registers during this window.
        self.delay.delay_us(RESET_WAIT_US);

        // Nothing has been converted since the reset, so the ADC must read zero.
        let adc = self.bus.read_u24(ADC_READ_CMD).map_err(Error::Bus)?;
        if adc != 0 {
            #[cfg(feature = "defmt")]
            defmt::error!("MS5607 self test failed, ADC read {:#X} after reset", adc);
            return Err(Error::SelfTest { adc });
        }

        let calibration = self.read_prom()?;

        if self.config.validate_crc && !calibration.crc_is_valid() {
            let stored = calibration.stored_crc();
            let computed = calibration.computed_crc();
            #[cfg(feature = "defmt")]
            defmt::error!(
                "MS5607 PROM CRC mismatch: stored {:#X}, computed {:#X}",
                stored,
                computed
            );
            return Err(Error::Crc { stored, computed });
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("MS5607 calibration C1..C6: {}", calibration.coefficients());

        self.state = State::Calibrated(calibration);
        Ok(())
    }

    fn read_prom(&mut self) -> Ms5607Result<Calibration, B::Error> {
        let mut prom = [0u16; PROM_WORDS];

        // The reserved and CRC words are only needed for the CRC check.
        let slots = if self.config.validate_crc {
            PROM_RESERVED_SLOT..=PROM_CRC_SLOT
        } else {
            PROM_RESERVED_SLOT + 1..=PROM_CRC_SLOT - 1
        };

        for slot in slots {
            prom[slot] = self.bus.read_u16(prom_read_cmd(slot)).map_err(Error::Bus)?;

            if self.config.prom_read_pacing_us > 0 {
                self.delay.delay_us(self.config.prom_read_pacing_us);
            }
        }

        Ok(Calibration::from_prom(prom))
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self.state, State::Uninitialized)
    }

    /// Coefficients loaded by the last successful `initialize`.
    pub fn calibration(&self) -> Option<&Calibration> {
        match &self.state {
            State::Uninitialized => None,
            State::Calibrated(calibration) | State::TemperatureKnown(calibration, _) => {
                Some(calibration)
            }
        }
    }

    pub fn oversampling(&self) -> Oversampling {
        self.config.oversampling
    }

    /// Takes effect with the next conversion.
    pub fn set_oversampling(&mut self, oversampling: Oversampling) {
        self.config.oversampling = oversampling;
    }

    pub fn compensation(&self) -> Compensation {
        self.config.compensation
    }

    /// Takes effect with the next temperature compensation.
    pub fn set_compensation(&mut self, compensation: Compensation) {
        self.config.compensation = compensation;
    }

    /// Start a D2 conversion, wait for it and read the raw 24-bit result.
    pub fn read_raw_temperature(&mut self) -> Ms5607Result<u32, B::Error> {
        let command = self.config.oversampling.temperature_command();
        self.convert(command)
    }

    /// Start a D1 conversion, wait for it and read the raw 24-bit result.
    pub fn read_raw_pressure(&mut self) -> Ms5607Result<u32, B::Error> {
        let command = self.config.oversampling.pressure_command();
        self.convert(command)
    }

    fn convert(&mut self, command: u8) -> Ms5607Result<u32, B::Error> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }

        let wait_us = self.config.oversampling.conversion_time_us();

        self.bus.send_command(command).map_err(Error::Bus)?;
        self.delay.delay_us(wait_us);
        let raw = self.bus.read_u24(ADC_READ_CMD).map_err(Error::Bus)?;

        // A finished conversion is never all zeros.
        if raw == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("MS5607 conversion {:#X} returned an empty ADC value", command);
            return Err(Error::EmptyConversion);
        }

        Ok(raw)
    }

    /// Convert a raw D2 value into a temperature.
    ///
    /// On success the offset and sensitivity used by
    /// [`compensate_pressure`](Self::compensate_pressure) are updated. A reading outside of the
    /// rated range is rejected and also drops the previous offset and sensitivity, so a stale
    /// temperature cannot leak into the next pressure.
    pub fn compensate_temperature(
        &mut self,
        raw_temperature: u32,
    ) -> Ms5607Result<Temperature, B::Error> {
        let calibration = match self.state {
            State::Uninitialized => return Err(Error::NotInitialized),
            State::Calibrated(calibration) | State::TemperatureKnown(calibration, _) => calibration,
        };

        let result = calibration.compensate_temperature(raw_temperature, self.config.compensation);
        let temperature = Temperature::from_centidegrees(result.temperature);

        if !temperature.is_in_range() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "MS5607 temperature {} out of range (raw {})",
                result.temperature,
                raw_temperature
            );
            self.state = State::Calibrated(calibration);
            return Err(Error::TemperatureOutOfRange(result.temperature));
        }

        self.state = State::TemperatureKnown(calibration, result);
        Ok(temperature)
    }

    /// Convert a raw D1 value into a pressure, using the last compensated temperature.
    pub fn compensate_pressure(&self, raw_pressure: u32) -> Ms5607Result<Pressure, B::Error> {
        let factors = self.pressure_factors().ok_or(match self.state {
            State::Uninitialized => Error::NotInitialized,
            _ => Error::NotReady,
        })?;

        let value = factors.compensate(raw_pressure);
        let pressure = Pressure::from_centimillibar(value);

        if !pressure.is_in_range() {
            #[cfg(feature = "defmt")]
            defmt::warn!("MS5607 pressure {} out of range (raw {})", value, raw_pressure);
            return Err(Error::PressureOutOfRange(value));
        }

        Ok(pressure)
    }

    /// One full cycle: temperature conversion and compensation, then pressure.
    pub fn measure(&mut self) -> Ms5607Result<Measurement, B::Error> {
        let raw_temperature = self.read_raw_temperature()?;
        let temperature = self.compensate_temperature(raw_temperature)?;

        let raw_pressure = self.read_raw_pressure()?;
        let pressure = self.compensate_pressure(raw_pressure)?;

        Ok(Measurement { temperature, pressure })
    }

    /// Temperature of the last successful compensation.
    pub fn last_temperature(&self) -> Option<Temperature> {
        match &self.state {
            State::TemperatureKnown(_, t) => Some(Temperature::from_centidegrees(t.temperature)),
            _ => None,
        }
    }

    /// dT of the last successful temperature compensation.
    pub fn temperature_deviation(&self) -> Option<i64> {
        match &self.state {
            State::TemperatureKnown(_, t) => Some(t.deviation),
            _ => None,
        }
    }

    pub fn pressure_factors(&self) -> Option<PressureFactors> {
        match &self.state {
            State::TemperatureKnown(_, t) => Some(t.factors),
            _ => None,
        }
    }
}
