//! Transport used by the driver.
//!
//! Every method is one chip-select framed exchange. [`Spi`] maps them onto an
//! [`embedded_hal::spi::SpiDevice`], which asserts and releases chip select around each
//! transaction.

use embedded_hal::spi::SpiDevice;

pub trait Bus {
    type Error;

    /// Send a single command byte.
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send `command` and clock in a 16-bit big-endian response.
    fn read_u16(&mut self, command: u8) -> Result<u16, Self::Error>;

    /// Send `command` and clock in a 24-bit big-endian response.
    fn read_u24(&mut self, command: u8) -> Result<u32, Self::Error>;
}

pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType>
where
    SpiType: SpiDevice,
{
    pub fn new(spi: SpiType) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SpiType {
        self.spi
    }
}

impl<SpiType> Bus for Spi<SpiType>
where
    SpiType: SpiDevice,
{
    type Error = SpiType::Error;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.spi.write(&[command])
    }

    fn read_u16(&mut self, command: u8) -> Result<u16, Self::Error> {
        let mut buf = [command, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;

        Ok(u16::from_be_bytes([buf[1], buf[2]]))
    }

    fn read_u24(&mut self, command: u8) -> Result<u32, Self::Error> {
        // First byte is clocked in while the command goes out and carries nothing.
        let mut buf = [command, 0, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;

        Ok(u32::from_be_bytes([0, buf[1], buf[2], buf[3]]))
    }
}
