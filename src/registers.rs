//! Command table of the MS5607.
//!
//! The device has no addressable registers; every exchange starts with a single command byte
//! (datasheet "Commands" table). Conversion commands carry the oversampling ratio in their low
//! nibble.

use embedded_hal::spi::{Mode, MODE_0};

// commands
pub const RESET_CMD: u8 = 0x1E;
pub const ADC_READ_CMD: u8 = 0x00;
pub const CONVERT_PRESSURE_CMD: u8 = 0x40; // D1, OSR 256
pub const CONVERT_TEMP_CMD: u8 = 0x50; // D2, OSR 256

// PROM slots, 16 bits each
pub const PROM_READ_CMD: u8 = 0xA0;
pub const PROM_WORDS: usize = 8;
pub const PROM_RESERVED_SLOT: usize = 0;
pub const PROM_CRC_SLOT: usize = 7;

/// Wait after a reset before the PROM can be read. The datasheet minimum is 2.8 ms.
pub const RESET_WAIT_US: u32 = 3_000;

/// SPI clock polarity/phase expected by the device. Mode 3 also works, mode 0 is what the
/// datasheet timing diagrams show.
pub const SPI_MODE: Mode = MODE_0;

/// Highest serial clock the MS5607 is rated for.
pub const MAX_SPI_FREQUENCY_HZ: u32 = 20_000_000;

/// PROM read command for slot `index` (0..=7).
pub const fn prom_read_cmd(index: usize) -> u8 {
    PROM_READ_CMD + (index as u8) * 2
}

/// Oversampling ratio of one ADC conversion.
///
/// Higher ratios lower the noise floor and take longer to convert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Oversampling {
    #[default]
    Osr256,
    Osr512,
    Osr1024,
    Osr2048,
    Osr4096,
}

impl Oversampling {
    pub const ALL: [Oversampling; 5] = [
        Oversampling::Osr256,
        Oversampling::Osr512,
        Oversampling::Osr1024,
        Oversampling::Osr2048,
        Oversampling::Osr4096,
    ];

    /// Offset added to the conversion base commands.
    const fn command_offset(self) -> u8 {
        match self {
            Oversampling::Osr256 => 0x00,
            Oversampling::Osr512 => 0x02,
            Oversampling::Osr1024 => 0x04,
            Oversampling::Osr2048 => 0x06,
            Oversampling::Osr4096 => 0x08,
        }
    }

    /// Command that starts a D1 (pressure) conversion.
    pub const fn pressure_command(self) -> u8 {
        CONVERT_PRESSURE_CMD | self.command_offset()
    }

    /// Command that starts a D2 (temperature) conversion.
    pub const fn temperature_command(self) -> u8 {
        CONVERT_TEMP_CMD | self.command_offset()
    }

    /// Maximum conversion time in microseconds, from the datasheet's max column.
    pub const fn conversion_time_us(self) -> u32 {
        match self {
            Oversampling::Osr256 => 600,
            Oversampling::Osr512 => 1_170,
            Oversampling::Osr1024 => 2_280,
            Oversampling::Osr2048 => 4_540,
            Oversampling::Osr4096 => 9_040,
        }
    }

    /// The ratio itself, e.g. 4096.
    pub const fn ratio(self) -> u16 {
        256 << (self.command_offset() / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_commands_follow_datasheet_table() {
        let pressure: [u8; 5] = Oversampling::ALL.map(Oversampling::pressure_command);
        let temperature: [u8; 5] = Oversampling::ALL.map(Oversampling::temperature_command);

        assert_eq!(pressure, [0x40, 0x42, 0x44, 0x46, 0x48]);
        assert_eq!(temperature, [0x50, 0x52, 0x54, 0x56, 0x58]);
    }

    #[test]
    fn conversion_time_grows_with_ratio() {
        for pair in Oversampling::ALL.windows(2) {
            assert!(pair[0].conversion_time_us() < pair[1].conversion_time_us());
        }
        assert_eq!(Oversampling::Osr4096.conversion_time_us(), 9_040);
    }

    #[test]
    fn ratios() {
        assert_eq!(Oversampling::ALL.map(Oversampling::ratio), [256, 512, 1024, 2048, 4096]);
    }

    #[test]
    fn prom_commands_step_by_two() {
        assert_eq!(prom_read_cmd(0), 0xA0);
        assert_eq!(prom_read_cmd(1), 0xA2);
        assert_eq!(prom_read_cmd(6), 0xAC);
        assert_eq!(prom_read_cmd(PROM_CRC_SLOT), 0xAE);
    }
}
