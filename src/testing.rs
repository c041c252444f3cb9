use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use heapless::Vec;

use crate::registers::{
    ADC_READ_CMD, CONVERT_PRESSURE_CMD, CONVERT_TEMP_CMD, PROM_READ_CMD, PROM_WORDS, RESET_CMD,
};

// Example values from the MS5607 datasheet: 20.00 °C and 1100.02 mbar.
pub const DATASHEET: [u16; 6] = [46372, 43981, 29059, 27842, 31553, 28165];
pub const DATASHEET_D1: u32 = 6_465_444;
pub const DATASHEET_D2: u32 = 8_077_636;
pub const DATASHEET_CRC: u16 = 0x0008;

pub const fn datasheet_prom() -> [u16; PROM_WORDS] {
    let c = DATASHEET;
    [0, c[0], c[1], c[2], c[3], c[4], c[5], DATASHEET_CRC]
}

/// Behaves like an MS5607 on the other end of the SPI bus.
///
/// Conversions complete instantly; the value of a started conversion is latched until the next
/// ADC read, which clears it like the real device does.
pub struct FakeMs5607 {
    pub prom: [u16; PROM_WORDS],
    pub d1: u32,
    pub d2: u32,
    /// MISO stuck high: every clocked-in byte reads 0xFF.
    pub miso_stuck_high: bool,
    pub fail_bus: bool,
    pub commands: Vec<u8, 128>,
    pending: Option<u32>,
}

impl FakeMs5607 {
    pub fn new() -> Self {
        Self {
            prom: datasheet_prom(),
            d1: DATASHEET_D1,
            d2: DATASHEET_D2,
            miso_stuck_high: false,
            fail_bus: false,
            commands: Vec::new(),
            pending: None,
        }
    }

    /// Commands sent after the last reset (the reset included).
    pub fn commands_since_reset(&self) -> &[u8] {
        let start = self.commands.iter().rposition(|c| *c == RESET_CMD).unwrap_or(0);
        &self.commands[start..]
    }

    fn command(&mut self, command: u8, response: &mut [u8]) {
        let _ = self.commands.push(command);
        response.fill(0);

        match command {
            RESET_CMD => self.pending = None,
            ADC_READ_CMD => {
                let adc = self.pending.take().unwrap_or(0).to_be_bytes();
                let n = response.len().min(3);
                response[..n].copy_from_slice(&adc[1..1 + n]);
            }
            c if c & 0xF0 == CONVERT_PRESSURE_CMD => self.pending = Some(self.d1),
            c if c & 0xF0 == CONVERT_TEMP_CMD => self.pending = Some(self.d2),
            c if c & 0xF0 == PROM_READ_CMD => {
                let slot = ((c - PROM_READ_CMD) / 2) as usize;
                let word = self.prom[slot].to_be_bytes();
                let n = response.len().min(2);
                response[..n].copy_from_slice(&word[..n]);
            }
            other => panic!("unexpected command 0x{other:02X}"),
        }

        if self.miso_stuck_high {
            response.fill(0xFF);
        }
    }
}

impl ErrorType for FakeMs5607 {
    type Error = ErrorKind;
}

impl SpiDevice for FakeMs5607 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail_bus {
            return Err(ErrorKind::Other);
        }

        // One transaction is one command; the first byte on MOSI selects it.
        let mut command = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if command.is_none() {
                        command = bytes.first().copied();
                        if let Some(c) = command {
                            self.command(c, &mut []);
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    let c = buf[0];
                    let mut response = [0u8; 3];
                    let n = buf.len() - 1;
                    self.command(c, &mut response[..n]);
                    buf[0] = if self.miso_stuck_high { 0xFF } else { 0 };
                    buf[1..].copy_from_slice(&response[..n]);
                }
                _ => panic!("unsupported SPI operation"),
            }
        }

        Ok(())
    }
}

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_us: Vec<u32, 64>,
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        let _ = self.waits_us.push(us);
        self.total_ns += us as u64 * 1_000;
    }
}
