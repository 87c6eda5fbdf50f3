use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;

/// Factory trimming parameters, one set per chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalibParams {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,

    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,

    pub dig_h1: u8,
    pub dig_h2: i16,
    pub dig_h3: i8,
    pub dig_h4: i16,
    pub dig_h5: i16,
    pub dig_h6: i8,
}

const BLOCK_LEN: usize = 8;

/// Uncompensated ADC output of one forced measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub pressure: u32,
    pub temperature: u32,
    pub humidity: u32,
    block: [u8; BLOCK_LEN],
}

impl RawSample {
    /// Size of the 0xF7..0xFE burst.
    pub const LEN: usize = BLOCK_LEN;

    /// Unpacks press_msb..hum_lsb. Pressure and temperature are 20 bits,
    /// left aligned in three bytes; humidity is a plain 16-bit word.
    pub fn from_block<E>(block: &[u8]) -> Result<Self, Error<E>> {
        if block.len() < Self::LEN {
            return Err(Error::MalformedBlock {
                expected: Self::LEN,
                actual: block.len(),
            });
        }
        let mut data = [0u8; BLOCK_LEN];
        data.copy_from_slice(&block[..Self::LEN]);

        let b: [u32; BLOCK_LEN] = data.map(u32::from);
        Ok(RawSample {
            pressure: (b[0] << 16 | b[1] << 8 | b[2]) >> 4,
            temperature: (b[3] << 16 | b[4] << 8 | b[5]) >> 4,
            humidity: b[6] << 8 | b[7],
            block: data,
        })
    }

    pub fn block(&self) -> &[u8; BLOCK_LEN] {
        &self.block
    }
}

impl fmt::Display for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawSample(temp=0x{:08X}, pressure=0x{:08X}, humidity=0x{:08X}, block=",
            self.temperature, self.pressure, self.humidity
        )?;
        for (n, byte) in self.block.iter().enumerate() {
            if n > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        f.write_str(")")
    }
}

/// A measurement in physical units.
///
/// Temperature is in °C, pressure in hPa, humidity in %rH within [0, 100].
/// Pressure is exactly 0 when the calibration makes the compensation
/// denominator vanish.
#[derive(Debug, Clone, PartialEq)]
pub struct CompensatedReading<'c> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub uncompensated: RawSample,
    pub calibration: &'c CalibParams,
}

impl fmt::Display for CompensatedReading<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompensatedReading(id={}, timestamp={}, temp={:.3} °C, pressure={:.2} hPa, humidity={:.2} % rH)",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f%Z"),
            self.temperature,
            self.pressure,
            self.humidity
        )
    }
}
