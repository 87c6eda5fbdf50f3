use std::collections::HashMap;

use log::{debug, info};

use crate::bus::Bus;
use crate::error::Error;
use crate::reader::RegisterReader;
use crate::structs::CalibParams;

// BME280 trimming parameter registers.
const REG_DIG_T1: u8 = 0x88;
const REG_DIG_T2: u8 = 0x8A;
const REG_DIG_T3: u8 = 0x8C;
const REG_DIG_P1: u8 = 0x8E;
const REG_DIG_P2: u8 = 0x90;
const REG_DIG_P3: u8 = 0x92;
const REG_DIG_P4: u8 = 0x94;
const REG_DIG_P5: u8 = 0x96;
const REG_DIG_P6: u8 = 0x98;
const REG_DIG_P7: u8 = 0x9A;
const REG_DIG_P8: u8 = 0x9C;
const REG_DIG_P9: u8 = 0x9E;
const REG_DIG_H1: u8 = 0xA1;
const REG_DIG_H2: u8 = 0xE1;
const REG_DIG_H3: u8 = 0xE3;
const REG_CALIB_E4: u8 = 0xE4;
const REG_CALIB_E5: u8 = 0xE5;
const REG_CALIB_E6: u8 = 0xE6;
const REG_DIG_H6: u8 = 0xE7;

/// Reads the 18 trimming parameters from the device.
///
/// Any failed register read aborts the load.
pub fn load_calibration<B>(bus: &mut B, address: u8) -> Result<CalibParams, Error<B::Error>>
where
    B: Bus + ?Sized,
{
    let mut read = RegisterReader::new(bus, address);
    read_params(&mut read).map_err(Error::Transport)
}

fn read_params<B: Bus + ?Sized>(read: &mut RegisterReader<'_, B>) -> Result<CalibParams, B::Error> {
    let dig_t1 = read.unsigned_word(REG_DIG_T1)?;
    let dig_t2 = read.signed_word(REG_DIG_T2)?;
    let dig_t3 = read.signed_word(REG_DIG_T3)?;

    let dig_p1 = read.unsigned_word(REG_DIG_P1)?;
    let dig_p2 = read.signed_word(REG_DIG_P2)?;
    let dig_p3 = read.signed_word(REG_DIG_P3)?;
    let dig_p4 = read.signed_word(REG_DIG_P4)?;
    let dig_p5 = read.signed_word(REG_DIG_P5)?;
    let dig_p6 = read.signed_word(REG_DIG_P6)?;
    let dig_p7 = read.signed_word(REG_DIG_P7)?;
    let dig_p8 = read.signed_word(REG_DIG_P8)?;
    let dig_p9 = read.signed_word(REG_DIG_P9)?;

    let dig_h1 = read.unsigned_byte(REG_DIG_H1)?;
    let dig_h2 = read.signed_word(REG_DIG_H2)?;
    let dig_h3 = read.signed_byte(REG_DIG_H3)?;

    // dig_H4 and dig_H5 are 12-bit signed values sharing 0xE5.
    let e4 = read.signed_byte(REG_CALIB_E4)?;
    let e5 = read.unsigned_byte(REG_CALIB_E5)?;
    let e6 = read.signed_byte(REG_CALIB_E6)?;
    let dig_h4 = (i16::from(e4) << 4) | i16::from(e5 & 0x0F);
    let dig_h5 = i16::from((e5 >> 4) & 0x0F) | (i16::from(e6) << 4);

    let dig_h6 = read.signed_byte(REG_DIG_H6)?;

    info!("loaded calibration from device 0x{:02X}", read.address());

    Ok(CalibParams {
        dig_t1,
        dig_t2,
        dig_t3,
        dig_p1,
        dig_p2,
        dig_p3,
        dig_p4,
        dig_p5,
        dig_p6,
        dig_p7,
        dig_p8,
        dig_p9,
        dig_h1,
        dig_h2,
        dig_h3,
        dig_h4,
        dig_h5,
        dig_h6,
    })
}

/// Identifies one physical sensor: the bus it hangs off and its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    pub bus: u8,
    pub address: u8,
}

impl DeviceKey {
    pub fn new(bus: u8, address: u8) -> Self {
        DeviceKey { bus, address }
    }
}

/// Calibration records already read, keyed by device.
///
/// The trimming registers never change, so a caller sampling the same device
/// repeatedly can keep one of these and skip the reload.
#[derive(Debug, Default, Clone)]
pub struct CalibrationCache {
    entries: HashMap<DeviceKey, CalibParams>,
}

impl CalibrationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached parameters for `key`, reading them from `bus` the
    /// first time. A failed load leaves the cache unchanged.
    pub fn get_or_load<B>(
        &mut self,
        key: DeviceKey,
        bus: &mut B,
    ) -> Result<&CalibParams, Error<B::Error>>
    where
        B: Bus + ?Sized,
    {
        if self.entries.contains_key(&key) {
            debug!("calibration cache hit for {:?}", key);
        } else {
            debug!("calibration cache miss for {:?}", key);
            let params = load_calibration(bus, key.address)?;
            self.entries.insert(key, params);
        }
        // Present either way by now.
        Ok(&self.entries[&key])
    }

    pub fn get(&self, key: DeviceKey) -> Option<&CalibParams> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: DeviceKey, params: CalibParams) -> Option<CalibParams> {
        self.entries.insert(key, params)
    }

    /// Forgets `key`, forcing the next `get_or_load` back to the device.
    pub fn invalidate(&mut self, key: DeviceKey) -> Option<CalibParams> {
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
