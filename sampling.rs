use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use embedded_hal::delay::DelayNs;
use log::{debug, trace};
use uuid::Uuid;

use crate::bus::Bus;
use crate::compensation::compensate;
use crate::error::{Error, InvalidOversampling};
use crate::structs::{CalibParams, CompensatedReading, RawSample};

// BME280 control and data registers.
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_ADC_VALUE: u8 = 0xF7;

const MODE_FORCED: u8 = 0b01;

/// Oversampling rate of one measurement channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Oversampling {
    #[default]
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

impl Oversampling {
    /// The 3-bit `osrs_x` register field.
    pub fn register_value(self) -> u8 {
        self as u8
    }

    /// Exponent used for the settling delay; the same 1..5 as the register.
    pub fn exponent(self) -> u32 {
        u32::from(self.register_value())
    }

    /// Number of samples averaged: 1, 2, 4, 8 or 16.
    pub fn factor(self) -> u8 {
        1 << (self.register_value() - 1)
    }

    pub fn from_factor(factor: u8) -> Result<Self, InvalidOversampling> {
        match factor {
            1 => Ok(Oversampling::X1),
            2 => Ok(Oversampling::X2),
            4 => Ok(Oversampling::X4),
            8 => Ok(Oversampling::X8),
            16 => Ok(Oversampling::X16),
            _ => Err(InvalidOversampling(factor)),
        }
    }
}

impl TryFrom<u8> for Oversampling {
    type Error = InvalidOversampling;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Oversampling::X1),
            2 => Ok(Oversampling::X2),
            3 => Ok(Oversampling::X4),
            4 => Ok(Oversampling::X8),
            5 => Ok(Oversampling::X16),
            _ => Err(InvalidOversampling(value)),
        }
    }
}

/// Oversampling for each of the three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OversamplingSettings {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub humidity: Oversampling,
}

impl OversamplingSettings {
    pub fn uniform(mode: Oversampling) -> Self {
        OversamplingSettings {
            temperature: mode,
            pressure: mode,
            humidity: mode,
        }
    }

    /// `ctrl_meas` value: osrs_t[7:5] | osrs_p[4:2] | forced mode.
    pub fn ctrl_meas(&self) -> u8 {
        self.temperature.register_value() << 5 | self.pressure.register_value() << 2 | MODE_FORCED
    }

    pub fn ctrl_hum(&self) -> u8 {
        self.humidity.register_value()
    }
}

/// Time to wait between triggering a forced measurement and reading it.
///
/// Each channel contributes 0.575 ms + 2.3 ms * 2^osr. This is above the
/// datasheet's maximum conversion time for every setting.
pub fn measurement_delay(settings: &OversamplingSettings) -> Duration {
    let channel = |mode: Oversampling| 575 + 2300 * (1u64 << mode.exponent());
    Duration::from_micros(
        channel(settings.temperature) + channel(settings.humidity) + channel(settings.pressure),
    )
}

/// Source of reading timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of reading identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> Uuid;
}

/// Random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Takes forced-mode measurements.
///
/// The clock and identifier source are swappable so readings can be
/// reproduced in tests.
#[derive(Debug, Clone, Default)]
pub struct Sampler<C = SystemClock, G = RandomIds> {
    clock: C,
    ids: G,
    oversampling: OversamplingSettings,
}

impl Sampler {
    pub fn new(oversampling: OversamplingSettings) -> Self {
        Sampler::with_sources(SystemClock, RandomIds, oversampling)
    }
}

impl<C: Clock, G: IdGenerator> Sampler<C, G> {
    pub fn with_sources(clock: C, ids: G, oversampling: OversamplingSettings) -> Self {
        Sampler {
            clock,
            ids,
            oversampling,
        }
    }

    pub fn oversampling(&self) -> &OversamplingSettings {
        &self.oversampling
    }

    /// Triggers one forced measurement on `address`, waits for it, and
    /// returns the compensated result.
    ///
    /// The bus is held for the whole sequence: two writes, the settling
    /// delay, one burst read. Forced mode is device state, so callers sharing
    /// a sensor between threads must serialize calls themselves (for example
    /// a mutex around the bus). Once the writes are issued the wait is not
    /// cut short; reading early returns the previous conversion.
    ///
    /// Any transport error aborts the sequence and no reading is produced.
    pub fn sample<'c, B, D>(
        &mut self,
        bus: &mut B,
        delay: &mut D,
        address: u8,
        calib: &'c CalibParams,
    ) -> Result<CompensatedReading<'c>, Error<B::Error>>
    where
        B: Bus + ?Sized,
        D: DelayNs + ?Sized,
    {
        let ctrl_hum = self.oversampling.ctrl_hum();
        let ctrl_meas = self.oversampling.ctrl_meas();
        debug!(
            "0x{:02X}: ctrl_hum=0x{:02X} ctrl_meas=0x{:02X}",
            address, ctrl_hum, ctrl_meas
        );
        bus.write_byte(address, REG_CTRL_HUM, ctrl_hum)
            .map_err(Error::Transport)?;
        bus.write_byte(address, REG_CTRL_MEAS, ctrl_meas)
            .map_err(Error::Transport)?;

        let wait = measurement_delay(&self.oversampling);
        debug!("0x{:02X}: waiting {:?} for conversion", address, wait);
        delay.delay_us(u32::try_from(wait.as_micros()).unwrap_or(u32::MAX));

        let block = bus
            .read_block(address, REG_ADC_VALUE, RawSample::LEN as u8)
            .map_err(Error::Transport)?;
        let raw = RawSample::from_block(&block)?;
        trace!("0x{:02X}: {}", address, raw);

        let values = compensate(&raw, calib);
        Ok(CompensatedReading {
            id: self.ids.next_id(),
            timestamp: self.clock.now(),
            temperature: values.temperature,
            pressure: values.pressure,
            humidity: values.humidity,
            uncompensated: raw,
            calibration: calib,
        })
    }
}

/// One forced measurement with the same oversampling on every channel,
/// stamped with wall-clock time and a random id.
pub fn sample<'c, B, D>(
    bus: &mut B,
    delay: &mut D,
    address: u8,
    calib: &'c CalibParams,
    mode: Oversampling,
) -> Result<CompensatedReading<'c>, Error<B::Error>>
where
    B: Bus + ?Sized,
    D: DelayNs + ?Sized,
{
    Sampler::new(OversamplingSettings::uniform(mode)).sample(bus, delay, address, calib)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_values() {
        let all = [
            Oversampling::X1,
            Oversampling::X2,
            Oversampling::X4,
            Oversampling::X8,
            Oversampling::X16,
        ];
        for (n, mode) in all.iter().enumerate() {
            assert_eq!(mode.register_value(), n as u8 + 1);
            assert_eq!(Oversampling::try_from(n as u8 + 1), Ok(*mode));
            assert_eq!(Oversampling::from_factor(mode.factor()), Ok(*mode));
        }
        assert_eq!(Oversampling::X16.factor(), 16);
        assert_eq!(Oversampling::try_from(0), Err(InvalidOversampling(0)));
        assert_eq!(Oversampling::try_from(6), Err(InvalidOversampling(6)));
        assert_eq!(Oversampling::from_factor(3), Err(InvalidOversampling(3)));
    }

    #[test]
    fn control_bytes() {
        let settings = OversamplingSettings::uniform(Oversampling::X1);
        assert_eq!(settings.ctrl_hum(), 0x01);
        assert_eq!(settings.ctrl_meas(), 0b001_001_01);

        let settings = OversamplingSettings {
            temperature: Oversampling::X2,
            pressure: Oversampling::X16,
            humidity: Oversampling::X8,
        };
        assert_eq!(settings.ctrl_hum(), 0x04);
        assert_eq!(settings.ctrl_meas(), 0b010_101_01);
    }

    #[test]
    fn delay_x1() {
        let settings = OversamplingSettings::uniform(Oversampling::X1);
        assert_eq!(measurement_delay(&settings), Duration::from_micros(15_525));
    }

    #[test]
    fn delay_x16() {
        let settings = OversamplingSettings::uniform(Oversampling::X16);
        assert_eq!(measurement_delay(&settings), Duration::from_micros(222_525));
    }

    #[test]
    fn delay_is_per_channel() {
        let settings = OversamplingSettings {
            temperature: Oversampling::X1,
            pressure: Oversampling::X4,
            humidity: Oversampling::X2,
        };
        // 5175 + 18975 + 9775
        assert_eq!(measurement_delay(&settings), Duration::from_micros(33_925));
    }

    #[test]
    fn delay_covers_datasheet_maximum() {
        // Datasheet 9.1: t_measure,max = 1.25 + 2.3*T + (2.3*P + 0.575) + (2.3*H + 0.575) ms
        let modes = [
            Oversampling::X1,
            Oversampling::X2,
            Oversampling::X4,
            Oversampling::X8,
            Oversampling::X16,
        ];
        for &t in &modes {
            for &p in &modes {
                for &h in &modes {
                    let settings = OversamplingSettings {
                        temperature: t,
                        pressure: p,
                        humidity: h,
                    };
                    let max_us = 1250
                        + 2300 * u64::from(t.factor())
                        + 2300 * u64::from(p.factor())
                        + 575
                        + 2300 * u64::from(h.factor())
                        + 575;
                    assert!(measurement_delay(&settings) >= Duration::from_micros(max_us));
                }
            }
        }
    }
}
