//! Driver for the Bosch BME280 temperature/humidity/pressure sensor over I2C.
//!
//! Reads the factory trimming parameters, triggers a forced measurement,
//! waits for the conversion and compensates the raw ADC output into °C, hPa
//! and %rH with the datasheet's double precision formulas.
//!
//! ```no_run
//! # #[cfg(feature = "rpi")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rppal::i2c::I2c;
//! use rpbme280::{load_calibration, sample, Oversampling, StdDelay, DEFAULT_ADDRESS};
//!
//! let mut i2c = I2c::new()?;
//! let calib = load_calibration(&mut i2c, DEFAULT_ADDRESS)?;
//! let reading = sample(&mut i2c, &mut StdDelay, DEFAULT_ADDRESS, &calib, Oversampling::X1)?;
//! println!("{}", reading);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "rpi"))]
//! # fn main() {}
//! ```

mod bus;
mod calibration;
mod compensation;
mod error;
mod reader;
mod sampling;
mod settings;
mod structs;

pub use bus::Bus;
pub use calibration::{load_calibration, CalibrationCache, DeviceKey};
pub use compensation::{compensate, Compensated};
pub use error::{Error, InvalidOversampling, SettingsError};
pub use reader::RegisterReader;
pub use sampling::{
    measurement_delay, sample, Clock, IdGenerator, Oversampling, OversamplingSettings,
    RandomIds, Sampler, StdDelay, SystemClock,
};
pub use settings::Settings;
pub use structs::{CalibParams, CompensatedReading, RawSample};

/// Individual compensation steps, for callers holding raw ADC values.
pub mod formulas {
    pub use crate::compensation::{humidity, pressure, t_fine, temperature};
}

// BME280 I2C slave addresses, selected by the SDO pin.
pub const DEFAULT_ADDRESS: u8 = 0x76;
pub const ALTERNATE_ADDRESS: u8 = 0x77;
