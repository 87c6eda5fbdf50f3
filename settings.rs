use std::env;

use crate::error::SettingsError;
use crate::sampling::{Oversampling, OversamplingSettings};
use crate::DEFAULT_ADDRESS;

const ENV_BUS: &str = "BME280_BUS";
const ENV_ADDRESS: &str = "BME280_ADDRESS";
const ENV_OVERSAMPLING: &str = "BME280_OVERSAMPLING";

/// Where the sensor lives and how to sample it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// I2C bus number, i.e. `/dev/i2c-<bus>`.
    pub bus: u8,
    pub address: u8,
    pub oversampling: OversamplingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bus: 1,
            address: DEFAULT_ADDRESS,
            oversampling: OversamplingSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, overridden by `BME280_BUS`, `BME280_ADDRESS` and
    /// `BME280_OVERSAMPLING` when set.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(value) = lookup(ENV_BUS) {
            settings.bus = parse_byte(ENV_BUS, &value)?;
        }
        if let Some(value) = lookup(ENV_ADDRESS) {
            settings.address = parse_byte(ENV_ADDRESS, &value)?;
        }
        if let Some(value) = lookup(ENV_OVERSAMPLING) {
            let factor = parse_byte(ENV_OVERSAMPLING, &value)?;
            settings.oversampling = OversamplingSettings::uniform(Oversampling::from_factor(factor)?);
        }
        Ok(settings)
    }
}

// Decimal, or hex with a 0x prefix.
fn parse_byte(name: &'static str, value: &str) -> Result<u8, SettingsError> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| SettingsError::NotANumber {
        name,
        value: value.to_string(),
    })
}
