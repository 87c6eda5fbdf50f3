use thiserror::Error;

/// Errors raised while talking to the sensor.
///
/// `E` is the bus transport's own error type; it is carried through untouched.
#[derive(Debug, Error)]
pub enum Error<E> {
    #[error("bus transport error: {0:?}")]
    Transport(E),

    #[error("burst read returned {actual} bytes, expected {expected}")]
    MalformedBlock { expected: usize, actual: usize },
}

/// A register value or factor that does not name an oversampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid oversampling value: {0}")]
pub struct InvalidOversampling(pub u8);

/// Environment overrides that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{name}: cannot parse {value:?} as a byte value")]
    NotANumber { name: &'static str, value: String },

    #[error("BME280_OVERSAMPLING: {0}")]
    Oversampling(#[from] InvalidOversampling),
}
