use std::error::Error;

use log::info;
use rppal::i2c::I2c;

use rpbme280::{load_calibration, Sampler, Settings, StdDelay};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = Settings::from_env()?;
    info!(
        "reading BME280 at 0x{:02X} on /dev/i2c-{}",
        settings.address, settings.bus
    );

    let mut i2c = I2c::with_bus(settings.bus)?;
    let calib = load_calibration(&mut i2c, settings.address)?;

    let mut sampler = Sampler::new(settings.oversampling);
    let reading = sampler.sample(&mut i2c, &mut StdDelay, settings.address, &calib)?;

    println!("Timestamp: {}", reading.timestamp);
    println!("Temperature: {:.2} C", reading.temperature);
    println!("Humidity: {:.2} %", reading.humidity);
    println!("Pressure: {:.2} hPa", reading.pressure);

    Ok(())
}
