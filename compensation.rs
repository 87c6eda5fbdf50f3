//! Double precision compensation formulas, BME280 datasheet Appendix A (8.1).

use crate::structs::{CalibParams, RawSample};

/// Compensated values, before they are stamped into a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensated {
    /// °C
    pub temperature: f64,
    /// hPa
    pub pressure: f64,
    /// %rH, within [0, 100]
    pub humidity: f64,
}

pub fn compensate(raw: &RawSample, calib: &CalibParams) -> Compensated {
    let t_fine = t_fine(raw.temperature, calib);
    Compensated {
        temperature: t_fine / 5120.0,
        pressure: pressure(raw.pressure, t_fine, calib) / 100.0,
        humidity: humidity(raw.humidity, t_fine, calib),
    }
}

/// Fine resolution temperature shared by the humidity and pressure formulas.
pub fn t_fine(raw_t: u32, calib: &CalibParams) -> f64 {
    let raw_t = f64::from(raw_t);
    let t1 = f64::from(calib.dig_t1);
    let v1 = (raw_t / 16384.0 - t1 / 1024.0) * f64::from(calib.dig_t2);
    let d = raw_t / 131072.0 - t1 / 8192.0;
    let v2 = d * d * f64::from(calib.dig_t3);
    v1 + v2
}

pub fn temperature(raw_t: u32, calib: &CalibParams) -> f64 {
    t_fine(raw_t, calib) / 5120.0
}

/// Relative humidity in %rH, clamped to [0, 100].
pub fn humidity(raw_h: u32, t_fine: f64, calib: &CalibParams) -> f64 {
    let h1 = f64::from(calib.dig_h1);
    let h2 = f64::from(calib.dig_h2);
    let h3 = f64::from(calib.dig_h3);
    let h4 = f64::from(calib.dig_h4);
    let h5 = f64::from(calib.dig_h5);
    let h6 = f64::from(calib.dig_h6);

    let mut res = t_fine - 76800.0;
    res = (f64::from(raw_h) - (h4 * 64.0 + h5 / 16384.0 * res))
        * (h2 / 65536.0 * (1.0 + h6 / 67108864.0 * res * (1.0 + h3 / 67108864.0 * res)));
    res = res * (1.0 - (h1 * res / 524288.0));
    // min/max rather than clamp: a NaN lands on 100 instead of escaping
    res.min(100.0).max(0.0)
}

/// Pressure in Pa. Returns 0 when dig_P1 drives the divisor to zero.
pub fn pressure(raw_p: u32, t_fine: f64, calib: &CalibParams) -> f64 {
    let p1 = f64::from(calib.dig_p1);
    let p2 = f64::from(calib.dig_p2);
    let p3 = f64::from(calib.dig_p3);
    let p4 = f64::from(calib.dig_p4);
    let p5 = f64::from(calib.dig_p5);
    let p6 = f64::from(calib.dig_p6);
    let p7 = f64::from(calib.dig_p7);
    let p8 = f64::from(calib.dig_p8);
    let p9 = f64::from(calib.dig_p9);

    let mut v1 = t_fine / 2.0 - 64000.0;
    let mut v2 = v1 * v1 * p6 / 32768.0;
    v2 = v2 + v1 * p5 * 2.0;
    v2 = v2 / 4.0 + p4 * 65536.0;
    v1 = (p3 * v1 * v1 / 524288.0 + p2 * v1) / 524288.0;
    v1 = (1.0 + v1 / 32768.0) * p1;

    if v1 == 0.0 {
        return 0.0;
    }

    let mut res = 1048576.0 - f64::from(raw_p);
    res = ((res - v2 / 4096.0) * 6250.0) / v1;
    v1 = p9 * res * res / 2147483648.0;
    v2 = res * p8 / 32768.0;
    res + (v1 + v2 + p7) / 16.0
}
