//! Sensor simulation and classification for a single joint.
//!
//! Readings drift by a bounded random step each tick.  Classification is a
//! pure function of the reading: each metric is checked against a warning
//! band and a wider critical band, and the joint status is the worst of the
//! three.

use jointview_types::{AlertFlags, SensorRecord, Status};
use rand::Rng;

/// Temperature never drifts above this, °C.
pub const TEMPERATURE_CEILING: f64 = 60.0;
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 80.0);
pub const PRESSURE_RANGE: (f64, f64) = (990.0, 1030.0);

/// Drift multiplier applied to temperature while the joint is moving.
pub const MOVING_FACTOR: f64 = 1.5;

const TEMPERATURE_CRITICAL: f64 = 50.0;
const TEMPERATURE_WARNING: f64 = 40.0;
const HUMIDITY_CRITICAL: f64 = 70.0;
const HUMIDITY_WARNING: f64 = 60.0;
const PRESSURE_CRITICAL_BAND: (f64, f64) = (1000.0, 1025.0);
const PRESSURE_WARNING_BAND: (f64, f64) = (1005.0, 1020.0);

/// Advance `record` by one random step.
pub fn simulate<R: Rng>(record: &mut SensorRecord, moving: bool, rng: &mut R) {
    let factor = if moving { MOVING_FACTOR } else { 1.0 };

    let r: f64 = rng.r#gen();
    record.temperature = (record.temperature + (r * 0.5 - 0.2) * factor).min(TEMPERATURE_CEILING);

    let r: f64 = rng.r#gen();
    record.humidity = (record.humidity + (r * 2.0 - 1.0)).clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);

    let r: f64 = rng.r#gen();
    record.pressure =
        (record.pressure + (r * 0.5 - 0.25)).clamp(PRESSURE_RANGE.0, PRESSURE_RANGE.1);
}

fn outside(value: f64, (lower, upper): (f64, f64)) -> bool {
    value < lower || value > upper
}

fn grade(critical: bool, warning: bool) -> Status {
    if critical {
        Status::Critical
    } else if warning {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// Flag out-of-band metrics and compute the overall status.
pub fn classify(record: &SensorRecord) -> (AlertFlags, Status) {
    let temperature = grade(
        record.temperature > TEMPERATURE_CRITICAL,
        record.temperature > TEMPERATURE_WARNING,
    );
    let humidity = grade(
        record.humidity > HUMIDITY_CRITICAL,
        record.humidity > HUMIDITY_WARNING,
    );
    let pressure = grade(
        outside(record.pressure, PRESSURE_CRITICAL_BAND),
        outside(record.pressure, PRESSURE_WARNING_BAND),
    );

    let flags = AlertFlags {
        temperature: temperature != Status::Normal,
        humidity: humidity != Status::Normal,
        pressure: pressure != Status::Normal,
    };
    (flags, temperature.max(humidity).max(pressure))
}

/// Short breach list shown on the floating label, e.g. `温: 55.0°C`.
pub fn label_breaches(record: &SensorRecord, flags: AlertFlags) -> String {
    let mut items = Vec::new();
    if flags.temperature {
        items.push(format!("温: {:.1}°C", record.temperature));
    }
    if flags.humidity {
        items.push(format!("湿: {:.1}%", record.humidity));
    }
    if flags.pressure {
        items.push(format!("压: {:.1}hPa", record.pressure));
    }
    items.join(" ")
}

/// Log line for a joint in a non-normal state.
pub fn alert_line(joint: &str, record: &SensorRecord, flags: AlertFlags) -> String {
    let mut items = Vec::new();
    if flags.temperature {
        items.push(format!("温度异常 ({:.1}°C)", record.temperature));
    }
    if flags.humidity {
        items.push(format!("湿度异常 ({:.1}%)", record.humidity));
    }
    if flags.pressure {
        items.push(format!("压力异常 ({:.1}hPa)", record.pressure));
    }
    format!(
        "[{}] 关节 {}: {}",
        record.status.as_str().to_uppercase(),
        joint,
        items.join("，")
    )
}
