//! Collaborators the reading service drives: the sensor, the alert LED and
//! the wall clock.
//!
//! The service only sees the traits below. Concrete backends are chosen from
//! [`HardwareSettings`] at startup and handed over by value.

use std::fmt;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::settings::HardwareSettings;

mod clock;
mod gpio;
mod iio;
mod simulated;

pub use clock::SystemClock;
pub use gpio::SysfsLed;
pub use iio::IioDhtSensor;
pub use simulated::{LoggedLed, SimulatedSensor};

/// How a single sensor read failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// Expected to clear on retry (bus timing glitch, checksum miss).
    Transient(String),
    /// Anything else; retrying will not help.
    Fatal(String),
}

impl SensorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, SensorError::Transient(_))
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Transient(msg) => write!(f, "transient: {msg}"),
            SensorError::Fatal(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for SensorError {}

/// Temperature/humidity source. `Ok(None)` means the device answered without
/// a value for this attempt.
pub trait Sensor: Send {
    /// Degrees Celsius.
    fn temperature(&mut self) -> Result<Option<f64>, SensorError>;

    /// Relative humidity, percent.
    fn humidity(&mut self) -> Result<Option<f64>, SensorError>;
}

/// Binary output used for the visual alert.
pub trait Actuator: Send {
    fn set(&mut self, on: bool) -> Result<()>;
}

pub trait Clock: Send {
    /// Current local wall time.
    fn now(&self) -> NaiveDateTime;
}

/// Builds the sensor for the configured backend.
pub fn build_sensor(settings: &HardwareSettings) -> Result<Box<dyn Sensor>> {
    match settings {
        HardwareSettings::Sysfs { iio_device, .. } => {
            Ok(Box::new(IioDhtSensor::open(iio_device)?))
        }
        HardwareSettings::Simulated {
            temperature,
            humidity,
            jitter,
            transient_failure_rate,
        } => Ok(Box::new(SimulatedSensor::new(
            *temperature,
            *humidity,
            *jitter,
            *transient_failure_rate,
        ))),
    }
}

/// Builds the alert LED for the configured backend. Fails if the pin cannot
/// be claimed, which aborts startup.
pub fn build_actuator(settings: &HardwareSettings) -> Result<Box<dyn Actuator>> {
    match settings {
        HardwareSettings::Sysfs {
            gpio_root,
            led_gpio,
            ..
        } => Ok(Box::new(SysfsLed::export(gpio_root, *led_gpio)?)),
        HardwareSettings::Simulated { .. } => Ok(Box::new(LoggedLed::default())),
    }
}
