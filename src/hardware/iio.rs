use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};

use super::{Sensor, SensorError};

const TEMPERATURE_ATTR: &str = "in_temp_input";
const HUMIDITY_ATTR: &str = "in_humidityrelative_input";

// errno values the dht11 IIO driver returns when a transfer goes wrong.
const EINTR: i32 = 4;
const EIO: i32 = 5;
const EAGAIN: i32 = 11;
const ETIMEDOUT: i32 = 110;

/// DHT11/DHT22 exposed by the kernel `dht11` IIO driver.
///
/// Both attributes report milli-units; every read triggers a fresh transfer
/// in the driver, which is where the intermittent `EIO`s come from.
#[derive(Debug, Clone)]
pub struct IioDhtSensor {
    temperature_path: PathBuf,
    humidity_path: PathBuf,
}

impl IioDhtSensor {
    pub fn open(device_dir: &Path) -> Result<Self> {
        let temperature_path = device_dir.join(TEMPERATURE_ATTR);
        let humidity_path = device_dir.join(HUMIDITY_ATTR);

        for path in [&temperature_path, &humidity_path] {
            if !path.exists() {
                bail!("sensor attribute {} not found", path.display());
            }
        }

        Ok(Self {
            temperature_path,
            humidity_path,
        })
    }

    fn read_milli(path: &Path) -> Result<Option<f64>, SensorError> {
        let raw = fs::read_to_string(path).map_err(|err| classify_io_error(path, err))?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        raw.parse::<i64>()
            .map(|milli| Some(milli as f64 / 1000.0))
            .map_err(|err| {
                SensorError::Fatal(format!(
                    "unexpected value '{raw}' in {}: {err}",
                    path.display()
                ))
            })
    }
}

impl Sensor for IioDhtSensor {
    fn temperature(&mut self) -> Result<Option<f64>, SensorError> {
        Self::read_milli(&self.temperature_path)
    }

    fn humidity(&mut self) -> Result<Option<f64>, SensorError> {
        Self::read_milli(&self.humidity_path)
    }
}

fn classify_io_error(path: &Path, err: io::Error) -> SensorError {
    let transient = match err.raw_os_error() {
        Some(EIO | ETIMEDOUT | EAGAIN | EINTR) => true,
        _ => matches!(
            err.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
        ),
    };

    let message = format!("{}: {err}", path.display());
    if transient {
        SensorError::Transient(message)
    } else {
        SensorError::Fatal(message)
    }
}
