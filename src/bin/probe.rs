//! Bench check for the sensor wiring: prints a reading every interval until a
//! non-recoverable error. Usage: `envwatch-probe [interval_secs]`.

use std::{thread, time::Duration};

use anyhow::{bail, Context, Result};
use log::warn;

use envwatch_lib::{
    hardware::{build_sensor, Sensor, SensorError},
    settings::Settings,
};

const TRANSIENT_PAUSE: Duration = Duration::from_secs(3);

fn read(sensor: &mut dyn Sensor) -> Result<(Option<f64>, Option<f64>), SensorError> {
    let humidity = sensor.humidity()?;
    let temperature = sensor.temperature()?;
    Ok((temperature, humidity))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let interval = std::env::args()
        .nth(1)
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("interval must be a whole number of seconds")?
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(1));

    let settings = Settings::from_env()?;
    let mut sensor = build_sensor(&settings.hardware).context("failed to open sensor")?;

    let mut count: u64 = 0;
    loop {
        match read(sensor.as_mut()) {
            Ok((Some(temperature), Some(humidity))) => {
                count += 1;
                println!("#{count} Temp = {temperature:.1}°C Humidity = {humidity:.1}%");
                thread::sleep(interval);
            }
            Ok(_) => {
                warn!("sensor answered without a value");
                thread::sleep(interval);
            }
            Err(SensorError::Transient(msg)) => {
                warn!("Something is wrong: {msg}");
                thread::sleep(TRANSIENT_PAUSE);
            }
            Err(SensorError::Fatal(msg)) => bail!("sensor read error: {msg}"),
        }
    }
}
