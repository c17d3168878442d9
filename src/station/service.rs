use std::thread;

use crate::{
    error::StationError,
    hardware::{Actuator, Clock, Sensor, SensorError},
    models::{round_tenth, Reading, TIMESTAMP_FORMAT},
    settings::SamplingSettings,
    store::LogStore,
};

use super::alert;

// Set to false to silence per-sample diagnostics
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Takes one validated reading per call: bounded sensor retry, range check,
/// LED alert, timestamp, log append.
pub struct ReadingService {
    sensor: Box<dyn Sensor>,
    actuator: Box<dyn Actuator>,
    clock: Box<dyn Clock>,
    store: LogStore,
    settings: SamplingSettings,
}

impl ReadingService {
    pub fn new(
        sensor: Box<dyn Sensor>,
        actuator: Box<dyn Actuator>,
        clock: Box<dyn Clock>,
        store: LogStore,
        settings: SamplingSettings,
    ) -> Self {
        Self {
            sensor,
            actuator,
            clock,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Returns the rounded reading. Only sensor problems fail the call; a log
    /// append failure is reported and the reading is still returned.
    pub fn sample(&mut self) -> Result<Reading, StationError> {
        let (raw_temperature, raw_humidity) = self.read_with_retry()?;
        let temperature = round_tenth(raw_temperature);
        let humidity = round_tenth(raw_humidity);

        if self.in_range(temperature, humidity) {
            alert::clear(self.actuator.as_mut());
        } else {
            log_warn!(
                "Out of range: temperature {temperature}°C (ok {}), humidity {humidity}% (ok {})",
                self.settings.temperature_range,
                self.settings.humidity_range
            );
            alert::blink(self.actuator.as_mut(), &self.settings.blink);
        }

        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let reading = Reading::new(timestamp, temperature, humidity);

        if let Err(err) = self.store.append(&reading) {
            log_warn!("Reading at {} was not logged: {err}", reading.timestamp);
        } else {
            log_info!(
                "Logged reading {} {}°C {}%",
                reading.timestamp,
                reading.temperature,
                reading.humidity
            );
        }

        Ok(reading)
    }

    pub fn in_range(&self, temperature: f64, humidity: f64) -> bool {
        self.settings.temperature_range.contains(temperature)
            && self.settings.humidity_range.contains(humidity)
    }

    fn read_with_retry(&mut self) -> Result<(f64, f64), StationError> {
        let attempts = self.settings.retry.attempts;

        for attempt in 1..=attempts {
            match self.read_pair() {
                Ok((Some(temperature), Some(humidity)))
                    if temperature.is_finite() && humidity.is_finite() =>
                {
                    return Ok((temperature, humidity));
                }
                Ok(_) => {
                    log_debug!("sensor attempt {attempt}/{attempts} returned no value");
                }
                Err(SensorError::Transient(msg)) => {
                    log_warn!("sensor attempt {attempt}/{attempts} failed: {msg}");
                    if attempt < attempts {
                        thread::sleep(self.settings.retry.backoff());
                    }
                }
                Err(SensorError::Fatal(msg)) => {
                    log_error!("Sensor exception: {msg}");
                    return Err(StationError::SensorFailure(format!(
                        "Sensor read error: {msg}"
                    )));
                }
            }
        }

        log_error!("Sensor gave no reading in {attempts} attempts");
        Err(StationError::SensorFailure(
            "Sensor failed after retries".into(),
        ))
    }

    fn read_pair(&mut self) -> Result<(Option<f64>, Option<f64>), SensorError> {
        let temperature = self.sensor.temperature()?;
        let humidity = self.sensor.humidity()?;
        Ok((temperature, humidity))
    }
}
