use anyhow::Result;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{Actuator, Sensor, SensorError};

/// Produces readings around fixed base values, failing transiently at a
/// configurable rate.
pub struct SimulatedSensor {
    rng: StdRng,
    temperature: f64,
    humidity: f64,
    jitter: f64,
    transient_failure_rate: f64,
}

impl SimulatedSensor {
    pub fn new(temperature: f64, humidity: f64, jitter: f64, transient_failure_rate: f64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            temperature,
            humidity,
            jitter: jitter.abs(),
            transient_failure_rate: transient_failure_rate.clamp(0.0, 1.0),
        }
    }

    fn jittered(&mut self, base: f64) -> f64 {
        if self.jitter == 0.0 {
            return base;
        }
        base + self.rng.gen_range(-self.jitter..=self.jitter)
    }
}

impl Sensor for SimulatedSensor {
    fn temperature(&mut self) -> Result<Option<f64>, SensorError> {
        // One failure roll per attempt; the service always reads temperature first.
        if self.rng.gen_bool(self.transient_failure_rate) {
            return Err(SensorError::Transient("simulated checksum mismatch".into()));
        }
        Ok(Some(self.jittered(self.temperature)))
    }

    fn humidity(&mut self) -> Result<Option<f64>, SensorError> {
        Ok(Some(self.jittered(self.humidity).clamp(0.0, 100.0)))
    }
}

/// Stand-in LED that only remembers and logs its state.
#[derive(Debug, Default)]
pub struct LoggedLed {
    on: bool,
}

impl Actuator for LoggedLed {
    fn set(&mut self, on: bool) -> Result<()> {
        if self.on != on {
            debug!("simulated LED {}", if on { "on" } else { "off" });
        }
        self.on = on;
        Ok(())
    }
}
