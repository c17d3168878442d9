//! Fake collaborators for exercising the station without hardware.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};

use crate::hardware::{Actuator, Clock, Sensor, SensorError};

pub type Attempt = Result<(Option<f64>, Option<f64>), SensorError>;

/// Replays one scripted outcome per attempt. Temperature is read first and
/// consumes the attempt; humidity returns the value paired with it.
pub struct ScriptedSensor {
    attempts: VecDeque<Attempt>,
    pending_humidity: Option<Option<f64>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedSensor {
    pub fn new(attempts: Vec<Attempt>) -> (Self, Arc<Mutex<usize>>) {
        let calls = Arc::new(Mutex::new(0));
        (
            Self {
                attempts: attempts.into(),
                pending_humidity: None,
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn always(temperature: f64, humidity: f64) -> Self {
        Self::new(vec![Ok((Some(temperature), Some(humidity))); 16]).0
    }
}

impl Sensor for ScriptedSensor {
    fn temperature(&mut self) -> Result<Option<f64>, SensorError> {
        *self.calls.lock().unwrap() += 1;
        match self.attempts.pop_front() {
            Some(Ok((temperature, humidity))) => {
                self.pending_humidity = Some(humidity);
                Ok(temperature)
            }
            Some(Err(err)) => Err(err),
            None => Err(SensorError::Fatal("script exhausted".into())),
        }
    }

    fn humidity(&mut self) -> Result<Option<f64>, SensorError> {
        self.pending_humidity
            .take()
            .ok_or_else(|| SensorError::Fatal("humidity read out of order".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedEvent {
    Set(bool),
}

pub struct RecordingActuator {
    events: Arc<Mutex<Vec<LedEvent>>>,
    fail: bool,
}

impl RecordingActuator {
    pub fn new() -> (Self, Arc<Mutex<Vec<LedEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: events.clone(),
                fail: false,
            },
            events,
        )
    }

    /// Records every call but reports each one as failed.
    pub fn failing() -> (Self, Arc<Mutex<Vec<LedEvent>>>) {
        let (mut actuator, events) = Self::new();
        actuator.fail = true;
        (actuator, events)
    }
}

impl Actuator for RecordingActuator {
    fn set(&mut self, on: bool) -> Result<()> {
        self.events.lock().unwrap().push(LedEvent::Set(on));
        if self.fail {
            return Err(anyhow!("pin unavailable"));
        }
        Ok(())
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, min, sec))
            .expect("valid fixed time");
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
