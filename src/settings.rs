use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::models::Range;

pub const CONFIG_PATH_ENV: &str = "ENVWATCH_CONFIG";
pub const BIND_ENV: &str = "ENVWATCH_BIND";
pub const LOG_FILE_ENV: &str = "ENVWATCH_LOG_FILE";
const DEFAULT_CONFIG_FILE: &str = "envwatch.json";
const MAX_SIM_JITTER: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkSettings {
    /// Number of on/off cycles per alert.
    pub cycles: u32,
    /// Hold time for each on and each off phase.
    pub interval_ms: u64,
}

impl Default for BlinkSettings {
    fn default() -> Self {
        Self {
            cycles: 10,
            interval_ms: 300,
        }
    }
}

impl BlinkSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 1000,
        }
    }
}

impl RetrySettings {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Which collaborators back the sensor and the alert LED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum HardwareSettings {
    /// Kernel DHT IIO device for the sensor, sysfs GPIO for the LED.
    Sysfs {
        #[serde(default = "default_iio_device")]
        iio_device: PathBuf,
        #[serde(default = "default_gpio_root")]
        gpio_root: PathBuf,
        #[serde(default = "default_led_gpio")]
        led_gpio: u32,
    },
    /// Synthetic readings and a log-only LED, for running off-device.
    Simulated {
        #[serde(default = "default_sim_temperature")]
        temperature: f64,
        #[serde(default = "default_sim_humidity")]
        humidity: f64,
        #[serde(default = "default_sim_jitter")]
        jitter: f64,
        #[serde(default)]
        transient_failure_rate: f64,
    },
}

fn default_iio_device() -> PathBuf {
    PathBuf::from("/sys/bus/iio/devices/iio:device0")
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

fn default_led_gpio() -> u32 {
    17
}

fn default_sim_temperature() -> f64 {
    22.0
}

fn default_sim_humidity() -> f64 {
    50.0
}

fn default_sim_jitter() -> f64 {
    1.5
}

impl Default for HardwareSettings {
    fn default() -> Self {
        HardwareSettings::Sysfs {
            iio_device: default_iio_device(),
            gpio_root: default_gpio_root(),
            led_gpio: default_led_gpio(),
        }
    }
}

/// Parameters the reading service consults on every sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingSettings {
    pub temperature_range: Range,
    pub humidity_range: Range,
    pub blink: BlinkSettings,
    pub retry: RetrySettings,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Settings::default().sampling()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub log_file: PathBuf,
    pub temperature_range: Range,
    pub humidity_range: Range,
    pub blink: BlinkSettings,
    pub retry: RetrySettings,
    pub hardware: HardwareSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".into(),
            log_file: PathBuf::from("log.csv"),
            temperature_range: Range::new(18.0, 27.0),
            humidity_range: Range::new(40.0, 60.0),
            blink: BlinkSettings::default(),
            retry: RetrySettings::default(),
            hardware: HardwareSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from `ENVWATCH_CONFIG` (or `envwatch.json`) and applies
    /// the environment overrides.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut settings = Self::load(&path)?;

        if let Ok(bind) = std::env::var(BIND_ENV) {
            settings.bind = bind;
        }
        if let Some(log_file) = std::env::var_os(LOG_FILE_ENV) {
            settings.log_file = PathBuf::from(log_file);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// A missing file means defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.temperature_range.is_valid() {
            bail!("invalid temperature range {}", self.temperature_range);
        }
        if !self.humidity_range.is_valid() {
            bail!("invalid humidity range {}", self.humidity_range);
        }
        if self.retry.attempts == 0 {
            bail!("retry.attempts must be at least 1");
        }
        if let HardwareSettings::Simulated {
            temperature,
            humidity,
            jitter,
            transient_failure_rate,
        } = self.hardware
        {
            if !(0.0..=1.0).contains(&transient_failure_rate) {
                bail!("transient_failure_rate must be within [0, 1]");
            }
            if !jitter.is_finite() || jitter.abs() > MAX_SIM_JITTER {
                bail!("jitter must be finite and at most {MAX_SIM_JITTER}");
            }
            if !temperature.is_finite() || !humidity.is_finite() {
                bail!("simulated base values must be finite");
            }
        }
        Ok(())
    }

    pub fn sampling(&self) -> SamplingSettings {
        SamplingSettings {
            temperature_range: self.temperature_range,
            humidity_range: self.humidity_range,
            blink: self.blink,
            retry: self.retry,
        }
    }
}
