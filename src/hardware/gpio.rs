use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;

use super::Actuator;

/// LED on a GPIO line driven through the legacy `/sys/class/gpio` interface.
#[derive(Debug)]
pub struct SysfsLed {
    value_path: PathBuf,
}

impl SysfsLed {
    /// Exports `pin` under `gpio_root`, configures it as an output and drives
    /// it low.
    pub fn export(gpio_root: &Path, pin: u32) -> Result<Self> {
        let pin_dir = gpio_root.join(format!("gpio{pin}"));

        if !pin_dir.exists() {
            match fs::write(gpio_root.join("export"), pin.to_string()) {
                Ok(()) => {}
                // EBUSY: someone else exported it between our check and the write.
                Err(err) if err.raw_os_error() == Some(16) => {}
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to export GPIO {pin}"));
                }
            }
        }

        fs::write(pin_dir.join("direction"), "out")
            .with_context(|| format!("failed to set GPIO {pin} as output"))?;

        let mut led = Self {
            value_path: pin_dir.join("value"),
        };
        led.write_value(false)
            .with_context(|| format!("failed to drive GPIO {pin} low"))?;

        info!("Alert LED ready on GPIO {pin}");
        Ok(led)
    }

    fn write_value(&mut self, on: bool) -> io::Result<()> {
        fs::write(&self.value_path, if on { "1" } else { "0" })
    }
}

impl Actuator for SysfsLed {
    fn set(&mut self, on: bool) -> Result<()> {
        self.write_value(on)
            .with_context(|| format!("failed to write {}", self.value_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configures_exported_pin_and_toggles_value() {
        let root = std::env::temp_dir().join(format!("envwatch-gpio-{}", uuid::Uuid::new_v4()));
        let pin_dir = root.join("gpio17");
        fs::create_dir_all(&pin_dir).unwrap();

        let mut led = SysfsLed::export(&root, 17).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("direction")).unwrap(), "out");
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "0");

        led.set(true).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "1");
        led.set(false).unwrap();
        assert_eq!(fs::read_to_string(pin_dir.join("value")).unwrap(), "0");

        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn missing_gpio_root_fails() {
        let root = std::env::temp_dir().join(format!("envwatch-gpio-{}", uuid::Uuid::new_v4()));
        assert!(SysfsLed::export(&root, 17).is_err());
    }
}
