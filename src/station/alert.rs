use std::thread;

use crate::{hardware::Actuator, settings::BlinkSettings};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// Runs the full blink sequence on the calling thread: `cycles` times on,
/// hold, off, hold. Write failures are logged and the sequence carries on so
/// the LED is always left off.
pub fn blink(actuator: &mut dyn Actuator, settings: &BlinkSettings) {
    let hold = settings.interval();
    for cycle in 0..settings.cycles {
        for on in [true, false] {
            if let Err(err) = actuator.set(on) {
                log_warn!("alert LED write failed on cycle {}: {err:#}", cycle + 1);
            }
            thread::sleep(hold);
        }
    }
}

/// Clears the alert without blinking.
pub fn clear(actuator: &mut dyn Actuator) {
    if let Err(err) = actuator.set(false) {
        log_warn!("failed to switch alert LED off: {err:#}");
    }
}
