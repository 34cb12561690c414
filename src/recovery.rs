//! Manual recovery of a hung I2C bus.
//!
//! A peer reset in the middle of a read can keep SDA low while it waits for
//! clocks that never come, and the I2C peripheral then refuses to start a
//! transfer. Clocking the peer through the rest of its byte plus a NACK and
//! issuing a STOP by hand releases it.

use consts::*;

use embedded_hal::{delay::DelayNs, digital::OutputPin};
use log::debug;

use crate::consts;

/// Bit-bangs 9 clock pulses and a STOP on `sda`/`scl`, then hands both pins
/// to `restore` and returns what it builds, normally the I2C peripheral
/// again.
///
/// The pins are expected in open-drain output mode, so driving them high
/// releases the line. `restore` is responsible for switching them back to
/// input or alternate function mode.
///
/// Whether the peer actually let go is not checked; the next transfer on
/// the restored bus is the test.
pub fn recover_bus<SDA, SCL, E, D, F, I>(
    mut sda: SDA,
    mut scl: SCL,
    delay: &mut D,
    restore: F,
) -> Result<I, E>
where
    SDA: OutputPin<Error = E>,
    SCL: OutputPin<Error = E>,
    D: DelayNs,
    F: FnOnce(SDA, SCL) -> I,
{
    debug!("Recovering I2C bus");

    // SDA stays high so no START or STOP is seen while clocking
    sda.set_high()?;

    // 8 data clocks, the 9th reads as a NACK
    for _ in 0..TFMP_RECOVERY_CLOCK_PULSES {
        scl.set_high()?;
        delay.delay_us(TFMP_RECOVERY_HALF_PERIOD_US);
        scl.set_low()?;
        delay.delay_us(TFMP_RECOVERY_HALF_PERIOD_US);
    }

    // STOP: SDA rises while SCL is high
    sda.set_low()?;
    delay.delay_us(TFMP_RECOVERY_HALF_PERIOD_US);
    scl.set_high()?;
    delay.delay_us(TFMP_RECOVERY_STOP_SETUP_US);
    sda.set_high()?;
    delay.delay_us(TFMP_RECOVERY_STOP_SETUP_US);

    Ok(restore(sda, scl))
}
