use consts::*;

use core::fmt;

use embedded_hal::{delay::DelayNs, i2c::SevenBitAddress};
use log::debug;

use crate::{consts, BusOperation, Config, Error, Status, Tfmpi2c};

/// Status line plus hex dump of a raw buffer, as printed by the bench tools.
///
/// ```text
///  Status: READY Data: 59 59 7B 00 D7 11 C8 08 E5
/// ```
pub struct Dump<'a> {
    status: Status,
    bytes: &'a [u8],
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " Status: {} Data:", self.status)?;
        for b in self.bytes {
            write!(f, " {:02X}", b)?;
        }
        Ok(())
    }
}

impl<B: BusOperation, T: DelayNs> Tfmpi2c<B, T> {

    /// Status of the last call, `Ready` if it succeeded.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Firmware version read by the last successful `GET_FIRMWARE_VERSION`,
    /// major first. All zero until then.
    pub fn firmware_version(&self) -> [u8; 3] {
        self.version
    }

    /// Last raw data frame, zeroed at the start of each read.
    pub fn frame(&self) -> &[u8; TFMP_FRAME_SIZE] {
        &self.frame
    }

    /// Last raw command reply, zeroed at the start of each read.
    pub fn reply(&self) -> &[u8; TFMP_REPLY_SIZE] {
        &self.reply
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame_dump(&self) -> Dump<'_> {
        Dump { status: self.status, bytes: &self.frame }
    }

    pub fn reply_dump(&self) -> Dump<'_> {
        Dump { status: self.status, bytes: &self.reply }
    }

    /// This function queries the firmware version.
    ///
    /// # Return
    ///
    /// `version` : `[major, minor, revision]`.
    pub fn get_firmware_version(&mut self) -> Result<[u8; 3], Error<B::Error>> {
        self.send_command(GET_FIRMWARE_VERSION, 0)?;
        Ok(self.version)
    }

    /// This function sets the internal measurement rate.
    ///
    /// # Arguments
    ///
    /// * `rate` : Frames per second, use the `FRAME_*` constants. 0 stops
    ///   free running measurement, see `trigger_detection`.
    pub fn set_frame_rate(&mut self, rate: u16) -> Result<(), Error<B::Error>> {
        self.send_command(SET_FRAME_RATE, u32::from(rate))
    }

    /// This function changes the device address. The device answers on the
    /// new address right away and it becomes the default address of this
    /// driver. Use `save_settings` to keep it across power cycles.
    ///
    /// # Arguments
    ///
    /// * `new_address` : Between `TFMP_MIN_ADDRESS` and `TFMP_MAX_ADDRESS`.
    pub fn set_i2c_address(&mut self, new_address: SevenBitAddress) -> Result<(), Error<B::Error>> {
        self.send_command(SET_I2C_ADDRESS, u32::from(new_address))?;
        debug!("Device moved from {:#04X} to {:#04X}", self.config.address, new_address);
        self.config.address = new_address;
        Ok(())
    }

    pub fn soft_reset(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(SOFT_RESET, 0)
    }

    /// Restores factory settings, address included.
    pub fn hard_reset(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(HARD_RESET, 0)
    }

    pub fn save_settings(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(SAVE_SETTINGS, 0)
    }

    pub fn enable_output(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(ENABLE_OUTPUT, 0)
    }

    pub fn disable_output(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(DISABLE_OUTPUT, 0)
    }

    /// Single shot measurement when the frame rate is 0.
    pub fn trigger_detection(&mut self) -> Result<(), Error<B::Error>> {
        self.send_command(TRIGGER_DETECTION, 0)
    }
}
