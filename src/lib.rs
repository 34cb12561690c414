//! # TFMini-Plus I2C driver
//!
//! Blocking, `no_std` driver for the Benewake TFMini-Plus (and TFMini-S)
//! LiDAR configured for its I2C interface.
//!
//! The device speaks a small framed protocol on top of I2C: every command is
//! written as a `0x5A` frame, some commands answer with a reply frame, and a
//! measurement is a 9 byte `0x59 0x59` frame. Both directions carry an
//! additive checksum. Two calls cover almost everything:
//!
//! * [`Tfmpi2c::get_data`] reads one measurement.
//! * [`Tfmpi2c::send_command`] sends one of the commands in [`consts`].
//!
//! Every call resets [`Tfmpi2c::status`] and leaves the code of the failure
//! there, so the driver stays usable after any error. Retrying is up to the
//! caller.
//!
//! [`recovery::recover_bus`] frees a bus that a peer left hung mid-transfer.
#![cfg_attr(not(test), no_std)]

pub mod accessors;
pub mod bus_operation;
pub mod config;
pub mod consts;
pub mod frame;
pub mod recovery;
pub mod status;
pub mod utils;

pub use accessors::*;
pub use bus_operation::*;
pub use config::*;
pub use frame::{ChecksumError, CommandFrame, Measurement};
pub use status::*;

use consts::*;
use frame::*;

use core::fmt;

use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, ErrorKind, NoAcknowledgeSource, SevenBitAddress},
};
use log::{debug, error, warn};

use bitfield::bitfield;

bitfield! {
    /// Packed command descriptor: reply length, command length, command id
    /// and a one byte immediate payload, least significant byte first.
    #[derive(Copy, Clone, PartialEq, Eq)]
    pub struct Command(u32);
    impl Debug;
    pub u8, reply_len, _: 7, 0;
    pub u8, cmd_len, _: 15, 8;
    pub u8, id, _: 23, 16;
    pub u8, payload, _: 31, 24;
}

pub struct Tfmpi2c<B: BusOperation, T: DelayNs> {
    status: Status,
    version: [u8; 3],
    frame: [u8; TFMP_FRAME_SIZE],
    reply: [u8; TFMP_REPLY_SIZE],
    config: Config,

    pub bus: B,
    pub tim: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<B> {
    I2cRead(B),
    I2cWrite(B),
    /// The device acknowledged fewer bytes than the command holds.
    I2cLength(B),
    Checksum,
    CommandFailed,
    InvalidParam,
    WeakSignal(Measurement),
    SignalSaturation(Measurement),
    AmbientLightSaturation(Measurement),
}

impl<B> Error<B> {
    /// Status code recorded by the driver for this error.
    pub fn status(&self) -> Status {
        match self {
            Error::I2cRead(_) => Status::I2cRead,
            Error::I2cWrite(_) => Status::I2cWrite,
            Error::I2cLength(_) => Status::I2cLength,
            Error::Checksum => Status::Checksum,
            Error::CommandFailed | Error::InvalidParam => Status::CommandFailed,
            Error::WeakSignal(_) => Status::WeakSignal,
            Error::SignalSaturation(_) => Status::SignalSaturation,
            Error::AmbientLightSaturation(_) => Status::AmbientLightSaturation,
        }
    }

    /// The reading carried by an advisory error, if any.
    pub fn measurement(&self) -> Option<Measurement> {
        match self {
            Error::WeakSignal(m) | Error::SignalSaturation(m) | Error::AmbientLightSaturation(m) => {
                Some(*m)
            }
            _ => None,
        }
    }
}

impl<B: fmt::Debug> fmt::Display for Error<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2cRead(e) | Error::I2cWrite(e) | Error::I2cLength(e) => {
                write!(f, "{} ({:?})", self.status(), e)
            }
            Error::InvalidParam => f.write_str("invalid parameter"),
            _ => write!(f, "{}", self.status()),
        }
    }
}

impl<B: BusOperation, T: DelayNs> Tfmpi2c<B, T> {
    pub(crate) fn with_bus(bus: B, tim: T, config: Config) -> Self {
        Tfmpi2c {
            status: Status::Ready,
            version: [0; 3],
            frame: [0; TFMP_FRAME_SIZE],
            reply: [0; TFMP_REPLY_SIZE],
            config,
            bus,
            tim,
        }
    }

    /// Reads one measurement from the configured address.
    pub fn get_data(&mut self) -> Result<Measurement, Error<B::Error>> {
        self.get_data_from(self.config.address)
    }

    /// Reads one measurement from `address`.
    ///
    /// The device is first told to prepare a frame in centimeters, then the
    /// 9 byte frame is read back and checked. A checksum-valid frame that
    /// the device itself marks as abnormal (weak signal, signal or ambient
    /// light saturation) is still an error, carrying the decoded values.
    pub fn get_data_from(&mut self, address: SevenBitAddress) -> Result<Measurement, Error<B::Error>> {
        self.status = Status::Ready;

        self.send_command_to(I2C_FORMAT_CM, 0, address)?;

        self.frame = [0; TFMP_FRAME_SIZE];
        if let Err(e) = self.bus.read(address, &mut self.frame) {
            error!("Data frame read from {:#04X} failed: {:?}", address, e.kind());
            return self.fail(Error::I2cRead(e));
        }

        let (data, status) = match validate_data_frame(&self.frame) {
            Ok(decoded) => decoded,
            Err(ChecksumError { computed, received }) => {
                error!(
                    "Bad data frame checksum: calculated {:02X}, received {:02X}. Frame: {:02X?}",
                    computed, received, self.frame
                );
                return self.fail(Error::Checksum);
            }
        };

        // classify() only yields these four codes
        let err = match status {
            Status::Ready => {
                debug!("Frame {:02X?} -> {:?}", self.frame, data);
                return Ok(data);
            }
            Status::WeakSignal => Error::WeakSignal(data),
            Status::SignalSaturation => Error::SignalSaturation(data),
            _ => Error::AmbientLightSaturation(data),
        };
        warn!("Abnormal reading from {:#04X}: {} {:?}", address, status, data);
        self.fail(err)
    }

    /// Distance only, from the configured address.
    pub fn get_distance(&mut self) -> Result<i16, Error<B::Error>> {
        self.get_distance_from(self.config.address)
    }

    /// Distance only, from `address`.
    pub fn get_distance_from(&mut self, address: SevenBitAddress) -> Result<i16, Error<B::Error>> {
        self.get_data_from(address).map(|data| data.distance)
    }

    /// Sends `cmd` with `param` to the configured address.
    pub fn send_command(&mut self, cmd: Command, param: u32) -> Result<(), Error<B::Error>> {
        self.send_command_to(cmd, param, self.config.address)
    }

    /// Sends `cmd` with `param` to `address` and checks the reply, if the
    /// command has one.
    ///
    /// Commands with a reply block for the configured settling delay before
    /// the reply is read. `SET_I2C_ADDRESS` takes effect at once, so its
    /// reply is read from the new address; a `param` outside
    /// `TFMP_MIN_ADDRESS..=TFMP_MAX_ADDRESS` fails with `InvalidParam`
    /// before anything is written.
    pub fn send_command_to(
        &mut self,
        cmd: Command,
        param: u32,
        address: SevenBitAddress,
    ) -> Result<(), Error<B::Error>> {
        self.status = Status::Ready;

        if cmd.id() == CMD_ID_SET_I2C_ADDRESS
            && !(u32::from(TFMP_MIN_ADDRESS)..=u32::from(TFMP_MAX_ADDRESS)).contains(&param)
        {
            error!("I2C address {:#X} out of range", param);
            return self.fail(Error::InvalidParam);
        }

        let frame = build_command_frame(cmd, param);
        debug!(
            "Executing command {:#010X} on {:#04X}: {:02X?}",
            cmd.0,
            address,
            frame.as_bytes()
        );

        if let Err(e) = self.bus.write(address, frame.as_bytes()) {
            error!("Command write to {:#04X} failed: {:?}", address, e.kind());
            let err = match e.kind() {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => Error::I2cLength(e),
                _ => Error::I2cWrite(e),
            };
            return self.fail(err);
        }

        let reply_len = frame.reply_len();
        if reply_len == 0 {
            return Ok(());
        }
        self.tim.delay_ms(self.config.reply_delay_ms);

        let address = if cmd.id() == CMD_ID_SET_I2C_ADDRESS {
            param as SevenBitAddress
        } else {
            address
        };

        self.reply = [0; TFMP_REPLY_SIZE];
        if let Err(e) = self.bus.read(address, &mut self.reply[..reply_len]) {
            error!("Reply read from {:#04X} failed: {:?}", address, e.kind());
            return self.fail(Error::I2cRead(e));
        }

        if let Err(ChecksumError { computed, received }) = validate_reply_frame(&self.reply[..reply_len]) {
            error!(
                "Bad reply checksum: calculated {:02X}, received {:02X}. Reply: {:02X?}",
                computed,
                received,
                &self.reply[..reply_len]
            );
            return self.fail(Error::Checksum);
        }
        debug!("Reply: {:02X?}", &self.reply[..reply_len]);

        match cmd.id() {
            CMD_ID_GET_FIRMWARE_VERSION => {
                self.version = [self.reply[5], self.reply[4], self.reply[3]];
                debug!(
                    "Firmware version {}.{}.{}",
                    self.version[0], self.version[1], self.version[2]
                );
            }
            CMD_ID_SOFT_RESET | CMD_ID_HARD_RESET | CMD_ID_SAVE_SETTINGS => {
                if self.reply[3] != 0 {
                    error!("Command {:#010X} reported failure", cmd.0);
                    return self.fail(Error::CommandFailed);
                }
            }
            _ => {}
        }

        Ok(())
    }

    pub(crate) fn fail<R>(&mut self, err: Error<B::Error>) -> Result<R, Error<B::Error>> {
        self.status = err.status();
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_fields() {
        assert_eq!(SET_BAUD_RATE.reply_len(), 8);
        assert_eq!(SET_BAUD_RATE.cmd_len(), 8);
        assert_eq!(SET_BAUD_RATE.id(), 0x06);
        assert_eq!(SET_I2C_MODE.payload(), 0x01);
        assert_eq!(SET_I2C_ADDRESS.payload(), TFMP_DEFAULT_ADDRESS);
        assert_eq!(TRIGGER_DETECTION.reply_len(), 0);
    }

    #[test]
    fn id_constants_match_catalog() {
        assert_eq!(GET_FIRMWARE_VERSION.id(), CMD_ID_GET_FIRMWARE_VERSION);
        assert_eq!(SET_FRAME_RATE.id(), CMD_ID_SET_FRAME_RATE);
        assert_eq!(SET_BAUD_RATE.id(), CMD_ID_SET_BAUD_RATE);
        assert_eq!(SET_I2C_ADDRESS.id(), CMD_ID_SET_I2C_ADDRESS);
        assert_eq!(SOFT_RESET.id(), CMD_ID_SOFT_RESET);
        assert_eq!(HARD_RESET.id(), CMD_ID_HARD_RESET);
        assert_eq!(SAVE_SETTINGS.id(), CMD_ID_SAVE_SETTINGS);
    }

    #[test]
    fn error_maps_to_status() {
        let m = Measurement { distance: -1, flux: 10, temperature: 20 };
        assert_eq!(Error::<()>::I2cLength(()).status(), Status::I2cLength);
        assert_eq!(Error::<()>::InvalidParam.status(), Status::CommandFailed);
        assert_eq!(Error::<()>::WeakSignal(m).status(), Status::WeakSignal);
        assert_eq!(Error::<()>::WeakSignal(m).measurement(), Some(m));
        assert_eq!(Error::<()>::Checksum.measurement(), None);
        assert_eq!(format!("{}", Error::<()>::Checksum), "CHECKSUM");
    }
}
