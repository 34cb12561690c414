//! Command and data frame encoding, pure and bus independent.
//!
//! ```text
//! Data frame (device -> host), 9 bytes:
//!   0x59  0x59  Dist_L  Dist_H  Flux_L  Flux_H  Temp_L  Temp_H  CheckSum
//!
//! Command frame (host -> device), 3 to 8 bytes:
//!   0x5A  Length  Cmd_ID  [Payload ...]  CheckSum
//! ```
//! Every checksum is the low byte of the sum of all preceding bytes.

use consts::*;
use utils::*;

use crate::{consts, utils, Command, Status};

/// One decoded data frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Measurement {
    /// Distance to target, centimeters in the default format.
    pub distance: i16,
    /// Strength of the returned signal in arbitrary units, -1 when saturated.
    pub flux: i16,
    /// Chip temperature in degrees Celsius.
    pub temperature: i16,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChecksumError {
    pub computed: u8,
    pub received: u8,
}

/// A command ready to be written on the bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: [u8; TFMP_COMMAND_MAX],
    len: usize,
    reply_len: usize,
}

impl CommandFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of reply bytes the device sends back, 0 if none.
    pub fn reply_len(&self) -> usize {
        self.reply_len
    }
}

/// Encodes `cmd` into a command frame.
///
/// Only `SET_I2C_ADDRESS` (1 byte), `SET_FRAME_RATE` (2 bytes) and
/// `SET_BAUD_RATE` (4 bytes) carry `param`; it is ignored for every other
/// command id. Descriptors claiming more than 8 bytes are clamped.
pub fn build_command_frame(cmd: Command, param: u32) -> CommandFrame {
    let mut bytes: [u8; TFMP_COMMAND_MAX] = [0; TFMP_COMMAND_MAX];
    bytes[..4].copy_from_slice(&cmd.0.to_le_bytes());
    let len = (cmd.cmd_len() as usize).min(TFMP_COMMAND_MAX);
    let reply_len = (cmd.reply_len() as usize).min(TFMP_REPLY_SIZE);

    bytes[0] = TFMP_COMMAND_HEADER;

    match cmd.id() {
        CMD_ID_SET_I2C_ADDRESS => from_u32_to_u8(param, &mut bytes[3..4]),
        CMD_ID_SET_FRAME_RATE => from_u32_to_u8(param, &mut bytes[3..5]),
        CMD_ID_SET_BAUD_RATE => from_u32_to_u8(param, &mut bytes[3..7]),
        _ => {}
    }

    if len > 0 {
        bytes[len - 1] = checksum(&bytes[..len - 1]);
    }

    CommandFrame { bytes, len, reply_len }
}

/// Checks and decodes a 9 byte data frame.
///
/// The returned status is advisory: a frame with a valid checksum always
/// decodes, even when the device flags the reading as unusable.
pub fn validate_data_frame(
    frame: &[u8; TFMP_FRAME_SIZE],
) -> Result<(Measurement, Status), ChecksumError> {
    let computed = checksum(&frame[..TFMP_FRAME_SIZE - 1]);
    let received = frame[TFMP_FRAME_SIZE - 1];
    if computed != received {
        return Err(ChecksumError { computed, received });
    }

    let mut words: [i16; 3] = [0; 3];
    from_u8_to_i16(&frame[2..8], &mut words);

    let data = Measurement {
        distance: words[0],
        flux: words[1],
        // Device reports eighths of a degree, offset by 256
        temperature: (words[2] >> 3) - 256,
    };

    Ok((data, classify(&data)))
}

/// Checks the trailing checksum of a command reply and returns it unchanged.
pub fn validate_reply_frame(reply: &[u8]) -> Result<&[u8], ChecksumError> {
    let Some((&received, body)) = reply.split_last() else {
        return Ok(reply);
    };
    let computed = checksum(body);
    if computed != received {
        return Err(ChecksumError { computed, received });
    }
    Ok(reply)
}

/// Abnormal data codes from the TFMini-S product manual, first match wins.
pub fn classify(data: &Measurement) -> Status {
    if data.distance == -1 {
        Status::WeakSignal
    } else if data.flux == -1 {
        Status::SignalSaturation
    } else if data.distance == -4 {
        Status::AmbientLightSaturation
    } else {
        Status::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_frame(dist: i16, flux: i16, temp_raw: i16) -> [u8; TFMP_FRAME_SIZE] {
        let mut f = [0u8; TFMP_FRAME_SIZE];
        f[0] = TFMP_FRAME_HEADER;
        f[1] = TFMP_FRAME_HEADER;
        f[2..4].copy_from_slice(&dist.to_le_bytes());
        f[4..6].copy_from_slice(&flux.to_le_bytes());
        f[6..8].copy_from_slice(&temp_raw.to_le_bytes());
        f[8] = checksum(&f[..8]);
        f
    }

    #[test]
    fn every_catalog_frame_ends_with_its_checksum() {
        let catalog = [
            SET_SERIAL_MODE,
            SET_I2C_MODE,
            GET_FIRMWARE_VERSION,
            SET_FRAME_RATE,
            STANDARD_FORMAT_CM,
            STANDARD_FORMAT_MM,
            SET_BAUD_RATE,
            ENABLE_OUTPUT,
            DISABLE_OUTPUT,
            SET_I2C_ADDRESS,
            SOFT_RESET,
            HARD_RESET,
            SAVE_SETTINGS,
            I2C_FORMAT_CM,
            I2C_FORMAT_MM,
            TRIGGER_DETECTION,
        ];
        for cmd in catalog {
            for param in [0, 0x20, 0x01F4, 0x0001_C200, u32::MAX] {
                let frame = build_command_frame(cmd, param);
                let bytes = frame.as_bytes();
                assert_eq!(bytes.len(), cmd.cmd_len() as usize);
                assert_eq!(bytes[0], TFMP_COMMAND_HEADER);
                assert_eq!(bytes[1] as usize, bytes.len());
                let (last, body) = bytes.split_last().unwrap();
                assert_eq!(*last, checksum(body), "{:?} {:#x}", cmd, param);
            }
        }
    }

    #[test]
    fn known_wire_encodings() {
        assert_eq!(
            build_command_frame(I2C_FORMAT_CM, 0).as_bytes(),
            &[0x5A, 0x05, 0x00, 0x01, 0x60]
        );
        assert_eq!(
            build_command_frame(GET_FIRMWARE_VERSION, 0).as_bytes(),
            &[0x5A, 0x04, 0x01, 0x5F]
        );
        assert_eq!(
            build_command_frame(SOFT_RESET, 0).as_bytes(),
            &[0x5A, 0x04, 0x02, 0x60]
        );
        assert_eq!(
            build_command_frame(SAVE_SETTINGS, 0).as_bytes(),
            &[0x5A, 0x04, 0x11, 0x6F]
        );
    }

    #[test]
    fn parameter_width_follows_command_id() {
        let addr = build_command_frame(SET_I2C_ADDRESS, 0x0000_1234);
        assert_eq!(addr.as_bytes(), &[0x5A, 0x05, 0x0B, 0x34, 0x9E]);
        assert_eq!(addr.reply_len(), 5);

        let rate = build_command_frame(SET_FRAME_RATE, u32::from(FRAME_500));
        assert_eq!(rate.as_bytes(), &[0x5A, 0x06, 0x03, 0xF4, 0x01, 0x58]);

        let baud = build_command_frame(SET_BAUD_RATE, BAUD_115200);
        assert_eq!(
            baud.as_bytes(),
            &[0x5A, 0x08, 0x06, 0x00, 0xC2, 0x01, 0x00, 0x2B]
        );

        // Parameter is ignored by commands that take none
        assert_eq!(
            build_command_frame(ENABLE_OUTPUT, 0xFFFF_FFFF),
            build_command_frame(ENABLE_OUTPUT, 0)
        );
    }

    #[test]
    fn oversized_descriptor_is_clamped() {
        let frame = build_command_frame(Command(0xFFFF_FFFF), 0);
        assert_eq!(frame.len(), TFMP_COMMAND_MAX);
        assert_eq!(frame.reply_len(), TFMP_REPLY_SIZE);
        let empty = build_command_frame(Command(0), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn data_frame_decodes_fields() {
        // 25 degrees: (25 + 256) << 3
        let frame = data_frame(123, 4567, (25 + 256) << 3);
        let (data, status) = validate_data_frame(&frame).unwrap();
        assert_eq!(
            data,
            Measurement { distance: 123, flux: 4567, temperature: 25 }
        );
        assert_eq!(status, Status::Ready);
    }

    #[test]
    fn temperature_drops_fraction_bits() {
        let (data, _) = validate_data_frame(&data_frame(10, 10, 0x0807)).unwrap();
        assert_eq!(data.temperature, (0x0807 >> 3) - 256);
        let (cold, _) = validate_data_frame(&data_frame(10, 10, 0x07C0)).unwrap();
        assert_eq!(cold.temperature, -8);
    }

    #[test]
    fn data_frame_valid_iff_checksum_matches() {
        let good = data_frame(300, 2000, 0x0900);
        for wrong in 0..=255u8 {
            let mut f = good;
            f[8] = wrong;
            assert_eq!(validate_data_frame(&f).is_ok(), wrong == good[8]);
        }

        let mut corrupted = good;
        corrupted[3] ^= 0x01;
        let err = validate_data_frame(&corrupted).unwrap_err();
        assert_eq!(err.received, good[8]);
        assert_ne!(err.computed, err.received);
    }

    #[test]
    fn classification_priority() {
        let at = |distance, flux| classify(&Measurement { distance, flux, temperature: 0 });
        assert_eq!(at(-1, -1), Status::WeakSignal);
        assert_eq!(at(-1, 50), Status::WeakSignal);
        assert_eq!(at(-2, -1), Status::SignalSaturation);
        assert_eq!(at(-4, -1), Status::SignalSaturation);
        assert_eq!(at(-4, 500), Status::AmbientLightSaturation);
        assert_eq!(at(-2, 500), Status::Ready);
        assert_eq!(at(0, 0), Status::Ready);
        assert_eq!(at(1200, 32767), Status::Ready);
    }

    #[test]
    fn advisory_status_still_decodes() {
        let (data, status) = validate_data_frame(&data_frame(-4, 800, 0x0900)).unwrap();
        assert_eq!(data.distance, -4);
        assert_eq!(status, Status::AmbientLightSaturation);
    }

    #[test]
    fn reply_checksum() {
        let reply = [0x5A, 0x07, 0x01, 0x01, 0x02, 0x03, 0x68];
        assert_eq!(validate_reply_frame(&reply), Ok(&reply[..]));

        let bad = [0x5A, 0x05, 0x02, 0x00, 0x00];
        assert_eq!(
            validate_reply_frame(&bad),
            Err(ChecksumError { computed: 0x61, received: 0x00 })
        );

        assert!(validate_reply_frame(&[]).unwrap().is_empty());
    }
}
