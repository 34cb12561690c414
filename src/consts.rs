use embedded_hal::i2c::SevenBitAddress;

use crate::Command;

pub const TFMP_DEFAULT_ADDRESS: SevenBitAddress = 0x10;
pub const TFMP_MIN_ADDRESS: SevenBitAddress = 0x01;
pub const TFMP_MAX_ADDRESS: SevenBitAddress = 0x7F;

pub const TFMP_FRAME_SIZE: usize = 9;
pub const TFMP_REPLY_SIZE: usize = 8;
pub const TFMP_COMMAND_MAX: usize = 8;

pub const TFMP_FRAME_HEADER: u8 = 0x59;
pub const TFMP_COMMAND_HEADER: u8 = 0x5A;

/* Worst case is a flash erase on HARD_RESET / SAVE_SETTINGS */
pub const TFMP_REPLY_DELAY_MS: u32 = 500;

/* Bus recovery timing, standard mode (100 kHz) */
pub const TFMP_RECOVERY_CLOCK_PULSES: u8 = 9;
pub const TFMP_RECOVERY_HALF_PERIOD_US: u32 = 5;
pub const TFMP_RECOVERY_STOP_SETUP_US: u32 = 2;

/*
 * Command descriptors, packed little endian as
 *     payload | command id | command length | reply length
 * and handed to `send_command` as is.
 */

// No reply
pub const SET_SERIAL_MODE: Command = Command(0x000A_0500);
pub const SET_I2C_MODE: Command = Command(0x010A_0500);

// Three byte firmware version
pub const GET_FIRMWARE_VERSION: Command = Command(0x0001_0407);

// Echo of the command
pub const SET_FRAME_RATE: Command = Command(0x0003_0606);
pub const STANDARD_FORMAT_CM: Command = Command(0x0105_0505);
pub const STANDARD_FORMAT_MM: Command = Command(0x0605_0505);
pub const SET_BAUD_RATE: Command = Command(0x0006_0808);
pub const ENABLE_OUTPUT: Command = Command(0x0107_0505);
pub const DISABLE_OUTPUT: Command = Command(0x0007_0505);
pub const SET_I2C_ADDRESS: Command = Command(0x100B_0505);

// Echo plus a pass(0) / fail(1) byte
pub const SOFT_RESET: Command = Command(0x0002_0405);
pub const HARD_RESET: Command = Command(0x0010_0405);
pub const SAVE_SETTINGS: Command = Command(0x0011_0405);

// Data frame is read back separately
pub const I2C_FORMAT_CM: Command = Command(0x0100_0500);
pub const I2C_FORMAT_MM: Command = Command(0x0600_0500);
pub const TRIGGER_DETECTION: Command = Command(0x0004_0400);

// Ids the driver treats specially
pub const CMD_ID_GET_FIRMWARE_VERSION: u8 = 0x01;
pub const CMD_ID_SOFT_RESET: u8 = 0x02;
pub const CMD_ID_SET_FRAME_RATE: u8 = 0x03;
pub const CMD_ID_SET_BAUD_RATE: u8 = 0x06;
pub const CMD_ID_SET_I2C_ADDRESS: u8 = 0x0B;
pub const CMD_ID_HARD_RESET: u8 = 0x10;
pub const CMD_ID_SAVE_SETTINGS: u8 = 0x11;

/* Parameters, mostly meaningful in UART mode */
pub const BAUD_9600: u32 = 0x00_2580;
pub const BAUD_14400: u32 = 0x00_3840;
pub const BAUD_19200: u32 = 0x00_4B00;
pub const BAUD_56000: u32 = 0x00_DAC0;
pub const BAUD_115200: u32 = 0x01_C200;
pub const BAUD_460800: u32 = 0x07_0800;
pub const BAUD_921600: u32 = 0x0E_1000;

pub const FRAME_0: u16 = 0x0000;
pub const FRAME_1: u16 = 0x0001;
pub const FRAME_2: u16 = 0x0002;
pub const FRAME_5: u16 = 0x0005;
pub const FRAME_10: u16 = 0x000A;
pub const FRAME_20: u16 = 0x0014;
pub const FRAME_25: u16 = 0x0019;
pub const FRAME_50: u16 = 0x0032;
pub const FRAME_100: u16 = 0x0064;
pub const FRAME_125: u16 = 0x007D;
pub const FRAME_200: u16 = 0x00C8;
pub const FRAME_250: u16 = 0x00FA;
pub const FRAME_500: u16 = 0x01F4;
pub const FRAME_1000: u16 = 0x03E8;
