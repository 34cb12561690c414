use embedded_hal::i2c::SevenBitAddress;

use crate::consts::{TFMP_DEFAULT_ADDRESS, TFMP_REPLY_DELAY_MS};

/// Driver settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address used by the calls that take none.
    pub address: SevenBitAddress,
    /// Wait between a command and the read of its reply, in milliseconds.
    pub reply_delay_ms: u32,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `address` - The default device address.
    /// * `reply_delay_ms` - The command settling delay.
    pub fn new(address: SevenBitAddress, reply_delay_ms: u32) -> Config {
        Config { address, reply_delay_ms }
    }

    /// Sets the default device address.
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }

    /// Sets the command settling delay.
    ///
    /// Shorter delays than the default are fine for commands that only echo,
    /// but `HARD_RESET` and `SAVE_SETTINGS` erase flash and need the full
    /// 500 ms before the reply is valid.
    pub fn reply_delay_ms(mut self, reply_delay_ms: u32) -> Self {
        self.reply_delay_ms = reply_delay_ms;
        self
    }
}

impl Default for Config {
    /// Factory address `0x10` and a 500 ms settling delay.
    fn default() -> Config {
        Config {
            address: TFMP_DEFAULT_ADDRESS,
            reply_delay_ms: TFMP_REPLY_DELAY_MS,
        }
    }
}
