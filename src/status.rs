use core::fmt;

/// Outcome of the last driver operation.
///
/// The numeric codes match the ones used by the Arduino TFMini-Plus
/// libraries so logs can be compared side by side.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready = 0,
    SerialTimeout = 1,
    NoHeader = 2,
    Checksum = 3,
    I2cTimeout = 4,
    CommandPass = 5,
    CommandFailed = 6,
    I2cRead = 7,
    I2cWrite = 8,
    I2cLength = 9,
    /// Signal strength below 100, distance reads -1.
    WeakSignal = 10,
    /// Strength reads -1.
    SignalSaturation = 11,
    /// Distance reads -4.
    AmbientLightSaturation = 12,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "READY",
            Status::SerialTimeout => "SERIAL",
            Status::NoHeader => "HEADER",
            Status::Checksum => "CHECKSUM",
            Status::I2cTimeout => "TIMEOUT",
            Status::CommandPass => "PASS",
            Status::CommandFailed => "FAIL",
            Status::I2cRead => "I2C-READ",
            Status::I2cWrite => "I2C-WRITE",
            Status::I2cLength => "I2C-LENGTH",
            Status::WeakSignal => "Signal weak",
            Status::SignalSaturation => "Signal saturation",
            Status::AmbientLightSaturation => "Ambient light saturation",
        }
    }

    pub fn is_ready(self) -> bool {
        self == Status::Ready
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> Self {
        s as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
