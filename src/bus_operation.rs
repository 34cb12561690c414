use embedded_hal::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};

use crate::{Config, Tfmpi2c};

/// Addressed transport the driver runs its transactions on.
///
/// `write` is one START..STOP write transaction and `read` one START..STOP
/// read transaction. Errors are classified through
/// [`embedded_hal::i2c::Error::kind`].
pub trait BusOperation {
    type Error: embedded_hal::i2c::Error;

    fn read(&mut self, address: SevenBitAddress, rbuf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, address: SevenBitAddress, wbuf: &[u8]) -> Result<(), Self::Error>;
}

pub struct Tfmpi2cI2C<P> {
    i2c: P,
}

impl<P: I2c> Tfmpi2cI2C<P> {
    pub(crate) fn new(i2c: P) -> Self {
        Tfmpi2cI2C { i2c }
    }
}

impl<P: I2c> BusOperation for Tfmpi2cI2C<P> {
    type Error = P::Error;

    #[inline]
    fn read(&mut self, address: SevenBitAddress, rbuf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(address, rbuf)
    }

    #[inline]
    fn write(&mut self, address: SevenBitAddress, wbuf: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, wbuf)
    }
}

impl<P, T> Tfmpi2c<Tfmpi2cI2C<P>, T>
where
    P: I2c,
    T: DelayNs,
{
    pub fn new_i2c(i2c: P, tim: T, config: Config) -> Self {
        Tfmpi2c::with_bus(Tfmpi2cI2C::new(i2c), tim, config)
    }

    /// Gives the bus and the delay back, e.g. to run a bus recovery.
    pub fn release(self) -> (P, T) {
        (self.bus.i2c, self.tim)
    }
}
