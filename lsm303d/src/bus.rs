//! Two-wire bus transactions.
//!
//! Every register access opens the channel, selects the slave, performs one
//! write and/or one read, then closes the channel again by dropping the
//! handle. Nothing is held open between calls. A persistent handle would save
//! the open/select per access but must keep the blocking one-transaction-per-call
//! error behaviour.

use core::fmt::Debug;

use embedded_hal::i2c::{I2c, SevenBitAddress};
use log::trace;

use crate::registers::AUTO_INCREMENT;

/// Source of bus channels, e.g. the `/dev/i2c-N` nodes of a Linux host.
pub trait I2cTransport {
    type Error: Debug;
    type Handle<'a>: I2cHandle<Error = Self::Error>
    where
        Self: 'a;

    fn open(&mut self, channel: u8) -> Result<Self::Handle<'_>, Self::Error>;
}

/// An open channel. Dropping it closes the channel.
pub trait I2cHandle {
    type Error: Debug;

    fn select(&mut self, address: SevenBitAddress) -> Result<(), Self::Error>;
    /// Returns the number of bytes the bus accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;
    /// Returns the number of bytes the bus delivered.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum BusError<E> {
    Open(E),
    Select(E),
    Transfer(E),
    ShortWrite { expected: usize, actual: usize },
    ShortRead { expected: usize, actual: usize },
}

/// Transport bound to one channel and one slave address.
pub struct Bus<T> {
    transport: T,
    channel: u8,
    address: SevenBitAddress,
}

impl<T: I2cTransport> Bus<T> {
    pub fn new(transport: T, channel: u8, address: SevenBitAddress) -> Self {
        Self { transport, channel, address }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn destroy(self) -> T {
        self.transport
    }

    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError<T::Error>> {
        trace!("bus {} @{:#04x}: write {:#04x} = {:#04x}", self.channel, self.address, reg, value);
        let mut handle = self.transport.open(self.channel).map_err(BusError::Open)?;
        handle.select(self.address).map_err(BusError::Select)?;

        let frame = [reg, value];
        let written = handle.write(&frame).map_err(BusError::Transfer)?;
        if written != frame.len() {
            return Err(BusError::ShortWrite { expected: frame.len(), actual: written });
        }
        Ok(())
    }

    /// Fills `buffer` starting at `reg`. More than one byte is a burst read.
    pub fn read_registers(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), BusError<T::Error>> {
        let pointer = if buffer.len() > 1 { reg | AUTO_INCREMENT } else { reg };
        trace!("bus {} @{:#04x}: read {:#04x} x{}", self.channel, self.address, reg, buffer.len());

        let mut handle = self.transport.open(self.channel).map_err(BusError::Open)?;
        handle.select(self.address).map_err(BusError::Select)?;

        let written = handle.write(&[pointer]).map_err(BusError::Transfer)?;
        if written != 1 {
            return Err(BusError::ShortWrite { expected: 1, actual: written });
        }

        let read = handle.read(buffer).map_err(BusError::Transfer)?;
        if read != buffer.len() {
            return Err(BusError::ShortRead { expected: buffer.len(), actual: read });
        }
        Ok(())
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, BusError<T::Error>> {
        let mut buf = [0u8];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum HalBusError<E> {
    I2c(E),
    NoSuchChannel(u8),
    NoSlaveSelected,
}

/// Exposes one embedded-hal I2C peripheral as channel `channel`.
pub struct HalTransport<I2C> {
    i2c: I2C,
    channel: u8,
}

impl<I2C> HalTransport<I2C> {
    pub fn new(i2c: I2C, channel: u8) -> Self {
        Self { i2c, channel }
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn destroy(self) -> I2C {
        self.i2c
    }
}

pub struct HalHandle<'a, I2C> {
    i2c: &'a mut I2C,
    address: Option<SevenBitAddress>,
}

impl<I2C: I2c> I2cTransport for HalTransport<I2C> {
    type Error = HalBusError<I2C::Error>;
    type Handle<'a> = HalHandle<'a, I2C> where Self: 'a;

    fn open(&mut self, channel: u8) -> Result<Self::Handle<'_>, Self::Error> {
        if channel != self.channel {
            return Err(HalBusError::NoSuchChannel(channel));
        }
        Ok(HalHandle { i2c: &mut self.i2c, address: None })
    }
}

impl<I2C: I2c> I2cHandle for HalHandle<'_, I2C> {
    type Error = HalBusError<I2C::Error>;

    fn select(&mut self, address: SevenBitAddress) -> Result<(), Self::Error> {
        self.address = Some(address);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let address = self.address.ok_or(HalBusError::NoSlaveSelected)?;
        self.i2c.write(address, bytes).map_err(HalBusError::I2c)?;
        Ok(bytes.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let address = self.address.ok_or(HalBusError::NoSlaveSelected)?;
        self.i2c.read(address, buffer).map_err(HalBusError::I2c)?;
        Ok(buffer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

    const ADDR: u8 = 0x1D;

    #[test]
    fn single_read_leaves_auto_increment_clear() {
        let expectations = [
            Transaction::write(ADDR, vec![0x0F]),
            Transaction::read(ADDR, vec![0x49]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = Bus::new(HalTransport::new(i2c.clone(), 1), 1, ADDR);

        assert_eq!(bus.read_register(0x0F), Ok(0x49));
        i2c.done();
    }

    #[test]
    fn burst_read_sets_auto_increment() {
        let expectations = [
            Transaction::write(ADDR, vec![0x05 | 0x80]),
            Transaction::read(ADDR, vec![1, 2, 3]),
        ];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = Bus::new(HalTransport::new(i2c.clone(), 1), 1, ADDR);

        let mut buf = [0u8; 3];
        bus.read_registers(0x05, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
        i2c.done();
    }

    #[test]
    fn register_write_is_one_two_byte_frame() {
        let expectations = [Transaction::write(ADDR, vec![0x20, 0x57])];
        let mut i2c = I2cMock::new(&expectations);
        let mut bus = Bus::new(HalTransport::new(i2c.clone(), 1), 1, ADDR);

        bus.write_register(0x20, 0x57).unwrap();
        i2c.done();
    }

    #[test]
    fn unknown_channel_fails_to_open() {
        let mut i2c = I2cMock::new(&[]);
        let mut bus = Bus::new(HalTransport::new(i2c.clone(), 1), 2, ADDR);

        assert_eq!(
            bus.write_register(0x20, 0x00),
            Err(BusError::Open(HalBusError::NoSuchChannel(2)))
        );
        i2c.done();
    }
}
