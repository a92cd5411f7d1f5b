//! Bus capabilities the driver can talk through.
//!
//! The LPS family speaks two framings on the wire:
//! - I2C is *address-framed*: the register index is written as a single byte and the reply is read back.
//! - SPI is *flag-framed*: bit 7 of the address byte is the read flag, and every read clocks out one
//!   leading byte that is discarded.
//!
//! [`Bus`] only needs a raw `transact(write, read)` primitive. How register accesses are laid out on
//! the wire is decided by [`Frame`], based on [`Bus::kind`].

use embedded_hal::i2c::SevenBitAddress;

/// Largest register burst the driver issues (PRESS_OUT_XL..TEMP_OUT_H).
pub const MAX_REG_BYTES: usize = 5;

/// Largest frame that can appear on the wire: address byte + burst.
pub const MAX_FRAME_BYTES: usize = MAX_REG_BYTES + 1;

const READ_FLAG: u8 = 0x80;

/// How register accesses are framed on a given bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusKind {
    /// Address byte written, reply read back. Used by I2C.
    AddressFramed,
    /// Read/write flag in bit 7 of the address, one echo byte ahead of every reply. Used by SPI.
    FlagFramed,
}

impl BusKind {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            BusKind::AddressFramed => "address-framed",
            BusKind::FlagFramed => "flag-framed",
        }
    }
}

/// A raw transaction primitive.
///
/// Implementations must perform `write` followed by a read filling `read` as a single bus
/// transaction. An empty `read` means the transaction is a pure write.
pub trait Bus {
    type Error;

    /// The framing this bus requires. Must not change over the lifetime of the bus.
    fn kind(&self) -> BusKind;

    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> impl Future<Output = Result<(), Self::Error>>;
}

/// I2C bus wrapper holding the 7-bit device address.
pub struct I2c<I2cType> {
    i2c: I2cType,
    address: SevenBitAddress,
}

impl<I2cType> I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    pub(crate) fn new(i2c: I2cType, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    pub fn release(self) -> I2cType {
        self.i2c
    }
}

impl<I2cType> Bus for I2c<I2cType>
where
    I2cType: embedded_hal_async::i2c::I2c,
{
    type Error = <I2cType as embedded_hal_async::i2c::ErrorType>::Error;

    fn kind(&self) -> BusKind {
        BusKind::AddressFramed
    }

    async fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        if read.is_empty() {
            self.i2c.write(self.address, write).await
        } else {
            self.i2c.write_read(self.address, write, read).await
        }
    }
}

/// SPI bus wrapper. Chip select is handled by the [`SpiDevice`](embedded_hal_async::spi::SpiDevice).
pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    pub(crate) fn new(spi: SpiType) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SpiType {
        self.spi
    }
}

impl<SpiType> Bus for Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    type Error = <SpiType as embedded_hal_async::spi::ErrorType>::Error;

    fn kind(&self) -> BusKind {
        BusKind::FlagFramed
    }

    async fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        if read.is_empty() {
            self.spi.write(write).await
        } else {
            self.spi.transfer(read, write).await
        }
    }
}

/// The bytes of one register access, laid out for a specific [`BusKind`].
///
/// `tx[..tx_len]` is what goes out on the wire, `rx_len` how many bytes come back and `skip` how
/// many of those leading bytes carry no register data.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Frame {
    tx: [u8; MAX_FRAME_BYTES],
    tx_len: usize,
    rx_len: usize,
    skip: usize,
}

impl Frame {
    /// Frames a read of `len` bytes starting at `addr`.
    ///
    /// `len` is capped at [`MAX_REG_BYTES`].
    pub(crate) fn read(kind: BusKind, addr: u8, len: usize) -> Self {
        let len = len.min(MAX_REG_BYTES);
        let mut tx = [0u8; MAX_FRAME_BYTES];
        match kind {
            BusKind::AddressFramed => {
                tx[0] = addr;
                Frame { tx, tx_len: 1, rx_len: len, skip: 0 }
            }
            BusKind::FlagFramed => {
                // The remaining clocked-out bytes are ignored by the chip.
                tx[0] = addr | READ_FLAG;
                Frame { tx, tx_len: len + 1, rx_len: len + 1, skip: 1 }
            }
        }
    }

    /// Frames a single `(addr, value)` write.
    pub(crate) fn write(kind: BusKind, addr: u8, value: u8) -> Self {
        let addr = match kind {
            BusKind::AddressFramed => addr,
            BusKind::FlagFramed => addr & !READ_FLAG,
        };
        let mut tx = [0u8; MAX_FRAME_BYTES];
        tx[0] = addr;
        tx[1] = value;
        Frame { tx, tx_len: 2, rx_len: 0, skip: 0 }
    }

    pub(crate) fn tx(&self) -> &[u8] {
        &self.tx[..self.tx_len]
    }

    pub(crate) fn rx_len(&self) -> usize {
        self.rx_len
    }

    /// Copies the register payload out of a raw reply into `out`.
    pub(crate) fn unpack(&self, rx: &[u8], out: &mut [u8]) {
        out.copy_from_slice(&rx[self.skip..self.rx_len]);
    }
}
