//! Register catalog shared by the LPS331AP, LPS25H and LPS22HB.
//!
//! Only the identification and output registers sit at the same address on every chip, so only those
//! get typed markers. The control registers move between chips; their addresses come from the
//! resolved [`RegisterMap`](crate::variant::RegisterMap) and their contents are modelled by
//! [`ctrl_reg1`] and [`ctrl_reg2`].

pub mod ctrl_reg1;
pub mod ctrl_reg2;
pub mod data;
pub mod who_am_i;

/// Bit 7 of the I2C sub-address: register auto-increment for burst reads.
///
/// On SPI bit 7 is the read flag, and the LPS331AP/LPS25H auto-increment bit is bit 6 (`MS`),
/// which the burst addresses here do not set.
pub const AUTO_INCREMENT: u8 = 0x80;

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Self::Out;
}
