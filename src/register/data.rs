//! ### PRESS_OUT / TEMP_OUT - Output registers (`0x28 - 0x2C`, R)
//!
//! | Address | Register     |
//! |---------|--------------|
//! | `0x28`  | PRESS_OUT_XL |
//! | `0x29`  | PRESS_OUT_L  |
//! | `0x2A`  | PRESS_OUT_H  |
//! | `0x2B`  | TEMP_OUT_L   |
//! | `0x2C`  | TEMP_OUT_H   |
//!
//! All values are little-endian. With block data update (BDU) enabled the chip only latches a new
//! sample once PRESS_OUT_H has been read, so PRESS_OUT_H must be the last address read: read
//! [`TempOut`] first, then [`PressOut`].
use crate::measurement::{raw_pressure, raw_temperature};
use crate::register::{Readable, Reg, AUTO_INCREMENT};

/// Marker struct for TEMP_OUT_L..TEMP_OUT_H (0x2B - 0x2C), read as one burst.
///
/// - **Length:** 2 bytes
/// - **Access:** Read-only
pub struct TempOut;
impl Reg for TempOut { const ADDR: u8 = 0x2B | AUTO_INCREMENT; }

impl Readable for TempOut {
    type Out = i16;
    const N: usize = 2;

    fn decode(b: &[u8]) -> Self::Out {
        raw_temperature([b[0], b[1]])
    }
}

/// Marker struct for PRESS_OUT_XL..PRESS_OUT_H (0x28 - 0x2A), read as one burst.
///
/// The value is the raw 24-bit count in 1/4096 hPa. It is not sign-extended.
///
/// - **Length:** 3 bytes
/// - **Access:** Read-only
pub struct PressOut;
impl Reg for PressOut { const ADDR: u8 = 0x28 | AUTO_INCREMENT; }

impl Readable for PressOut {
    type Out = u32;
    const N: usize = 3;

    fn decode(b: &[u8]) -> Self::Out {
        raw_pressure([b[0], b[1], b[2]])
    }
}

/// Marker struct for the whole PRESS_OUT_XL..TEMP_OUT_H block (0x28 - 0x2C).
///
/// Reading it is only used to clear STATUS_REG after an LPS331AP software reset; the content is
/// discarded.
///
/// - **Length:** 5 bytes
/// - **Access:** Read-only
pub struct PressTempOut;
impl Reg for PressTempOut { const ADDR: u8 = 0x28 | AUTO_INCREMENT; }

impl Readable for PressTempOut {
    type Out = ();
    const N: usize = 5;

    fn decode(_: &[u8]) -> Self::Out {}
}
