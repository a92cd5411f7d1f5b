//! ### WHO_AM_I - Device identification (`0x0F`, 1 byte, R)
//!
//! Holds a fixed id byte that tells the chips of the family apart:
//!
//! | Chip     | Value  |
//! |----------|--------|
//! | LPS331AP | `0xBB` |
//! | LPS25H   | `0xBD` |
//! | LPS22HB  | `0xB1` |
#![doc(alias = "WHO_AM_I")]
use crate::register::{Readable, Reg};

/// Marker struct for the WHO_AM_I (0x0F) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct WhoAmI;
impl Reg for WhoAmI { const ADDR: u8 = 0x0F; }

impl Readable for WhoAmI {
    type Out = u8;
    fn decode(b: &[u8]) -> Self::Out {
        b[0]
    }
}
