//! ### CTRL_REG2 - Secondary control (`0x21` LPS331AP/LPS25H, `0x11` LPS22HB, 1 byte, R/W)
//!
//! Hosts the command bits. BOOT and ONE_SHOT clear themselves once the chip is done. SWRESET clears
//! itself on LPS25H and LPS22HB only; on LPS331AP it must be cleared by writing 0.
#![doc(alias = "CTRL_REG2")]

/// Reboot memory content (reload trimming parameters).
pub const BOOT: u8 = 1 << 7;
/// Software reset.
pub const SWRESET: u8 = 1 << 2;
/// Start a single measurement.
pub const ONE_SHOT: u8 = 1 << 0;

/// A command bit in CTRL_REG2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Boot,
    SoftwareReset,
    OneShot,
}

impl Command {
    pub const fn mask(self) -> u8 {
        match self {
            Command::Boot => BOOT,
            Command::SoftwareReset => SWRESET,
            Command::OneShot => ONE_SHOT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_masks() {
        assert_eq!(0b1000_0000, Command::Boot.mask());
        assert_eq!(0b0000_0100, Command::SoftwareReset.mask());
        assert_eq!(0b0000_0001, Command::OneShot.mask());
    }
}
