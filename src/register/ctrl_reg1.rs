//! ### CTRL_REG1 - Primary control (`0x20` LPS331AP/LPS25H, `0x10` LPS22HB, 1 byte, R/W)
//!
//! Power state, output data rate and block data update.
//!
//! | Bit   | LPS331AP / LPS25H | LPS22HB    |
//! |-------|-------------------|------------|
//! | 7     | PD (power down)   | reserved   |
//! | 6..4  | ODR               | ODR        |
//! | 2     | BDU               | reserved   |
//!
//! Writing an ODR of 0 selects one-shot operation; a non-zero ODR makes the chip free-run.
#![doc(alias = "CTRL_REG1")]

/// Active mode (`1`) vs power-down (`0`). Not present on LPS22HB.
pub const PD: u8 = 1 << 7;
/// Block data update: output registers are not updated until PRESS_OUT_H has been read.
pub const BDU: u8 = 1 << 2;

const ODR_SHIFT: u8 = 4;
const ODR_MASK: u8 = 0b111;

/// Everything off. Used to bring the chip to a clean state before a one-shot measurement.
pub const POWER_DOWN: u8 = 0;

/// Powered up, ODR = one-shot, BDU on.
pub const ONE_SHOT_READY: u8 = PD | BDU;

/// Decoded CTRL_REG1 contents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlReg1 {
    pub power_up: bool,
    pub odr: u8,
    pub bdu: bool,
}

impl CtrlReg1 {
    /// The value written to start continuous sampling: `PD << 7 | ODR << 4`.
    ///
    /// On chips without a power-down bit, bit 7 stays clear.
    pub fn continuous(power_down_bit: bool, odr: u8) -> u8 {
        CtrlReg1 { power_up: power_down_bit, odr, bdu: false }.into()
    }
}

impl From<u8> for CtrlReg1 {
    fn from(v: u8) -> Self {
        Self {
            power_up: v & PD != 0,
            odr: (v >> ODR_SHIFT) & ODR_MASK,
            bdu: v & BDU != 0,
        }
    }
}

impl From<CtrlReg1> for u8 {
    fn from(v: CtrlReg1) -> Self {
        let mut value = (v.odr & ODR_MASK) << ODR_SHIFT;
        if v.power_up {
            value |= PD;
        }
        if v.bdu {
            value |= BDU;
        }
        value
    }
}
