//! Chip identity and the per-chip register map.
//!
//! The three supported chips share the command protocol but disagree on where the control registers
//! live, which data rate code continuous sampling uses, whether CTRL_REG1 has a power-down bit and how
//! TEMP_OUT is scaled. All of that is captured once in a static [`Descriptor`] per chip.

use crate::bus::Bus;
use crate::error::ErrorKind;
use crate::measurement::Temperature;
use crate::observer::Observer;
use crate::register::ctrl_reg1::CtrlReg1;
use crate::register::who_am_i::WhoAmI;
use crate::transport::{Transport, TransportResult};

/// Where the control registers of a chip live. `res_conf` is `None` on chips without RES_CONF.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMap {
    pub ctrl_reg1: u8,
    pub ctrl_reg2: u8,
    pub res_conf: Option<u8>,
}

/// How a software reset completes on a chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetStrategy {
    /// SWRESET clears itself; poll it like any other command bit.
    SelfClearing,
    /// SWRESET stays set: write it, wait, clear it by hand, wait, then flush the output registers.
    Sequenced,
}

/// Everything that differs between chips of the family.
#[derive(Debug)]
pub struct Descriptor {
    pub name: &'static str,
    pub who_am_i: u8,
    pub registers: RegisterMap,
    /// ODR code written by continuous-mode initialisation.
    pub odr: u8,
    /// CTRL_REG1 bit 7 is a power-down control on this chip.
    pub power_down_bit: bool,
    /// RES_CONF value selecting the high-precision averaging used in one-shot mode.
    pub averaging: Option<u8>,
    pub reset: ResetStrategy,
    pub temperature: fn(i16) -> Temperature,
}

const ZERO_CELSIUS: Temperature = Temperature::from_nano_celsius(0);

fn lps331ap_temperature(raw: i16) -> Temperature {
    // 42.5 °C + raw / 480
    Temperature::from_counts(Temperature::from_nano_celsius(42_500_000_000), raw, 480)
}

fn lps2x_temperature(raw: i16) -> Temperature {
    Temperature::from_counts(ZERO_CELSIUS, raw, 100)
}

static LPS331AP: Descriptor = Descriptor {
    name: "LPS331AP",
    who_am_i: 0xBB,
    registers: RegisterMap { ctrl_reg1: 0x20, ctrl_reg2: 0x21, res_conf: Some(0x10) },
    odr: 0b110, // 12.5 Hz
    power_down_bit: true,
    // AVGT = 0b111 (128), AVGP = 0b1010 (512)
    averaging: Some(0b0111_1010),
    reset: ResetStrategy::Sequenced,
    temperature: lps331ap_temperature,
};

static LPS25H: Descriptor = Descriptor {
    name: "LPS25H",
    who_am_i: 0xBD,
    registers: RegisterMap { ctrl_reg1: 0x20, ctrl_reg2: 0x21, res_conf: Some(0x10) },
    odr: 0b011, // 12.5 Hz
    power_down_bit: true,
    // AVGT = 0b11 (64), AVGP = 0b11 (512)
    averaging: Some(0b0000_1111),
    reset: ResetStrategy::SelfClearing,
    temperature: lps2x_temperature,
};

static LPS22HB: Descriptor = Descriptor {
    name: "LPS22HB",
    who_am_i: 0xB1,
    registers: RegisterMap { ctrl_reg1: 0x10, ctrl_reg2: 0x11, res_conf: None },
    odr: 0b110,
    power_down_bit: false,
    averaging: None,
    reset: ResetStrategy::SelfClearing,
    temperature: lps2x_temperature,
};

/// A supported chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipVariant {
    Lps331ap,
    Lps25h,
    Lps22hb,
}

impl ChipVariant {
    pub const ALL: [ChipVariant; 3] = [ChipVariant::Lps331ap, ChipVariant::Lps25h, ChipVariant::Lps22hb];

    /// Maps a WHO_AM_I value to a chip, if it is one of ours.
    pub fn from_who_am_i(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.who_am_i() == id)
    }

    pub fn descriptor(&self) -> &'static Descriptor {
        match self {
            ChipVariant::Lps331ap => &LPS331AP,
            ChipVariant::Lps25h => &LPS25H,
            ChipVariant::Lps22hb => &LPS22HB,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn who_am_i(&self) -> u8 {
        self.descriptor().who_am_i
    }

    pub fn register_map(&self) -> RegisterMap {
        self.descriptor().registers
    }

    pub fn output_data_rate(&self) -> u8 {
        self.descriptor().odr
    }

    pub fn has_power_down_bit(&self) -> bool {
        self.descriptor().power_down_bit
    }

    /// CTRL_REG1 value for continuous sampling: `PD << 7 | ODR << 4`.
    pub fn initial_control_byte(&self) -> u8 {
        let d = self.descriptor();
        CtrlReg1::continuous(d.power_down_bit, d.odr)
    }

    pub fn averaging_code(&self) -> Option<u8> {
        self.descriptor().averaging
    }

    pub fn reset_strategy(&self) -> ResetStrategy {
        self.descriptor().reset
    }

    /// Converts a raw TEMP_OUT count with this chip's scale.
    pub fn convert_temperature(&self, raw: i16) -> Temperature {
        (self.descriptor().temperature)(raw)
    }
}

/// Current contents of the control registers. `res_conf` is `None` on chips without RES_CONF.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegisters {
    pub ctrl_reg1: u8,
    pub ctrl_reg2: u8,
    pub res_conf: Option<u8>,
}

impl ControlRegisters {
    /// CTRL_REG1 split into its fields.
    pub fn ctrl_reg1_fields(&self) -> CtrlReg1 {
        CtrlReg1::from(self.ctrl_reg1)
    }
}

/// Reads WHO_AM_I and maps it to a [`ChipVariant`].
pub(crate) async fn identify<B: Bus, O: Observer>(transport: &mut Transport<B, O>) -> TransportResult<ChipVariant, B::Error> {
    let id = transport.read::<WhoAmI>().await?;
    let variant = ChipVariant::from_who_am_i(id).ok_or(ErrorKind::UnsupportedChip(id))?;

    transport.observer().chip_identified(variant, variant.initial_control_byte());

    Ok(variant)
}

/// Reads CTRL_REG1, CTRL_REG2 and, where present, RES_CONF and reports them to the observer.
pub(crate) async fn read_control_registers<B: Bus, O: Observer>(
    transport: &mut Transport<B, O>,
    variant: ChipVariant,
) -> TransportResult<ControlRegisters, B::Error> {
    let map = variant.register_map();
    let mut b = [0u8; 1];

    transport.read_register(map.ctrl_reg1, &mut b).await?;
    let ctrl_reg1 = b[0];

    transport.read_register(map.ctrl_reg2, &mut b).await?;
    let ctrl_reg2 = b[0];

    let res_conf = match map.res_conf {
        Some(addr) => {
            transport.read_register(addr, &mut b).await?;
            Some(b[0])
        }
        None => None,
    };

    let regs = ControlRegisters { ctrl_reg1, ctrl_reg2, res_conf };
    transport.observer().control_registers(variant, &regs);

    Ok(regs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::testing::{FakeBus, Op};

    #[test]
    fn who_am_i_mapping() {
        assert_eq!(Some(ChipVariant::Lps331ap), ChipVariant::from_who_am_i(0xBB));
        assert_eq!(Some(ChipVariant::Lps25h), ChipVariant::from_who_am_i(0xBD));
        assert_eq!(Some(ChipVariant::Lps22hb), ChipVariant::from_who_am_i(0xB1));

        for id in (0u8..=255).filter(|id| ![0xBB, 0xBD, 0xB1].contains(id)) {
            assert_eq!(None, ChipVariant::from_who_am_i(id));
        }
    }

    #[test]
    fn register_maps() {
        assert_eq!(
            RegisterMap { ctrl_reg1: 0x20, ctrl_reg2: 0x21, res_conf: Some(0x10) },
            ChipVariant::Lps331ap.register_map()
        );
        assert_eq!(
            RegisterMap { ctrl_reg1: 0x20, ctrl_reg2: 0x21, res_conf: Some(0x10) },
            ChipVariant::Lps25h.register_map()
        );
        assert_eq!(
            RegisterMap { ctrl_reg1: 0x10, ctrl_reg2: 0x11, res_conf: None },
            ChipVariant::Lps22hb.register_map()
        );
    }

    #[test]
    fn initial_control_bytes() {
        assert_eq!(0b1110_0000, ChipVariant::Lps331ap.initial_control_byte());
        assert_eq!(0b1011_0000, ChipVariant::Lps25h.initial_control_byte());
        assert_eq!(0b0110_0000, ChipVariant::Lps22hb.initial_control_byte());
    }

    #[test]
    fn lps331ap_temperature_law() {
        // 42.5 + 27600 / 480 = 100.0
        let t = ChipVariant::Lps331ap.convert_temperature(0x6BD0);
        assert_eq!(100_000_000_000, t.nano_celsius());

        let t = ChipVariant::Lps331ap.convert_temperature(0);
        assert_eq!(42_500, t.millicelsius());

        let t = ChipVariant::Lps331ap.convert_temperature(-10200);
        assert_eq!(21_250, t.millicelsius());
    }

    #[test]
    fn lps2x_temperature_law() {
        assert_eq!(25_000, ChipVariant::Lps25h.convert_temperature(2500).millicelsius());
        assert_eq!(-5_120, ChipVariant::Lps22hb.convert_temperature(-512).millicelsius());
    }

    #[test]
    fn snapshot_decodes_ctrl_reg1() {
        let regs = ControlRegisters { ctrl_reg1: 0xB0, ctrl_reg2: 0x00, res_conf: Some(0x0F) };
        assert_eq!(CtrlReg1 { power_up: true, odr: 0b011, bdu: false }, regs.ctrl_reg1_fields());

        let regs = ControlRegisters { ctrl_reg1: 0x84, ctrl_reg2: 0x01, res_conf: None };
        assert_eq!(CtrlReg1 { power_up: true, odr: 0, bdu: true }, regs.ctrl_reg1_fields());
    }

    #[tokio::test]
    async fn identify_reads_who_am_i() {
        let mut bus = FakeBus::i2c();
        bus.with_response(0x0F, &[0xB1]);
        let mut transport = Transport::new(bus, NoopObserver);

        assert_eq!(ChipVariant::Lps22hb, identify(&mut transport).await.unwrap());

        let (bus, _) = transport.release();
        assert_eq!(&[Op::Read(0x0F, 1)], bus.ops().as_slice());
    }

    #[tokio::test]
    async fn identify_rejects_unknown_chip() {
        let mut bus = FakeBus::spi();
        bus.with_response(0x0F, &[0x60]);
        let mut transport = Transport::new(bus, NoopObserver);

        let err = identify(&mut transport).await.unwrap_err();
        assert!(matches!(err, ErrorKind::UnsupportedChip(0x60)));
    }

    #[tokio::test]
    async fn control_snapshot_skips_missing_res_conf() {
        let mut bus = FakeBus::i2c();
        bus.with_response(0x10, &[0x60]);
        bus.with_response(0x11, &[0x10]);
        let mut transport = Transport::new(bus, NoopObserver);

        let regs = read_control_registers(&mut transport, ChipVariant::Lps22hb).await.unwrap();
        assert_eq!(ControlRegisters { ctrl_reg1: 0x60, ctrl_reg2: 0x10, res_conf: None }, regs);

        let (bus, _) = transport.release();
        assert_eq!(&[Op::Read(0x10, 1), Op::Read(0x11, 1)], bus.ops().as_slice());
    }

    #[tokio::test]
    async fn control_snapshot_includes_res_conf() {
        let mut bus = FakeBus::i2c();
        bus.with_response(0x20, &[0xE0]);
        bus.with_response(0x21, &[0x00]);
        bus.with_response(0x10, &[0x7A]);
        let mut transport = Transport::new(bus, NoopObserver);

        let regs = read_control_registers(&mut transport, ChipVariant::Lps331ap).await.unwrap();
        assert_eq!(ControlRegisters { ctrl_reg1: 0xE0, ctrl_reg2: 0x00, res_conf: Some(0x7A) }, regs);
    }
}
