//! Diagnostics hooks.
//!
//! The driver reports what it does to an [`Observer`]. The default [`NoopObserver`] drops
//! everything; [`LogObserver`] forwards it to the [`log`] facade at debug level.

use crate::bus::BusKind;
use crate::measurement::Reading;
use crate::variant::{ChipVariant, ControlRegisters};

/// Receives diagnostic records from the driver. Every method defaults to doing nothing.
pub trait Observer {
    /// A single `(addr, value)` register write is about to go out on the bus.
    fn write_command(&mut self, _kind: BusKind, _addr: u8, _value: u8) {}

    /// WHO_AM_I has been read and matched.
    fn chip_identified(&mut self, _variant: ChipVariant, _initial_control_byte: u8) {}

    /// A snapshot of the control registers has been read.
    fn control_registers(&mut self, _variant: ChipVariant, _regs: &ControlRegisters) {}

    /// A measurement has been converted.
    fn reading(&mut self, _variant: ChipVariant, _reading: &Reading) {}
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn write_command(&mut self, kind: BusKind, addr: u8, value: u8) {
        (**self).write_command(kind, addr, value)
    }

    fn chip_identified(&mut self, variant: ChipVariant, initial_control_byte: u8) {
        (**self).chip_identified(variant, initial_control_byte)
    }

    fn control_registers(&mut self, variant: ChipVariant, regs: &ControlRegisters) {
        (**self).control_registers(variant, regs)
    }

    fn reading(&mut self, variant: ChipVariant, reading: &Reading) {
        (**self).reading(variant, reading)
    }
}

/// Discards every record.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Emits every record through `log::debug!`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn write_command(&mut self, kind: BusKind, addr: u8, value: u8) {
        log::debug!("write_command {}: 0x{:02x} <- 0b{:08b}(0x{:02x})", kind.label(), addr, value, value);
    }

    fn chip_identified(&mut self, variant: ChipVariant, initial_control_byte: u8) {
        let regs = variant.register_map();
        log::debug!(
            "chip 0x{:02x} {}: CTRL_REG1=0x{:02x} CTRL_REG2=0x{:02x} RES_CONF={:?} INIT_CMD=0b{:08b}(0x{:02x})",
            variant.who_am_i(),
            variant.name(),
            regs.ctrl_reg1,
            regs.ctrl_reg2,
            regs.res_conf,
            initial_control_byte,
            initial_control_byte
        );
    }

    fn control_registers(&mut self, variant: ChipVariant, regs: &ControlRegisters) {
        let map = variant.register_map();
        let ctrl1 = regs.ctrl_reg1_fields();
        log::debug!(
            "{} CTRL_REG1 power_up={} odr=0b{:03b} bdu={}",
            variant.name(),
            ctrl1.power_up,
            ctrl1.odr,
            ctrl1.bdu
        );
        match (map.res_conf, regs.res_conf) {
            (Some(addr), Some(value)) => log::debug!(
                "{} CTRL_REG1(0x{:02x})={:08b} CTRL_REG2(0x{:02x})={:08b} RES_CONF(0x{:02x})={:08b}",
                variant.name(),
                map.ctrl_reg1,
                regs.ctrl_reg1,
                map.ctrl_reg2,
                regs.ctrl_reg2,
                addr,
                value
            ),
            _ => log::debug!(
                "{} CTRL_REG1(0x{:02x})={:08b} CTRL_REG2(0x{:02x})={:08b}",
                variant.name(),
                map.ctrl_reg1,
                regs.ctrl_reg1,
                map.ctrl_reg2,
                regs.ctrl_reg2
            ),
        }
    }

    fn reading(&mut self, variant: ChipVariant, reading: &Reading) {
        log::debug!("{} {}", variant.name(), reading);
    }
}
