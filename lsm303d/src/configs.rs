use crate::registers::*;

// Reboot memory content, then return every control register to its
// power-on value. FIFO_CTRL = 0 puts the FIFO in bypass.
pub const CONFIG_RESET: &[RegConfig<Reg>] = &[
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl0,
        value: Ctrl0Flags::BOOT.bits(),
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl1,
        value: 0x00, // accelerometer powered down, axes off
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl2,
        value: 0x00, // ±2 g
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl3,
        value: 0x00, // no INT1 sources
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl4,
        value: 0x00, // no INT2 sources
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl5,
        value: 0x00, // temperature off, low resolution mag
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl6,
        value: 0x00, // ±2 gauss
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::Ctrl7,
        value: 0x00,
    },
    RegConfig {
        op: RegOp::Write,
        reg: Reg::FifoCtrl,
        value: FifoMode::Bypass.bits(),
    },
];

pub const CONTROL_REGS: &[Reg] = &[
    Reg::Ctrl0,
    Reg::Ctrl1,
    Reg::Ctrl2,
    Reg::Ctrl3,
    Reg::Ctrl4,
    Reg::Ctrl5,
    Reg::Ctrl6,
    Reg::Ctrl7,
    Reg::FifoCtrl,
    Reg::FifoSrc,
];
