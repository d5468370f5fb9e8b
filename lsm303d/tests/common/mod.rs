#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal_mock::eh1::delay::NoopDelay;
use lsm303d::registers::*;
use lsm303d::{I2cHandle, I2cTransport, Lsm303d, DEFAULT_ADDRESS};

pub const CHANNEL: u8 = 1;

const ACCEL_OUT_FIRST: u8 = Reg::OutXLA as u8;
const ACCEL_OUT_LAST: u8 = Reg::OutZHA as u8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Write { reg: u8, value: u8 },
    Read { start: u8, len: usize, burst: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    NoDevice,
    Nack(u8),
    NotSelected,
}

/// LSM303D register file behind a channel/slave transport.
pub struct SimLsm303d {
    pub regs: [u8; REGISTER_MAP_SIZE],
    pub fifo: VecDeque<u8>,
    pub ops: Vec<Op>,
    /// Writes to these registers are ignored.
    pub stuck: Vec<Reg>,
    /// Writes to these registers are NACKed.
    pub rejected: Vec<Reg>,
    pub fail_open: bool,
    pub short_read: bool,
    pub short_write: bool,
    /// Set when a burst ran across the accelerometer outputs while streaming.
    pub glitched: bool,
    pub opens: usize,
    pub closes: usize,
    pointer: u8,
    auto_increment: bool,
}

impl SimLsm303d {
    pub fn new() -> Self {
        let mut regs = [0u8; REGISTER_MAP_SIZE];
        regs[Reg::WhoAmI as usize] = WHO_AM_I_VALUE;
        Self {
            regs,
            fifo: VecDeque::new(),
            ops: Vec::new(),
            stuck: Vec::new(),
            rejected: Vec::new(),
            fail_open: false,
            short_read: false,
            short_write: false,
            glitched: false,
            opens: 0,
            closes: 0,
            pointer: 0,
            auto_increment: false,
        }
    }

    pub fn reg(&self, reg: Reg) -> u8 {
        self.regs[reg as usize]
    }

    pub fn set_reg(&mut self, reg: Reg, value: u8) {
        self.regs[reg as usize] = value;
    }

    pub fn set_pair(&mut self, low: Reg, value: i16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs[low as usize] = lo;
        self.regs[low as usize + 1] = hi;
    }

    pub fn set_mag(&mut self, x: i16, y: i16, z: i16) {
        self.set_pair(Reg::OutXLM, x);
        self.set_pair(Reg::OutYLM, y);
        self.set_pair(Reg::OutZLM, z);
    }

    pub fn set_accel(&mut self, x: i16, y: i16, z: i16) {
        self.set_pair(Reg::OutXLA, x);
        self.set_pair(Reg::OutYLA, y);
        self.set_pair(Reg::OutZLA, z);
    }

    pub fn set_temperature(&mut self, raw: u16) {
        self.set_pair(Reg::TempOutL, raw as i16);
    }

    pub fn push_fifo(&mut self, x: i16, y: i16, z: i16) {
        for v in [x, y, z] {
            self.fifo.extend(v.to_le_bytes());
        }
    }

    pub fn reads(&self) -> Vec<(u8, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Read { start, len, .. } => Some((*start, *len)),
                Op::Write { .. } => None,
            })
            .collect()
    }

    pub fn writes_to(&self, reg: Reg) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Write { reg: r, .. } if *r == reg as u8))
            .count()
    }

    fn streaming(&self) -> bool {
        let fm = (self.reg(Reg::FifoCtrl) & FIFO_MODE_MASK) >> FIFO_MODE_LOC;
        fm == FifoMode::Stream as u8 && self.reg(Reg::Ctrl0) & Ctrl0Flags::FIFO_EN.bits() != 0
    }

    fn fifo_src(&self) -> u8 {
        let slots = self.fifo.len() / FIFO_SLOT_BYTES;
        if slots == 0 {
            FifoSrcFlags::EMPTY.bits()
        } else {
            ((slots - 1) & 0x1F) as u8
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        self.ops.push(Op::Write { reg, value });
        if self.stuck.iter().any(|r| *r as u8 == reg) {
            return;
        }
        match reg {
            r if r == Reg::WhoAmI as u8 || r == Reg::FifoSrc as u8 => {}
            // reboot completes instantly
            r if r == Reg::Ctrl0 as u8 => self.regs[r as usize] = value & !Ctrl0Flags::BOOT.bits(),
            r if (r as usize) < REGISTER_MAP_SIZE => self.regs[r as usize] = value,
            _ => {}
        }
    }

    fn read_byte(&mut self, start: u8) -> u8 {
        let reg = self.pointer;
        let streaming = self.streaming();
        let in_accel = (ACCEL_OUT_FIRST..=ACCEL_OUT_LAST).contains(&reg);

        if streaming && in_accel {
            if !(ACCEL_OUT_FIRST..=ACCEL_OUT_LAST).contains(&start) {
                self.glitched = true;
            }
            if self.auto_increment {
                self.pointer = if reg == ACCEL_OUT_LAST { ACCEL_OUT_FIRST } else { reg + 1 };
            }
            return self.fifo.pop_front().unwrap_or(0);
        }

        let value = if reg == Reg::FifoSrc as u8 {
            self.fifo_src()
        } else {
            self.regs.get(reg as usize).copied().unwrap_or(0)
        };
        if self.auto_increment {
            self.pointer = reg.wrapping_add(1);
        }
        value
    }
}

pub struct SimHandle<'a> {
    sim: &'a mut SimLsm303d,
    selected: Option<u8>,
}

impl Drop for SimHandle<'_> {
    fn drop(&mut self) {
        self.sim.closes += 1;
    }
}

impl I2cTransport for SimLsm303d {
    type Error = SimError;
    type Handle<'a> = SimHandle<'a>;

    fn open(&mut self, channel: u8) -> Result<SimHandle<'_>, SimError> {
        if self.fail_open || channel != CHANNEL {
            return Err(SimError::NoDevice);
        }
        self.opens += 1;
        Ok(SimHandle { sim: self, selected: None })
    }
}

impl I2cHandle for SimHandle<'_> {
    type Error = SimError;

    fn select(&mut self, address: u8) -> Result<(), SimError> {
        if address != DEFAULT_ADDRESS {
            return Err(SimError::Nack(address));
        }
        self.selected = Some(address);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, SimError> {
        self.selected.ok_or(SimError::NotSelected)?;
        match bytes {
            [pointer] => {
                self.sim.pointer = pointer & !AUTO_INCREMENT;
                self.sim.auto_increment = pointer & AUTO_INCREMENT != 0;
            }
            [reg, value] => {
                let reg = reg & !AUTO_INCREMENT;
                if self.sim.rejected.iter().any(|r| *r as u8 == reg) {
                    return Err(SimError::Nack(reg));
                }
                self.sim.write_reg(reg, *value);
            }
            _ => {}
        }
        if self.sim.short_write {
            return Ok(bytes.len().saturating_sub(1));
        }
        Ok(bytes.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, SimError> {
        self.selected.ok_or(SimError::NotSelected)?;
        let start = self.sim.pointer;
        self.sim.ops.push(Op::Read { start, len: buffer.len(), burst: self.sim.auto_increment });
        for b in buffer.iter_mut() {
            *b = self.sim.read_byte(start);
        }
        if self.sim.short_read {
            return Ok(buffer.len().saturating_sub(1));
        }
        Ok(buffer.len())
    }
}

pub fn device() -> Lsm303d<SimLsm303d> {
    let mut delay = NoopDelay::new();
    Lsm303d::new(SimLsm303d::new(), CHANNEL, DEFAULT_ADDRESS, &mut delay)
}

pub fn sim(dev: &mut Lsm303d<SimLsm303d>) -> &mut SimLsm303d {
    dev.bus().transport()
}
