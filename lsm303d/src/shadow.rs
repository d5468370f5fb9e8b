use crate::registers::{Reg, FIFO_MAX_SLOTS, FIFO_SLOT_BYTES, REGISTER_MAP_SIZE};

/// Output channels backed by a low/high register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Temperature,
    MagX,
    MagY,
    MagZ,
    AccelX,
    AccelY,
    AccelZ,
}

impl Measurement {
    /// (low, high)
    pub fn registers(self) -> (Reg, Reg) {
        match self {
            Measurement::Temperature => (Reg::TempOutL, Reg::TempOutH),
            Measurement::MagX => (Reg::OutXLM, Reg::OutXHM),
            Measurement::MagY => (Reg::OutYLM, Reg::OutYHM),
            Measurement::MagZ => (Reg::OutZLM, Reg::OutZHM),
            Measurement::AccelX => (Reg::OutXLA, Reg::OutXHA),
            Measurement::AccelY => (Reg::OutYLA, Reg::OutYHA),
            Measurement::AccelZ => (Reg::OutZLA, Reg::OutZHA),
        }
    }
}

/// Local copy of the readable register map, indexed by register address.
#[derive(Debug, Clone)]
pub struct RegisterShadow {
    bytes: [u8; REGISTER_MAP_SIZE],
}

impl Default for RegisterShadow {
    fn default() -> Self {
        Self { bytes: [0; REGISTER_MAP_SIZE] }
    }
}

impl RegisterShadow {
    pub fn clear(&mut self) {
        self.bytes = [0; REGISTER_MAP_SIZE];
    }

    pub fn byte(&self, reg: Reg) -> u8 {
        self.bytes[reg as usize]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Window `first..=last` to be filled by one burst read.
    pub fn region_mut(&mut self, first: Reg, last: Reg) -> &mut [u8] {
        &mut self.bytes[first as usize..=last as usize]
    }

    /// Window from `first` to the end of the map.
    pub fn tail_mut(&mut self, first: Reg) -> &mut [u8] {
        &mut self.bytes[first as usize..]
    }

    /// High byte first, read as 16-bit two's complement.
    pub fn raw(&self, measurement: Measurement) -> i16 {
        let (low, high) = measurement.registers();
        i16::from_be_bytes([self.byte(high), self.byte(low)])
    }

    /// Same pair as `raw`, without sign interpretation.
    pub fn raw_unsigned(&self, measurement: Measurement) -> u16 {
        self.raw(measurement) as u16
    }
}

/// Holding area for one accelerometer FIFO drain.
#[derive(Debug, Clone)]
pub struct FifoStaging {
    bytes: [u8; FIFO_MAX_SLOTS * FIFO_SLOT_BYTES],
}

impl Default for FifoStaging {
    fn default() -> Self {
        Self { bytes: [0; FIFO_MAX_SLOTS * FIFO_SLOT_BYTES] }
    }
}

impl FifoStaging {
    pub fn clear(&mut self) {
        self.bytes = [0; FIFO_MAX_SLOTS * FIFO_SLOT_BYTES];
    }

    /// Buffer for `slots` samples, capped at the staging capacity.
    pub fn slots_mut(&mut self, slots: usize) -> &mut [u8] {
        let len = slots.min(FIFO_MAX_SLOTS) * FIFO_SLOT_BYTES;
        &mut self.bytes[..len]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
