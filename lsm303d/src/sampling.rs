//! One sampling cycle.
//!
//! The magnetometer/temperature block and the accelerometer block of the
//! LSM303D continue bursts differently. A single burst that runs across both,
//! or that touches the accelerometer outputs while the FIFO is streaming,
//! shifts or duplicates bytes. Every burst below stays on one side, and the
//! FIFO is drained last.

use log::{error, trace};

use crate::convert::{average_fifo, pitch_and_roll, scaled_axes, temperature_celsius};
use crate::registers::*;
use crate::shadow::Measurement;
use crate::types::{Readings, ThreeAxes};
use crate::{Error, I2cTransport, Lsm303d};

impl<T: I2cTransport> Lsm303d<T> {
    /// Refreshes the register shadow and, if `WHO_AM_I` checks out, the
    /// readings. On any error the previous readings are kept.
    pub fn sample(&mut self) -> Result<(), Error<T::Error>> {
        self.synced = false;

        let accel = match self.fifo_mode {
            FifoMode::Stream => self.sample_streaming()?,
            FifoMode::Bypass => self.sample_direct()?,
        };

        let identity = self.shadow.byte(Reg::WhoAmI);
        if identity != WHO_AM_I_VALUE {
            error!("MAJOR FAILURE: DATA WITH LSM303D HAS LOST SYNC! WHO_AM_I = {:#04x}", identity);
            return Err(Error::SyncLost(identity));
        }

        let temperature = temperature_celsius(self.shadow.raw_unsigned(Measurement::Temperature));
        let mag = scaled_axes(
            [
                self.shadow.raw(Measurement::MagX) as i32,
                self.shadow.raw(Measurement::MagY) as i32,
                self.shadow.raw(Measurement::MagZ) as i32,
            ],
            self.mag_scale,
        );
        let (pitch, roll) = pitch_and_roll(&accel);

        self.readings = Readings { accel, mag, temperature, pitch, roll };
        self.synced = true;
        trace!("{:?}", self.readings);
        Ok(())
    }

    fn sample_streaming(&mut self) -> Result<ThreeAxes, Error<T::Error>> {
        self.bus.read_registers(Reg::TempOutL.addr(), self.shadow.region_mut(Reg::TempOutL, Reg::OutZHM))?;
        self.bus.read_registers(Reg::WhoAmI.addr(), self.shadow.region_mut(Reg::WhoAmI, Reg::WhoAmI))?;
        self.bus.read_registers(Reg::IntCtrlM.addr(), self.shadow.region_mut(Reg::IntCtrlM, Reg::StatusA))?;
        self.bus.read_registers(Reg::FifoCtrl.addr(), self.shadow.tail_mut(Reg::FifoCtrl))?;

        let slots = self.drain_fifo()?;
        let raw = match average_fifo(self.fifo.bytes(), slots, self.fifo_sign) {
            Some(raw) => raw,
            None => {
                error!("Error! Divide by 0 while averaging accelerometer FIFO!");
                return Err(Error::EmptyFifo);
            }
        };
        Ok(scaled_axes(raw, self.accel_scale))
    }

    /// Reads FIFO_SRC and pulls that many samples out of the queue.
    fn drain_fifo(&mut self) -> Result<usize, Error<T::Error>> {
        let src = self.bus.read_register(Reg::FifoSrc.addr())?;
        if FifoSrcFlags::from_bits_truncate(src).contains(FifoSrcFlags::EMPTY) {
            return Ok(0);
        }

        let slots = (src & FIFO_LEVEL_MASK) as usize + 1;
        self.bus.read_registers(Reg::OutXLA.addr(), self.fifo.slots_mut(slots))?;
        Ok(slots)
    }

    /// Outside of stream mode the accelerometer outputs are plain registers.
    fn sample_direct(&mut self) -> Result<ThreeAxes, Error<T::Error>> {
        // the mag/temperature outputs sit below WHO_AM_I, outside the second burst
        self.bus.read_registers(Reg::TempOutL.addr(), self.shadow.region_mut(Reg::TempOutL, Reg::OutZHM))?;
        self.bus.read_registers(Reg::WhoAmI.addr(), self.shadow.tail_mut(Reg::WhoAmI))?;

        Ok(scaled_axes(
            [
                self.shadow.raw(Measurement::AccelX) as i32,
                self.shadow.raw(Measurement::AccelY) as i32,
                self.shadow.raw(Measurement::AccelZ) as i32,
            ],
            self.accel_scale,
        ))
    }
}
