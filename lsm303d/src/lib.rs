#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod configs;
pub mod convert;
pub mod registers;
pub mod shadow;
pub mod types;

mod sampling;

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use log::{debug, error, warn};

use registers::*;

pub use bus::{Bus, BusError, HalBusError, HalTransport, I2cHandle, I2cTransport};
pub use configs::*;
pub use shadow::{FifoStaging, Measurement, RegisterShadow};
pub use types::{FifoSignConvention, Readings, ThreeAxes};

/// SA0 pulled high.
pub const DEFAULT_ADDRESS: u8 = 0x1D;

const RESET_SETTLE_MS: u32 = 1000;

#[derive(Debug, PartialEq)]
pub enum Error<E> {
    Bus(BusError<E>),
    /// `WHO_AM_I` read back something other than 0x49; carries what was read.
    SyncLost(u8),
    InvalidSetting { field: &'static str, bits: u8 },
    FifoModeMismatch { requested: FifoMode, observed: u8 },
    /// No queued samples to average.
    EmptyFifo,
}

impl<E> From<BusError<E>> for Error<E> {
    fn from(e: BusError<E>) -> Self {
        Error::Bus(e)
    }
}

pub struct Lsm303d<T: I2cTransport> {
    bus: Bus<T>,
    shadow: RegisterShadow,
    fifo: FifoStaging,
    accel_scale: f32,
    mag_scale: f32,
    fifo_mode: FifoMode,
    fifo_sign: FifoSignConvention,
    readings: Readings,
    synced: bool,
}

impl<T: I2cTransport> Lsm303d<T> {
    /// Resets the chip, enables magnetometer, accelerometer and temperature
    /// sensor, then takes one sample. Failing steps are logged and skipped.
    pub fn new<D: DelayNs>(transport: T, channel: u8, address: u8, delay: &mut D) -> Self {
        let mut dev = Self::unconfigured(transport, channel, address);

        if let Err(e) = dev.reset(delay) {
            error!("LSM303D reset failed: {:?}", e);
        }
        if let Err(e) = dev.enable_magnetometer() {
            error!("Failed to enable magnetometer: {:?}", e);
        }
        if let Err(e) = dev.enable_accelerometer() {
            error!("Failed to enable accelerometer: {:?}", e);
        }
        if let Err(e) = dev.enable_temperature_sensor() {
            error!("Failed to enable temperature sensor: {:?}", e);
        }
        if let Err(e) = dev.sample() {
            error!("Initial LSM303D sample failed: {:?}", e);
        }
        dev
    }

    pub fn default<D: DelayNs>(transport: T, channel: u8, delay: &mut D) -> Self {
        Self::new(transport, channel, DEFAULT_ADDRESS, delay)
    }

    /// Driver state only; nothing is sent on the bus.
    pub fn unconfigured(transport: T, channel: u8, address: u8) -> Self {
        Self {
            bus: Bus::new(transport, channel, address),
            shadow: RegisterShadow::default(),
            fifo: FifoStaging::default(),
            accel_scale: 0.0,
            mag_scale: 0.0,
            fifo_mode: FifoMode::Bypass,
            fifo_sign: FifoSignConvention::default(),
            readings: Readings::default(),
            synced: false,
        }
    }

    pub fn destroy(self) -> T {
        self.bus.destroy()
    }

    pub fn bus(&mut self) -> &mut Bus<T> {
        &mut self.bus
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<T::Error>> {
        Ok(self.bus.read_register(Reg::WhoAmI.addr())?)
    }

    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<T::Error>> {
        debug!("Resetting LSM303D...");
        // local state follows the reset even if the bus writes fail
        self.fifo_mode = FifoMode::Bypass;
        self.shadow.clear();
        self.fifo.clear();
        self.synced = false;
        self.apply_config(CONFIG_RESET)?;
        delay.delay_ms(RESET_SETTLE_MS);
        debug!("Done.");
        Ok(())
    }

    /// Every step is attempted; the first failure is returned.
    pub fn enable_magnetometer(&mut self) -> Result<(), Error<T::Error>> {
        let rate = self.set_mag_data_rate(MagDataRate::Hz100);
        let scale = self.set_mag_scale(MagScale::Gauss8);
        // continuous conversion, low-power off
        let mode = self
            .modify_reg(Reg::Ctrl7, MAG_MODE_MASK, 0)
            .map(|_| ())
            .inspect_err(|_| error!("Failed to set magnetometer conversion mode!"));
        rate.and(scale).and(mode)
    }

    /// Every step is attempted, so the axes are enabled even when the FIFO
    /// mode does not stick. The first failure is returned.
    pub fn enable_accelerometer(&mut self) -> Result<(), Error<T::Error>> {
        let rate = self.set_accel_data_rate(AccelDataRate::Hz1600);
        let scale = self.set_accel_scale(AccelScale::G8);
        let fifo = self
            .set_accel_fifo_mode(FifoMode::Stream)
            .inspect_err(|e| error!("Failed to enable accelerometer FIFO: {:?}", e));
        let axes = (Ctrl1Flags::AXEN | Ctrl1Flags::AYEN | Ctrl1Flags::AZEN).bits();
        let enable = self
            .modify_reg(Reg::Ctrl1, axes, axes)
            .map(|_| ())
            .inspect_err(|_| error!("Failed to enable accelerometer axes!"));
        rate.and(scale).and(fifo).and(enable)
    }

    pub fn enable_temperature_sensor(&mut self) -> Result<(), Error<T::Error>> {
        let en = Ctrl5Flags::TEMP_EN.bits();
        self.modify_reg(Reg::Ctrl5, en, en)?;
        Ok(())
    }

    pub fn set_accel_data_rate(&mut self, rate: AccelDataRate) -> Result<(), Error<T::Error>> {
        self.modify_reg(Reg::Ctrl1, ACCEL_ODR_MASK, (rate as u8) << ACCEL_ODR_LOC)
            .map(|_| ())
            .inspect_err(|_| error!("Failure to update accelerometer data rate!"))
    }

    pub fn set_accel_data_rate_bits(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match AccelDataRate::try_from(bits) {
            Ok(rate) => self.set_accel_data_rate(rate),
            Err(()) => Err(invalid("accelerometer data rate", bits)),
        }
    }

    /// Output data rate as currently programmed in CTRL1.
    pub fn accel_data_rate(&mut self) -> Result<AccelDataRate, Error<T::Error>> {
        let ctrl1 = self.bus.read_register(Reg::Ctrl1.addr())?;
        let bits = (ctrl1 & ACCEL_ODR_MASK) >> ACCEL_ODR_LOC;
        AccelDataRate::try_from(bits).map_err(|_| invalid("accelerometer data rate", bits))
    }

    /// Also selects high magnetometer resolution.
    pub fn set_mag_data_rate(&mut self, rate: MagDataRate) -> Result<(), Error<T::Error>> {
        self.modify_reg(
            Reg::Ctrl5,
            MAG_RES_MASK | MAG_ODR_MASK,
            MAG_RES_HIGH | (rate as u8) << MAG_ODR_LOC,
        )
        .map(|_| ())
        .inspect_err(|_| error!("Failed to set magnetometer data rate!"))
    }

    pub fn set_mag_data_rate_bits(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match MagDataRate::try_from(bits) {
            Ok(rate) => self.set_mag_data_rate(rate),
            Err(()) => Err(invalid("magnetometer data rate", bits)),
        }
    }

    /// On any failure the accel scale factor drops to 0.
    pub fn set_accel_scale(&mut self, scale: AccelScale) -> Result<(), Error<T::Error>> {
        match self.modify_reg(Reg::Ctrl2, ACCEL_FS_MASK, (scale as u8) << ACCEL_FS_LOC) {
            Ok(_) => {
                self.accel_scale = scale.sensitivity();
                Ok(())
            }
            Err(e) => {
                error!("Failed to set accelerometer scale!");
                self.accel_scale = 0.0;
                Err(e)
            }
        }
    }

    pub fn set_accel_scale_bits(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match AccelScale::try_from(bits) {
            Ok(scale) => self.set_accel_scale(scale),
            Err(()) => {
                self.accel_scale = 0.0;
                Err(invalid("accelerometer scale", bits))
            }
        }
    }

    /// On any failure the mag scale factor drops to 0.
    pub fn set_mag_scale(&mut self, scale: MagScale) -> Result<(), Error<T::Error>> {
        match self.modify_reg(Reg::Ctrl6, MAG_FS_MASK, (scale as u8) << MAG_FS_LOC) {
            Ok(_) => {
                self.mag_scale = scale.sensitivity();
                Ok(())
            }
            Err(e) => {
                error!("Failed to set magnetometer scale!");
                self.mag_scale = 0.0;
                Err(e)
            }
        }
    }

    pub fn set_mag_scale_bits(&mut self, bits: u8) -> Result<(), Error<T::Error>> {
        match MagScale::try_from(bits) {
            Ok(scale) => self.set_mag_scale(scale),
            Err(()) => {
                self.mag_scale = 0.0;
                Err(invalid("magnetometer scale", bits))
            }
        }
    }

    /// Programs FIFO_EN and the FM field, then reads FIFO_CTRL back. A
    /// mismatch is reported and the cached mode keeps its previous value; the
    /// device is not reverted.
    pub fn set_accel_fifo_mode(&mut self, mode: FifoMode) -> Result<(), Error<T::Error>> {
        let enable = match mode {
            FifoMode::Stream => Ctrl0Flags::FIFO_EN.bits(),
            FifoMode::Bypass => 0,
        };
        // BOOT is masked so a pending reboot is never re-triggered
        self.modify_reg(Reg::Ctrl0, (Ctrl0Flags::FIFO_EN | Ctrl0Flags::BOOT).bits(), enable)?;
        self.modify_reg(Reg::FifoCtrl, FIFO_MODE_MASK, mode.bits())?;

        let observed = self.bus.read_register(Reg::FifoCtrl.addr())? & FIFO_MODE_MASK;
        if observed != mode.bits() {
            warn!("Error setting LSM303D accelerometer FIFO mode {:?}: FIFO_CTRL FM = {:#04x}", mode, observed);
            return Err(Error::FifoModeMismatch { requested: mode, observed });
        }
        self.fifo_mode = mode;
        Ok(())
    }

    /// FIFO mode as programmed on the device, `None` for modes this driver
    /// does not use.
    pub fn fifo_mode_on_device(&mut self) -> Result<Option<FifoMode>, Error<T::Error>> {
        let fifo_ctrl = self.bus.read_register(Reg::FifoCtrl.addr())?;
        Ok(FifoMode::try_from((fifo_ctrl & FIFO_MODE_MASK) >> FIFO_MODE_LOC).ok())
    }

    pub fn fifo_mode(&self) -> FifoMode {
        self.fifo_mode
    }

    pub fn fifo_sign_convention(&self) -> FifoSignConvention {
        self.fifo_sign
    }

    pub fn set_fifo_sign_convention(&mut self, convention: FifoSignConvention) {
        self.fifo_sign = convention;
    }

    /// g per LSB; 0 after a failed scale change.
    pub fn accel_scale(&self) -> f32 {
        self.accel_scale
    }

    /// gauss per LSB; 0 after a failed scale change.
    pub fn mag_scale(&self) -> f32 {
        self.mag_scale
    }

    pub fn readings(&self) -> Readings {
        self.readings
    }

    pub fn acceleration(&self) -> ThreeAxes {
        self.readings.accel
    }

    pub fn magnetic_field(&self) -> ThreeAxes {
        self.readings.mag
    }

    pub fn temperature(&self) -> f32 {
        self.readings.temperature
    }

    pub fn pitch(&self) -> f32 {
        self.readings.pitch
    }

    pub fn roll(&self) -> f32 {
        self.readings.roll
    }

    pub fn shadow(&self) -> &RegisterShadow {
        &self.shadow
    }

    /// Whether the last sampling cycle completed and passed the identity check.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Clears `mask` in `reg` and ORs in `bits`; all other bits are written
    /// back unchanged. Returns the value written.
    pub fn modify_reg(&mut self, reg: Reg, mask: u8, bits: u8) -> Result<u8, Error<T::Error>> {
        let current = self.bus.read_register(reg.addr())?;
        let value = (current & !mask) | (bits & mask);
        debug!("modify_reg {:<11}({:#04X}) {:#04x} -> {:#04x}", reg.name(), reg.addr(), current, value);
        self.bus.write_register(reg.addr(), value)?;
        Ok(value)
    }

    /// Accepts any register type that implements the `Register` trait
    pub fn apply_config<R>(&mut self, config: &[RegConfig<R>]) -> Result<(), Error<T::Error>>
    where
        R: Register + NamedRegister + Copy,
    {
        for entry in config {
            let addr = entry.reg.addr();
            match entry.op {
                RegOp::Write => {
                    debug!("write_reg {:<11}({:#04X}) = {:#04x}", entry.reg.name(), addr, entry.value);
                    self.bus.write_register(addr, entry.value)?
                },
                RegOp::Read => {
                    let data = self.bus.read_register(addr)?;
                    debug!("read_reg {:<11}({:#04X}) = {:#04x}", entry.reg.name(), addr, data);
                }
            }
        }
        Ok(())
    }

    pub fn dump_config<R>(&mut self, regs: &[R]) -> Result<(), Error<T::Error>>
    where
        R: NamedRegister + Copy,
    {
        fn show(label: &str, reg: u8, val: Result<u8, impl Debug>) {
            match val {
                Ok(v) => debug!("{:<11}({:#04x}): 0x{:02X} ({:>3}) 0b{:08b}", label, reg, v, v, v),
                Err(e) => debug!("{:<11}: Error: {:?}", label, e),
            }
        }

        for reg in regs {
            let label = reg.name();
            let addr = reg.addr();
            show(label, addr, self.bus.read_register(addr));
        }

        Ok(())
    }
}

fn invalid<E>(field: &'static str, bits: u8) -> Error<E> {
    error!("Invalid {} {:#04x}", field, bits);
    Error::InvalidSetting { field, bits }
}
