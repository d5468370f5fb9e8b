//! Raw register values to physical units.

use core::f32::consts::PI;

use crate::registers::FIFO_SLOT_BYTES;
use crate::types::{FifoSignConvention, ThreeAxes};

/// Factory calibration point of the temperature sensor.
pub const TEMPERATURE_OFFSET_C: f32 = 25.0;
pub const TEMPERATURE_LSB_PER_C: f32 = 8.0;

const TEMPERATURE_SIGN: u16 = 0x0800;
const TEMPERATURE_FIELD: u16 = 0x0FFF;
const TEMPERATURE_MAGNITUDE: u16 = 0x07FF;

pub fn scaled(raw: i32, scale: f32) -> f32 {
    raw as f32 * scale
}

pub fn scaled_axes(raw: [i32; 3], scale: f32) -> ThreeAxes {
    ThreeAxes::new(scaled(raw[0], scale), scaled(raw[1], scale), scaled(raw[2], scale))
}

/// The sensor packs a 12-bit two's complement reading into the 16-bit pair.
///
/// Negative readings are inverted and incremented, then limited to the 11
/// magnitude bits, so `0x800` lands on the calibration point itself.
pub fn temperature_celsius(raw: u16) -> f32 {
    if raw & TEMPERATURE_SIGN != 0 {
        let magnitude = (!raw).wrapping_add(1) & TEMPERATURE_MAGNITUDE;
        TEMPERATURE_OFFSET_C - magnitude as f32 / TEMPERATURE_LSB_PER_C
    } else {
        (raw & TEMPERATURE_FIELD) as f32 / TEMPERATURE_LSB_PER_C + TEMPERATURE_OFFSET_C
    }
}

/// Slot `index` of a drained FIFO block (low byte first per axis).
pub fn fifo_slot(block: &[u8], index: usize) -> [i16; 3] {
    let base = index * FIFO_SLOT_BYTES;
    let s = &block[base..base + FIFO_SLOT_BYTES];
    [
        i16::from_le_bytes([s[0], s[1]]),
        i16::from_le_bytes([s[2], s[3]]),
        i16::from_le_bytes([s[4], s[5]]),
    ]
}

/// Per-axis mean of the first `slots` samples in `block`, truncated toward
/// zero. Returns `None` when there is nothing to average.
pub fn average_fifo(block: &[u8], slots: usize, convention: FifoSignConvention) -> Option<[i32; 3]> {
    if slots == 0 || block.len() < slots * FIFO_SLOT_BYTES {
        return None;
    }

    let mut sum = [0i32; 3];
    for i in 0..slots {
        let sample = fifo_slot(block, i);
        for (acc, raw) in sum.iter_mut().zip(sample) {
            let value = match convention {
                FifoSignConvention::Inverted => (!raw).wrapping_add(1),
                FifoSignConvention::Direct => raw,
            };
            *acc += value as i32;
        }
    }

    let n = slots as i32;
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}

/// Tilt from the gravity vector, in degrees. Returns `(pitch, roll)`.
///
/// A zero vector yields NaN for both.
pub fn pitch_and_roll(accel: &ThreeAxes) -> (f32, f32) {
    let xx = accel.x * accel.x;
    let yy = accel.y * accel.y;
    let zz = accel.z * accel.z;
    let pitch = 180.0 * libm::atanf(accel.x / libm::sqrtf(yy + zz)) / PI;
    let roll = 180.0 * libm::atanf(accel.y / libm::sqrtf(xx + zz)) / PI;
    (pitch, roll)
}
