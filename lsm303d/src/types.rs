#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreeAxes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ThreeAxes {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_within_delta(&self, other: &ThreeAxes, delta: f32) -> bool {
        libm::fabsf(self.x - other.x) <= delta &&
            libm::fabsf(self.y - other.y) <= delta &&
            libm::fabsf(self.z - other.z) <= delta
    }
}

/// Snapshot of the last validated sampling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    /// g
    pub accel: ThreeAxes,
    /// gauss
    pub mag: ThreeAxes,
    /// °C
    pub temperature: f32,
    /// degrees
    pub pitch: f32,
    /// degrees
    pub roll: f32,
}

/// How raw FIFO slots are signed before averaging.
///
/// `Inverted` negates every slot (`!raw + 1`) after assembling it, which
/// flips the sign of FIFO-averaged acceleration relative to the direct
/// register path. It is the default because existing users of the averaged
/// output depend on it; `Direct` uses the assembled value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FifoSignConvention {
    #[default]
    Inverted,
    Direct,
}
