use bitflags::bitflags;

macro_rules! registers {
    (
        $enum_name:ident, $slice_name:ident {
            $($name:ident = $val:expr),* $(,)?
        }
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum $enum_name {
            $($name = $val),*
        }

        pub const $slice_name: &[$enum_name] = &[
            $($enum_name::$name),*
        ];

        impl $enum_name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum_name::$name => stringify!($name),)*
                }
            }
        }

        impl Register for $enum_name {
            fn addr(self) -> u8 {
                self as u8
            }
        }

        impl NamedRegister for $enum_name {
            fn name(&self) -> &'static str {
                self.name()
            }
        }

        impl From<$enum_name> for u8 {
            fn from(r: $enum_name) -> u8 {
                r as u8
            }
        }
    };
}

#[derive(Clone, Copy, Debug)]
pub enum RegOp {
    Read,
    Write
}

pub trait NamedRegister: Register {
    fn name(&self) -> &'static str;
}

pub trait Register: Copy {
    fn addr(self) -> u8;
}

pub struct RegConfig<R: Register> {
    pub op: RegOp,
    pub reg: R,
    pub value: u8,
}

registers! {
    Reg, REGS {
        TempOutL    = 0x05,
        TempOutH    = 0x06,
        StatusM     = 0x07,
        OutXLM      = 0x08,
        OutXHM      = 0x09,
        OutYLM      = 0x0A,
        OutYHM      = 0x0B,
        OutZLM      = 0x0C,
        OutZHM      = 0x0D,
        WhoAmI      = 0x0F,
        IntCtrlM    = 0x12,
        IntSrcM     = 0x13,
        IntThsLM    = 0x14,
        IntThsHM    = 0x15,
        OffsetXLM   = 0x16,
        OffsetXHM   = 0x17,
        OffsetYLM   = 0x18,
        OffsetYHM   = 0x19,
        OffsetZLM   = 0x1A,
        OffsetZHM   = 0x1B,
        ReferenceX  = 0x1C,
        ReferenceY  = 0x1D,
        ReferenceZ  = 0x1E,
        Ctrl0       = 0x1F,
        Ctrl1       = 0x20,
        Ctrl2       = 0x21,
        Ctrl3       = 0x22,
        Ctrl4       = 0x23,
        Ctrl5       = 0x24,
        Ctrl6       = 0x25,
        Ctrl7       = 0x26,
        StatusA     = 0x27,
        OutXLA      = 0x28,
        OutXHA      = 0x29,
        OutYLA      = 0x2A,
        OutYHA      = 0x2B,
        OutZLA      = 0x2C,
        OutZHA      = 0x2D,
        FifoCtrl    = 0x2E,
        FifoSrc     = 0x2F,
        IgCfg1      = 0x30,
        IgSrc1      = 0x31,
        IgThs1      = 0x32,
        IgDur1      = 0x33,
        IgCfg2      = 0x34,
        IgSrc2      = 0x35,
        IgThs2      = 0x36,
        IgDur2      = 0x37,
        ClickCfg    = 0x38,
        ClickSrc    = 0x39,
        ClickThs    = 0x3A,
        TimeLimit   = 0x3B,
        TimeLatency = 0x3C,
        TimeWindow  = 0x3D,
        ActThs      = 0x3E,
        ActDur      = 0x3F,
    }
}

/// Value of `WHO_AM_I` on a genuine part.
pub const WHO_AM_I_VALUE: u8 = 0x49;

/// One past the last mapped register; sizes the register shadow.
pub const REGISTER_MAP_SIZE: usize = 0x40;

/// Sub-address bit 7 turns on register auto-increment for burst reads.
pub const AUTO_INCREMENT: u8 = 0x80;

/* CTRL0
 * B7   B6      B5      B4   B3   B2      B1      B0
 * BOOT FIFO_EN FTH_EN 0    0    HP_CL   HPIS1   HPIS2
*/
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctrl0Flags: u8 {
        const BOOT    = 1 << 7;
        const FIFO_EN = 1 << 6;
        const FTH_EN  = 1 << 5;
    }
}

/* CTRL1
 * B7     B6     B5     B4     B3   B2   B1   B0
 * AODR3  AODR2  AODR1  AODR0  BDU  AZEN AYEN AXEN
*/
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctrl1Flags: u8 {
        const BDU  = 1 << 3;
        const AZEN = 1 << 2;
        const AYEN = 1 << 1;
        const AXEN = 1 << 0;
    }
}

pub const ACCEL_ODR_LOC: u8 = 4;
pub const ACCEL_ODR_MASK: u8 = 0b1111 << ACCEL_ODR_LOC;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelDataRate {
    PowerDown = 0,
    Hz3_125   = 1,
    Hz6_25    = 2,
    Hz12_5    = 3,
    Hz25      = 4,
    Hz50      = 5,
    Hz100     = 6,
    Hz200     = 7,
    Hz400     = 8,
    Hz800     = 9,
    Hz1600    = 10,
}

impl TryFrom<u8> for AccelDataRate {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccelDataRate::PowerDown),
            1 => Ok(AccelDataRate::Hz3_125),
            2 => Ok(AccelDataRate::Hz6_25),
            3 => Ok(AccelDataRate::Hz12_5),
            4 => Ok(AccelDataRate::Hz25),
            5 => Ok(AccelDataRate::Hz50),
            6 => Ok(AccelDataRate::Hz100),
            7 => Ok(AccelDataRate::Hz200),
            8 => Ok(AccelDataRate::Hz400),
            9 => Ok(AccelDataRate::Hz800),
            10 => Ok(AccelDataRate::Hz1600),
            _ => Err(()),
        }
    }
}

/* CTRL2
 * B7    B6    B5    B4    B3    B2   B1   B0
 * ABW1  ABW0  AFS2  AFS1  AFS0  0    AST  SIM
*/
pub const ACCEL_FS_LOC: u8 = 3;
pub const ACCEL_FS_MASK: u8 = 0b111 << ACCEL_FS_LOC;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccelScale {
    G2  = 0,
    G4  = 1,
    G6  = 2,
    G8  = 3,
    G16 = 4,
}

impl AccelScale {
    /// Sensitivity in g per LSB.
    pub fn sensitivity(self) -> f32 {
        match self {
            AccelScale::G2 => 0.000061,
            AccelScale::G4 => 0.000122,
            AccelScale::G6 => 0.000183,
            AccelScale::G8 => 0.000244,
            AccelScale::G16 => 0.000732,
        }
    }
}

impl TryFrom<u8> for AccelScale {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccelScale::G2),
            1 => Ok(AccelScale::G4),
            2 => Ok(AccelScale::G6),
            3 => Ok(AccelScale::G8),
            4 => Ok(AccelScale::G16),
            _ => Err(()),
        }
    }
}

/* CTRL5
 * B7      B6     B5     B4     B3     B2     B1    B0
 * TEMP_EN M_RES1 M_RES0 M_ODR2 M_ODR1 M_ODR0 LIR2  LIR1
*/
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ctrl5Flags: u8 {
        const TEMP_EN = 1 << 7;
        const LIR2    = 1 << 1;
        const LIR1    = 1 << 0;
    }
}

pub const MAG_RES_LOC: u8 = 5;
pub const MAG_RES_MASK: u8 = 0b11 << MAG_RES_LOC;
pub const MAG_RES_HIGH: u8 = 0b11 << MAG_RES_LOC;

pub const MAG_ODR_LOC: u8 = 2;
pub const MAG_ODR_MASK: u8 = 0b111 << MAG_ODR_LOC;

/// 100 Hz is only available with the accelerometer above 50 Hz or powered down.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MagDataRate {
    Hz3_125 = 0,
    Hz6_25  = 1,
    Hz12_5  = 2,
    Hz25    = 3,
    Hz50    = 4,
    Hz100   = 5,
}

impl TryFrom<u8> for MagDataRate {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MagDataRate::Hz3_125),
            1 => Ok(MagDataRate::Hz6_25),
            2 => Ok(MagDataRate::Hz12_5),
            3 => Ok(MagDataRate::Hz25),
            4 => Ok(MagDataRate::Hz50),
            5 => Ok(MagDataRate::Hz100),
            _ => Err(()),
        }
    }
}

/* CTRL6
 * B7   B6    B5    B4   B3   B2   B1   B0
 * 0    MFS1  MFS0  0    0    0    0    0
*/
pub const MAG_FS_LOC: u8 = 5;
pub const MAG_FS_MASK: u8 = 0b11 << MAG_FS_LOC;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MagScale {
    Gauss2  = 0,
    Gauss4  = 1,
    Gauss8  = 2,
    Gauss12 = 3,
}

impl MagScale {
    /// Sensitivity in gauss per LSB.
    pub fn sensitivity(self) -> f32 {
        match self {
            MagScale::Gauss2 => 0.00008,
            MagScale::Gauss4 => 0.00016,
            MagScale::Gauss8 => 0.00032,
            MagScale::Gauss12 => 0.000479,
        }
    }
}

impl TryFrom<u8> for MagScale {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MagScale::Gauss2),
            1 => Ok(MagScale::Gauss4),
            2 => Ok(MagScale::Gauss8),
            3 => Ok(MagScale::Gauss12),
            _ => Err(()),
        }
    }
}

/* CTRL7
 * B7    B6    B5     B4   B3   B2   B1   B0
 * AHPM1 AHPM0 AFDS   T_ONLY 0  MLP  MD1  MD0
*/
pub const MAG_MODE_MASK: u8 = 0b111; // MLP | MD1 | MD0, all clear = continuous

/* FIFO_CTRL
 * B7   B6   B5   B4    B3    B2    B1    B0
 * FM2  FM1  FM0  FTH4  FTH3  FTH2  FTH1  FTH0
*/
pub const FIFO_MODE_LOC: u8 = 5;
pub const FIFO_MODE_MASK: u8 = 0b111 << FIFO_MODE_LOC;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FifoMode {
    Bypass = 0,
    Stream = 2,
}

impl FifoMode {
    /// FM field as it sits in FIFO_CTRL.
    pub const fn bits(self) -> u8 {
        (self as u8) << FIFO_MODE_LOC
    }
}

impl TryFrom<u8> for FifoMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FifoMode::Bypass),
            2 => Ok(FifoMode::Stream),
            _ => Err(()),
        }
    }
}

/* FIFO_SRC
 * B7   B6    B5     B4   B3   B2   B1   B0
 * FTH  OVRN  EMPTY  FSS4 FSS3 FSS2 FSS1 FSS0
*/
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoSrcFlags: u8 {
        const FTH   = 1 << 7;
        const OVRN  = 1 << 6;
        const EMPTY = 1 << 5;
    }
}

/// Unread-level bits honoured when sizing a drain.
pub const FIFO_LEVEL_MASK: u8 = 0x0F;

/// Largest drain the level field can describe.
pub const FIFO_MAX_SLOTS: usize = FIFO_LEVEL_MASK as usize + 1;

/// X/Y/Z, low byte first.
pub const FIFO_SLOT_BYTES: usize = 6;
