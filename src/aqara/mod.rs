pub mod profile;
pub use profile::{Profile, ProfileError, ProfileSet};
pub mod status;
pub use status::{StatusError, StatusRegister};

use serde::{Deserialize, Serialize};

use crate::bits::BitRange;

/*
Status register layout (32 bits, remaining bits are reserved):

bits 28-31   power        0 = off, 1 = on
bits 24-27   mode         raw code, per-model table
bits 20-23   fan speed    raw code, per-model table
bits 16-17   swing        0 = swing, 1 = fixed
bits  8-15   temperature  target temperature in integer Celsius
*/
pub const POWER: BitRange = BitRange::fixed(28, 31);
pub const MODE: BitRange = BitRange::fixed(24, 27);
pub const FAN_SPEED: BitRange = BitRange::fixed(20, 23);
pub const SWING: BitRange = BitRange::fixed(16, 17);
pub const TEMPERATURE: BitRange = BitRange::fixed(8, 15);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Off,
    On,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Heat,
    Cool,
    Auto,
    Dry,
    Fan,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Low,
    Medium,
    High,
    Auto,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Swing {
    Swing,
    Fixed,
}

// The complete state packed into the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcState {
    pub power: Power,

    pub mode: Mode,

    pub fan_speed: FanSpeed,

    pub swing: Swing,

    // Target temperature in Celsius
    pub temperature: u8,
}
