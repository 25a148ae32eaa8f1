pub mod aqara;
pub mod bits;
pub mod wire;

pub use aqara::{AcState, FanSpeed, Mode, Power, Profile, ProfileSet, StatusRegister, Swing};
pub use bits::{extract, replace, BitRange, BitsError};
