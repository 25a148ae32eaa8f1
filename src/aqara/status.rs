use std::fmt;

use thiserror::Error;

use super::{
    AcState, FanSpeed, Mode, Power, Profile, Swing, FAN_SPEED, MODE, POWER, SWING, TEMPERATURE,
};
use crate::bits::{self, BitsError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error(transparent)]
    Bits(#[from] BitsError),

    #[error("no {field} is mapped to raw value {raw}")]
    UnknownRawValue { field: &'static str, raw: u32 },

    #[error("no raw {field} encoding for {value:?}")]
    UnknownSemanticValue { field: &'static str, value: String },

    #[error("temperature {0}C out of range, must be between {1}C and {2}C")]
    TemperatureOutOfRange(u8, u8, u8),
}

// Power and swing codes are shared by every known partner firmware; only
// the mode and fan tables vary per model.
const POWER_OFF: u32 = 0;
const POWER_ON: u32 = 1;
const SWING_ON: u32 = 0;
const SWING_FIXED: u32 = 1;

/// A snapshot of the device's packed status register.
///
/// The register is fetched fresh before every read and written back whole
/// after every change; nothing is cached here. The fetch/modify/send cycle
/// against the live device is not atomic, so callers must serialize writers
/// per physical device or the last whole-register write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusRegister(pub u32);

impl StatusRegister {
    pub fn power(&self) -> Result<Power, StatusError> {
        match bits::extract(self.0, POWER) {
            POWER_OFF => Ok(Power::Off),
            POWER_ON => Ok(Power::On),
            raw => Err(StatusError::UnknownRawValue {
                field: "power",
                raw,
            }),
        }
    }

    pub fn mode(&self, profile: &Profile) -> Result<Mode, StatusError> {
        let raw = bits::extract(self.0, MODE);
        profile
            .mode_for_raw(raw)
            .ok_or(StatusError::UnknownRawValue { field: "mode", raw })
    }

    pub fn fan_speed(&self, profile: &Profile) -> Result<FanSpeed, StatusError> {
        let raw = bits::extract(self.0, FAN_SPEED);
        profile
            .fan_speed_for_raw(raw)
            .ok_or(StatusError::UnknownRawValue {
                field: "fan speed",
                raw,
            })
    }

    pub fn swing(&self) -> Result<Swing, StatusError> {
        match bits::extract(self.0, SWING) {
            SWING_ON => Ok(Swing::Swing),
            SWING_FIXED => Ok(Swing::Fixed),
            raw => Err(StatusError::UnknownRawValue {
                field: "swing",
                raw,
            }),
        }
    }

    // The raw temperature is already in integer Celsius
    pub fn temperature(&self) -> u8 {
        bits::extract(self.0, TEMPERATURE) as u8
    }

    pub fn set_power(self, power: Power) -> Result<Self, StatusError> {
        let raw = match power {
            Power::Off => POWER_OFF,
            Power::On => POWER_ON,
        };
        Ok(Self(bits::replace(self.0, POWER, raw)?))
    }

    /// Changing the mode also turns the device on, in the same register
    /// value, matching the partner protocol.
    pub fn set_mode(self, profile: &Profile, mode: Mode) -> Result<Self, StatusError> {
        let raw = profile
            .raw_mode(mode)
            .ok_or_else(|| StatusError::UnknownSemanticValue {
                field: "mode",
                value: mode.to_string(),
            })?;

        let register = bits::replace(self.0, MODE, raw)?;
        Ok(Self(bits::replace(register, POWER, POWER_ON)?))
    }

    /// Changing the fan speed also turns the device on.
    pub fn set_fan_speed(self, profile: &Profile, fan_speed: FanSpeed) -> Result<Self, StatusError> {
        let raw =
            profile
                .raw_fan_speed(fan_speed)
                .ok_or_else(|| StatusError::UnknownSemanticValue {
                    field: "fan speed",
                    value: fan_speed.to_string(),
                })?;

        let register = bits::replace(self.0, FAN_SPEED, raw)?;
        Ok(Self(bits::replace(register, POWER, POWER_ON)?))
    }

    pub fn set_swing(self, swing: Swing) -> Result<Self, StatusError> {
        let raw = match swing {
            Swing::Swing => SWING_ON,
            Swing::Fixed => SWING_FIXED,
        };
        Ok(Self(bits::replace(self.0, SWING, raw)?))
    }

    /// Changing the target temperature also turns the device on.
    pub fn set_temperature(self, profile: &Profile, temperature: u8) -> Result<Self, StatusError> {
        if !(profile.min_temperature..=profile.max_temperature).contains(&temperature) {
            return Err(StatusError::TemperatureOutOfRange(
                temperature,
                profile.min_temperature,
                profile.max_temperature,
            ));
        }

        let register = bits::replace(self.0, TEMPERATURE, temperature as u32)?;
        Ok(Self(bits::replace(register, POWER, POWER_ON)?))
    }

    /// Decodes every field, failing on any raw value the profile does not
    /// know about.
    pub fn state(&self, profile: &Profile) -> Result<AcState, StatusError> {
        Ok(AcState {
            power: self.power()?,
            mode: self.mode(profile)?,
            fan_speed: self.fan_speed(profile)?,
            swing: self.swing()?,
            temperature: self.temperature(),
        })
    }

    /// Tolerant decode: any reading the profile cannot map is reported as
    /// the device being off instead of failing. Opt-in; [`Self::state`] is
    /// the default.
    pub fn state_lossy(&self, profile: &Profile) -> AcState {
        let mode = self.mode(profile).ok();
        let fan_speed = self.fan_speed(profile).ok();

        let power = match self.power() {
            Ok(Power::On) if mode.is_some() && fan_speed.is_some() => Power::On,
            _ => Power::Off,
        };

        AcState {
            power,
            mode: mode.unwrap_or(Mode::Auto),
            fan_speed: fan_speed.unwrap_or(FanSpeed::Auto),
            swing: self.swing().unwrap_or(Swing::Fixed),
            temperature: self.temperature(),
        }
    }

    /// Writes every field of `state` onto this register, leaving reserved
    /// bits untouched.
    pub fn apply_state(self, profile: &Profile, state: &AcState) -> Result<Self, StatusError> {
        // Power goes last so an Off state survives the implicit power-on of
        // the mode/fan/temperature writes.
        self.set_swing(state.swing)?
            .set_temperature(profile, state.temperature)?
            .set_fan_speed(profile, state.fan_speed)?
            .set_mode(profile, state.mode)?
            .set_power(state.power)
    }

    pub fn from_state(profile: &Profile, state: &AcState) -> Result<Self, StatusError> {
        Self(0).apply_state(profile, state)
    }
}

// The device wire format: the register travels as a decimal string.
impl fmt::Display for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqara::ProfileSet;
    use strum::IntoEnumIterator;

    fn v3() -> Profile {
        ProfileSet::builtin()
            .find("lumi.acpartner.v3")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_power_on_from_zero() {
        let register = StatusRegister(0).set_power(Power::On).unwrap();
        assert_eq!(register.0, 268435456); // 1 << 28
        assert_eq!(register.power().unwrap(), Power::On);
    }

    #[test]
    fn test_set_temperature() {
        let register = StatusRegister(268435456)
            .set_temperature(&v3(), 22)
            .unwrap();
        assert_eq!(register.0, 268441088); // 268435456 | 22 << 8
        assert_eq!(register.temperature(), 22);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let profile = v3();
        let register = StatusRegister(0)
            .set_mode(&profile, Mode::Cool)
            .unwrap()
            .set_temperature(&profile, 22)
            .unwrap();

        assert_eq!(register.mode(&profile).unwrap(), Mode::Cool);
        assert_eq!(register.temperature(), 22);
    }

    #[test]
    fn test_implicit_power_on() {
        let profile = v3();
        let off = StatusRegister(0);

        assert_eq!(
            off.set_mode(&profile, Mode::Heat).unwrap().power().unwrap(),
            Power::On
        );
        assert_eq!(
            off.set_fan_speed(&profile, FanSpeed::High)
                .unwrap()
                .power()
                .unwrap(),
            Power::On
        );
        assert_eq!(
            off.set_temperature(&profile, 25)
                .unwrap()
                .power()
                .unwrap(),
            Power::On
        );

        // Swing and power writes leave the power field alone
        assert_eq!(
            off.set_swing(Swing::Fixed).unwrap().power().unwrap(),
            Power::Off
        );
    }

    #[test]
    fn test_temperature_bounds() {
        let profile = v3();
        assert_eq!(
            StatusRegister(0).set_temperature(&profile, 12),
            Err(StatusError::TemperatureOutOfRange(12, 17, 30))
        );
        assert_eq!(
            StatusRegister(0).set_temperature(&profile, 31),
            Err(StatusError::TemperatureOutOfRange(31, 17, 30))
        );
    }

    #[test]
    fn test_unknown_raw_mode() {
        let profile = v3();
        // Raw mode 9 is unmapped for every builtin family
        let register = StatusRegister(9 << 24);

        assert_eq!(
            register.mode(&profile),
            Err(StatusError::UnknownRawValue { field: "mode", raw: 9 })
        );
        assert!(register.state(&profile).is_err());
    }

    #[test]
    fn test_lossy_decode_reads_as_off() {
        let profile = v3();
        let register = StatusRegister((POWER_ON << 28) | (9 << 24) | (24 << 8));

        let state = register.state_lossy(&profile);
        assert_eq!(state.power, Power::Off);
        assert_eq!(state.temperature, 24);
    }

    #[test]
    fn test_state_round_trip_all_modes() {
        for profile in [
            v3(),
            ProfileSet::builtin()
                .find("lumi.acpartner.v1")
                .unwrap()
                .clone(),
        ] {
            for mode in Mode::iter() {
                for fan_speed in FanSpeed::iter() {
                    let state = AcState {
                        power: Power::On,
                        mode,
                        fan_speed,
                        swing: Swing::Swing,
                        temperature: profile.min_temperature,
                    };

                    let register = StatusRegister::from_state(&profile, &state).unwrap();
                    assert_eq!(register.state(&profile).unwrap(), state);
                }
            }
        }
    }

    #[test]
    fn test_apply_state_preserves_reserved_bits() {
        let profile = v3();
        let state = AcState {
            power: Power::Off,
            mode: Mode::Dry,
            fan_speed: FanSpeed::Low,
            swing: Swing::Fixed,
            temperature: 20,
        };

        // Bits 0-7 and 18-19 are outside every declared field
        let register = StatusRegister(0xff | (0b11 << 18))
            .apply_state(&profile, &state)
            .unwrap();

        assert_eq!(register.0 & 0xff, 0xff);
        assert_eq!((register.0 >> 18) & 0b11, 0b11);
        assert_eq!(register.state(&profile).unwrap(), state);
        assert_eq!(register.power().unwrap(), Power::Off);
    }

    #[test]
    fn test_unknown_semantic_value() {
        let mut profile = v3();
        profile.modes.remove(&Mode::Dry);

        assert!(matches!(
            StatusRegister(0).set_mode(&profile, Mode::Dry),
            Err(StatusError::UnknownSemanticValue { field: "mode", .. })
        ));
    }

    #[test]
    fn test_wire_format_is_decimal() {
        assert_eq!(StatusRegister(268441088).to_string(), "268441088");
    }
}
