/** Register string representations.

The partner protocol transmits the status register as a decimal-string
encoded integer. Hex (`0x`) and binary (`0b`) spellings are accepted on
input as debugging conveniences.
*/
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("failed to parse register string {0:?}")]
    BadRegister(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum WireFormat {
    Decimal,
    Hex,
    Binary,
}

impl WireFormat {
    pub fn format(&self, register: u32) -> String {
        match self {
            WireFormat::Decimal => format!("{}", register),
            WireFormat::Hex => format!("{:#010x}", register),
            WireFormat::Binary => format!("{:#034b}", register),
        }
    }
}

pub fn parse_register(input: &str) -> Result<u32, WireError> {
    let trimmed = input.trim();

    let (digits, radix) = if let Some(hex) = trimmed.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = trimmed.strip_prefix("0b") {
        (bin, 2)
    } else {
        (trimmed, 10)
    };

    u32::from_str_radix(digits, radix).map_err(|_| WireError::BadRegister(trimmed.to_string()))
}
