use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Shortest login the relaxed policy accepts.
pub const MIN_LOGIN_LEN: usize = 4;

/// Shortest login the binary's own `auth()` check accepts (strictly more than 5).
pub const BINARY_MIN_LOGIN_LEN: usize = 6;

const SEED_XOR: u32 = 0x1337;
const SEED_OFFSET: u32 = 6_221_293;
const MIX_MODULUS: u32 = 0x539;

/// Errors produced while validating a login.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialError {
    #[error("login must be at least {min_len} characters")]
    InvalidInput { min_len: usize },
    #[error("login byte {byte:#04x} at index {index} is not printable")]
    NonPrintable { index: usize, byte: u8 },
}

/// Validation rules applied before a serial is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginPolicy {
    /// Only require the four bytes the seed reads from.
    #[default]
    Relaxed,
    /// Mirror the target binary: more than five bytes, none of them control characters.
    Binary,
}

impl LoginPolicy {
    pub fn min_len(self) -> usize {
        match self {
            LoginPolicy::Relaxed => MIN_LOGIN_LEN,
            LoginPolicy::Binary => BINARY_MIN_LOGIN_LEN,
        }
    }

    pub fn validate(self, login: &[u8]) -> Result<(), SerialError> {
        let min_len = self.min_len();
        if login.len() < min_len {
            return Err(SerialError::InvalidInput { min_len });
        }
        if self == LoginPolicy::Binary {
            if let Some((index, &byte)) = login.iter().enumerate().find(|(_, b)| **b <= 31) {
                return Err(SerialError::NonPrintable { index, byte });
            }
        }
        Ok(())
    }
}

/// Initial mixing state derived from the fourth login byte.
pub fn seed(b3: u8) -> u32 {
    (u32::from(b3) ^ SEED_XOR).wrapping_add(SEED_OFFSET)
}

/// One update step of the mixing loop.
pub fn mix(v: u32, byte: u8) -> u32 {
    v.wrapping_add((v ^ u32::from(byte)) % MIX_MODULUS)
}

/// Run the mixing loop over `bytes`, starting from `seed`.
pub fn fold(seed: u32, bytes: &[u8]) -> u32 {
    bytes.iter().fold(seed, |v, &byte| mix(v, byte))
}

/// Compute the serial for `login` under the default (relaxed) policy.
pub fn calculate_serial(login: &[u8]) -> Result<u32, SerialError> {
    calculate_serial_with(login, LoginPolicy::Relaxed)
}

/// Compute the serial for `login` after validating it against `policy`.
///
/// The loop walks the whole login, including the bytes the seed already saw.
pub fn calculate_serial_with(login: &[u8], policy: LoginPolicy) -> Result<u32, SerialError> {
    policy.validate(login)?;
    Ok(fold(seed(login[3]), login))
}

/// Serializable record of a computed serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialReport {
    pub login: String,
    pub serial: u32,
}

impl SerialReport {
    pub fn new(login: &[u8], serial: u32) -> Self {
        Self {
            login: String::from_utf8_lossy(login).into_owned(),
            serial,
        }
    }
}
