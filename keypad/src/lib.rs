pub mod controller;
pub mod key;
pub mod pin;
mod utils;

pub use controller::*;
pub use key::Key;
pub use pin::{Digit, Pin, PIN_LENGTH};

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone, Copy)]
pub enum KeypadError {
    #[error("PIN must be exactly 4 digits, each 0-9")]
    InvalidPin,
    #[error("invalid digit: {0}")]
    InvalidDigit(u8),
    #[error("invalid key: {0:?}")]
    InvalidKey(char),
}

pub type KeypadResult<T> = Result<T, KeypadError>;
