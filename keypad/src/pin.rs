//! Validated value types for keypad digits and PIN codes.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::{KeypadError, KeypadResult};
use crate::utils::WithinExt;

/// The number of digits in a PIN code.
pub const PIN_LENGTH: usize = 4;

/// A single decimal digit (0-9) entered on the keypad.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Creates a new digit.
    ///
    /// # Errors
    /// - [KeypadError::InvalidDigit] if `value` is not in `0..=9`.
    pub fn new(value: u8) -> KeypadResult<Digit> {
        if value.within(0..=9) {
            Ok(Digit(value))
        } else {
            Err(KeypadError::InvalidDigit(value))
        }
    }

    /// Converts a decimal character (`'0'..='9'`) to a [Digit].
    pub fn from_char(c: char) -> Option<Digit> {
        c.to_digit(10).map(|d| Digit(d as u8))
    }

    /// Gets the numeric value of the digit.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Converts the digit to its corresponding character.
    pub fn to_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl TryFrom<u8> for Digit {
    type Error = KeypadError;

    fn try_from(value: u8) -> KeypadResult<Digit> {
        Digit::new(value)
    }
}

/// A 4-digit PIN code.
///
/// Serialized as a string of exactly four decimal characters, e.g. `"0915"`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin([Digit; PIN_LENGTH]);

impl Pin {
    /// Creates a PIN from four digit values.
    ///
    /// # Errors
    /// - [KeypadError::InvalidPin] if any of the values is not in `0..=9`.
    pub fn new(digits: [u8; PIN_LENGTH]) -> KeypadResult<Pin> {
        let mut pin = [Digit::default(); PIN_LENGTH];
        for (slot, value) in pin.iter_mut().zip(digits) {
            *slot = Digit::new(value).map_err(|_| KeypadError::InvalidPin)?;
        }
        Ok(Pin(pin))
    }

    /// Creates a PIN from already validated digits.
    pub const fn from_digits(digits: [Digit; PIN_LENGTH]) -> Pin {
        Pin(digits)
    }

    pub fn digits(&self) -> &[Digit; PIN_LENGTH] {
        &self.0
    }

    /// Checks whether `entry` is equal to this PIN.
    ///
    /// Every position is compared, even after a mismatch was already found.
    pub fn matches(&self, entry: &[Digit; PIN_LENGTH]) -> bool {
        self.0
            .iter()
            .zip(entry)
            .fold(0u8, |diff, (stored, entered)| diff | (stored.0 ^ entered.0))
            == 0
    }
}

impl TryFrom<&[u8]> for Pin {
    type Error = KeypadError;

    fn try_from(digits: &[u8]) -> KeypadResult<Pin> {
        let digits: [u8; PIN_LENGTH] = digits.try_into().map_err(|_| KeypadError::InvalidPin)?;
        Pin::new(digits)
    }
}

/// Reads the PIN as a decimal number, so `42` is the code `0042`.
impl TryFrom<u32> for Pin {
    type Error = KeypadError;

    fn try_from(number: u32) -> KeypadResult<Pin> {
        if number > 9999 {
            return Err(KeypadError::InvalidPin);
        }
        Pin::new([
            (number / 1000) as u8,
            (number / 100 % 10) as u8,
            (number / 10 % 10) as u8,
            (number % 10) as u8,
        ])
    }
}

impl FromStr for Pin {
    type Err = KeypadError;

    fn from_str(s: &str) -> KeypadResult<Pin> {
        let digits = s
            .chars()
            .map(|c| Digit::from_char(c).ok_or(KeypadError::InvalidPin))
            .collect::<Result<Vec<_>, _>>()?;
        digits
            .try_into()
            .map(Pin)
            .map_err(|_| KeypadError::InvalidPin)
    }
}

impl TryFrom<String> for Pin {
    type Error = KeypadError;

    fn try_from(s: String) -> KeypadResult<Pin> {
        s.parse()
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> String {
        pin.to_string()
    }
}

impl Display for Pin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for digit in self.0 {
            write!(f, "{}", digit.to_char())?;
        }
        Ok(())
    }
}
