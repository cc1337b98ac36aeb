use crate::{Digit, KeypadError, KeypadResult};

/// Represents a key event on the door keypad.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Key {
    /// One of the `0` to `9` keys.
    Digit(Digit),
    /// The `A` key, opening an unlocked door.
    Accept,
    /// The `C` key, clearing the entry or closing an open door.
    Cancel,
}

impl Key {
    /// Converts a character to a [Key].
    ///
    /// `'A'` is [Key::Accept], `'C'` is [Key::Cancel] and `'0'..='9'` are digits.
    ///
    /// # Errors
    /// - [KeypadError::InvalidKey] for any other character.
    pub fn from_char(c: char) -> KeypadResult<Key> {
        match c {
            'A' => Ok(Key::Accept),
            'C' => Ok(Key::Cancel),
            _ => Digit::from_char(c)
                .map(Key::Digit)
                .ok_or(KeypadError::InvalidKey(c)),
        }
    }

    /// Converts the [Key] to its corresponding character.
    pub fn to_char(self) -> char {
        match self {
            Key::Digit(digit) => digit.to_char(),
            Key::Accept => 'A',
            Key::Cancel => 'C',
        }
    }

    /// Parses a whole sequence of key presses, e.g. `"1234A"`.
    pub fn parse_sequence(keys: &str) -> KeypadResult<Vec<Key>> {
        keys.chars().map(Key::from_char).collect()
    }
}

impl TryFrom<char> for Key {
    type Error = KeypadError;

    fn try_from(c: char) -> KeypadResult<Key> {
        Key::from_char(c)
    }
}
