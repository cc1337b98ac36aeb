//! The module for the keypad state machine.

use std::fmt::{Display, Formatter};
use log::{debug, info, warn};
use crate::{Digit, Key, KeypadResult, Pin, PIN_LENGTH};

/// The number of consecutive wrong attempts tolerated while locked.
///
/// One more wrong attempt blocks the lock for good.
pub const MAX_FAILED_ATTEMPTS: u8 = 2;

/// Enum that can represent the different phases of the lock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// The door is locked and waiting for the PIN.
    Locked {
        /// Wrong attempts entered since the last unlock, at most [MAX_FAILED_ATTEMPTS].
        failed_attempts: u8,
    },
    /// The correct PIN was entered, waiting for accept to open the door.
    Unlocked,
    /// The door is physically open.
    Open,
    /// Too many wrong attempts. Nothing gets the lock out of this phase.
    Blocked,
    /// A new PIN is being typed in after unlocking.
    ChangingPin,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Locked { failed_attempts: 0 }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Locked { failed_attempts } => write!(f, "locked ({} failed)", failed_attempts),
            Phase::Unlocked => write!(f, "unlocked"),
            Phase::Open => write!(f, "open"),
            Phase::Blocked => write!(f, "blocked"),
            Phase::ChangingPin => write!(f, "changing PIN"),
        }
    }
}

/// Digits typed in for the attempt in progress.
#[derive(Copy, Clone, Debug, Default)]
struct Entry {
    digits: [Digit; PIN_LENGTH],
    len: usize,
}

impl Entry {
    /// Appends a digit. Once the entry is full, returns its digits and starts over empty.
    fn push(&mut self, digit: Digit) -> Option<[Digit; PIN_LENGTH]> {
        self.digits[self.len] = digit;
        self.len += 1;
        if self.len < PIN_LENGTH {
            return None;
        }
        let full = self.digits;
        self.clear();
        Some(full)
    }

    fn clear(&mut self) {
        *self = Entry::default();
    }
}

/// The keypad controller, owning the stored PIN and the lock phase.
///
/// Every operation is a synchronous in-memory transition. Callers sharing a controller
/// between threads have to serialize access themselves, e.g. with a `Mutex`.
#[derive(Clone, Debug)]
pub struct KeypadController {
    pin: Pin,
    entry: Entry,
    phase: Phase,
}

impl KeypadController {
    /// Creates a locked controller with no failed attempts.
    ///
    /// # Errors
    /// - [KeypadError::InvalidPin](crate::KeypadError::InvalidPin) unless `pin` is exactly
    ///   4 digits, each in `0..=9`.
    pub fn new(pin: &[u8]) -> KeypadResult<Self> {
        Ok(Self::with_pin(Pin::try_from(pin)?))
    }

    /// Creates a locked controller with no failed attempts from an already validated PIN.
    pub fn with_pin(pin: Pin) -> Self {
        KeypadController {
            pin,
            entry: Entry::default(),
            phase: Phase::default(),
        }
    }

    /// Handles a single key event.
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(digit) => self.enter_digit(digit),
            Key::Accept => self.press_accept(),
            Key::Cancel => self.press_cancel(),
        }
    }

    /// Handles a press of the digit key `n`.
    ///
    /// # Errors
    /// - [KeypadError::InvalidDigit](crate::KeypadError::InvalidDigit) if `n` is not in
    ///   `0..=9`, whatever the phase.
    pub fn press_digit(&mut self, n: u8) -> KeypadResult<()> {
        self.enter_digit(Digit::new(n)?);
        Ok(())
    }

    /// Handles a press of the accept key, opening the door if it's unlocked.
    pub fn press_accept(&mut self) {
        if self.phase == Phase::Unlocked {
            info!("Door opened.");
            self.phase = Phase::Open;
        } else {
            debug!("Accept ignored while {}.", self.phase);
        }
    }

    /// Handles a press of the cancel key.
    ///
    /// Always drops the digits entered so far. Closes and locks an open door, and
    /// abandons a PIN change in progress.
    pub fn press_cancel(&mut self) {
        self.entry.clear();
        match self.phase {
            Phase::Open => {
                info!("Door closed and locked.");
                self.phase = Phase::Locked { failed_attempts: 0 };
            }
            Phase::ChangingPin => {
                info!("PIN change cancelled.");
                self.phase = Phase::Unlocked;
            }
            _ => debug!("Entry cleared."),
        }
    }

    fn enter_digit(&mut self, digit: Digit) {
        match self.phase {
            Phase::Open | Phase::Blocked => {
                debug!("Digit ignored while {}.", self.phase);
            }
            Phase::Unlocked | Phase::ChangingPin => {
                self.phase = Phase::ChangingPin;
                if let Some(new_pin) = self.entry.push(digit) {
                    info!("PIN changed, door locked.");
                    self.pin = Pin::from_digits(new_pin);
                    self.phase = Phase::Locked { failed_attempts: 0 };
                }
            }
            Phase::Locked { failed_attempts } => {
                if let Some(attempt) = self.entry.push(digit) {
                    self.check_attempt(&attempt, failed_attempts);
                }
            }
        }
    }

    fn check_attempt(&mut self, attempt: &[Digit; PIN_LENGTH], failed_attempts: u8) {
        if self.pin.matches(attempt) {
            info!("Unlocked with correct PIN.");
            self.phase = Phase::Unlocked;
        } else if failed_attempts >= MAX_FAILED_ATTEMPTS {
            warn!("Incorrect PIN entered {} times in a row. Lock blocked.", failed_attempts + 1);
            self.phase = Phase::Blocked;
        } else {
            warn!("Incorrect PIN entered.");
            self.phase = Phase::Locked { failed_attempts: failed_attempts + 1 };
        }
    }

    /// Gets the current phase of the lock.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gets the number of consecutive wrong attempts.
    ///
    /// Stays at [MAX_FAILED_ATTEMPTS] once blocked, and is 0 while unlocked, open or changing the PIN.
    pub fn failed_attempts(&self) -> u8 {
        match self.phase {
            Phase::Locked { failed_attempts } => failed_attempts,
            Phase::Blocked => MAX_FAILED_ATTEMPTS,
            Phase::Unlocked | Phase::Open | Phase::ChangingPin => 0,
        }
    }

    /// Gets how many digits of the current entry were typed in so far.
    pub fn entered(&self) -> usize {
        self.entry.len
    }

    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    pub fn is_unlocked(&self) -> bool {
        self.phase == Phase::Unlocked
    }

    pub fn is_blocked(&self) -> bool {
        self.phase == Phase::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeypadError;

    fn controller() -> KeypadController {
        KeypadController::new(&[1, 2, 3, 4]).unwrap()
    }

    fn type_keys(controller: &mut KeypadController, keys: &str) {
        for key in Key::parse_sequence(keys).unwrap() {
            controller.press(key);
        }
    }

    #[test]
    fn starts_locked() {
        let controller = controller();
        assert_eq!(controller.phase(), Phase::Locked { failed_attempts: 0 });
        assert_eq!(controller.entered(), 0);
        assert!(!controller.is_open());
        assert!(!controller.is_unlocked());
        assert!(!controller.is_blocked());
    }

    #[test]
    fn new_rejects_malformed_pin() {
        assert_eq!(KeypadController::new(&[1, 2, 3]).err(), Some(KeypadError::InvalidPin));
        assert_eq!(KeypadController::new(&[1, 2, 3, 4, 5]).err(), Some(KeypadError::InvalidPin));
        assert_eq!(KeypadController::new(&[1, 2, 3, 12]).err(), Some(KeypadError::InvalidPin));
    }

    #[test]
    fn press_digit_rejects_out_of_range() {
        let mut controller = controller();
        assert_eq!(controller.press_digit(10), Err(KeypadError::InvalidDigit(10)));
        assert_eq!(controller.entered(), 0);
    }

    #[test]
    fn invalid_digit_reported_while_open_or_blocked() {
        let mut open = controller();
        type_keys(&mut open, "1234A");
        assert_eq!(open.press_digit(10), Err(KeypadError::InvalidDigit(10)));
        assert_eq!(open.phase(), Phase::Open);

        let mut blocked = controller();
        type_keys(&mut blocked, "000011112222");
        assert_eq!(blocked.press_digit(10), Err(KeypadError::InvalidDigit(10)));
        assert_eq!(blocked.press_digit(200), Err(KeypadError::InvalidDigit(200)));
        assert_eq!(blocked.phase(), Phase::Blocked);
    }

    #[test]
    fn counts_entered_digits() {
        let mut controller = controller();
        type_keys(&mut controller, "12");
        assert_eq!(controller.entered(), 2);
        type_keys(&mut controller, "3");
        assert_eq!(controller.entered(), 3);
        type_keys(&mut controller, "4");
        assert_eq!(controller.entered(), 0);
    }

    #[test]
    fn correct_pin_then_accept_opens() {
        let mut controller = controller();
        type_keys(&mut controller, "1234");
        assert!(controller.is_unlocked());
        type_keys(&mut controller, "A");
        assert!(controller.is_open());
    }

    #[test]
    fn cancel_after_unlock_keeps_unlocked() {
        let mut controller = controller();
        type_keys(&mut controller, "1234C");
        assert!(controller.is_unlocked());
    }

    #[test]
    fn cancel_closes_open_door() {
        let mut controller = controller();
        type_keys(&mut controller, "0000");
        type_keys(&mut controller, "1234AC");
        assert_eq!(controller.phase(), Phase::Locked { failed_attempts: 0 });
        type_keys(&mut controller, "C");
        assert_eq!(controller.phase(), Phase::Locked { failed_attempts: 0 });
    }

    #[test]
    fn cancel_drops_partial_entry() {
        let mut controller = controller();
        type_keys(&mut controller, "12C34");
        assert_eq!(controller.entered(), 2);
        type_keys(&mut controller, "C1234");
        assert!(controller.is_unlocked());
    }

    #[test]
    fn wrong_attempts_count_up_then_block() {
        let mut controller = controller();
        type_keys(&mut controller, "0000");
        assert_eq!(controller.failed_attempts(), 1);
        type_keys(&mut controller, "1111");
        assert_eq!(controller.failed_attempts(), 2);
        type_keys(&mut controller, "2222");
        assert!(controller.is_blocked());
        assert_eq!(controller.failed_attempts(), MAX_FAILED_ATTEMPTS);
        type_keys(&mut controller, "3333");
        assert_eq!(controller.failed_attempts(), MAX_FAILED_ATTEMPTS);
    }

    #[test]
    fn unlock_resets_failed_attempts() {
        let mut controller = controller();
        type_keys(&mut controller, "00001111");
        type_keys(&mut controller, "1234");
        assert!(controller.is_unlocked());
        assert_eq!(controller.failed_attempts(), 0);
    }

    #[test]
    fn blocked_ignores_everything() {
        let mut controller = controller();
        type_keys(&mut controller, "000011112222");
        type_keys(&mut controller, "1234A");
        assert!(controller.is_blocked());
        assert_eq!(controller.press_digit(1), Ok(()));
        assert_eq!(controller.entered(), 0);
        type_keys(&mut controller, "C1234");
        assert!(controller.is_blocked());
    }

    #[test]
    fn open_ignores_digits() {
        let mut controller = controller();
        type_keys(&mut controller, "1234A5678");
        assert!(controller.is_open());
        assert_eq!(controller.entered(), 0);
    }

    #[test]
    fn digits_after_unlock_change_pin() {
        let mut controller = controller();
        type_keys(&mut controller, "12345");
        assert_eq!(controller.phase(), Phase::ChangingPin);
        assert!(!controller.is_unlocked());
        type_keys(&mut controller, "678");
        assert_eq!(controller.phase(), Phase::Locked { failed_attempts: 0 });
        type_keys(&mut controller, "1234");
        assert_eq!(controller.failed_attempts(), 1);
        type_keys(&mut controller, "5678");
        assert!(controller.is_unlocked());
    }

    #[test]
    fn accept_while_changing_pin_is_ignored() {
        let mut controller = controller();
        type_keys(&mut controller, "123456A");
        assert_eq!(controller.phase(), Phase::ChangingPin);
        assert_eq!(controller.entered(), 2);
    }

    #[test]
    fn cancel_abandons_pin_change() {
        let mut controller = controller();
        type_keys(&mut controller, "123456C");
        assert!(controller.is_unlocked());
        assert_eq!(controller.entered(), 0);
        type_keys(&mut controller, "A");
        assert!(controller.is_open());
    }
}
