mod config;

use std::env::args;
use std::process::ExitCode;
use dotenv::dotenv;
use log::{debug, info};
use thiserror::Error;
use doorlock_keypad::{Key, KeypadController, Pin};
use crate::config::Config;

#[derive(Debug, Error, Eq, PartialEq)]
enum ArgsError {
    #[error("usage: doorlock [PIN] KEYS")]
    Usage,
    #[error("PIN is not a decimal number: {0:?}")]
    PinNotNumber(String),
}

/// The parsed command line: an optional PIN followed by the keys to press.
#[derive(Debug)]
struct Args {
    pin: Option<Pin>,
    keys: Vec<Key>,
}

fn parse_args(args: &[String]) -> eyre::Result<Args> {
    match args {
        [keys] => Ok(Args {
            pin: None,
            keys: Key::parse_sequence(keys)?,
        }),
        [pin, keys] => {
            let number: u32 = pin
                .parse()
                .map_err(|_| ArgsError::PinNotNumber(pin.clone()))?;
            Ok(Args {
                pin: Some(Pin::try_from(number)?),
                keys: Key::parse_sequence(keys)?,
            })
        }
        _ => Err(ArgsError::Usage.into()),
    }
}

/// Picks the PIN given on the command line, falling back to the config's PIN.
fn resolve_pin(pin: Option<Pin>, load_config: impl FnOnce() -> Option<Config>) -> Pin {
    if let Some(pin) = pin {
        return pin;
    }
    info!("No PIN given, only KEYS. Using the PIN from the config.");
    if let Some(config) = load_config() {
        info!("Config loaded.");
        config.pin
    } else {
        info!("Config not found. Using default");
        Config::default().pin
    }
}

/// Feeds the keys to a fresh controller, in order.
fn run(pin: Pin, keys: &[Key]) -> KeypadController {
    let mut controller = KeypadController::with_pin(pin);
    for &key in keys {
        controller.press(key);
    }
    controller
}

fn main() -> eyre::Result<ExitCode> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    let args = parse_args(&args().skip(1).collect::<Vec<_>>())?;

    let pin = resolve_pin(args.pin, Config::try_load);

    debug!("Pressing {} keys.", args.keys.len());
    let controller = run(pin, &args.keys);
    info!("Lock is {}.", controller.phase());

    if controller.is_open() {
        println!("door is open");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("door is closed");
        Ok(ExitCode::FAILURE)
    }
}
