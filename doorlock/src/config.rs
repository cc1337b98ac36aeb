use std::env::var_os;
use std::ffi::OsStr;
use std::path::Path;
use doorlock_keypad::Pin;
use serde::{Serialize, Deserialize};

const DEFAULT_PIN: &str = "1234";

#[derive(Serialize, Deserialize, Debug)]
pub struct Config {
    /// The PIN used when none is given on the command line.
    pub pin: Pin,
}

impl Config {
    /// Loads the config from the file named by `DOORLOCK_CONFIG_FILE` (`config.json` by default).
    ///
    /// Returns `None` if the file doesn't exist or can't be parsed.
    pub fn try_load() -> Option<Self> {
        let config_str = var_os("DOORLOCK_CONFIG_FILE");
        let config_str: &OsStr = config_str.as_deref().unwrap_or(OsStr::new("config.json"));
        Self::try_load_from(Path::new(config_str))
    }

    pub fn try_load_from(config_path: &Path) -> Option<Self> {
        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            let reader = std::io::BufReader::new(file);
            serde_json::from_reader(reader).ok()
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pin: DEFAULT_PIN.parse().expect("Invalid default PIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pin_is_1234() {
        assert_eq!(Config::default().pin.to_string(), "1234");
    }

    #[test]
    fn parses_pin_from_json() {
        let config: Config = serde_json::from_str(r#"{ "pin": "0915" }"#).unwrap();
        assert_eq!(config.pin.to_string(), "0915");
    }

    #[test]
    fn rejects_malformed_pin() {
        assert!(serde_json::from_str::<Config>(r#"{ "pin": "12" }"#).is_err());
        assert!(serde_json::from_str::<Config>(r#"{ "pin": 1234 }"#).is_err());
    }

    #[test]
    fn missing_file_loads_nothing() {
        assert!(Config::try_load_from(Path::new("/nonexistent/doorlock/config.json")).is_none());
    }
}
