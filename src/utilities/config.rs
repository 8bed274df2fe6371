use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use tracing::warn;

use super::error::ConfigError;

pub const NUM_FLOORS: u8 = 10;
pub const CAPACITY: u8 = 10;
pub const LOBBY: u8 = 1;

const FILE_PATH: &str = "config.json";
const FALLBACK_FILE_PATH: &str = "_config.json";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub elevator: HashMap<String, u8>,
    #[serde(default)]
    pub timing: HashMap<String, f64>,
    #[serde(default)]
    pub display: HashMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElevatorSettings {
    pub num_floors: u8,
    pub capacity: u8,
}

impl Default for ElevatorSettings {
    fn default() -> Self {
        ElevatorSettings {
            num_floors: NUM_FLOORS,
            capacity: CAPACITY,
        }
    }
}

/// Fixed durations of the simulated steps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSettings {
    pub load: Duration,
    pub movement: Duration,
    pub idle_poll: Duration,
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            load: Duration::from_secs(1),
            movement: Duration::from_secs(2),
            idle_poll: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub enabled: bool,
    pub refresh: Duration,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            enabled: true,
            refresh: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub elevator: ElevatorSettings,
    pub timing: TimingSettings,
    pub display: DisplayConfig,
}

/// Values given on the command line as `--key value` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgOverrides {
    pub config_path: Option<String>,
    pub num_floors: Option<u8>,
    pub capacity: Option<u8>,
    pub display: Option<bool>,
}

impl Config {
    /// Reads the configuration file and applies the command line on top of it.
    pub fn get(args: &[String]) -> Result<Self, ConfigError> {
        let overrides = parse_args(args);
        let config_file = read_config_file(overrides.config_path.as_deref())?;
        let mut config = Self::from_file(config_file)?;
        config.apply(&overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        let config = Self::from_file(config_file)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(config_file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let elevator = ElevatorSettings {
            num_floors: config_file.elevator.get("num_floors").copied().unwrap_or(defaults.elevator.num_floors),
            capacity: config_file.elevator.get("capacity").copied().unwrap_or(defaults.elevator.capacity),
        };
        let timing = TimingSettings {
            load: seconds(&config_file.timing, "load_secs", defaults.timing.load)?,
            movement: seconds(&config_file.timing, "move_secs", defaults.timing.movement)?,
            idle_poll: seconds(&config_file.timing, "idle_poll_secs", defaults.timing.idle_poll)?,
        };
        let display = DisplayConfig {
            enabled: config_file.display.get("enabled").map_or(defaults.display.enabled, |v| *v != 0),
            refresh: config_file.display.get("refresh_ms").map_or(defaults.display.refresh, |ms| Duration::from_millis(*ms)),
        };
        Ok(Config { elevator, timing, display })
    }

    pub fn apply(&mut self, overrides: &ArgOverrides) {
        if let Some(num_floors) = overrides.num_floors {
            self.elevator.num_floors = num_floors;
        }
        if let Some(capacity) = overrides.capacity {
            self.elevator.capacity = capacity;
        }
        if let Some(display) = overrides.display {
            self.display.enabled = display;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elevator.num_floors < 2 {
            return Err(ConfigError::Invalid(format!(
                "num_floors must be at least 2, got {}",
                self.elevator.num_floors
            )));
        }
        if self.elevator.capacity == 0 {
            return Err(ConfigError::Invalid(String::from("capacity must be at least 1")));
        }
        if self.display.refresh.is_zero() {
            return Err(ConfigError::Invalid(String::from("refresh_ms must be positive")));
        }
        Ok(())
    }
}

fn seconds(timing: &HashMap<String, f64>, key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match timing.get(key) {
        None => Ok(default),
        Some(secs) if secs.is_finite() && *secs >= 0.0 => Ok(Duration::from_secs_f64(*secs)),
        Some(secs) => Err(ConfigError::Invalid(format!("{} must be a non-negative number, got {}", key, secs))),
    }
}

fn read_config_file(path: Option<&str>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = path {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        return Ok(serde_json::from_str(&contents)?);
    }
    let config_contents = match fs::read_to_string(FILE_PATH) {
        Ok(content) => content,
        Err(_) => match fs::read_to_string(FALLBACK_FILE_PATH) {
            Ok(content) => {
                warn!("No configuration file provided, using default settings...");
                content
            }
            Err(_) => {
                warn!("No configuration files found, using built-in settings...");
                return Ok(ConfigFile::default());
            }
        },
    };
    Ok(serde_json::from_str(&config_contents)?)
}

/// Parses `--key value` pairs, program name excluded.
pub fn parse_args(args: &[String]) -> ArgOverrides {
    let mut overrides = ArgOverrides::default();

    for arg_pair in args.chunks_exact(2) {
        match arg_pair[0].as_str() {
            "--config" => overrides.config_path = Some(arg_pair[1].clone()),
            "--floors" => match arg_pair[1].parse::<u8>() {
                Ok(num) => overrides.num_floors = Some(num),
                Err(_) => warn!("floors {} is not a number, skipping...", arg_pair[1]),
            },
            "--capacity" => match arg_pair[1].parse::<u8>() {
                Ok(num) => overrides.capacity = Some(num),
                Err(_) => warn!("capacity {} is not a number, skipping...", arg_pair[1]),
            },
            "--display" => match arg_pair[1].as_str() {
                "on" => overrides.display = Some(true),
                "off" => overrides.display = Some(false),
                other => warn!("display {} is not on/off, skipping...", other),
            },
            _ => warn!("illegal argument {}, skipping...", arg_pair[0]),
        }
    }
    if args.len() % 2 == 1 {
        warn!("argument {} has no value, skipping...", args[args.len() - 1]);
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bundled_defaults_parse() {
        let config = Config::from_json(include_str!("../../_config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_json(r#"{ "elevator": { "num_floors": 6 }, "timing": { "move_secs": 0.5 } }"#).unwrap();
        assert_eq!(config.elevator.num_floors, 6);
        assert_eq!(config.elevator.capacity, CAPACITY);
        assert_eq!(config.timing.movement, Duration::from_millis(500));
        assert_eq!(config.timing.load, Duration::from_secs(1));
        assert!(config.display.enabled);

        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            Config::from_json(r#"{ "elevator": { "num_floors": 1 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "elevator": { "capacity": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "timing": { "load_secs": -1.0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(Config::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn parses_argument_pairs() {
        let overrides = parse_args(&args(&["--floors", "12", "--display", "off", "--config", "lift.json"]));
        assert_eq!(overrides.num_floors, Some(12));
        assert_eq!(overrides.display, Some(false));
        assert_eq!(overrides.config_path.as_deref(), Some("lift.json"));
        assert_eq!(overrides.capacity, None);
    }

    #[test]
    fn skips_bad_arguments() {
        let overrides = parse_args(&args(&["--floors", "many", "--bogus", "1", "--capacity"]));
        assert_eq!(overrides, ArgOverrides::default());
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let mut config = Config::default();
        config.apply(&ArgOverrides {
            num_floors: Some(4),
            capacity: Some(2),
            display: Some(false),
            ..ArgOverrides::default()
        });
        assert_eq!(config.elevator, ElevatorSettings { num_floors: 4, capacity: 2 });
        assert!(!config.display.enabled);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = Config::get(&args(&["--config", "/nonexistent/elevator.json"]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
