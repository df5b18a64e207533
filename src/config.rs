use std::path::Path;

use serde::Deserialize;

/// Runtime configuration, read from a JSON file given as the first command
/// line argument. Every field has a default, so running without a file
/// works.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Port the controller listens on for the robot.
    pub port: u16,
    /// How often the current command is pushed, in milliseconds.
    pub send_interval_ms: u64,
    /// Speed slider maximum, field `A` of the command.
    pub max_speed: i32,
    /// Turn slider maximum in each direction, field `C` of the command.
    pub max_turn: i32,
    /// PWM frequency slider maximum, field `D` of the command.
    pub max_frequency: i32,
    /// PWM frequency at startup.
    pub initial_frequency: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 53000,
            send_interval_ms: 20,
            max_speed: 1000,
            max_turn: 500,
            max_frequency: 100_000,
            initial_frequency: 50_000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.port, 53000);
        assert_eq!(config.initial_frequency, 50_000);
        assert_eq!(config.max_speed, 1000);
    }

    #[test]
    fn a_partial_file_keeps_the_other_defaults() {
        let config: Config = serde_json::from_str(r#"{ "port": 54000 }"#).unwrap();
        assert_eq!(config.port, 54000);
        assert_eq!(config.send_interval_ms, 20);
        assert_eq!(config.max_frequency, 100_000);
    }

    #[test]
    fn camel_case_field_names() {
        let config: Config = serde_json::from_str(r#"{ "sendIntervalMs": 50 }"#).unwrap();
        assert_eq!(config.send_interval_ms, 50);
    }
}
