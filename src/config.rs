use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bot::Difficulty;
use crate::error::ConfigError;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9977";
const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 60;

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: String,
    /// Difficulty new sessions start with.
    pub difficulty: Difficulty,
    /// Fixes the bot's random source, for reproducible games.
    pub seed: Option<u64>,
    pub monitor_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            difficulty: Difficulty::default(),
            seed: None,
            monitor_interval: Duration::from_secs(DEFAULT_MONITOR_INTERVAL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(address) = lookup("BIND_ADDRESS") {
            config.bind_address = address;
        }
        if let Some(value) = lookup("BOT_DIFFICULTY") {
            config.difficulty = value.parse()
                .map_err(|_| ConfigError::InvalidValue { key: "BOT_DIFFICULTY", value })?;
        }
        if let Some(value) = lookup("BOT_SEED") {
            let seed = value.parse()
                .map_err(|_| ConfigError::InvalidValue { key: "BOT_SEED", value })?;
            config.seed = Some(seed);
        }
        if let Some(value) = lookup("MONITOR_INTERVAL_SECS") {
            let secs = value.parse()
                .map_err(|_| ConfigError::InvalidValue { key: "MONITOR_INTERVAL_SECS", value })?;
            config.monitor_interval = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::Duration;
    use rand::Rng;
    use crate::bot::Difficulty;
    use crate::config::Config;
    use crate::error::ConfigError;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address, "0.0.0.0:9977");
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.monitor_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDRESS", "127.0.0.1:8000"),
            ("BOT_DIFFICULTY", "medium"),
            ("BOT_SEED", "42"),
            ("MONITOR_INTERVAL_SECS", "5"),
        ])).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8000");
        assert_eq!(config.difficulty, Difficulty::Heuristic);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.monitor_interval, Duration::from_secs(5));

        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("BOT_SEED", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "BOT_SEED", .. }));

        let err = Config::from_lookup(lookup(&[("BOT_DIFFICULTY", "hard")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"hard\" for BOT_DIFFICULTY");
    }
}
