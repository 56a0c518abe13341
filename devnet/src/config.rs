use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DevnetConfig {
    pub network_passphrase: String,
    /// Delay between applying a transaction and reporting it confirmed.
    pub confirmation_delay_ms: u64,
    /// Give up on a submission after this long. Unset means wait forever.
    #[serde(default)]
    pub submit_timeout_ms: Option<u64>,
    pub max_call_depth: usize,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            network_passphrase: "Donaswap Local Devnet ; 2026".to_string(),
            confirmation_delay_ms: 0,
            submit_timeout_ms: None,
            max_call_depth: 8,
        }
    }
}

impl DevnetConfig {
    /// Read `DEVNET_*` variables (a `.env` file is honoured), falling back to
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env(Environment::with_prefix("DEVNET"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .add_source(env.try_parsing(true))
            .set_default("network_passphrase", defaults.network_passphrase)?
            .set_default("confirmation_delay_ms", defaults.confirmation_delay_ms)?
            .set_default("max_call_depth", defaults.max_call_depth as u64)?
            .build()?
            .try_deserialize()
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DevnetConfig::default();
        assert_eq!(cfg.confirmation_delay(), Duration::ZERO);
        assert_eq!(cfg.submit_timeout(), None);
        assert_eq!(cfg.max_call_depth, 8);
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("DEVNET").source(Some(vars))
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let cfg = DevnetConfig::from_env(env(&[])).unwrap();
        assert_eq!(cfg, DevnetConfig::default());
    }

    #[test]
    fn test_environment_sets_timeout() {
        let cfg = DevnetConfig::from_env(env(&[
            ("DEVNET_SUBMIT_TIMEOUT_MS", "50"),
            ("DEVNET_CONFIRMATION_DELAY_MS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.submit_timeout(), Some(Duration::from_millis(50)));
        assert_eq!(cfg.confirmation_delay(), Duration::from_millis(3));
        assert_eq!(cfg.max_call_depth, 8);
    }

    #[test]
    fn test_timeout_conversion() {
        let cfg = DevnetConfig {
            submit_timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(cfg.submit_timeout(), Some(Duration::from_millis(250)));
    }
}
