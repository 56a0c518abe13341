use crate::errors::FixtureError;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Largest decimals value whose scale still fits in a `u128`.
const MAX_DECIMALS: u32 = 38;

/// Parameters of the test tokens minted during a build.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FixtureConfig {
    /// Whole-token supply minted to the deployer for each ERC20.
    pub token_supply_units: u64,
    pub token_decimals: u32,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            token_supply_units: 10_000,
            token_decimals: 18,
        }
    }
}

impl FixtureConfig {
    /// Read `DONASWAP_*` variables (a `.env` file is honoured), falling back to
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env(Environment::with_prefix("DONASWAP"))
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .add_source(env.try_parsing(true))
            .set_default("token_supply_units", defaults.token_supply_units)?
            .set_default("token_decimals", defaults.token_decimals)?
            .build()?
            .try_deserialize()
    }

    /// Supply in base units.
    pub fn token_supply(&self) -> Result<u128, FixtureError> {
        if self.token_decimals > MAX_DECIMALS {
            return Err(FixtureError::Config(format!(
                "token_decimals {} exceeds {}",
                self.token_decimals, MAX_DECIMALS
            )));
        }
        (self.token_supply_units as u128)
            .checked_mul(10u128.pow(self.token_decimals))
            .ok_or_else(|| FixtureError::Config("token supply overflows u128".to_string()))
    }
}

pub fn expand_to_18_decimals(n: u64) -> u128 {
    n as u128 * 10u128.pow(18)
}
