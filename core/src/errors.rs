use crate::address::Address;
use crate::environment::EnvError;
use thiserror::Error;

/// Reasons an environment build is aborted. None of them are retried.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Execution environment error: {0}")]
    Environment(#[from] EnvError),

    #[error("Deployment of {artifact} failed: {source}")]
    Deployment {
        artifact: String,
        #[source]
        source: EnvError,
    },

    #[error("Call {artifact}.{function} failed: {source}")]
    Invocation {
        artifact: String,
        function: String,
        #[source]
        source: EnvError,
    },

    #[error("Could not resolve {0}")]
    Unresolved(String),

    #[error("Pair {pair} reports token0 {token0}, which matches neither requested token")]
    NonCanonicalToken { pair: Address, token0: Address },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FixtureError {
    /// Revert reason, if the failure came from a reverted transaction.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::Environment(EnvError::Reverted(reason))
            | Self::Deployment {
                source: EnvError::Reverted(reason),
                ..
            }
            | Self::Invocation {
                source: EnvError::Reverted(reason),
                ..
            } => Some(reason),
            _ => None,
        }
    }
}
