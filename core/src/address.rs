use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use stellar_strkey::Strkey;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("Invalid strkey: {0}")]
    InvalidStrkey(String),

    #[error("Unsupported strkey kind: {0}")]
    UnsupportedKind(String),
}

/// An account or contract identifier on the ledger.
///
/// Ordering is total (accounts sort before contracts, then by raw bytes), which
/// is what registries rely on when they canonicalize token pairs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    Account([u8; 32]),
    Contract([u8; 32]),
}

impl Address {
    pub fn bytes(&self) -> &[u8; 32] {
        match self {
            Self::Account(bytes) | Self::Contract(bytes) => bytes,
        }
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// An all-zero address is what a registry reports for an empty slot.
    pub fn is_zero(&self) -> bool {
        self.bytes().iter().all(|b| *b == 0)
    }

    /// Derive a contract address as `sha256(deployer ‖ discriminator)`.
    pub fn derive_contract(deployer: &Address, discriminator: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(deployer.bytes());
        hasher.update(discriminator);
        Self::Contract(hasher.finalize().into())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strkey = match self {
            Self::Account(bytes) => {
                Strkey::PublicKeyEd25519(stellar_strkey::ed25519::PublicKey(*bytes))
            }
            Self::Contract(bytes) => Strkey::Contract(stellar_strkey::Contract(*bytes)),
        };
        f.write_str(&strkey.to_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let strkey =
            Strkey::from_string(s).map_err(|e| AddressError::InvalidStrkey(format!("{e:?}")))?;
        match strkey {
            Strkey::PublicKeyEd25519(key) => Ok(Self::Account(key.0)),
            Strkey::Contract(contract) => Ok(Self::Contract(contract.0)),
            _ => Err(AddressError::UnsupportedKind(s.chars().take(1).collect())),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
