use crate::address::Address;
use crate::transaction::{Receipt, SignedTransaction};
use crate::value::Value;
use thiserror::Error;

/// Errors reported by an execution environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("Invalid transaction signature")]
    InvalidSignature,

    #[error("Nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch { expected: u64, got: u64 },

    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),

    #[error("Unknown contract: {0}")]
    UnknownContract(Address),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Timed out waiting for confirmation")]
    Timeout,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Something that accepts signed transactions and answers read-only queries.
///
/// `submit` resolves only once the transaction is confirmed (or rejected), so
/// callers can sequence dependent steps by awaiting it.
#[allow(async_fn_in_trait)]
pub trait ExecutionEnvironment: Send + Sync {
    fn network_passphrase(&self) -> &str;

    /// Next nonce the ledger expects from `account`.
    async fn nonce(&self, account: &Address) -> Result<u64, EnvError>;

    async fn submit(&self, tx: SignedTransaction) -> Result<Receipt, EnvError>;

    /// Evaluate a read-only call. State is never modified.
    async fn query(
        &self,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, EnvError>;

    /// Latest closed ledger sequence.
    async fn ledger(&self) -> Result<u64, EnvError>;
}
