use crate::config::DevnetConfig;
use crate::contracts;
use crate::host::{ArtifactRegistry, Execution, World};
use donaswap_core::{
    Action, Address, EnvError, ExecutionEnvironment, Receipt, SignedTransaction, Value,
};
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct LedgerState {
    sequence: u64,
    nonces: HashMap<Address, u64>,
    world: World,
}

/// In-process ledger hosting the exchange artifacts.
///
/// Transactions are applied one at a time in arrival order. A transaction that
/// passes signature and nonce checks always consumes its nonce and closes a
/// ledger, even when it reverts; its state changes are discarded in that case.
pub struct Devnet {
    config: DevnetConfig,
    registry: ArtifactRegistry,
    state: Mutex<LedgerState>,
}

impl Devnet {
    /// A devnet with every exchange artifact registered.
    pub fn new(config: DevnetConfig) -> Self {
        Self::with_registry(config, contracts::registry())
    }

    pub fn with_registry(config: DevnetConfig, registry: ArtifactRegistry) -> Self {
        Self {
            config,
            registry,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Credit `account` with native asset out of thin air.
    pub async fn fund(&self, account: Address, amount: u128) {
        let mut state = self.state.lock().await;
        let balance = state.world.native_balances.entry(account).or_insert(0);
        *balance = balance.saturating_add(amount);
        tracing::debug!(%account, amount = %amount, "Funded account");
    }

    pub async fn native_balance(&self, account: &Address) -> u128 {
        let state = self.state.lock().await;
        state
            .world
            .native_balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Artifact name of the contract at `address`.
    pub async fn artifact_at(&self, address: &Address) -> Option<String> {
        let state = self.state.lock().await;
        state
            .world
            .contracts
            .get(address)
            .map(|c| c.artifact.clone())
    }

    fn apply(&self, state: &mut LedgerState, signed: SignedTransaction) -> Result<Receipt, EnvError> {
        let passphrase = self.config.network_passphrase.as_str();
        if !signed.verify(passphrase) {
            return Err(EnvError::InvalidSignature);
        }
        let tx_hash = signed.hash(passphrase)?;

        let tx = &signed.tx;
        let expected = state.nonces.get(&tx.source).copied().unwrap_or(0);
        if tx.nonce != expected {
            return Err(EnvError::NonceMismatch {
                expected,
                got: tx.nonce,
            });
        }
        match &tx.action {
            Action::Deploy { artifact, .. } if !self.registry.contains(artifact) => {
                return Err(EnvError::UnknownArtifact(artifact.clone()));
            }
            Action::Invoke { contract, .. } if !state.world.contracts.contains_key(contract) => {
                return Err(EnvError::UnknownContract(*contract));
            }
            _ => {}
        }

        state.nonces.insert(tx.source, expected + 1);
        state.sequence += 1;
        let ledger = state.sequence;

        let mut exec = Execution::new(
            &mut state.world,
            &self.registry,
            self.config.max_call_depth,
            false,
        );
        let outcome = match &tx.action {
            Action::Deploy { artifact, args } => {
                let address = Address::derive_contract(&tx.source, &tx.nonce.to_be_bytes());
                exec.create(tx.source, artifact, args, address)
                    .map(|address| (Some(address), Value::Void))
            }
            Action::Invoke {
                contract,
                function,
                args,
            } => exec
                .call(tx.source, *contract, function, args)
                .map(|result| (None, result)),
        };
        let events = exec.into_events();

        match outcome {
            Ok((contract_address, result)) => {
                tracing::debug!(tx.hash = %tx_hash, ledger, "Transaction applied");
                Ok(Receipt {
                    tx_hash,
                    ledger,
                    contract_address,
                    result,
                    events,
                })
            }
            Err(revert) => {
                tracing::warn!(tx.hash = %tx_hash, ledger, reason = %revert, "Transaction reverted");
                Err(EnvError::Reverted(revert.0))
            }
        }
    }
}

impl ExecutionEnvironment for Devnet {
    fn network_passphrase(&self) -> &str {
        &self.config.network_passphrase
    }

    async fn nonce(&self, account: &Address) -> Result<u64, EnvError> {
        let state = self.state.lock().await;
        Ok(state.nonces.get(account).copied().unwrap_or(0))
    }

    async fn submit(&self, tx: SignedTransaction) -> Result<Receipt, EnvError> {
        let confirm = async {
            let receipt = {
                let mut state = self.state.lock().await;
                self.apply(&mut state, tx)?
            };
            let delay = self.config.confirmation_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, EnvError>(receipt)
        };

        match self.config.submit_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, confirm)
                .await
                .map_err(|_| EnvError::Timeout)?,
            None => confirm.await,
        }
    }

    async fn query(
        &self,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, EnvError> {
        let state = self.state.lock().await;
        if !state.world.contracts.contains_key(contract) {
            return Err(EnvError::UnknownContract(*contract));
        }
        // Queries run against a throwaway copy so nothing can leak into state.
        let mut world = state.world.clone();
        drop(state);

        let mut exec = Execution::new(&mut world, &self.registry, self.config.max_call_depth, true);
        exec.call(Address::Account([0u8; 32]), *contract, function, &args)
            .map_err(|revert| EnvError::Reverted(revert.0))
    }

    async fn ledger(&self) -> Result<u64, EnvError> {
        Ok(self.state.lock().await.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donaswap_core::artifacts::{self, token};
    use donaswap_core::{Identity, Transaction};

    fn devnet() -> Devnet {
        Devnet::new(DevnetConfig::default())
    }

    fn deploy_tx(identity: &Identity, nonce: u64, artifact: &str, args: Vec<Value>) -> SignedTransaction {
        Transaction {
            source: identity.address(),
            nonce,
            action: Action::Deploy {
                artifact: artifact.to_string(),
                args,
            },
        }
        .sign(identity, "Donaswap Local Devnet ; 2026")
        .unwrap()
    }

    #[tokio::test]
    async fn test_deploy_assigns_deterministic_address() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        let receipt = net
            .submit(deploy_tx(&id, 0, artifacts::ERC20, vec![Value::U128(100)]))
            .await
            .unwrap();
        let expected = Address::derive_contract(&id.address(), &0u64.to_be_bytes());
        assert_eq!(receipt.contract_address, Some(expected));
        assert_eq!(receipt.ledger, 1);
        assert_eq!(net.artifact_at(&expected).await.as_deref(), Some(artifacts::ERC20));
    }

    #[tokio::test]
    async fn test_bad_signature_rejected() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        let mut tx = deploy_tx(&id, 0, artifacts::WETH9, vec![]);
        tx.signature[0] ^= 0xFF;
        assert_eq!(net.submit(tx).await, Err(EnvError::InvalidSignature));
        assert_eq!(net.nonce(&id.address()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_nonce_must_match() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        let err = net
            .submit(deploy_tx(&id, 3, artifacts::WETH9, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, EnvError::NonceMismatch { expected: 0, got: 3 });
    }

    #[tokio::test]
    async fn test_unknown_artifact_rejected_without_consuming_nonce() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        let err = net
            .submit(deploy_tx(&id, 0, "Nope", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, EnvError::UnknownArtifact("Nope".to_string()));
        assert_eq!(net.nonce(&id.address()).await.unwrap(), 0);
        assert_eq!(net.ledger().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revert_consumes_nonce_and_discards_state() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        // ERC20 without a supply argument reverts in its constructor.
        let err = net
            .submit(deploy_tx(&id, 0, artifacts::ERC20, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, EnvError::Reverted(_)));
        assert_eq!(net.nonce(&id.address()).await.unwrap(), 1);
        let address = Address::derive_contract(&id.address(), &0u64.to_be_bytes());
        assert_eq!(net.artifact_at(&address).await, None);
    }

    #[tokio::test]
    async fn test_query_cannot_write() {
        let net = devnet();
        let id = Identity::from_seed([1u8; 32]);
        let receipt = net
            .submit(deploy_tx(&id, 0, artifacts::ERC20, vec![Value::U128(100)]))
            .await
            .unwrap();
        let token = receipt.contract_address.unwrap();
        let err = net
            .query(
                &token,
                token::APPROVE,
                vec![Address::Account([2u8; 32]).into(), Value::U128(1)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EnvError::Reverted(reason) if reason.contains("read-only")));
    }

    #[tokio::test]
    async fn test_query_unknown_contract() {
        let net = devnet();
        let missing = Address::Contract([9u8; 32]);
        assert_eq!(
            net.query(&missing, token::NAME, vec![]).await,
            Err(EnvError::UnknownContract(missing))
        );
    }

    #[tokio::test]
    async fn test_submit_timeout() {
        let net = Devnet::new(DevnetConfig {
            confirmation_delay_ms: 200,
            submit_timeout_ms: Some(10),
            ..Default::default()
        });
        let id = Identity::from_seed([1u8; 32]);
        let err = net
            .submit(deploy_tx(&id, 0, artifacts::WETH9, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err, EnvError::Timeout);
    }

    #[tokio::test]
    async fn test_fund_and_balance() {
        let net = devnet();
        let account = Address::Account([5u8; 32]);
        net.fund(account, 40).await;
        net.fund(account, 2).await;
        assert_eq!(net.native_balance(&account).await, 42);
    }

    #[tokio::test]
    async fn test_fund_saturates() {
        let net = devnet();
        let account = Address::Account([5u8; 32]);
        net.fund(account, u128::MAX).await;
        net.fund(account, 1).await;
        assert_eq!(net.native_balance(&account).await, u128::MAX);
    }
}
