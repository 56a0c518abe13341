use crate::address::Address;
use crate::environment::{EnvError, ExecutionEnvironment};
use crate::identity::Identity;
use crate::transaction::{Action, Receipt, Transaction};
use crate::value::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An identity connected to an execution environment.
///
/// Nonces are handed out locally in call order, so several submissions may be
/// in flight at once without racing on the ledger's nonce.
pub struct Client<E> {
    env: Arc<E>,
    identity: Identity,
    next_nonce: AtomicU64,
}

impl<E: ExecutionEnvironment> Client<E> {
    pub async fn connect(env: Arc<E>, identity: Identity) -> Result<Arc<Self>, EnvError> {
        let nonce = env.nonce(&identity.address()).await?;
        Ok(Arc::new(Self {
            env,
            identity,
            next_nonce: AtomicU64::new(nonce),
        }))
    }

    pub fn address(&self) -> Address {
        self.identity.address()
    }

    async fn send(&self, action: Action) -> Result<Receipt, EnvError> {
        let nonce = self.next_nonce.fetch_add(1, Ordering::SeqCst);
        let passphrase = self.env.network_passphrase();
        let tx = Transaction {
            source: self.address(),
            nonce,
            action,
        };
        let prepared = tx
            .sign(&self.identity, passphrase)
            .and_then(|signed| Ok((signed.hash(passphrase)?, signed)));
        let (tx_hash, signed) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.resync_nonce().await?;
                return Err(e);
            }
        };

        tracing::debug!(tx.hash = %tx_hash, tx.nonce = nonce, "Submitting transaction");
        match self.env.submit(signed).await {
            Ok(receipt) => {
                tracing::debug!(
                    tx.hash = %receipt.tx_hash,
                    ledger = receipt.ledger,
                    "Transaction confirmed"
                );
                Ok(receipt)
            }
            // A revert is executed and consumes the nonce.
            Err(e @ EnvError::Reverted(_)) => Err(e),
            Err(e) => {
                tracing::warn!(tx.hash = %tx_hash, error = %e, "Transaction rejected");
                self.resync_nonce().await?;
                Err(e)
            }
        }
    }

    /// Take the next nonce from the ledger again after a submission that may
    /// not have consumed the one handed out.
    async fn resync_nonce(&self) -> Result<(), EnvError> {
        let nonce = self.env.nonce(&self.address()).await?;
        self.next_nonce.store(nonce, Ordering::SeqCst);
        tracing::debug!(tx.nonce = nonce, "Nonce resynchronized");
        Ok(())
    }

    /// Deploy `artifact` and return a handle bound to this client.
    pub async fn deploy(
        self: &Arc<Self>,
        artifact: &str,
        args: Vec<Value>,
    ) -> Result<ContractHandle<E>, EnvError> {
        let receipt = self
            .send(Action::Deploy {
                artifact: artifact.to_string(),
                args,
            })
            .await?;
        let address = receipt.contract_address.ok_or_else(|| {
            EnvError::Malformed(format!("deploy receipt {} has no contract", receipt.tx_hash))
        })?;
        tracing::info!(%artifact, %address, "Deployed");
        Ok(ContractHandle::at(Arc::clone(self), address, artifact))
    }

    pub async fn invoke(
        &self,
        contract: Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Receipt, EnvError> {
        self.send(Action::Invoke {
            contract,
            function: function.to_string(),
            args,
        })
        .await
    }
}

/// A deployed contract bound to the client that will sign calls to it.
pub struct ContractHandle<E> {
    address: Address,
    artifact: String,
    client: Arc<Client<E>>,
}

impl<E> ContractHandle<E> {
    /// Attach to an already deployed contract.
    pub fn at(client: Arc<Client<E>>, address: Address, artifact: &str) -> Self {
        Self {
            address,
            artifact: artifact.to_string(),
            client,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn client(&self) -> &Arc<Client<E>> {
        &self.client
    }
}

impl<E: ExecutionEnvironment> ContractHandle<E> {
    /// State-changing call; resolves once confirmed.
    pub async fn send(&self, function: &str, args: Vec<Value>) -> Result<Receipt, EnvError> {
        self.client.invoke(self.address, function, args).await
    }

    /// Read-only call.
    pub async fn call(&self, function: &str, args: Vec<Value>) -> Result<Value, EnvError> {
        self.client.env.query(&self.address, function, args).await
    }

    pub async fn call_address(&self, function: &str, args: Vec<Value>) -> Result<Address, EnvError> {
        let value = self.call(function, args).await?;
        Address::try_from(value).map_err(|e| EnvError::Malformed(e.to_string()))
    }
}

impl<E> Clone for ContractHandle<E> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            artifact: self.artifact.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl<E> fmt::Debug for ContractHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("artifact", &self.artifact)
            .field("address", &self.address)
            .finish()
    }
}

impl<E> PartialEq for ContractHandle<E> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}
