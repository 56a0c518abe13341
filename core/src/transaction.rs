use crate::address::Address;
use crate::environment::EnvError;
use crate::identity::{verify_signature, Identity};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What a transaction asks the ledger to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Deploy {
        artifact: String,
        args: Vec<Value>,
    },
    Invoke {
        contract: Address,
        function: String,
        args: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub source: Address,
    pub nonce: u64,
    pub action: Action,
}

impl Transaction {
    /// Digest that gets signed: `sha256(network_id ‖ json(tx))`.
    pub fn signature_payload(&self, network_passphrase: &str) -> Result<[u8; 32], EnvError> {
        let body = serde_json::to_vec(self)
            .map_err(|e| EnvError::Malformed(format!("unencodable transaction: {e}")))?;
        let mut hasher = Sha256::new();
        hasher.update(network_id(network_passphrase));
        hasher.update(&body);
        Ok(hasher.finalize().into())
    }

    pub fn sign(
        self,
        identity: &Identity,
        network_passphrase: &str,
    ) -> Result<SignedTransaction, EnvError> {
        let digest = self.signature_payload(network_passphrase)?;
        Ok(SignedTransaction {
            signature: identity.sign(&digest).to_vec(),
            public_key: identity.public_key(),
            tx: self,
        })
    }
}

pub fn network_id(network_passphrase: &str) -> [u8; 32] {
    Sha256::digest(network_passphrase.as_bytes()).into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub public_key: [u8; 32],
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    pub fn hash(&self, network_passphrase: &str) -> Result<String, EnvError> {
        Ok(hex::encode(self.tx.signature_payload(network_passphrase)?))
    }

    /// The signature must come from the key behind `tx.source`.
    pub fn verify(&self, network_passphrase: &str) -> bool {
        if self.tx.source != Address::Account(self.public_key) {
            return false;
        }
        let Ok(signature) = <[u8; 64]>::try_from(self.signature.as_slice()) else {
            return false;
        };
        let Ok(digest) = self.tx.signature_payload(network_passphrase) else {
            return false;
        };
        verify_signature(&self.public_key, &digest, &signature)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub contract: Address,
    pub topic: String,
    pub data: Vec<Value>,
}

/// Confirmation of an applied transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: String,
    pub ledger: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    pub result: Value,
    pub events: Vec<Event>,
}
