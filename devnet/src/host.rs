//! Execution context handed to contract code.

use donaswap_core::value::ValueError;
use donaswap_core::{Address, Event, Value};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;

/// A contract-level failure. Aborts the current frame and rolls back its
/// writes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct Revert(pub String);

impl Revert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<ValueError> for Revert {
    fn from(e: ValueError) -> Self {
        Self(e.to_string())
    }
}

pub type HostResult<T> = Result<T, Revert>;

pub fn require(condition: bool, reason: &str) -> HostResult<()> {
    if condition {
        Ok(())
    } else {
        Err(Revert::new(reason))
    }
}

/// Code behind an artifact name.
pub trait ContractCode: Send + Sync {
    fn construct(&self, host: &mut Host<'_, '_>, args: &[Value]) -> HostResult<()>;

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value])
        -> HostResult<Value>;
}

pub fn unknown_function(function: &str) -> Revert {
    Revert::new(format!("unknown function {function}"))
}

#[derive(Clone, Default)]
pub struct ArtifactRegistry {
    codes: HashMap<String, Arc<dyn ContractCode>>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, code: impl ContractCode + 'static) -> &mut Self {
        self.codes.insert(name.to_string(), Arc::new(code));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ContractCode>> {
        self.codes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codes.contains_key(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContractInstance {
    pub artifact: String,
    pub storage: BTreeMap<String, Value>,
    /// Counter for contracts this contract deploys without a salt.
    pub deploy_nonce: u64,
}

/// Everything a transaction may change.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub contracts: HashMap<Address, ContractInstance>,
    pub native_balances: HashMap<Address, u128>,
}

/// One transaction (or query) worth of execution over a [`World`].
pub struct Execution<'a> {
    world: &'a mut World,
    registry: &'a ArtifactRegistry,
    stack: Vec<Address>,
    events: Vec<Event>,
    read_only: bool,
    max_depth: usize,
}

impl<'a> Execution<'a> {
    pub fn new(
        world: &'a mut World,
        registry: &'a ArtifactRegistry,
        max_depth: usize,
        read_only: bool,
    ) -> Self {
        Self {
            world,
            registry,
            stack: Vec::new(),
            events: Vec::new(),
            read_only,
            max_depth,
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn enter(&mut self, contract: Address) -> HostResult<()> {
        if self.stack.contains(&contract) {
            return Err(Revert::new(format!("reentrant call into {contract}")));
        }
        if self.stack.len() >= self.max_depth {
            return Err(Revert::new("call depth exceeded"));
        }
        self.stack.push(contract);
        Ok(())
    }

    /// Run `frame` as contract `contract`; on failure the world and the event
    /// log are restored to what they were before the frame.
    fn run_frame<T>(
        &mut self,
        contract: Address,
        frame: impl FnOnce(&mut Self) -> HostResult<T>,
    ) -> HostResult<T> {
        self.enter(contract)?;
        let snapshot = self.world.clone();
        let events_len = self.events.len();
        let result = frame(self);
        if result.is_err() {
            *self.world = snapshot;
            self.events.truncate(events_len);
        }
        self.stack.pop();
        result
    }

    pub fn call(
        &mut self,
        caller: Address,
        contract: Address,
        function: &str,
        args: &[Value],
    ) -> HostResult<Value> {
        let artifact = self
            .world
            .contracts
            .get(&contract)
            .map(|c| c.artifact.clone())
            .ok_or_else(|| Revert::new(format!("no contract at {contract}")))?;
        let code = self
            .registry
            .get(&artifact)
            .ok_or_else(|| Revert::new(format!("unknown artifact {artifact}")))?;

        tracing::trace!(%caller, %contract, %function, "call");
        self.run_frame(contract, |exec| {
            let mut host = Host {
                exec,
                this: contract,
                caller,
            };
            code.invoke(&mut host, function, args)
        })
    }

    pub fn create(
        &mut self,
        deployer: Address,
        artifact: &str,
        args: &[Value],
        address: Address,
    ) -> HostResult<Address> {
        require(!self.read_only, "contract creation in read-only call")?;
        let code = self
            .registry
            .get(artifact)
            .ok_or_else(|| Revert::new(format!("unknown artifact {artifact}")))?;
        require(
            !self.world.contracts.contains_key(&address),
            "contract address already in use",
        )?;

        tracing::trace!(%deployer, %artifact, %address, "create");
        self.run_frame(address, |exec| {
            exec.world.contracts.insert(
                address,
                ContractInstance {
                    artifact: artifact.to_string(),
                    ..Default::default()
                },
            );
            let mut host = Host {
                exec,
                this: address,
                caller: deployer,
            };
            code.construct(&mut host, args)
        })?;
        Ok(address)
    }
}

/// A contract's view of the ledger while one of its functions runs.
pub struct Host<'e, 'a> {
    exec: &'e mut Execution<'a>,
    this: Address,
    caller: Address,
}

fn storage_key<K: Serialize>(key: &K) -> HostResult<String> {
    serde_json::to_string(key).map_err(|e| Revert::new(format!("bad storage key: {e}")))
}

impl Host<'_, '_> {
    pub fn this(&self) -> Address {
        self.this
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    fn instance(&self) -> HostResult<&ContractInstance> {
        self.exec
            .world
            .contracts
            .get(&self.this)
            .ok_or_else(|| Revert::new(format!("no contract at {}", self.this)))
    }

    fn instance_mut(&mut self) -> HostResult<&mut ContractInstance> {
        require(!self.exec.read_only, "state modification in read-only call")?;
        let this = self.this;
        self.exec
            .world
            .contracts
            .get_mut(&this)
            .ok_or_else(|| Revert::new(format!("no contract at {this}")))
    }

    pub fn get<K, T>(&self, key: &K) -> HostResult<Option<T>>
    where
        K: Serialize,
        T: for<'v> TryFrom<&'v Value, Error = ValueError>,
    {
        let key = storage_key(key)?;
        match self.instance()?.storage.get(&key) {
            Some(value) => Ok(Some(T::try_from(value)?)),
            None => Ok(None),
        }
    }

    /// Raw stored value, `Void` when unset.
    pub fn get_value<K: Serialize>(&self, key: &K) -> HostResult<Value> {
        let key = storage_key(key)?;
        Ok(self
            .instance()?
            .storage
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    pub fn has<K: Serialize>(&self, key: &K) -> HostResult<bool> {
        let key = storage_key(key)?;
        Ok(self.instance()?.storage.contains_key(&key))
    }

    pub fn set<K: Serialize>(&mut self, key: &K, value: impl Into<Value>) -> HostResult<()> {
        let key = storage_key(key)?;
        self.instance_mut()?.storage.insert(key, value.into());
        Ok(())
    }

    pub fn remove<K: Serialize>(&mut self, key: &K) -> HostResult<()> {
        let key = storage_key(key)?;
        self.instance_mut()?.storage.remove(&key);
        Ok(())
    }

    pub fn emit(&mut self, topic: &str, data: Vec<Value>) {
        self.exec.events.push(Event {
            contract: self.this,
            topic: topic.to_string(),
            data,
        });
    }

    pub fn invoke(&mut self, contract: Address, function: &str, args: Vec<Value>) -> HostResult<Value> {
        let this = self.this;
        self.exec.call(this, contract, function, &args)
    }

    /// Artifact deployed at `address`, if any.
    pub fn code_at(&self, address: &Address) -> Option<String> {
        self.exec
            .world
            .contracts
            .get(address)
            .map(|c| c.artifact.clone())
    }

    /// Deploy at `sha256(this ‖ deploy_nonce)`.
    pub fn deploy(&mut self, artifact: &str, args: Vec<Value>) -> HostResult<Address> {
        let instance = self.instance_mut()?;
        let nonce = instance.deploy_nonce;
        instance.deploy_nonce += 1;
        let address = Address::derive_contract(&self.this, &nonce.to_be_bytes());
        let this = self.this;
        self.exec.create(this, artifact, &args, address)
    }

    /// Deploy at `sha256(this ‖ salt)`; the same salt can only be used once.
    pub fn deploy_with_salt(
        &mut self,
        artifact: &str,
        args: Vec<Value>,
        salt: &[u8; 32],
    ) -> HostResult<Address> {
        let address = Address::derive_contract(&self.this, salt);
        let this = self.this;
        self.exec.create(this, artifact, &args, address)
    }

    fn move_native(&mut self, from: Address, to: Address, amount: u128) -> HostResult<()> {
        require(!self.exec.read_only, "state modification in read-only call")?;
        let balances = &mut self.exec.world.native_balances;
        let from_balance = balances.get(&from).copied().unwrap_or(0);
        require(from_balance >= amount, "insufficient native balance")?;
        balances.insert(from, from_balance - amount);
        let to_balance = balances.entry(to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }

    /// Pull `amount` of the native asset from the caller into this contract.
    pub fn take_native(&mut self, amount: u128) -> HostResult<()> {
        let (from, to) = (self.caller, self.this);
        self.move_native(from, to, amount)
    }

    /// Pay `amount` of the native asset from this contract to `to`.
    pub fn send_native(&mut self, to: Address, amount: u128) -> HostResult<()> {
        let from = self.this;
        self.move_native(from, to, amount)
    }
}
