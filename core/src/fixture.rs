//! Builds the full V1/V2 exchange environment that test scenarios run against.
//!
//! The pipeline runs strictly forward: leaves (tokens, WETH, event emitter),
//! the V1 factory and its template, the V2 factory, both routers, the migrator,
//! and finally the pools. Every state-changing step is awaited before anything
//! that depends on it starts. Pool addresses and token order are always read
//! back from the registries, never predicted locally.

use crate::address::Address;
use crate::artifacts::{self, factory_v1, factory_v2, pair};
use crate::client::{Client, ContractHandle};
use crate::config::FixtureConfig;
use crate::environment::ExecutionEnvironment;
use crate::errors::FixtureError;
use crate::identity::Identity;
use crate::transaction::Receipt;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Handles to every component of a bootstrapped environment.
///
/// `token0`/`token1` follow the canonical order of `pair`. `router` is the
/// default router for new scenarios and is always `router02`.
pub struct V2Fixture<E> {
    pub token0: ContractHandle<E>,
    pub token1: ContractHandle<E>,
    pub weth: ContractHandle<E>,
    pub weth_partner: ContractHandle<E>,
    pub factory_v1: ContractHandle<E>,
    pub factory_v2: ContractHandle<E>,
    pub router01: ContractHandle<E>,
    pub router02: ContractHandle<E>,
    pub router: ContractHandle<E>,
    pub router_event_emitter: ContractHandle<E>,
    pub migrator: ContractHandle<E>,
    pub weth_exchange_v1: ContractHandle<E>,
    pub pair: ContractHandle<E>,
    pub weth_pair: ContractHandle<E>,
}

/// Addresses of a [`V2Fixture`], in a serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressBook {
    pub token0: Address,
    pub token1: Address,
    pub weth: Address,
    pub weth_partner: Address,
    pub factory_v1: Address,
    pub factory_v2: Address,
    pub router01: Address,
    pub router02: Address,
    pub router: Address,
    pub router_event_emitter: Address,
    pub migrator: Address,
    pub weth_exchange_v1: Address,
    pub pair: Address,
    pub weth_pair: Address,
}

impl<E> From<&V2Fixture<E>> for AddressBook {
    fn from(f: &V2Fixture<E>) -> Self {
        Self {
            token0: f.token0.address(),
            token1: f.token1.address(),
            weth: f.weth.address(),
            weth_partner: f.weth_partner.address(),
            factory_v1: f.factory_v1.address(),
            factory_v2: f.factory_v2.address(),
            router01: f.router01.address(),
            router02: f.router02.address(),
            router: f.router.address(),
            router_event_emitter: f.router_event_emitter.address(),
            migrator: f.migrator.address(),
            weth_exchange_v1: f.weth_exchange_v1.address(),
            pair: f.pair.address(),
            weth_pair: f.weth_pair.address(),
        }
    }
}

impl<E> fmt::Debug for V2Fixture<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        AddressBook::from(self).fmt(f)
    }
}

/// Leaf contracts with no dependencies on each other.
pub struct Leaves<E> {
    pub token_a: ContractHandle<E>,
    pub token_b: ContractHandle<E>,
    pub weth: ContractHandle<E>,
    pub weth_partner: ContractHandle<E>,
    pub router_event_emitter: ContractHandle<E>,
}

/// A pair handle together with its tokens in the pair's own order.
pub struct CanonicalPair<E> {
    pub pair: ContractHandle<E>,
    pub token0: ContractHandle<E>,
    pub token1: ContractHandle<E>,
}

async fn deploy<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
    artifact: &str,
    args: Vec<Value>,
) -> Result<ContractHandle<E>, FixtureError> {
    client
        .deploy(artifact, args)
        .await
        .map_err(|source| FixtureError::Deployment {
            artifact: artifact.to_string(),
            source,
        })
}

async fn send<E: ExecutionEnvironment>(
    contract: &ContractHandle<E>,
    function: &str,
    args: Vec<Value>,
) -> Result<Receipt, FixtureError> {
    contract
        .send(function, args)
        .await
        .map_err(|source| FixtureError::Invocation {
            artifact: contract.artifact().to_string(),
            function: function.to_string(),
            source,
        })
}

async fn call<E: ExecutionEnvironment>(
    contract: &ContractHandle<E>,
    function: &str,
    args: Vec<Value>,
) -> Result<Value, FixtureError> {
    contract
        .call(function, args)
        .await
        .map_err(|source| FixtureError::Invocation {
            artifact: contract.artifact().to_string(),
            function: function.to_string(),
            source,
        })
}

/// Look up a freshly created component in its registry.
async fn resolve<E: ExecutionEnvironment>(
    registry: &ContractHandle<E>,
    function: &str,
    args: Vec<Value>,
    what: &str,
) -> Result<Address, FixtureError> {
    call(registry, function, args)
        .await?
        .as_registered_address()
        .ok_or_else(|| FixtureError::Unresolved(what.to_string()))
}

/// Deploy the two interchangeable tokens, WETH, the partner token and the
/// router event emitter concurrently.
pub async fn deploy_leaves<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
    token_supply: u128,
) -> Result<Leaves<E>, FixtureError> {
    let (token_a, token_b, weth, weth_partner, router_event_emitter) = tokio::try_join!(
        deploy(client, artifacts::ERC20, vec![Value::U128(token_supply)]),
        deploy(client, artifacts::ERC20, vec![Value::U128(token_supply)]),
        deploy(client, artifacts::WETH9, vec![]),
        deploy(client, artifacts::ERC20, vec![Value::U128(token_supply)]),
        deploy(client, artifacts::ROUTER_EVENT_EMITTER, vec![]),
    )?;
    Ok(Leaves {
        token_a,
        token_b,
        weth,
        weth_partner,
        router_event_emitter,
    })
}

/// Deploy the V1 factory and initialize it with a fresh exchange template.
pub async fn bootstrap_legacy<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
) -> Result<ContractHandle<E>, FixtureError> {
    let factory_v1 = deploy(client, artifacts::FACTORY_V1, vec![]).await?;
    let template = deploy(client, artifacts::EXCHANGE_V1, vec![]).await?;
    send(
        &factory_v1,
        factory_v1::INITIALIZE_FACTORY,
        vec![template.address().into()],
    )
    .await?;
    Ok(factory_v1)
}

/// Deploy the V2 factory with the client as fee-to setter.
pub async fn bootstrap_pair_factory<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
) -> Result<ContractHandle<E>, FixtureError> {
    deploy(client, artifacts::FACTORY_V2, vec![client.address().into()]).await
}

/// Deploy router01 and router02, both bound to `factory_v2` and `weth`.
pub async fn bootstrap_routers<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
    factory_v2: &ContractHandle<E>,
    weth: &ContractHandle<E>,
) -> Result<(ContractHandle<E>, ContractHandle<E>), FixtureError> {
    let args = vec![factory_v2.address().into(), weth.address().into()];
    let router01 = deploy(client, artifacts::ROUTER01, args.clone()).await?;
    let router02 = deploy(client, artifacts::ROUTER02, args).await?;
    Ok((router01, router02))
}

/// Deploy the migrator. It is bound to router01, the router V1 liquidity was
/// written against.
pub async fn deploy_migrator<E: ExecutionEnvironment>(
    client: &Arc<Client<E>>,
    factory_v1: &ContractHandle<E>,
    router01: &ContractHandle<E>,
) -> Result<ContractHandle<E>, FixtureError> {
    deploy(
        client,
        artifacts::MIGRATOR,
        vec![factory_v1.address().into(), router01.address().into()],
    )
    .await
}

/// Create the V1 exchange for `token` and attach to the registered address.
pub async fn materialize_exchange<E: ExecutionEnvironment>(
    factory_v1: &ContractHandle<E>,
    token: &ContractHandle<E>,
) -> Result<ContractHandle<E>, FixtureError> {
    send(
        factory_v1,
        factory_v1::CREATE_EXCHANGE,
        vec![token.address().into()],
    )
    .await?;
    let address = resolve(
        factory_v1,
        factory_v1::GET_EXCHANGE,
        vec![token.address().into()],
        &format!("V1 exchange for {}", token.address()),
    )
    .await?;
    Ok(ContractHandle::at(
        Arc::clone(factory_v1.client()),
        address,
        artifacts::EXCHANGE_V1,
    ))
}

/// Create the V2 pair for `(token_x, token_y)` and attach to the address the
/// factory registered for it.
pub async fn materialize_pair<E: ExecutionEnvironment>(
    factory_v2: &ContractHandle<E>,
    token_x: &ContractHandle<E>,
    token_y: &ContractHandle<E>,
) -> Result<ContractHandle<E>, FixtureError> {
    let tokens = vec![token_x.address().into(), token_y.address().into()];
    send(factory_v2, factory_v2::CREATE_PAIR, tokens.clone()).await?;
    let address = resolve(
        factory_v2,
        factory_v2::GET_PAIR,
        tokens,
        &format!("pair for {}/{}", token_x.address(), token_y.address()),
    )
    .await?;
    Ok(ContractHandle::at(
        Arc::clone(factory_v2.client()),
        address,
        artifacts::PAIR,
    ))
}

/// Order `token_x`/`token_y` the way `pair` stores them.
pub async fn canonical_order<E: ExecutionEnvironment>(
    pair: ContractHandle<E>,
    token_x: ContractHandle<E>,
    token_y: ContractHandle<E>,
) -> Result<CanonicalPair<E>, FixtureError> {
    let token0 = call(&pair, pair::TOKEN0, vec![])
        .await?
        .as_registered_address()
        .ok_or_else(|| FixtureError::Unresolved(format!("token0 of pair {}", pair.address())))?;

    let (token0, token1) = if token0 == token_x.address() {
        (token_x, token_y)
    } else if token0 == token_y.address() {
        (token_y, token_x)
    } else {
        return Err(FixtureError::NonCanonicalToken {
            pair: pair.address(),
            token0,
        });
    };

    Ok(CanonicalPair {
        pair,
        token0,
        token1,
    })
}

/// Deploy and wire the complete environment with `wallet` as deployer and
/// V2 fee-to setter.
pub async fn v2_fixture<E: ExecutionEnvironment>(
    env: Arc<E>,
    wallet: Identity,
    config: &FixtureConfig,
) -> Result<V2Fixture<E>, FixtureError> {
    let token_supply = config.token_supply()?;
    let client = Client::connect(env, wallet).await?;
    tracing::info!(wallet = %client.address(), token_supply = %token_supply, "Building V2 fixture");

    let leaves = deploy_leaves(&client, token_supply).await?;

    let factory_v1 = bootstrap_legacy(&client).await?;
    tracing::info!(factory_v1 = %factory_v1.address(), "V1 factory initialized");

    let factory_v2 = bootstrap_pair_factory(&client).await?;
    let (router01, router02) = bootstrap_routers(&client, &factory_v2, &leaves.weth).await?;
    let migrator = deploy_migrator(&client, &factory_v1, &router01).await?;

    let weth_exchange_v1 = materialize_exchange(&factory_v1, &leaves.weth_partner).await?;
    tracing::info!(exchange = %weth_exchange_v1.address(), "V1 exchange resolved");

    let pair = materialize_pair(&factory_v2, &leaves.token_a, &leaves.token_b).await?;
    let CanonicalPair {
        pair,
        token0,
        token1,
    } = canonical_order(pair, leaves.token_a, leaves.token_b).await?;
    tracing::info!(
        pair = %pair.address(),
        token0 = %token0.address(),
        token1 = %token1.address(),
        "Token pair resolved"
    );

    let weth_pair = materialize_pair(&factory_v2, &leaves.weth, &leaves.weth_partner).await?;
    tracing::info!(weth_pair = %weth_pair.address(), "WETH pair resolved");

    Ok(V2Fixture {
        token0,
        token1,
        weth: leaves.weth,
        weth_partner: leaves.weth_partner,
        factory_v1,
        factory_v2,
        router: router02.clone(),
        router01,
        router02,
        router_event_emitter: leaves.router_event_emitter,
        migrator,
        weth_exchange_v1,
        pair,
        weth_pair,
    })
}
