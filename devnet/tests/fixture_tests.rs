use donaswap_core::artifacts::{self, factory_v1, factory_v2, migrator, pair, router, token};
use donaswap_core::fixture::{
    bootstrap_pair_factory, canonical_order, deploy_leaves, materialize_pair,
};
use donaswap_core::{
    expand_to_18_decimals, logging, v2_fixture, Address, AddressBook, Client, ContractHandle,
    EnvError, FixtureConfig, FixtureError, Identity, V2Fixture, Value,
};
use donaswap_devnet::{Devnet, DevnetConfig};
use std::collections::HashSet;
use std::sync::Arc;

async fn build() -> (Arc<Devnet>, V2Fixture<Devnet>) {
    logging::init();
    let devnet = Arc::new(Devnet::new(DevnetConfig::default()));
    let fixture = v2_fixture(
        Arc::clone(&devnet),
        Identity::generate(),
        &FixtureConfig::default(),
    )
    .await
    .unwrap();
    (devnet, fixture)
}

#[tokio::test]
async fn test_every_component_has_a_distinct_address() {
    let (devnet, fixture) = build().await;
    let book = AddressBook::from(&fixture);

    let json = serde_json::to_value(&book).unwrap();
    let entries = json.as_object().unwrap();
    assert_eq!(entries.len(), 14);

    let mut seen = HashSet::new();
    for (name, value) in entries {
        let address: Address = value.as_str().unwrap().parse().unwrap();
        assert!(address.is_contract(), "{name} is not a contract");
        assert!(!address.is_zero(), "{name} is empty");
        assert!(
            devnet.artifact_at(&address).await.is_some(),
            "{name} has no code"
        );
        // `router` aliases `router02`; everything else is its own contract.
        if name != "router" {
            assert!(seen.insert(address), "{name} duplicates another component");
        }
    }
}

#[tokio::test]
async fn test_components_run_the_expected_artifacts() {
    let (devnet, fixture) = build().await;
    let expected = [
        (&fixture.token0, artifacts::ERC20),
        (&fixture.token1, artifacts::ERC20),
        (&fixture.weth, artifacts::WETH9),
        (&fixture.weth_partner, artifacts::ERC20),
        (&fixture.factory_v1, artifacts::FACTORY_V1),
        (&fixture.factory_v2, artifacts::FACTORY_V2),
        (&fixture.router01, artifacts::ROUTER01),
        (&fixture.router02, artifacts::ROUTER02),
        (&fixture.router_event_emitter, artifacts::ROUTER_EVENT_EMITTER),
        (&fixture.migrator, artifacts::MIGRATOR),
        (&fixture.weth_exchange_v1, artifacts::EXCHANGE_V1),
        (&fixture.pair, artifacts::PAIR),
        (&fixture.weth_pair, artifacts::PAIR),
    ];
    for (handle, artifact) in expected {
        assert_eq!(handle.artifact(), artifact);
        assert_eq!(
            devnet.artifact_at(&handle.address()).await.as_deref(),
            Some(artifact)
        );
    }
}

#[tokio::test]
async fn test_default_router_is_router02() {
    let (_devnet, fixture) = build().await;
    assert_eq!(fixture.router, fixture.router02);
    assert_ne!(fixture.router01, fixture.router02);
}

#[tokio::test]
async fn test_token_order_matches_pair() {
    let (_devnet, fixture) = build().await;
    assert_eq!(
        fixture.pair.call_address(pair::TOKEN0, vec![]).await.unwrap(),
        fixture.token0.address()
    );
    assert_eq!(
        fixture.pair.call_address(pair::TOKEN1, vec![]).await.unwrap(),
        fixture.token1.address()
    );
}

#[tokio::test]
async fn test_pairs_are_registered() {
    let (_devnet, fixture) = build().await;
    for args in [
        vec![fixture.token0.address().into(), fixture.token1.address().into()],
        vec![fixture.token1.address().into(), fixture.token0.address().into()],
    ] {
        assert_eq!(
            fixture
                .factory_v2
                .call_address(factory_v2::GET_PAIR, args)
                .await
                .unwrap(),
            fixture.pair.address()
        );
    }
    assert_eq!(
        fixture
            .factory_v2
            .call_address(
                factory_v2::GET_PAIR,
                vec![
                    fixture.weth_partner.address().into(),
                    fixture.weth.address().into()
                ]
            )
            .await
            .unwrap(),
        fixture.weth_pair.address()
    );
    assert_eq!(
        fixture
            .factory_v2
            .call(factory_v2::ALL_PAIRS_LENGTH, vec![])
            .await
            .unwrap(),
        Value::U32(2)
    );
}

#[tokio::test]
async fn test_v1_exchange_is_registered() {
    let (_devnet, fixture) = build().await;
    assert_eq!(
        fixture
            .factory_v1
            .call_address(
                factory_v1::GET_EXCHANGE,
                vec![fixture.weth_partner.address().into()]
            )
            .await
            .unwrap(),
        fixture.weth_exchange_v1.address()
    );
    assert_eq!(
        fixture
            .factory_v1
            .call_address(
                factory_v1::GET_TOKEN,
                vec![fixture.weth_exchange_v1.address().into()]
            )
            .await
            .unwrap(),
        fixture.weth_partner.address()
    );
}

#[tokio::test]
async fn test_routers_are_bound_to_factory_v2_and_weth() {
    let (_devnet, fixture) = build().await;
    for handle in [&fixture.router01, &fixture.router02] {
        assert_eq!(
            handle.call_address(router::FACTORY, vec![]).await.unwrap(),
            fixture.factory_v2.address()
        );
        assert_eq!(
            handle.call_address(router::WETH, vec![]).await.unwrap(),
            fixture.weth.address()
        );
    }
}

#[tokio::test]
async fn test_migrator_targets_router01() {
    let (_devnet, fixture) = build().await;
    let bound = fixture
        .migrator
        .call_address(migrator::ROUTER, vec![])
        .await
        .unwrap();
    assert_eq!(bound, fixture.router01.address());
    assert_ne!(bound, fixture.router02.address());
    assert_eq!(
        fixture
            .migrator
            .call_address(migrator::FACTORY_V1, vec![])
            .await
            .unwrap(),
        fixture.factory_v1.address()
    );
}

#[tokio::test]
async fn test_fee_to_setter_is_the_wallet() {
    let (_devnet, fixture) = build().await;
    let wallet = fixture.factory_v2.client().address();
    assert_eq!(
        fixture
            .factory_v2
            .call_address(factory_v2::FEE_TO_SETTER, vec![])
            .await
            .unwrap(),
        wallet
    );
}

#[tokio::test]
async fn test_wallet_holds_token_supply() {
    let (_devnet, fixture) = build().await;
    let wallet = fixture.token0.client().address();
    for handle in [&fixture.token0, &fixture.token1, &fixture.weth_partner] {
        assert_eq!(
            handle
                .call(token::BALANCE_OF, vec![wallet.into()])
                .await
                .unwrap(),
            Value::U128(expand_to_18_decimals(10_000))
        );
    }
}

#[tokio::test]
async fn test_v1_factory_cannot_be_reinitialized() {
    let (_devnet, fixture) = build().await;
    let err = fixture
        .factory_v1
        .send(
            factory_v1::INITIALIZE_FACTORY,
            vec![fixture.weth_exchange_v1.address().into()],
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EnvError::Reverted("factory already initialized".to_string())
    );
}

#[tokio::test]
async fn test_second_pair_creation_fails() {
    let (_devnet, fixture) = build().await;
    let err = materialize_pair(&fixture.factory_v2, &fixture.token1, &fixture.token0)
        .await
        .unwrap_err();
    assert!(matches!(err, FixtureError::Invocation { .. }));
    assert_eq!(err.revert_reason(), Some("pair already exists"));
}

#[tokio::test]
async fn test_pair_does_not_depend_on_argument_order() {
    logging::init();
    let seed = [7u8; 32];
    let mut outcomes = Vec::new();

    for swap in [false, true] {
        let devnet = Arc::new(Devnet::new(DevnetConfig::default()));
        let client = Client::connect(devnet, Identity::from_seed(seed)).await.unwrap();
        let leaves = deploy_leaves(&client, expand_to_18_decimals(1)).await.unwrap();
        let factory = bootstrap_pair_factory(&client).await.unwrap();

        let (x, y) = if swap {
            (&leaves.token_b, &leaves.token_a)
        } else {
            (&leaves.token_a, &leaves.token_b)
        };
        let created = materialize_pair(&factory, x, y).await.unwrap();
        let canonical = canonical_order(created, x.clone(), y.clone())
            .await
            .unwrap();
        outcomes.push((
            canonical.pair.address(),
            canonical.token0.address(),
            canonical.token1.address(),
        ));
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[tokio::test]
async fn test_fixtures_on_one_devnet_are_independent() {
    logging::init();
    let devnet = Arc::new(Devnet::new(DevnetConfig::default()));
    let config = FixtureConfig::default();
    let first = v2_fixture(Arc::clone(&devnet), Identity::generate(), &config)
        .await
        .unwrap();
    let second = v2_fixture(Arc::clone(&devnet), Identity::generate(), &config)
        .await
        .unwrap();

    let first = AddressBook::from(&first);
    let second = AddressBook::from(&second);
    assert_ne!(first.factory_v2, second.factory_v2);
    assert_ne!(first.pair, second.pair);
}

#[tokio::test]
async fn test_confirmation_delay_is_awaited() {
    logging::init();
    let devnet = Arc::new(Devnet::new(DevnetConfig {
        confirmation_delay_ms: 2,
        ..Default::default()
    }));
    let fixture = v2_fixture(
        Arc::clone(&devnet),
        Identity::generate(),
        &FixtureConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        fixture.pair.call_address(pair::TOKEN0, vec![]).await.unwrap(),
        fixture.token0.address()
    );
}

#[tokio::test]
async fn test_submission_timeout_aborts_build() {
    logging::init();
    let devnet = Arc::new(Devnet::new(DevnetConfig {
        confirmation_delay_ms: 200,
        submit_timeout_ms: Some(5),
        ..Default::default()
    }));
    let err = v2_fixture(devnet, Identity::generate(), &FixtureConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FixtureError::Deployment {
            source: EnvError::Timeout,
            ..
        }
    ));
}

#[tokio::test]
async fn test_handles_stay_usable_after_rejected_submissions() {
    let (_devnet, fixture) = build().await;
    let client = fixture.token0.client().clone();
    let recipient = Address::Account([3u8; 32]);

    let missing = ContractHandle::at(
        client.clone(),
        Address::Contract([9u8; 32]),
        artifacts::ERC20,
    );
    let err = missing
        .send(token::TRANSFER, vec![recipient.into(), Value::U128(1)])
        .await
        .unwrap_err();
    assert_eq!(err, EnvError::UnknownContract(missing.address()));

    let err = client.deploy("NotAnArtifact", vec![]).await.unwrap_err();
    assert_eq!(err, EnvError::UnknownArtifact("NotAnArtifact".to_string()));

    // A revert consumes its nonce; the next call must still line up.
    let err = fixture
        .token0
        .send(token::TRANSFER, vec![recipient.into(), Value::U128(u128::MAX)])
        .await
        .unwrap_err();
    assert_eq!(err, EnvError::Reverted("insufficient balance".to_string()));

    fixture
        .token0
        .send(token::TRANSFER, vec![recipient.into(), Value::U128(1)])
        .await
        .unwrap();
    fixture
        .factory_v2
        .send(factory_v2::SET_FEE_TO, vec![recipient.into()])
        .await
        .unwrap();
    assert_eq!(
        fixture
            .token0
            .call(token::BALANCE_OF, vec![recipient.into()])
            .await
            .unwrap(),
        Value::U128(1)
    );
}
