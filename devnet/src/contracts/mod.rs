//! Contract models standing in for the compiled exchange artifacts.
//!
//! They implement the surface the periphery tests touch: registries, pair
//! canonicalization, immutable wiring and a plain token. Pricing, swap and
//! migration math are not modelled.

mod event_emitter;
mod exchange_v1;
mod factory_v1;
mod factory_v2;
mod migrator;
mod pair;
mod router;
mod token;
mod weth;

pub use event_emitter::RouterEventEmitter;
pub use exchange_v1::ExchangeV1;
pub use factory_v1::FactoryV1;
pub use factory_v2::FactoryV2;
pub use migrator::Migrator;
pub use pair::Pair;
pub use router::Router;
pub use token::Erc20;
pub use weth::Weth9;

use crate::host::ArtifactRegistry;
use donaswap_core::artifacts;

/// Registry with every exchange artifact.
pub fn registry() -> ArtifactRegistry {
    let mut registry = ArtifactRegistry::new();
    registry
        .register(artifacts::ERC20, Erc20)
        .register(artifacts::WETH9, Weth9)
        .register(artifacts::FACTORY_V1, FactoryV1)
        .register(artifacts::EXCHANGE_V1, ExchangeV1)
        .register(artifacts::FACTORY_V2, FactoryV2)
        .register(artifacts::PAIR, Pair)
        .register(artifacts::ROUTER01, Router)
        .register(artifacts::ROUTER02, Router)
        .register(artifacts::MIGRATOR, Migrator)
        .register(artifacts::ROUTER_EVENT_EMITTER, RouterEventEmitter);
    registry
}
