//! Artifact names and function names of the exchange contracts.
//!
//! Contracts are addressed purely through these names; nothing here knows how
//! a contract is implemented.

pub const ERC20: &str = "ERC20";
pub const WETH9: &str = "WETH9";
pub const FACTORY_V1: &str = "DonaswapV1Factory";
pub const EXCHANGE_V1: &str = "DonaswapV1Exchange";
pub const FACTORY_V2: &str = "DonaswapFactory";
pub const PAIR: &str = "DonaswapPair";
pub const ROUTER01: &str = "DonaswapRouter";
pub const ROUTER02: &str = "DonaswapRouter02";
pub const MIGRATOR: &str = "DonaswapMigrator";
pub const ROUTER_EVENT_EMITTER: &str = "RouterEventEmitter";

pub mod token {
    pub const NAME: &str = "name";
    pub const SYMBOL: &str = "symbol";
    pub const DECIMALS: &str = "decimals";
    pub const TOTAL_SUPPLY: &str = "total_supply";
    pub const BALANCE_OF: &str = "balance_of";
    pub const ALLOWANCE: &str = "allowance";
    pub const TRANSFER: &str = "transfer";
    pub const APPROVE: &str = "approve";
    pub const TRANSFER_FROM: &str = "transfer_from";
}

pub mod weth {
    pub const DEPOSIT: &str = "deposit";
    pub const WITHDRAW: &str = "withdraw";
}

pub mod factory_v1 {
    pub const INITIALIZE_FACTORY: &str = "initialize_factory";
    pub const CREATE_EXCHANGE: &str = "create_exchange";
    pub const GET_EXCHANGE: &str = "get_exchange";
    pub const GET_TOKEN: &str = "get_token";
    pub const GET_TOKEN_WITH_ID: &str = "get_token_with_id";
    pub const EXCHANGE_TEMPLATE: &str = "exchange_template";
    pub const TOKEN_COUNT: &str = "token_count";
}

pub mod exchange_v1 {
    pub const SETUP: &str = "setup";
    pub const TOKEN_ADDRESS: &str = "token_address";
    pub const FACTORY_ADDRESS: &str = "factory_address";
}

pub mod factory_v2 {
    pub const CREATE_PAIR: &str = "create_pair";
    pub const GET_PAIR: &str = "get_pair";
    pub const ALL_PAIRS: &str = "all_pairs";
    pub const ALL_PAIRS_LENGTH: &str = "all_pairs_length";
    pub const FEE_TO: &str = "fee_to";
    pub const FEE_TO_SETTER: &str = "fee_to_setter";
    pub const SET_FEE_TO: &str = "set_fee_to";
    pub const SET_FEE_TO_SETTER: &str = "set_fee_to_setter";
    pub const PAIR_CREATED: &str = "pair_created";
}

pub mod pair {
    pub const INITIALIZE: &str = "initialize";
    pub const TOKEN0: &str = "token0";
    pub const TOKEN1: &str = "token1";
    pub const FACTORY: &str = "factory";
}

pub mod router {
    pub const FACTORY: &str = "factory";
    pub const WETH: &str = "weth";
}

pub mod migrator {
    pub const FACTORY_V1: &str = "factory_v1";
    pub const ROUTER: &str = "router";
}

pub mod event_emitter {
    pub const FORWARD: &str = "forward";
    pub const AMOUNTS: &str = "amounts";
}
