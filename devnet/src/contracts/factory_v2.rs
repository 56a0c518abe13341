use crate::host::{require, unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::{self, factory_v2, pair};
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
enum DataKey {
    Pair(Address, Address), // (token0, token1) -> pair
    AllPairs(u32),
    AllPairsLength,
    FeeTo,
    FeeToSetter,
}

fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}

fn pair_salt(token0: &Address, token1: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token0.bytes());
    hasher.update(token1.bytes());
    hasher.finalize().into()
}

fn all_pairs_length(host: &Host<'_, '_>) -> HostResult<u32> {
    Ok(host.get(&DataKey::AllPairsLength)?.unwrap_or(0))
}

fn create_pair(host: &mut Host<'_, '_>, token_a: Address, token_b: Address) -> HostResult<Address> {
    require(token_a != token_b, "identical addresses")?;
    // Accounts sort before contracts, so a zero contract can land in either slot.
    require(!token_a.is_zero() && !token_b.is_zero(), "zero address")?;
    let (token0, token1) = sort_tokens(token_a, token_b);
    require(
        !host.has(&DataKey::Pair(token0, token1))?,
        "pair already exists",
    )?;

    let salt = pair_salt(&token0, &token1);
    let deployed = host.deploy_with_salt(artifacts::PAIR, vec![], &salt)?;
    host.invoke(
        deployed,
        pair::INITIALIZE,
        vec![token0.into(), token1.into()],
    )?;

    host.set(&DataKey::Pair(token0, token1), deployed)?;
    let index = all_pairs_length(host)?;
    host.set(&DataKey::AllPairs(index), deployed)?;
    host.set(&DataKey::AllPairsLength, index + 1)?;
    host.emit(
        factory_v2::PAIR_CREATED,
        vec![
            token0.into(),
            token1.into(),
            deployed.into(),
            (index + 1).into(),
        ],
    );
    Ok(deployed)
}

fn require_fee_to_setter(host: &Host<'_, '_>) -> HostResult<()> {
    let setter: Option<Address> = host.get(&DataKey::FeeToSetter)?;
    require(setter == Some(host.caller()), "forbidden")
}

/// Second-generation registry. Pairs live at an address derived from their
/// sorted tokens, so the same pair cannot be created twice.
pub struct FactoryV2;

impl ContractCode for FactoryV2 {
    fn construct(&self, host: &mut Host<'_, '_>, args: &[Value]) -> HostResult<()> {
        let fee_to_setter: Address = arg("constructor", args, 0)?;
        host.set(&DataKey::FeeToSetter, fee_to_setter)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            factory_v2::CREATE_PAIR => {
                let token_a = arg(function, args, 0)?;
                let token_b = arg(function, args, 1)?;
                Ok(create_pair(host, token_a, token_b)?.into())
            }
            factory_v2::GET_PAIR => {
                let token_a = arg(function, args, 0)?;
                let token_b = arg(function, args, 1)?;
                let (token0, token1) = sort_tokens(token_a, token_b);
                host.get_value(&DataKey::Pair(token0, token1))
            }
            factory_v2::ALL_PAIRS => {
                let index: u32 = arg(function, args, 0)?;
                host.get_value(&DataKey::AllPairs(index))
            }
            factory_v2::ALL_PAIRS_LENGTH => Ok(all_pairs_length(host)?.into()),
            factory_v2::FEE_TO => host.get_value(&DataKey::FeeTo),
            factory_v2::FEE_TO_SETTER => host.get_value(&DataKey::FeeToSetter),
            factory_v2::SET_FEE_TO => {
                let fee_to: Address = arg(function, args, 0)?;
                require_fee_to_setter(host)?;
                host.set(&DataKey::FeeTo, fee_to)?;
                Ok(Value::Void)
            }
            factory_v2::SET_FEE_TO_SETTER => {
                let setter: Address = arg(function, args, 0)?;
                require_fee_to_setter(host)?;
                host.set(&DataKey::FeeToSetter, setter)?;
                Ok(Value::Void)
            }
            _ => Err(unknown_function(function)),
        }
    }
}
