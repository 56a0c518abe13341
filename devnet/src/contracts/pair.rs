use crate::host::{require, unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::pair;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    Factory,
    Token0,
    Token1,
}

/// Liquidity pair. Only its identity (factory and canonical tokens) is
/// modelled.
pub struct Pair;

impl ContractCode for Pair {
    fn construct(&self, host: &mut Host<'_, '_>, _args: &[Value]) -> HostResult<()> {
        let factory = host.caller();
        host.set(&DataKey::Factory, factory)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            pair::INITIALIZE => {
                let token0: Address = arg(function, args, 0)?;
                let token1: Address = arg(function, args, 1)?;
                let factory: Option<Address> = host.get(&DataKey::Factory)?;
                require(factory == Some(host.caller()), "forbidden")?;
                require(!host.has(&DataKey::Token0)?, "already initialized")?;
                host.set(&DataKey::Token0, token0)?;
                host.set(&DataKey::Token1, token1)?;
                Ok(Value::Void)
            }
            pair::TOKEN0 => host.get_value(&DataKey::Token0),
            pair::TOKEN1 => host.get_value(&DataKey::Token1),
            pair::FACTORY => host.get_value(&DataKey::Factory),
            _ => Err(unknown_function(function)),
        }
    }
}
