use crate::host::{require, unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::exchange_v1;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    Token,
    Factory,
}

/// First-generation per-token exchange. Only its wiring is modelled.
pub struct ExchangeV1;

impl ContractCode for ExchangeV1 {
    fn construct(&self, _host: &mut Host<'_, '_>, _args: &[Value]) -> HostResult<()> {
        Ok(())
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            exchange_v1::SETUP => {
                let token: Address = arg(function, args, 0)?;
                require(!host.has(&DataKey::Factory)?, "exchange already set up")?;
                require(!token.is_zero(), "zero token")?;
                host.set(&DataKey::Token, token)?;
                let factory = host.caller();
                host.set(&DataKey::Factory, factory)?;
                Ok(Value::Void)
            }
            exchange_v1::TOKEN_ADDRESS => host.get_value(&DataKey::Token),
            exchange_v1::FACTORY_ADDRESS => host.get_value(&DataKey::Factory),
            _ => Err(unknown_function(function)),
        }
    }
}
