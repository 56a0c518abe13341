use crate::host::{require, unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::{self, exchange_v1, factory_v1};
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    Template,
    TokenCount,
    TokenToExchange(Address),
    ExchangeToToken(Address),
    IdToToken(u32),
}

fn read_template(host: &Host<'_, '_>) -> HostResult<Option<Address>> {
    host.get(&DataKey::Template)
}

fn read_token_count(host: &Host<'_, '_>) -> HostResult<u32> {
    Ok(host.get(&DataKey::TokenCount)?.unwrap_or(0))
}

fn create_exchange(host: &mut Host<'_, '_>, token: Address) -> HostResult<Address> {
    require(!token.is_zero(), "zero token")?;
    require(read_template(host)?.is_some(), "factory not initialized")?;
    require(
        !host.has(&DataKey::TokenToExchange(token))?,
        "exchange already exists",
    )?;

    let exchange = host.deploy(artifacts::EXCHANGE_V1, vec![])?;
    host.invoke(exchange, exchange_v1::SETUP, vec![token.into()])?;

    let id = read_token_count(host)? + 1;
    host.set(&DataKey::TokenToExchange(token), exchange)?;
    host.set(&DataKey::ExchangeToToken(exchange), token)?;
    host.set(&DataKey::IdToToken(id), token)?;
    host.set(&DataKey::TokenCount, id)?;
    host.emit("new_exchange", vec![token.into(), exchange.into()]);
    Ok(exchange)
}

/// First-generation registry: one exchange per token, cloned from a template.
pub struct FactoryV1;

impl ContractCode for FactoryV1 {
    fn construct(&self, _host: &mut Host<'_, '_>, _args: &[Value]) -> HostResult<()> {
        Ok(())
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            factory_v1::INITIALIZE_FACTORY => {
                let template: Address = arg(function, args, 0)?;
                require(read_template(host)?.is_none(), "factory already initialized")?;
                require(
                    host.code_at(&template).as_deref() == Some(artifacts::EXCHANGE_V1),
                    "template is not an exchange",
                )?;
                host.set(&DataKey::Template, template)?;
                Ok(Value::Void)
            }
            factory_v1::CREATE_EXCHANGE => {
                let token = arg(function, args, 0)?;
                Ok(create_exchange(host, token)?.into())
            }
            factory_v1::GET_EXCHANGE => {
                let token: Address = arg(function, args, 0)?;
                host.get_value(&DataKey::TokenToExchange(token))
            }
            factory_v1::GET_TOKEN => {
                let exchange: Address = arg(function, args, 0)?;
                host.get_value(&DataKey::ExchangeToToken(exchange))
            }
            factory_v1::GET_TOKEN_WITH_ID => {
                let id: u32 = arg(function, args, 0)?;
                host.get_value(&DataKey::IdToToken(id))
            }
            factory_v1::EXCHANGE_TEMPLATE => host.get_value(&DataKey::Template),
            factory_v1::TOKEN_COUNT => Ok(read_token_count(host)?.into()),
            _ => Err(unknown_function(function)),
        }
    }
}
