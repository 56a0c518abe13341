use crate::host::{unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::migrator;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    FactoryV1,
    Router,
}

/// Moves liquidity from first-generation exchanges through a router. Only
/// the bindings are modelled.
pub struct Migrator;

impl ContractCode for Migrator {
    fn construct(&self, host: &mut Host<'_, '_>, args: &[Value]) -> HostResult<()> {
        let factory_v1: Address = arg("constructor", args, 0)?;
        let router: Address = arg("constructor", args, 1)?;
        host.set(&DataKey::FactoryV1, factory_v1)?;
        host.set(&DataKey::Router, router)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, _args: &[Value]) -> HostResult<Value> {
        match function {
            migrator::FACTORY_V1 => host.get_value(&DataKey::FactoryV1),
            migrator::ROUTER => host.get_value(&DataKey::Router),
            _ => Err(unknown_function(function)),
        }
    }
}
