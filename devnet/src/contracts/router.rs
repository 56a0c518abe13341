use crate::host::{unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::router;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    Factory,
    Weth,
}

/// Periphery router. Both router generations share this model; only the
/// factory and wrapped-native bindings are kept.
pub struct Router;

impl ContractCode for Router {
    fn construct(&self, host: &mut Host<'_, '_>, args: &[Value]) -> HostResult<()> {
        let factory: Address = arg("constructor", args, 0)?;
        let weth: Address = arg("constructor", args, 1)?;
        host.set(&DataKey::Factory, factory)?;
        host.set(&DataKey::Weth, weth)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, _args: &[Value]) -> HostResult<Value> {
        match function {
            router::FACTORY => host.get_value(&DataKey::Factory),
            router::WETH => host.get_value(&DataKey::Weth),
            _ => Err(unknown_function(function)),
        }
    }
}
