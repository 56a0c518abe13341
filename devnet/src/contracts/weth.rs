use super::token::{burn, invoke_token, mint, write_metadata};
use crate::host::{require, ContractCode, Host, HostResult};
use donaswap_core::artifacts::weth;
use donaswap_core::value::arg;
use donaswap_core::Value;

/// Wrapped native asset, backed 1:1 by the native balance it holds.
pub struct Weth9;

impl ContractCode for Weth9 {
    fn construct(&self, host: &mut Host<'_, '_>, _args: &[Value]) -> HostResult<()> {
        write_metadata(host, "Wrapped Native", "WNATIVE", 18)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            weth::DEPOSIT => {
                let amount: u128 = arg(function, args, 0)?;
                require(amount > 0, "zero deposit")?;
                host.take_native(amount)?;
                let to = host.caller();
                mint(host, to, amount)?;
                Ok(Value::Void)
            }
            weth::WITHDRAW => {
                let amount: u128 = arg(function, args, 0)?;
                let to = host.caller();
                burn(host, to, amount)?;
                host.send_native(to, amount)?;
                Ok(Value::Void)
            }
            _ => invoke_token(host, function, args),
        }
    }
}
