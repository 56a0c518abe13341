use crate::host::{require, unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::token;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};
use serde::Serialize;

#[derive(Serialize)]
enum DataKey {
    Allowance(Address, Address),
    Balance(Address),
    TotalSupply,
    Name,
    Symbol,
    Decimals,
}

pub(crate) fn write_metadata(
    host: &mut Host<'_, '_>,
    name: &str,
    symbol: &str,
    decimals: u32,
) -> HostResult<()> {
    host.set(&DataKey::Name, name)?;
    host.set(&DataKey::Symbol, symbol)?;
    host.set(&DataKey::Decimals, decimals)
}

pub(crate) fn read_balance(host: &Host<'_, '_>, addr: Address) -> HostResult<u128> {
    Ok(host.get(&DataKey::Balance(addr))?.unwrap_or(0))
}

fn read_total_supply(host: &Host<'_, '_>) -> HostResult<u128> {
    Ok(host.get(&DataKey::TotalSupply)?.unwrap_or(0))
}

pub(crate) fn mint(host: &mut Host<'_, '_>, to: Address, amount: u128) -> HostResult<()> {
    let supply = read_total_supply(host)?
        .checked_add(amount)
        .ok_or_else(|| crate::host::Revert::new("total supply overflow"))?;
    host.set(&DataKey::TotalSupply, supply)?;
    receive_balance(host, to, amount)?;
    host.emit("transfer", vec![Value::Void, to.into(), amount.into()]);
    Ok(())
}

pub(crate) fn burn(host: &mut Host<'_, '_>, from: Address, amount: u128) -> HostResult<()> {
    spend_balance(host, from, amount)?;
    let supply = read_total_supply(host)? - amount;
    host.set(&DataKey::TotalSupply, supply)?;
    host.emit("transfer", vec![from.into(), Value::Void, amount.into()]);
    Ok(())
}

fn receive_balance(host: &mut Host<'_, '_>, addr: Address, amount: u128) -> HostResult<()> {
    let balance = read_balance(host, addr)?;
    host.set(&DataKey::Balance(addr), balance + amount)
}

fn spend_balance(host: &mut Host<'_, '_>, addr: Address, amount: u128) -> HostResult<()> {
    let balance = read_balance(host, addr)?;
    require(balance >= amount, "insufficient balance")?;
    host.set(&DataKey::Balance(addr), balance - amount)
}

fn read_allowance(host: &Host<'_, '_>, from: Address, spender: Address) -> HostResult<u128> {
    Ok(host.get(&DataKey::Allowance(from, spender))?.unwrap_or(0))
}

fn write_allowance(
    host: &mut Host<'_, '_>,
    from: Address,
    spender: Address,
    amount: u128,
) -> HostResult<()> {
    let key = DataKey::Allowance(from, spender);
    if amount > 0 {
        host.set(&key, amount)
    } else {
        host.remove(&key)
    }
}

fn spend_allowance(
    host: &mut Host<'_, '_>,
    from: Address,
    spender: Address,
    amount: u128,
) -> HostResult<()> {
    let allowance = read_allowance(host, from, spender)?;
    require(allowance >= amount, "insufficient allowance")?;
    // An unlimited approval is never drawn down.
    if allowance != u128::MAX {
        write_allowance(host, from, spender, allowance - amount)?;
    }
    Ok(())
}

fn transfer(host: &mut Host<'_, '_>, from: Address, to: Address, amount: u128) -> HostResult<()> {
    spend_balance(host, from, amount)?;
    receive_balance(host, to, amount)?;
    host.emit("transfer", vec![from.into(), to.into(), amount.into()]);
    Ok(())
}

/// Functions shared by every fungible token model.
pub(crate) fn invoke_token(
    host: &mut Host<'_, '_>,
    function: &str,
    args: &[Value],
) -> HostResult<Value> {
    match function {
        token::NAME => Ok(host.get_value(&DataKey::Name)?),
        token::SYMBOL => Ok(host.get_value(&DataKey::Symbol)?),
        token::DECIMALS => Ok(host.get_value(&DataKey::Decimals)?),
        token::TOTAL_SUPPLY => Ok(read_total_supply(host)?.into()),
        token::BALANCE_OF => {
            let owner = arg(function, args, 0)?;
            Ok(read_balance(host, owner)?.into())
        }
        token::ALLOWANCE => {
            let owner = arg(function, args, 0)?;
            let spender = arg(function, args, 1)?;
            Ok(read_allowance(host, owner, spender)?.into())
        }
        token::TRANSFER => {
            let to = arg(function, args, 0)?;
            let amount = arg(function, args, 1)?;
            let from = host.caller();
            transfer(host, from, to, amount)?;
            Ok(true.into())
        }
        token::APPROVE => {
            let spender: Address = arg(function, args, 0)?;
            let amount: u128 = arg(function, args, 1)?;
            let owner = host.caller();
            write_allowance(host, owner, spender, amount)?;
            host.emit("approval", vec![owner.into(), spender.into(), amount.into()]);
            Ok(true.into())
        }
        token::TRANSFER_FROM => {
            let from = arg(function, args, 0)?;
            let to = arg(function, args, 1)?;
            let amount = arg(function, args, 2)?;
            let spender = host.caller();
            spend_allowance(host, from, spender, amount)?;
            transfer(host, from, to, amount)?;
            Ok(true.into())
        }
        _ => Err(unknown_function(function)),
    }
}

/// Test token; the whole supply goes to the deployer.
pub struct Erc20;

impl ContractCode for Erc20 {
    fn construct(&self, host: &mut Host<'_, '_>, args: &[Value]) -> HostResult<()> {
        let total_supply: u128 = arg("constructor", args, 0)?;
        write_metadata(host, "Donaswap Test Token", "DTT", 18)?;
        let deployer = host.caller();
        mint(host, deployer, total_supply)
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        invoke_token(host, function, args)
    }
}
