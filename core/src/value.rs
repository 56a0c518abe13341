use crate::address::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValueError {
    #[error("Invalid value type: expected {expected}, found {found}")]
    InvalidType { expected: String, found: String },

    #[error("Missing argument {index} for {function}")]
    MissingArgument { function: String, index: usize },
}

/// ABI value passed to and returned from contract functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    #[default]
    Void,
    Bool(bool),
    U32(u32),
    U128(u128),
    Address(Address),
    String(String),
    Vec(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool(_) => "bool",
            Self::U32(_) => "u32",
            Self::U128(_) => "u128",
            Self::Address(_) => "address",
            Self::String(_) => "string",
            Self::Vec(_) => "vec",
        }
    }

    /// Interpret a registry lookup result: `Void` or the zero address mean
    /// nothing is registered under the key.
    pub fn as_registered_address(&self) -> Option<Address> {
        match self {
            Self::Address(addr) if !addr.is_zero() => Some(*addr),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &str) -> ValueError {
        ValueError::InvalidType {
            expected: expected.to_string(),
            found: self.type_name().to_string(),
        }
    }
}

macro_rules! value_conversions {
    ($($variant:ident => $ty:ty, $name:literal);* $(;)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = ValueError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other.mismatch($name)),
                    }
                }
            }

            impl TryFrom<&Value> for $ty {
                type Error = ValueError;

                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    value.clone().try_into()
                }
            }
        )*
    };
}

value_conversions! {
    Bool => bool, "bool";
    U32 => u32, "u32";
    U128 => u128, "u128";
    Address => Address, "address";
    String => String, "string";
    Vec => Vec<Value>, "vec";
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Void
    }
}

/// Typed positional access to a call's argument list.
pub fn arg<T>(function: &str, args: &[Value], index: usize) -> Result<T, ValueError>
where
    T: for<'a> TryFrom<&'a Value, Error = ValueError>,
{
    let value = args.get(index).ok_or_else(|| ValueError::MissingArgument {
        function: function.to_string(),
        index,
    })?;
    T::try_from(value)
}
