//! Deploys and wires a Donaswap V1/V2 exchange environment for tests.
//!
//! The orchestrator in [`fixture`] talks to contracts only through their
//! artifact and function names ([`artifacts`]) over an
//! [`ExecutionEnvironment`], so any ledger that can host the artifacts can be
//! bootstrapped.

pub mod address;
pub mod artifacts;
pub mod client;
pub mod config;
pub mod environment;
pub mod errors;
pub mod fixture;
pub mod identity;
pub mod logging;
pub mod transaction;
pub mod value;

pub use address::Address;
pub use client::{Client, ContractHandle};
pub use config::{expand_to_18_decimals, FixtureConfig};
pub use environment::{EnvError, ExecutionEnvironment};
pub use errors::FixtureError;
pub use fixture::{v2_fixture, AddressBook, V2Fixture};
pub use identity::Identity;
pub use transaction::{Action, Event, Receipt, SignedTransaction, Transaction};
pub use value::Value;
