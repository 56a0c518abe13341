//! In-process ledger that hosts the Donaswap exchange artifacts, so the
//! fixture builder can run without an external node.

pub mod config;
pub mod contracts;
pub mod host;
pub mod ledger;

pub use config::DevnetConfig;
pub use ledger::Devnet;
