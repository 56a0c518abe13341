use donaswap_core::{logging, v2_fixture, AddressBook, FixtureConfig, Identity};
use donaswap_devnet::{Devnet, DevnetConfig};
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    tracing::info!("Donaswap devnet starting...");

    let devnet_config = DevnetConfig::load()?;
    let fixture_config = FixtureConfig::load()?;
    tracing::info!(?devnet_config, ?fixture_config, "Configuration loaded");

    let devnet = Arc::new(Devnet::new(devnet_config));
    let wallet = Identity::generate();
    tracing::info!(deployer = %wallet.address(), "Generated deployer identity");

    let fixture = v2_fixture(Arc::clone(&devnet), wallet, &fixture_config).await?;
    let book = AddressBook::from(&fixture);
    println!("{}", serde_json::to_string_pretty(&book)?);
    Ok(())
}
