//! Command implementations

use anyhow::{Context, Result};
use colored::*;
use keyless_wallet::{FilePackStore, KeylessWalletService, PackSetId, StoreBackedAuthServer};
use std::sync::Arc;

use crate::config::CliConfig;

pub mod shares;
pub mod wallet;

pub(crate) type CliService = KeylessWalletService<FilePackStore, StoreBackedAuthServer<FilePackStore>>;

/// Service over the file stores under the data directory.
pub(crate) async fn open_service(config: &CliConfig) -> Result<CliService> {
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening pack stores");
    let store = FilePackStore::open(config.packs_dir())
        .await
        .context("Failed to open pack store")?;
    let server_store = FilePackStore::open(config.server_dir())
        .await
        .context("Failed to open auth pack store")?;
    KeylessWalletService::new(
        config.engine,
        Arc::new(store),
        Arc::new(StoreBackedAuthServer::new(Arc::new(server_store))),
    )
    .context("Failed to start keyless wallet service")
}

pub(crate) fn parse_pack_set_id(value: &str) -> Result<PackSetId> {
    PackSetId::parse(value.trim()).context("Pack set id must be 32 lowercase hex characters")
}

pub(crate) fn print_mnemonic(mnemonic: &str) {
    println!("{}", "Mnemonic (write it down, it is shown only once):".bold().red());
    println!("  {}", mnemonic);
}
