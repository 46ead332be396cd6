//! Pack set commands: generate, restore, remove.

use anyhow::{Context, Result};
use colored::*;
use keyless_wallet::{keyless_mnemonic_from_phrase, PackSetId, UserInfo};
use zeroize::Zeroizing;

use super::{open_service, parse_pack_set_id, print_mnemonic};
use crate::config::CliConfig;

pub async fn generate(
    config: &CliConfig,
    user_info: UserInfo,
    mnemonic: Option<Zeroizing<String>>,
) -> Result<()> {
    println!("{}", "=== Keyless Wallet Setup ===".bold().cyan());
    println!();

    let service = open_service(config).await?;

    println!("{}", "Step 1: Sealing packs...".yellow());
    let packs = match mnemonic {
        Some(phrase) => {
            let info = keyless_mnemonic_from_phrase(&phrase).context("Invalid mnemonic")?;
            service
                .generate_packs_for_mnemonic(user_info, info, PackSetId::generate())
                .await?
        }
        None => service.generate_keyless_wallet_packs(user_info).await?,
    };
    println!("{}", "✓ Device, cloud and auth packs sealed".green());
    println!();

    println!("{}", "Step 2: Distributing packs...".yellow());
    let record_id = service.enable_keyless_wallet(&packs).await?;
    println!("{}", "✓ Packs stored".green());
    println!("  Pack set ID: {}", packs.pack_set_id());
    println!("  Auth record: {}", record_id);
    println!("  Data dir:    {}", config.data_dir.display());
    println!();

    print_mnemonic(&packs.mnemonic_info.mnemonic());
    Ok(())
}

pub async fn restore(config: &CliConfig, pack_set_id: &str) -> Result<()> {
    println!("{}", "=== Keyless Wallet Restore ===".bold().cyan());
    println!();

    let pack_set_id = parse_pack_set_id(pack_set_id)?;
    let service = open_service(config).await?;

    println!("{}", "Collecting packs...".yellow());
    let restored = service
        .restore_from_backends(&pack_set_id)
        .await
        .context("Restore failed")?;
    println!("{}", "✓ Wallet restored; missing pack regenerated".green());
    println!("  Account: {}", restored.device_key_pack_data.user_info.onekey_id_email);
    println!(
        "  Cloud:   {}",
        restored.device_key_pack_data.user_info.cloud_key_provider
    );
    println!();

    let written = service
        .redistribute_missing_packs(&restored)
        .await
        .context("Failed to store regenerated pack")?;
    if written.is_empty() {
        println!("{}", "✓ All backends already hold their pack".green());
    } else {
        let names: Vec<String> = written.iter().map(ToString::to_string).collect();
        println!("{}", format!("✓ Re-stored packs on: {}", names.join(", ")).green());
    }
    println!();

    print_mnemonic(&restored.packs.mnemonic_info.mnemonic());
    Ok(())
}

pub async fn remove(config: &CliConfig, pack_set_id: &str) -> Result<()> {
    let pack_set_id = parse_pack_set_id(pack_set_id)?;
    let service = open_service(config).await?;
    service.remove_keyless_wallet(&pack_set_id).await?;
    println!("{}", format!("✓ Removed pack set {}", pack_set_id).green());
    Ok(())
}
