//! Raw share commands.

use anyhow::{Context, Result};
use colored::*;
use keyless_wallet::{
    recover_missing_share, restore_mnemonic_from_share_key, MissingShareRequest, ShareKeys,
};
use zeroize::Zeroizing;

use super::print_mnemonic;

pub fn restore_shares(
    device: Option<String>,
    cloud: Option<String>,
    auth: Option<String>,
) -> Result<()> {
    let keys = ShareKeys {
        device_key: device,
        cloud_key: cloud,
        auth_key: auth,
    };
    let restored = restore_mnemonic_from_share_key(&keys).context("Could not combine shares")?;
    println!("{}", "✓ Mnemonic reconstructed".green());
    println!("  Shares:");
    for share in &restored.shares {
        println!("    {}", share);
    }
    println!();
    print_mnemonic(&restored.mnemonic);
    Ok(())
}

pub fn recover_share(mnemonic: Zeroizing<String>, share: String, x: u8) -> Result<()> {
    let request = MissingShareRequest {
        mnemonic,
        share_base64: share,
        missing_x: x,
    };
    let recovered = recover_missing_share(&request).context("Could not recompute share")?;
    println!("{}", format!("✓ Share at x = {}", x).green());
    println!("  {}", recovered);
    Ok(())
}
