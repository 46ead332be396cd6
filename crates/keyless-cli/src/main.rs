//! `keyless`: create, restore and remove keyless wallets from the terminal.
//!
//! Packs are kept under the data directory: device and cloud packs in
//! `packs/`, auth packs in `server/` standing in for the auth server.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "keyless", version, about = "Keyless wallet packs: split, store and restore")]
struct Cli {
    /// Data directory for stored packs
    #[arg(long, global = true, env = "KEYLESS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a mnemonic into three packs and store them
    Generate {
        #[arg(long)]
        email: String,

        #[arg(long)]
        user_id: String,

        #[arg(long, value_enum)]
        provider: Provider,

        #[arg(long)]
        cloud_user_id: String,

        #[arg(long)]
        cloud_email: Option<String>,

        /// Existing BIP-39 mnemonic to protect; a new 24-word one if omitted
        #[arg(long, env = "KEYLESS_MNEMONIC", hide_env_values = true)]
        mnemonic: Option<String>,
    },

    /// Restore a wallet from whichever packs are still stored and put back the lost one
    Restore {
        pack_set_id: String,
    },

    /// Rebuild a mnemonic from two or three raw base64 shares
    RestoreShares {
        #[arg(long)]
        device: Option<String>,

        #[arg(long)]
        cloud: Option<String>,

        #[arg(long)]
        auth: Option<String>,
    },

    /// Recompute the share at an x-coordinate from the mnemonic and one share
    RecoverShare {
        #[arg(long, env = "KEYLESS_MNEMONIC", hide_env_values = true)]
        mnemonic: String,

        #[arg(long)]
        share: String,

        #[arg(long)]
        x: u8,
    },

    /// Delete a wallet's packs from every backend
    Remove {
        pack_set_id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Provider {
    Icloud,
    GoogleDrive,
}

impl From<Provider> for keyless_wallet::CloudKeyProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Icloud => keyless_wallet::CloudKeyProvider::ICloud,
            Provider::GoogleDrive => keyless_wallet::CloudKeyProvider::GoogleDrive,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyless_wallet=info,keyless_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.data_dir)?;

    match cli.command {
        Commands::Generate {
            email,
            user_id,
            provider,
            cloud_user_id,
            cloud_email,
            mnemonic,
        } => {
            let user_info = keyless_wallet::UserInfo {
                onekey_id_email: email,
                onekey_id_user_id: user_id,
                cloud_key_provider: provider.into(),
                cloud_key_user_id: cloud_user_id,
                cloud_key_user_email: cloud_email,
            };
            commands::wallet::generate(&config, user_info, mnemonic.map(zeroize::Zeroizing::new))
                .await
        }
        Commands::Restore { pack_set_id } => commands::wallet::restore(&config, &pack_set_id).await,
        Commands::RestoreShares { device, cloud, auth } => {
            commands::shares::restore_shares(device, cloud, auth)
        }
        Commands::RecoverShare { mnemonic, share, x } => {
            commands::shares::recover_share(zeroize::Zeroizing::new(mnemonic), share, x)
        }
        Commands::Remove { pack_set_id } => commands::wallet::remove(&config, &pack_set_id).await,
    }
}
