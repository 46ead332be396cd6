use anyhow::{Context, Result};
use keyless_wallet::EngineConfig;
use std::path::PathBuf;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Root for the local pack store and the simulated auth server
    pub data_dir: PathBuf,
    pub engine: EngineConfig,
}

impl CliConfig {
    /// Resolve the data directory (flag or `KEYLESS_DATA_DIR`, else the
    /// platform data dir) and read KDF overrides from the environment.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let engine = EngineConfig::from_env().context("Invalid KDF configuration")?;
        Ok(Self { data_dir, engine })
    }

    pub fn packs_dir(&self) -> PathBuf {
        self.data_dir.join("packs")
    }

    pub fn server_dir(&self) -> PathBuf {
        self.data_dir.join("server")
    }
}

fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("com", "keyless", "keyless-wallet")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("Could not determine a data directory; pass --data-dir")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir_layout() {
        let config = CliConfig::load(Some(PathBuf::from("/tmp/keyless-test"))).unwrap();
        assert_eq!(config.packs_dir(), PathBuf::from("/tmp/keyless-test/packs"));
        assert_eq!(config.server_dir(), PathBuf::from("/tmp/keyless-test/server"));
    }
}
