//! Engine configuration.

use keyless_crypto::KdfParams;

use crate::errors::{KeylessError, Result};

/// Environment variable overriding the Argon2id memory cost (KiB).
pub const ENV_KDF_MEMORY_KIB: &str = "KEYLESS_KDF_MEMORY_KIB";
/// Environment variable overriding the Argon2id iteration count.
pub const ENV_KDF_ITERATIONS: &str = "KEYLESS_KDF_ITERATIONS";
/// Environment variable overriding the Argon2id parallelism.
pub const ENV_KDF_PARALLELISM: &str = "KEYLESS_KDF_PARALLELISM";

/// Engine configuration.
///
/// The 2-of-3 split is fixed by the pack layout (three packs, each carrying
/// material for another), so only the KDF cost is tunable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Argon2id parameters used when sealing packs
    pub kdf: KdfParams,
}

impl EngineConfig {
    /// Default configuration with the given KDF parameters.
    pub fn with_kdf(kdf: KdfParams) -> Self {
        Self { kdf }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = KdfParams::default();

        let memory_kib = parse_u32(&lookup, ENV_KDF_MEMORY_KIB, defaults.memory_kib)?;
        let iterations = parse_u32(&lookup, ENV_KDF_ITERATIONS, defaults.iterations)?;
        let parallelism = parse_u32(&lookup, ENV_KDF_PARALLELISM, defaults.parallelism)?;

        let kdf = KdfParams::new(memory_kib, iterations, parallelism)
            .map_err(|e| KeylessError::Config(e.to_string()))?;

        Ok(Self::with_kdf(kdf))
    }
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| KeylessError::Config(format!("{} must be an unsigned integer, got {:?}", key, raw))),
        None => Ok(default),
    }
}
