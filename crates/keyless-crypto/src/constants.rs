//! Cryptographic constants and domain separation strings.
//!
//! The pack format and the password-derivation salts are persisted on three
//! independent backends; changing any value here breaks restoration of
//! existing pack sets.

/// Keyless threshold: any 2 shares reconstruct the mnemonic
pub const KEYLESS_THRESHOLD: usize = 2;

/// Keyless share count: device, cloud and auth
pub const KEYLESS_TOTAL_SHARES: usize = 3;

/// Mnemonic entropy size in bytes (24 words)
pub const MNEMONIC_ENTROPY_SIZE: usize = 32;

/// Size of a password slice in bytes (before base64)
pub const PWD_SLICE_SIZE: usize = 32;

/// Size of a derived pack password in bytes (before base64)
pub const PACK_PASSWORD_SIZE: usize = 32;

/// Size of the symmetric pack key in bytes
pub const PACK_KEY_SIZE: usize = 32;

/// Size of XChaCha20-Poly1305 nonces in bytes (192 bits)
pub const NONCE_SIZE: usize = 24;

/// Size of XChaCha20-Poly1305 authentication tags in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the Argon2id salt embedded in every sealed pack
pub const KDF_SALT_SIZE: usize = 32;

/// Current sealed pack format version
pub const PACK_FORMAT_VERSION: u8 = 1;

/// Sealed pack header: version + three u32 KDF parameters + salt + nonce
pub const PACK_HEADER_SIZE: usize = 1 + 4 * 3 + KDF_SALT_SIZE + NONCE_SIZE;

/// Domain separation for sealed pack AAD
pub const DOMAIN_PACK_AAD: &str = "keyless:pack:v1";

/// Domain separation for pack password derivation (HKDF info)
pub const DOMAIN_PACK_PASSWORD: &str = "keyless:pack-password:v1";

/// Fixed salt suffix for device key password derivation
pub const DEVICE_KEY_PWD_SALT: &str = "99C79104-F920-407B-9C2B-F4CDBC427F91";

/// Fixed salt suffix for cloud key password derivation
pub const CLOUD_KEY_PWD_SALT: &str = "67341352-B635-45C6-BE7A-A35E0CDBFC0D";

/// Fixed salt suffix for auth key password derivation
pub const AUTH_KEY_PWD_SALT: &str = "1C766505-8009-4058-B09D-C8515A3F096F";

/// Argon2id parameters for pack key derivation
pub mod argon2_params {
    use argon2::Version;

    /// Memory cost: 64 MiB
    pub const MEMORY_COST: u32 = 64 * 1024;

    /// Time cost: 3 iterations
    pub const TIME_COST: u32 = 3;

    /// Parallelism: 1 thread
    pub const PARALLELISM: u32 = 1;

    /// Largest memory cost accepted from a pack header (256 MiB)
    pub const MAX_MEMORY_COST: u32 = 256 * 1024;

    /// Largest time cost accepted from a pack header
    pub const MAX_TIME_COST: u32 = 10;

    /// Largest parallelism accepted from a pack header
    pub const MAX_PARALLELISM: u32 = 8;

    /// Argon2 version
    pub const VERSION: Version = Version::V0x13;
}
