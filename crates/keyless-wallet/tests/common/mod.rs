#![allow(dead_code)]

use keyless_wallet::{CloudKeyProvider, KdfParams, PackEncryptor, RecoveryEngine, UserInfo};

/// BIP-39 test vector: 16 zero bytes of entropy.
pub const ABANDON_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub fn user_info() -> UserInfo {
    UserInfo {
        onekey_id_email: "alice@example.com".into(),
        onekey_id_user_id: "onekey-user-42".into(),
        cloud_key_provider: CloudKeyProvider::ICloud,
        cloud_key_user_id: "icloud-42".into(),
        cloud_key_user_email: Some("alice@icloud.com".into()),
    }
}

/// Encryptor with cheap Argon2 parameters.
pub fn encryptor() -> PackEncryptor {
    PackEncryptor::new(KdfParams::for_tests())
}

pub fn engine() -> RecoveryEngine {
    RecoveryEngine::new(encryptor())
}
