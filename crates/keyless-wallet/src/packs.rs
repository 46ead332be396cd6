//! Pack types.
//!
//! Each pack carries one share sealed under its own password, plus the
//! plaintext material needed to derive the password of another pack:
//!
//! | pack   | plaintext                                 | sealed payload                         |
//! |--------|-------------------------------------------|----------------------------------------|
//! | device | auth & cloud passwords, their slices      | device share                           |
//! | cloud  | auth password slice                       | cloud share, device slice              |
//! | auth   | (hash only)                               | auth share, cloud & device slices      |
//!
//! Any two packs therefore unlock each other. Packs are immutable once
//! written; recovery only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

use keyless_crypto::KeyKind;

use crate::types::{CloudKeyProvider, KeylessMnemonicInfo, PackSetId, UserInfo, XCoordination};

/// Placeholder written over `encrypted` fields when comparing pack sets.
const ENCRYPTED_PLACEHOLDER: &str = "";

/// Pack kept in the device's local secure storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceKeyPack {
    pub pack_set_id: PackSetId,
    pub cloud_key_provider: CloudKeyProvider,
    pub auth_key_pwd: String,
    pub auth_key_pwd_hash: String,
    pub auth_key_pwd_slice: String,
    pub cloud_key_pwd: String,
    pub cloud_key_pwd_hash: String,
    pub cloud_key_pwd_slice: String,
    pub device_key_pwd_hash: String,
    pub encrypted: String,
}

impl fmt::Debug for DeviceKeyPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKeyPack")
            .field("pack_set_id", &self.pack_set_id)
            .field("cloud_key_provider", &self.cloud_key_provider)
            .field("encrypted_len", &self.encrypted.len())
            .finish_non_exhaustive()
    }
}

/// Pack uploaded to the user's cloud backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudKeyPack {
    pub pack_set_id: PackSetId,
    pub auth_key_pwd_slice: String,
    pub cloud_key_pwd_hash: String,
    pub encrypted: String,
}

/// Pack held by the auth server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthKeyPack {
    pub pack_set_id: PackSetId,
    pub cloud_key_provider: CloudKeyProvider,
    pub auth_key_pwd_hash: String,
    pub encrypted: String,
}

/// Sealed payload of a [`DeviceKeyPack`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceKeyPackData {
    pub device_key: String,
    pub user_info: UserInfo,
    pub x_coordination: XCoordination,
}

/// Sealed payload of a [`CloudKeyPack`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudKeyPackData {
    pub cloud_key: String,
    pub device_key_pwd_slice: String,
    pub user_info: UserInfo,
    pub x_coordination: XCoordination,
}

/// Sealed payload of an [`AuthKeyPack`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthKeyPackData {
    pub auth_key: String,
    pub cloud_key_pwd_slice: String,
    pub device_key_pwd_slice: String,
    pub user_info: UserInfo,
    pub x_coordination: XCoordination,
}

macro_rules! redacted_debug {
    ($ty:ident) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("x_coordination", &self.x_coordination)
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(DeviceKeyPackData);
redacted_debug!(CloudKeyPackData);
redacted_debug!(AuthKeyPackData);

/// Single sealed share, for callers that manage passwords themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub pack_set_id: PackSetId,
    pub kind: KeyKind,
    pub encrypted: String,
}

/// Everything produced when a keyless wallet is created.
///
/// Lives only in memory; the three packs are distributed separately.
#[derive(Clone, PartialEq, Eq)]
pub struct KeylessWalletPacks {
    pub mnemonic_info: KeylessMnemonicInfo,
    pub device_key_pack: DeviceKeyPack,
    pub cloud_key_pack: CloudKeyPack,
    pub auth_key_pack: AuthKeyPack,
}

impl fmt::Debug for KeylessWalletPacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeylessWalletPacks")
            .field("pack_set_id", self.pack_set_id())
            .field("x_coordination", &self.mnemonic_info.x_coordination())
            .finish_non_exhaustive()
    }
}

impl KeylessWalletPacks {
    /// Pack set id shared by the three packs.
    pub fn pack_set_id(&self) -> &PackSetId {
        &self.device_key_pack.pack_set_id
    }

    /// Copy with every ciphertext replaced by a placeholder.
    pub fn without_ciphertexts(&self) -> Self {
        let mut normalized = self.clone();
        normalized.device_key_pack.encrypted = ENCRYPTED_PLACEHOLDER.to_string();
        normalized.cloud_key_pack.encrypted = ENCRYPTED_PLACEHOLDER.to_string();
        normalized.auth_key_pack.encrypted = ENCRYPTED_PLACEHOLDER.to_string();
        normalized
    }
}

/// Compare two pack sets, ignoring the sealed bytes.
///
/// Sealing is randomized (fresh salt and nonce), so a restored pack set never
/// matches byte for byte; every other field must.
pub fn is_packs_equal(a: &KeylessWalletPacks, b: &KeylessWalletPacks) -> bool {
    a.without_ciphertexts() == b.without_ciphertexts()
}

/// Result of restoring a wallet from two packs.
#[derive(Debug, Clone)]
pub struct KeylessWalletRestoredData {
    /// Rebuilt pack set, including a freshly sealed pack for the missing share
    pub packs: KeylessWalletPacks,
    pub device_key_pack_data: DeviceKeyPackData,
    pub cloud_key_pack_data: CloudKeyPackData,
    pub auth_key_pack_data: AuthKeyPackData,
}
