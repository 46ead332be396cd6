//! Keyless wallet engine.
//!
//! A BIP-39 mnemonic is split 2-of-3 into device, cloud and auth shares.
//! Each share is sealed into a pack whose password derives from material
//! carried by the other packs, so any two packs are enough to restore the
//! wallet and regenerate the third.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod encryptor;
pub mod errors;
pub mod generation;
pub mod packs;
pub mod recovery;
pub mod service;
pub mod store;
pub mod types;

pub use cache::AuthPackCache;
pub use config::EngineConfig;
pub use encryptor::PackEncryptor;
pub use errors::{KeylessError, Result};
pub use generation::{
    create_keyless_wallet_packs, generate_keyless_mnemonic, generate_keyless_wallet_packs,
    keyless_mnemonic_from_phrase,
};
pub use packs::{
    is_packs_equal, AuthKeyPack, AuthKeyPackData, CloudKeyPack, CloudKeyPackData, DeviceKeyPack,
    DeviceKeyPackData, KeylessWalletPacks, KeylessWalletRestoredData, Pack,
};
pub use recovery::{
    recover_missing_share, restore_mnemonic_from_share_key, FailureReason, MissingShareRequest,
    RecoveryEngine, RecoveryFlow, RecoveryState, RestoreRequest, RestoredFromPacks,
};
pub use service::KeylessWalletService;
pub use store::{
    AuthPackServer, Backend, FilePackStore, MemoryPackStore, PackStore, RecordId,
    StoreBackedAuthServer, StoredPack,
};
pub use types::{
    CloudKeyProvider, KeylessMnemonicInfo, PackSetId, RestoredMnemonic, Share, ShareKeys,
    UserInfo, XCoordination,
};

pub use keyless_crypto::{KdfParams, KeyKind};
