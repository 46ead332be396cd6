//! Pack persistence seams.
//!
//! The engine never talks to keychains, cloud drives or HTTP directly. It
//! goes through [`PackStore`] (one slot per backend and pack set) and
//! [`AuthPackServer`] (the server-held auth pack). Retries, if any, belong
//! to the implementations.

mod auth_server;
mod file;
mod memory;

pub use auth_server::{AuthPackServer, RecordId, StoreBackedAuthServer};
pub use file::FilePackStore;
pub use memory::MemoryPackStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    errors::{KeylessError, Result},
    packs::{AuthKeyPack, CloudKeyPack, DeviceKeyPack},
    types::PackSetId,
};

/// Where a pack lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Local secure storage
    Device,
    /// User's cloud backup
    Cloud,
    /// Auth server
    Server,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Device, Backend::Cloud, Backend::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Device => "device",
            Backend::Cloud => "cloud",
            Backend::Server => "server",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pack as written to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "pack", rename_all = "camelCase")]
pub enum StoredPack {
    DeviceKeyPack(DeviceKeyPack),
    CloudKeyPack(CloudKeyPack),
    AuthKeyPack(AuthKeyPack),
}

impl StoredPack {
    pub fn pack_set_id(&self) -> &PackSetId {
        match self {
            StoredPack::DeviceKeyPack(pack) => &pack.pack_set_id,
            StoredPack::CloudKeyPack(pack) => &pack.pack_set_id,
            StoredPack::AuthKeyPack(pack) => &pack.pack_set_id,
        }
    }

    /// The backend this kind of pack belongs on.
    pub fn backend(&self) -> Backend {
        match self {
            StoredPack::DeviceKeyPack(_) => Backend::Device,
            StoredPack::CloudKeyPack(_) => Backend::Cloud,
            StoredPack::AuthKeyPack(_) => Backend::Server,
        }
    }

    pub fn into_device(self) -> Option<DeviceKeyPack> {
        match self {
            StoredPack::DeviceKeyPack(pack) => Some(pack),
            _ => None,
        }
    }

    pub fn into_cloud(self) -> Option<CloudKeyPack> {
        match self {
            StoredPack::CloudKeyPack(pack) => Some(pack),
            _ => None,
        }
    }

    pub fn into_auth(self) -> Option<AuthKeyPack> {
        match self {
            StoredPack::AuthKeyPack(pack) => Some(pack),
            _ => None,
        }
    }
}

/// Storage for packs, keyed by backend and pack set id.
#[async_trait]
pub trait PackStore: Send + Sync {
    /// Persist `pack`. Packs are immutable: saving over an existing, different
    /// pack is an error.
    async fn save(&self, backend: Backend, pack_set_id: &PackSetId, pack: &StoredPack) -> Result<()>;

    /// Load the pack for `pack_set_id`, if any.
    async fn load(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<Option<StoredPack>>;

    /// Delete the pack for `pack_set_id`. Deleting a missing pack is not an error.
    async fn delete(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<()>;
}

/// Reject a pack aimed at the wrong slot.
pub(crate) fn check_placement(backend: Backend, pack_set_id: &PackSetId, pack: &StoredPack) -> Result<()> {
    if pack.backend() != backend {
        return Err(KeylessError::Storage(format!(
            "{} pack cannot be stored on the {} backend",
            pack.backend(),
            backend
        )));
    }
    if pack.pack_set_id() != pack_set_id {
        return Err(KeylessError::PackSetMismatch {
            expected: pack_set_id.to_string(),
            actual: pack.pack_set_id().to_string(),
        });
    }
    Ok(())
}

/// Reject overwriting a stored pack with different content.
pub(crate) fn check_immutable(
    backend: Backend,
    existing: Option<&StoredPack>,
    pack: &StoredPack,
) -> Result<()> {
    match existing {
        Some(existing) if existing != pack => Err(KeylessError::Storage(format!(
            "A different pack already exists on the {} backend for {}",
            backend,
            pack.pack_set_id()
        ))),
        _ => Ok(()),
    }
}
