use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{check_immutable, check_placement, Backend, PackStore, StoredPack};
use crate::{errors::Result, types::PackSetId};

/// In-memory pack store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPackStore {
    packs: RwLock<HashMap<(Backend, PackSetId), StoredPack>>,
}

impl MemoryPackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored packs across all backends.
    pub async fn len(&self) -> usize {
        self.packs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.packs.read().await.is_empty()
    }
}

#[async_trait]
impl PackStore for MemoryPackStore {
    async fn save(&self, backend: Backend, pack_set_id: &PackSetId, pack: &StoredPack) -> Result<()> {
        check_placement(backend, pack_set_id, pack)?;
        let mut packs = self.packs.write().await;
        let key = (backend, pack_set_id.clone());
        check_immutable(backend, packs.get(&key), pack)?;
        packs.insert(key, pack.clone());
        Ok(())
    }

    async fn load(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<Option<StoredPack>> {
        Ok(self
            .packs
            .read()
            .await
            .get(&(backend, pack_set_id.clone()))
            .cloned())
    }

    async fn delete(&self, backend: Backend, pack_set_id: &PackSetId) -> Result<()> {
        self.packs.write().await.remove(&(backend, pack_set_id.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::KeylessError;
    use crate::packs::CloudKeyPack;

    fn cloud_pack(id: &PackSetId, encrypted: &str) -> StoredPack {
        StoredPack::CloudKeyPack(CloudKeyPack {
            pack_set_id: id.clone(),
            auth_key_pwd_slice: "slice".into(),
            cloud_key_pwd_hash: "hash".into(),
            encrypted: encrypted.into(),
        })
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = MemoryPackStore::new();
        let id = PackSetId::generate();
        let pack = cloud_pack(&id, "blob");

        store.save(Backend::Cloud, &id, &pack).await.unwrap();
        assert_eq!(store.load(Backend::Cloud, &id).await.unwrap(), Some(pack.clone()));
        assert_eq!(store.load(Backend::Device, &id).await.unwrap(), None);

        // Saving the identical pack again is idempotent
        store.save(Backend::Cloud, &id, &pack).await.unwrap();
        assert_eq!(store.len().await, 1);

        store.delete(Backend::Cloud, &id).await.unwrap();
        assert!(store.is_empty().await);
        store.delete(Backend::Cloud, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_packs_are_immutable() {
        let store = MemoryPackStore::new();
        let id = PackSetId::generate();
        store.save(Backend::Cloud, &id, &cloud_pack(&id, "one")).await.unwrap();
        let err = store
            .save(Backend::Cloud, &id, &cloud_pack(&id, "two"))
            .await
            .unwrap_err();
        assert!(matches!(err, KeylessError::Storage(_)));
    }

    #[tokio::test]
    async fn test_rejects_wrong_slot() {
        let store = MemoryPackStore::new();
        let id = PackSetId::generate();
        let pack = cloud_pack(&id, "blob");
        assert!(matches!(
            store.save(Backend::Server, &id, &pack).await,
            Err(KeylessError::Storage(_))
        ));
        assert!(matches!(
            store.save(Backend::Cloud, &PackSetId::generate(), &pack).await,
            Err(KeylessError::PackSetMismatch { .. })
        ));
    }
}
