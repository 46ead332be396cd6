use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{Backend, PackStore, StoredPack};
use crate::{errors::Result, packs::AuthKeyPack, types::PackSetId};

/// Server-side identifier of an uploaded auth pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote holder of auth packs. Transport and session auth live in the
/// implementation.
#[async_trait]
pub trait AuthPackServer: Send + Sync {
    async fn upload_auth_pack(&self, pack: &AuthKeyPack) -> Result<RecordId>;

    async fn fetch_auth_pack(&self, pack_set_id: &PackSetId) -> Result<Option<AuthKeyPack>>;

    async fn delete_auth_pack(&self, pack_set_id: &PackSetId) -> Result<()>;
}

/// [`AuthPackServer`] over any [`PackStore`], using its server slot.
#[derive(Debug)]
pub struct StoreBackedAuthServer<S> {
    store: Arc<S>,
}

impl<S> Clone for StoreBackedAuthServer<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PackStore> StoreBackedAuthServer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: PackStore> AuthPackServer for StoreBackedAuthServer<S> {
    async fn upload_auth_pack(&self, pack: &AuthKeyPack) -> Result<RecordId> {
        self.store
            .save(
                Backend::Server,
                &pack.pack_set_id,
                &StoredPack::AuthKeyPack(pack.clone()),
            )
            .await?;
        let record_id = RecordId(uuid::Uuid::new_v4().to_string());
        tracing::info!(pack_set_id = %pack.pack_set_id, record_id = %record_id, "Auth pack uploaded");
        Ok(record_id)
    }

    async fn fetch_auth_pack(&self, pack_set_id: &PackSetId) -> Result<Option<AuthKeyPack>> {
        Ok(self
            .store
            .load(Backend::Server, pack_set_id)
            .await?
            .and_then(StoredPack::into_auth))
    }

    async fn delete_auth_pack(&self, pack_set_id: &PackSetId) -> Result<()> {
        self.store.delete(Backend::Server, pack_set_id).await
    }
}
