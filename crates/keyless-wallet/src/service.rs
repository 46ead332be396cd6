//! Async facade over generation, restore and pack distribution.
//!
//! Sealing and opening packs runs Argon2id, so every such call is moved to
//! the blocking pool. Backend I/O goes through [`PackStore`] and
//! [`AuthPackServer`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    cache::AuthPackCache,
    config::EngineConfig,
    errors::{KeylessError, Result},
    generation::{create_keyless_wallet_packs, generate_keyless_wallet_packs},
    packs::{AuthKeyPack, KeylessWalletPacks, KeylessWalletRestoredData},
    recovery::{
        recover_missing_share, restore_mnemonic_from_share_key, MissingShareRequest,
        RecoveryEngine, RestoreRequest,
    },
    store::{AuthPackServer, Backend, PackStore, RecordId, StoredPack},
    types::{KeylessMnemonicInfo, PackSetId, RestoredMnemonic, ShareKeys, UserInfo},
};

/// Keyless wallet service.
///
/// `S` holds the device and cloud packs, `A` the auth pack. The auth pack is
/// cached per session, sealed under a session key, so a restore right after
/// enabling does not need a server round trip.
pub struct KeylessWalletService<S, A> {
    config: EngineConfig,
    engine: RecoveryEngine,
    store: Arc<S>,
    auth_server: Arc<A>,
    auth_pack_cache: AuthPackCache,
}

impl<S, A> KeylessWalletService<S, A>
where
    S: PackStore + 'static,
    A: AuthPackServer + 'static,
{
    pub fn new(config: EngineConfig, store: Arc<S>, auth_server: Arc<A>) -> Result<Self> {
        Ok(Self {
            engine: RecoveryEngine::from_config(&config),
            config,
            store,
            auth_server,
            auth_pack_cache: AuthPackCache::new()?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &RecoveryEngine {
        &self.engine
    }

    // ========================================================================
    // Generation and restore
    // ========================================================================

    /// Generate a fresh mnemonic and its three packs.
    pub async fn generate_keyless_wallet_packs(&self, user_info: UserInfo) -> Result<KeylessWalletPacks> {
        let encryptor = *self.engine.encryptor();
        run_blocking(move || create_keyless_wallet_packs(&encryptor, &user_info)).await
    }

    /// Seal packs for an existing mnemonic split.
    pub async fn generate_packs_for_mnemonic(
        &self,
        user_info: UserInfo,
        mnemonic_info: KeylessMnemonicInfo,
        pack_set_id: PackSetId,
    ) -> Result<KeylessWalletPacks> {
        let encryptor = *self.engine.encryptor();
        run_blocking(move || {
            generate_keyless_wallet_packs(&encryptor, &user_info, &mnemonic_info, &pack_set_id)
        })
        .await
    }

    /// Restore from any two (or three) packs.
    pub async fn restore_keyless_wallet(&self, request: RestoreRequest) -> Result<KeylessWalletRestoredData> {
        let engine = self.engine;
        run_blocking(move || engine.restore_keyless_wallet(&request)).await
    }

    pub fn restore_mnemonic_from_share_key(&self, keys: &ShareKeys) -> Result<RestoredMnemonic> {
        restore_mnemonic_from_share_key(keys).map_err(KeylessError::normalize)
    }

    pub fn recover_missing_share(&self, request: &MissingShareRequest) -> Result<String> {
        recover_missing_share(request).map_err(KeylessError::normalize)
    }

    // ========================================================================
    // Distribution
    // ========================================================================

    /// Store the device and cloud packs and upload the auth pack.
    ///
    /// Stops at the first failing backend; packs already written stay in place
    /// and a retry with the same pack set is idempotent.
    pub async fn enable_keyless_wallet(&self, packs: &KeylessWalletPacks) -> Result<RecordId> {
        let pack_set_id = packs.pack_set_id().clone();

        self.store
            .save(
                Backend::Device,
                &pack_set_id,
                &StoredPack::DeviceKeyPack(packs.device_key_pack.clone()),
            )
            .await?;
        self.store
            .save(
                Backend::Cloud,
                &pack_set_id,
                &StoredPack::CloudKeyPack(packs.cloud_key_pack.clone()),
            )
            .await?;
        let record_id = self.auth_server.upload_auth_pack(&packs.auth_key_pack).await?;
        self.cache_auth_pack(&packs.auth_key_pack).await?;

        info!(pack_set_id = %pack_set_id, record_id = %record_id, "Keyless wallet enabled");
        Ok(record_id)
    }

    /// Collect whatever packs the backends still hold and restore from them.
    ///
    /// An unreachable backend counts as a missing pack; restore fails only if
    /// fewer than two packs come back.
    pub async fn restore_from_backends(&self, pack_set_id: &PackSetId) -> Result<KeylessWalletRestoredData> {
        let (device, cloud, auth) = tokio::join!(
            self.store.load(Backend::Device, pack_set_id),
            self.store.load(Backend::Cloud, pack_set_id),
            self.load_auth_pack(pack_set_id),
        );

        let request = RestoreRequest {
            device_key_pack: tolerate(Backend::Device, device).and_then(StoredPack::into_device),
            cloud_key_pack: tolerate(Backend::Cloud, cloud).and_then(StoredPack::into_cloud),
            auth_key_pack: tolerate(Backend::Server, auth),
        };
        debug!(pack_set_id = %pack_set_id, packs = request.len(), "Collected packs from backends");

        if request.is_empty() {
            return Err(KeylessError::NoPacksProvided);
        }
        self.restore_keyless_wallet(request).await
    }

    /// Store only the packs their backends no longer hold.
    ///
    /// Call after a restore to put the regenerated pack back. Packs still
    /// present are never overwritten. A backend that cannot be read is
    /// skipped. Returns the backends written.
    pub async fn redistribute_missing_packs(
        &self,
        restored: &KeylessWalletRestoredData,
    ) -> Result<Vec<Backend>> {
        let packs = &restored.packs;
        let pack_set_id = packs.pack_set_id();
        let (device, cloud, auth) = tokio::join!(
            self.store.load(Backend::Device, pack_set_id),
            self.store.load(Backend::Cloud, pack_set_id),
            self.auth_server.fetch_auth_pack(pack_set_id),
        );

        let mut written = Vec::new();
        if is_absent(Backend::Device, &device) {
            self.store
                .save(
                    Backend::Device,
                    pack_set_id,
                    &StoredPack::DeviceKeyPack(packs.device_key_pack.clone()),
                )
                .await?;
            written.push(Backend::Device);
        }
        if is_absent(Backend::Cloud, &cloud) {
            self.store
                .save(
                    Backend::Cloud,
                    pack_set_id,
                    &StoredPack::CloudKeyPack(packs.cloud_key_pack.clone()),
                )
                .await?;
            written.push(Backend::Cloud);
        }
        if is_absent(Backend::Server, &auth) {
            self.auth_server.upload_auth_pack(&packs.auth_key_pack).await?;
            self.cache_auth_pack(&packs.auth_key_pack).await?;
            written.push(Backend::Server);
        }

        info!(pack_set_id = %pack_set_id, written = written.len(), "Missing packs redistributed");
        Ok(written)
    }

    /// Delete the pack set from every backend and drop it from the cache.
    ///
    /// All backends are attempted; the first error is returned.
    pub async fn remove_keyless_wallet(&self, pack_set_id: &PackSetId) -> Result<()> {
        let (device, cloud, auth) = tokio::join!(
            self.store.delete(Backend::Device, pack_set_id),
            self.store.delete(Backend::Cloud, pack_set_id),
            self.auth_server.delete_auth_pack(pack_set_id),
        );
        self.auth_pack_cache.remove(pack_set_id).await;

        device?;
        cloud?;
        auth?;
        info!(pack_set_id = %pack_set_id, "Keyless wallet removed");
        Ok(())
    }

    // ========================================================================
    // Auth pack cache
    // ========================================================================

    pub async fn cache_auth_pack(&self, pack: &AuthKeyPack) -> Result<()> {
        self.auth_pack_cache.insert(pack).await
    }

    pub async fn cached_auth_pack(&self, pack_set_id: &PackSetId) -> Result<Option<AuthKeyPack>> {
        self.auth_pack_cache.get(pack_set_id).await
    }

    /// Drop one pack set from the cache, or every entry when `None`.
    pub async fn clear_auth_pack_cache(&self, pack_set_id: Option<&PackSetId>) {
        match pack_set_id {
            Some(id) => self.auth_pack_cache.remove(id).await,
            None => self.auth_pack_cache.clear().await,
        }
    }

    async fn load_auth_pack(&self, pack_set_id: &PackSetId) -> Result<Option<AuthKeyPack>> {
        if let Some(pack) = self.cached_auth_pack(pack_set_id).await? {
            return Ok(Some(pack));
        }
        let pack = self.auth_server.fetch_auth_pack(pack_set_id).await?;
        if let Some(pack) = &pack {
            self.cache_auth_pack(pack).await?;
        }
        Ok(pack)
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await?
        .map_err(KeylessError::normalize)
}

fn is_absent<T>(backend: Backend, loaded: &Result<Option<T>>) -> bool {
    match loaded {
        Ok(pack) => pack.is_none(),
        Err(e) => {
            warn!(backend = %backend, error = %e, "Backend unavailable, not redistributing to it");
            false
        }
    }
}

fn tolerate<T>(backend: Backend, loaded: Result<Option<T>>) -> Option<T> {
    match loaded {
        Ok(pack) => pack,
        Err(e) => {
            warn!(backend = %backend, error = %e, "Backend unavailable, treating pack as missing");
            None
        }
    }
}
