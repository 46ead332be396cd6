//! Session-scoped auth pack cache.
//!
//! Entries are sealed with XChaCha20-Poly1305 under a random key that lives
//! only as long as the cache, with the pack set id as AAD.

use std::collections::HashMap;

use tokio::sync::Mutex;
use zeroize::Zeroizing;

use keyless_crypto::{decrypt, encrypt, generate_random_bytes, NONCE_SIZE, PACK_KEY_SIZE};

use crate::{errors::Result, packs::AuthKeyPack, types::PackSetId};

struct SealedEntry {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

pub struct AuthPackCache {
    key: Zeroizing<[u8; PACK_KEY_SIZE]>,
    entries: Mutex<HashMap<PackSetId, SealedEntry>>,
}

impl AuthPackCache {
    /// Empty cache with a fresh session key.
    pub fn new() -> Result<Self> {
        Ok(Self {
            key: Zeroizing::new(generate_random_bytes()?),
            entries: Mutex::new(HashMap::new()),
        })
    }

    pub async fn insert(&self, pack: &AuthKeyPack) -> Result<()> {
        let plaintext = Zeroizing::new(serde_json::to_vec(pack)?);
        let nonce: [u8; NONCE_SIZE] = generate_random_bytes()?;
        let ciphertext = encrypt(
            &self.key,
            &plaintext,
            &nonce,
            pack.pack_set_id.as_str().as_bytes(),
        )?;
        self.entries
            .lock()
            .await
            .insert(pack.pack_set_id.clone(), SealedEntry { nonce, ciphertext });
        Ok(())
    }

    pub async fn get(&self, pack_set_id: &PackSetId) -> Result<Option<AuthKeyPack>> {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(pack_set_id) else {
            return Ok(None);
        };
        let plaintext = decrypt(
            &self.key,
            &entry.ciphertext,
            &entry.nonce,
            pack_set_id.as_str().as_bytes(),
        )?;
        Ok(Some(serde_json::from_slice(&plaintext)?))
    }

    pub async fn remove(&self, pack_set_id: &PackSetId) {
        self.entries.lock().await.remove(pack_set_id);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CloudKeyProvider;

    fn auth_pack(encrypted: &str) -> AuthKeyPack {
        AuthKeyPack {
            pack_set_id: PackSetId::generate(),
            cloud_key_provider: CloudKeyProvider::GoogleDrive,
            auth_key_pwd_hash: "hash".into(),
            encrypted: encrypted.into(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = AuthPackCache::new().unwrap();
        let pack = auth_pack("sealed-auth-pack");

        assert_eq!(cache.get(&pack.pack_set_id).await.unwrap(), None);
        cache.insert(&pack).await.unwrap();
        assert_eq!(cache.get(&pack.pack_set_id).await.unwrap(), Some(pack.clone()));

        cache.remove(&pack.pack_set_id).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_entries_are_not_stored_in_clear() {
        let cache = AuthPackCache::new().unwrap();
        let pack = auth_pack("sealed-auth-pack");
        cache.insert(&pack).await.unwrap();

        let entries = cache.entries.lock().await;
        let entry = &entries[&pack.pack_set_id];
        let needle = pack.encrypted.as_bytes();
        assert!(!entry
            .ciphertext
            .windows(needle.len())
            .any(|window| window == needle));
    }

    #[tokio::test]
    async fn test_entry_bound_to_pack_set_id() {
        let cache = AuthPackCache::new().unwrap();
        let a = auth_pack("a");
        let b = auth_pack("b");
        cache.insert(&a).await.unwrap();
        cache.insert(&b).await.unwrap();

        // Swap the sealed entries between ids
        {
            let mut entries = cache.entries.lock().await;
            let entry_a = entries.remove(&a.pack_set_id).unwrap();
            entries.insert(b.pack_set_id.clone(), entry_a);
        }
        assert!(cache.get(&b.pack_set_id).await.is_err());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = AuthPackCache::new().unwrap();
        cache.insert(&auth_pack("a")).await.unwrap();
        cache.insert(&auth_pack("b")).await.unwrap();
        assert_eq!(cache.len().await, 2);
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
