//! Sealing and opening of pack payloads.

use serde::{de::DeserializeOwned, Serialize};
use zeroize::Zeroizing;

use keyless_crypto::{
    base64_decode, base64_encode, open, seal, share_x_coordinate, verify_password_hash,
    CryptoError, KdfParams, KeyKind,
};

use crate::{
    errors::{KeylessError, Result},
    packs::Pack,
    types::{PackSetId, Share},
};

/// Seals JSON payloads into base64 pack blobs bound to a pack set and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackEncryptor {
    kdf: KdfParams,
}

impl Default for PackEncryptor {
    fn default() -> Self {
        Self::new(KdfParams::default())
    }
}

impl PackEncryptor {
    /// Encryptor sealing with the given KDF parameters.
    pub fn new(kdf: KdfParams) -> Self {
        Self { kdf }
    }

    /// KDF parameters used for new packs.
    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    /// Serialize `payload` and seal it under `password`.
    pub fn seal<T: Serialize>(
        &self,
        kind: KeyKind,
        pack_set_id: &PackSetId,
        password: &str,
        payload: &T,
    ) -> Result<String> {
        let plaintext = Zeroizing::new(serde_json::to_vec(payload)?);
        let blob = seal(
            password.as_bytes(),
            &plaintext,
            &context(kind, pack_set_id),
            &self.kdf,
        )?;
        Ok(base64_encode(&blob))
    }

    /// Open a blob produced by [`PackEncryptor::seal`].
    ///
    /// A payload that authenticates but does not parse as `T` is reported as
    /// an authentication failure like any other.
    pub fn open<T: DeserializeOwned>(
        &self,
        kind: KeyKind,
        pack_set_id: &PackSetId,
        password: &str,
        encrypted: &str,
    ) -> Result<T> {
        let blob = base64_decode(encrypted)?;
        let plaintext = open(password.as_bytes(), &blob, &context(kind, pack_set_id))?;
        serde_json::from_slice(&plaintext).map_err(|_| CryptoError::AuthenticationError.into())
    }

    /// Open after checking `password` against the pack's stored hash.
    ///
    /// Every failure names the pack, so callers can tell the user which
    /// backend holds a bad pack. The blob is opened even when the hash does
    /// not match, so a wrong password costs the same key derivation as a
    /// corrupted pack.
    pub fn open_verified<T: DeserializeOwned>(
        &self,
        kind: KeyKind,
        pack_set_id: &PackSetId,
        password: &str,
        expected_hash: &str,
        encrypted: &str,
    ) -> Result<T> {
        let hash_matches = verify_password_hash(password, expected_hash);
        let opened = self.open(kind, pack_set_id, password, encrypted);

        match opened {
            Ok(payload) if hash_matches => Ok(payload),
            Ok(_) | Err(KeylessError::Crypto(CryptoError::AuthenticationError | CryptoError::Decode(_))) => {
                tracing::warn!(pack_set_id = %pack_set_id, kind = %kind, "Pack could not be opened");
                Err(KeylessError::AuthenticationFailed { kind })
            }
            Err(other) => Err(other),
        }
    }

    /// Seal a single labeled share.
    pub fn encrypt_share(&self, share: &Share, pack_set_id: &PackSetId, password: &str) -> Result<Pack> {
        let encrypted = self.seal(share.kind, pack_set_id, password, share)?;
        Ok(Pack {
            pack_set_id: pack_set_id.clone(),
            kind: share.kind,
            encrypted,
        })
    }

    /// Open a single-share pack.
    pub fn decrypt_pack(&self, pack: &Pack, password: &str) -> Result<Share> {
        let share: Share = self.open(pack.kind, &pack.pack_set_id, password, &pack.encrypted)?;
        if share.kind != pack.kind {
            return Err(CryptoError::AuthenticationError.into());
        }
        if share_x_coordinate(&share.value)? != share.x {
            return Err(CryptoError::CorruptShare(format!(
                "{} share x-coordinate does not match its value",
                share.kind
            ))
            .into());
        }
        Ok(share)
    }
}

fn context(kind: KeyKind, pack_set_id: &PackSetId) -> Vec<u8> {
    let mut context = Vec::with_capacity(pack_set_id.as_str().len() + kind.as_str().len());
    context.extend_from_slice(pack_set_id.as_str().as_bytes());
    context.extend_from_slice(kind.as_str().as_bytes());
    context
}
