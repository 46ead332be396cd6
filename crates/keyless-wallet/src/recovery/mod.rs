//! Restoring a keyless wallet from any two of its three packs.
//!
//! Each pair follows its own password chain:
//!
//! - device + auth: the device pack carries the auth password; the auth
//!   payload carries the device slice.
//! - device + cloud: the device pack carries the cloud password; the cloud
//!   payload carries the device slice.
//! - auth + cloud: the cloud pack carries the auth slice; the auth payload
//!   carries the cloud slice (salted with the OneKey ID user id).
//!
//! After both shares are opened the mnemonic is interpolated, the third share
//! is regenerated, and the full pack set is rebuilt under the original
//! `pack_set_id`.

pub mod missing;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use keyless_crypto::{
    derive_auth_key_pwd, derive_cloud_key_pwd, derive_device_key_pwd, reconstruct_mnemonic,
    validate_mnemonic, CryptoError, KeyKind, ShamirShare, KEYLESS_THRESHOLD,
};

use crate::{
    config::EngineConfig,
    encryptor::PackEncryptor,
    errors::{KeylessError, Result},
    generation::generate_keyless_wallet_packs,
    packs::{
        AuthKeyPack, AuthKeyPackData, CloudKeyPack, CloudKeyPackData, DeviceKeyPack,
        DeviceKeyPackData, KeylessWalletRestoredData, Pack,
    },
    types::{KeylessMnemonicInfo, PackSetId, RestoredMnemonic, Share, ShareKeys, UserInfo, XCoordination},
};

pub use missing::{recover_missing_share, MissingShareRequest};
pub use state::{FailureReason, RecoveryFlow, RecoveryState};

/// Any subset of a wallet's three packs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_key_pack: Option<DeviceKeyPack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_key_pack: Option<CloudKeyPack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key_pack: Option<AuthKeyPack>,
}

impl RestoreRequest {
    /// Number of packs supplied.
    pub fn len(&self) -> usize {
        usize::from(self.device_key_pack.is_some())
            + usize::from(self.cloud_key_pack.is_some())
            + usize::from(self.auth_key_pack.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The common pack set id of the supplied packs.
    pub fn pack_set_id(&self) -> Result<PackSetId> {
        let ids = [
            self.device_key_pack.as_ref().map(|p| &p.pack_set_id),
            self.cloud_key_pack.as_ref().map(|p| &p.pack_set_id),
            self.auth_key_pack.as_ref().map(|p| &p.pack_set_id),
        ];
        common_pack_set_id(ids.into_iter().flatten())
    }
}

/// Mnemonic and shares recovered from single-share packs.
#[derive(Clone)]
pub struct RestoredFromPacks {
    pub mnemonic: Zeroizing<String>,
    pub shares: Vec<Share>,
}

impl fmt::Debug for RestoredFromPacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoredFromPacks")
            .field("shares", &self.shares)
            .finish_non_exhaustive()
    }
}

/// Two opened packs, with everything needed to rebuild the third.
struct Unlocked {
    known: [(KeyKind, String); 2],
    user_info: UserInfo,
    x_coordination: XCoordination,
    device_key_pwd_slice: String,
    cloud_key_pwd_slice: String,
    auth_key_pwd_slice: String,
    device_data: Option<DeviceKeyPackData>,
    cloud_data: Option<CloudKeyPackData>,
    auth_data: Option<AuthKeyPackData>,
}

impl Unlocked {
    fn missing(&self) -> KeyKind {
        KeyKind::ALL
            .into_iter()
            .find(|kind| self.known.iter().all(|(known, _)| known != kind))
            .unwrap_or(KeyKind::Cloud)
    }

    fn pwd_slice(&self, kind: KeyKind) -> &str {
        match kind {
            KeyKind::Device => &self.device_key_pwd_slice,
            KeyKind::Cloud => &self.cloud_key_pwd_slice,
            KeyKind::Auth => &self.auth_key_pwd_slice,
        }
    }
}

/// Decrypts packs, interpolates the mnemonic and rebuilds lost shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryEngine {
    encryptor: PackEncryptor,
}

impl RecoveryEngine {
    pub fn new(encryptor: PackEncryptor) -> Self {
        Self { encryptor }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(PackEncryptor::new(config.kdf))
    }

    pub fn encryptor(&self) -> &PackEncryptor {
        &self.encryptor
    }

    /// Restore a wallet from any two (or all three) of its packs.
    ///
    /// Pairs are tried in the order device+auth, device+cloud, auth+cloud.
    /// When all three packs are supplied the third is opened with the rebuilt
    /// password and must hold exactly the regenerated share.
    pub fn restore_keyless_wallet(&self, request: &RestoreRequest) -> Result<KeylessWalletRestoredData> {
        let mut flow = RecoveryFlow::new();
        if request.is_empty() {
            return Err(flow.fail(KeylessError::NoPacksProvided));
        }
        let pack_set_id = request.pack_set_id().map_err(|e| flow.fail(e))?;
        flow.advance(RecoveryState::PacksCollected)?;
        debug!(pack_set_id = %pack_set_id, packs = request.len(), "Restoring keyless wallet");

        let (unlocked, extra) = match (
            &request.device_key_pack,
            &request.cloud_key_pack,
            &request.auth_key_pack,
        ) {
            (Some(device), cloud, Some(auth)) => {
                flow.advance(RecoveryState::Decrypting)?;
                let unlocked = self
                    .unlock_device_and_auth(&pack_set_id, device, auth)
                    .map_err(|e| flow.fail(e))?;
                (unlocked, cloud.as_ref().map(ExtraPack::Cloud))
            }
            (Some(device), Some(cloud), None) => {
                flow.advance(RecoveryState::Decrypting)?;
                let unlocked = self
                    .unlock_device_and_cloud(&pack_set_id, device, cloud)
                    .map_err(|e| flow.fail(e))?;
                (unlocked, None)
            }
            (None, Some(cloud), Some(auth)) => {
                flow.advance(RecoveryState::Decrypting)?;
                let unlocked = self
                    .unlock_auth_and_cloud(&pack_set_id, auth, cloud)
                    .map_err(|e| flow.fail(e))?;
                (unlocked, None)
            }
            _ => {
                return Err(flow.fail(KeylessError::InsufficientShares {
                    required: KEYLESS_THRESHOLD,
                    provided: request.len(),
                }))
            }
        };

        let restored = self.rebuild(&pack_set_id, unlocked, extra, &mut flow)?;
        info!(pack_set_id = %pack_set_id, "Keyless wallet restored");
        Ok(restored)
    }

    /// Restore a mnemonic from single-share packs and their passwords.
    pub fn restore_from_packs(&self, packs: &[(&Pack, &str)]) -> Result<RestoredFromPacks> {
        let mut flow = RecoveryFlow::new();
        if packs.is_empty() {
            return Err(flow.fail(KeylessError::NoPacksProvided));
        }
        common_pack_set_id(packs.iter().map(|(pack, _)| &pack.pack_set_id)).map_err(|e| flow.fail(e))?;
        flow.advance(RecoveryState::PacksCollected)?;
        if packs.len() < KEYLESS_THRESHOLD {
            return Err(flow.fail(KeylessError::InsufficientShares {
                required: KEYLESS_THRESHOLD,
                provided: packs.len(),
            }));
        }

        flow.advance(RecoveryState::Decrypting)?;
        let mut shares = Vec::with_capacity(packs.len());
        for (pack, password) in packs {
            let share = self.encryptor.decrypt_pack(pack, password).map_err(|e| {
                flow.fail(match e {
                    KeylessError::Crypto(CryptoError::AuthenticationError | CryptoError::Decode(_)) => {
                        KeylessError::AuthenticationFailed { kind: pack.kind }
                    }
                    other => other,
                })
            })?;
            shares.push(share);
        }

        let raw = shares
            .iter()
            .map(|share| ShamirShare::from_base64(&share.value))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| flow.fail(e.into()))?;
        let mnemonic = reconstruct_mnemonic(&raw, KEYLESS_THRESHOLD).map_err(|e| flow.fail(e.into()))?;
        flow.advance(RecoveryState::Reconstructed)?;

        validate_mnemonic(&mnemonic).map_err(|e| flow.fail(e.into()))?;
        flow.advance(RecoveryState::Verified)?;
        flow.advance(RecoveryState::Done)?;

        Ok(RestoredFromPacks { mnemonic, shares })
    }

    fn unlock_device_and_auth(
        &self,
        pack_set_id: &PackSetId,
        device: &DeviceKeyPack,
        auth: &AuthKeyPack,
    ) -> Result<Unlocked> {
        let auth_data: AuthKeyPackData = self.encryptor.open_verified(
            KeyKind::Auth,
            pack_set_id,
            &device.auth_key_pwd,
            &auth.auth_key_pwd_hash,
            &auth.encrypted,
        )?;

        let device_pwd = derive_device_key_pwd(&auth_data.device_key_pwd_slice)
            .map_err(|_| KeylessError::AuthenticationFailed { kind: KeyKind::Device })?;
        let device_data: DeviceKeyPackData = self.encryptor.open_verified(
            KeyKind::Device,
            pack_set_id,
            &device_pwd,
            &device.device_key_pwd_hash,
            &device.encrypted,
        )?;

        Ok(Unlocked {
            known: [
                (KeyKind::Device, device_data.device_key.clone()),
                (KeyKind::Auth, auth_data.auth_key.clone()),
            ],
            user_info: auth_data.user_info.clone(),
            x_coordination: auth_data.x_coordination,
            device_key_pwd_slice: auth_data.device_key_pwd_slice.clone(),
            cloud_key_pwd_slice: auth_data.cloud_key_pwd_slice.clone(),
            auth_key_pwd_slice: device.auth_key_pwd_slice.clone(),
            device_data: Some(device_data),
            cloud_data: None,
            auth_data: Some(auth_data),
        })
    }

    fn unlock_device_and_cloud(
        &self,
        pack_set_id: &PackSetId,
        device: &DeviceKeyPack,
        cloud: &CloudKeyPack,
    ) -> Result<Unlocked> {
        let cloud_data: CloudKeyPackData = self.encryptor.open_verified(
            KeyKind::Cloud,
            pack_set_id,
            &device.cloud_key_pwd,
            &cloud.cloud_key_pwd_hash,
            &cloud.encrypted,
        )?;

        let device_pwd = derive_device_key_pwd(&cloud_data.device_key_pwd_slice)
            .map_err(|_| KeylessError::AuthenticationFailed { kind: KeyKind::Device })?;
        let device_data: DeviceKeyPackData = self.encryptor.open_verified(
            KeyKind::Device,
            pack_set_id,
            &device_pwd,
            &device.device_key_pwd_hash,
            &device.encrypted,
        )?;

        Ok(Unlocked {
            known: [
                (KeyKind::Device, device_data.device_key.clone()),
                (KeyKind::Cloud, cloud_data.cloud_key.clone()),
            ],
            user_info: cloud_data.user_info.clone(),
            x_coordination: cloud_data.x_coordination,
            device_key_pwd_slice: cloud_data.device_key_pwd_slice.clone(),
            cloud_key_pwd_slice: device.cloud_key_pwd_slice.clone(),
            auth_key_pwd_slice: device.auth_key_pwd_slice.clone(),
            device_data: Some(device_data),
            cloud_data: Some(cloud_data),
            auth_data: None,
        })
    }

    fn unlock_auth_and_cloud(
        &self,
        pack_set_id: &PackSetId,
        auth: &AuthKeyPack,
        cloud: &CloudKeyPack,
    ) -> Result<Unlocked> {
        let auth_pwd = derive_auth_key_pwd(&cloud.auth_key_pwd_slice)
            .map_err(|_| KeylessError::AuthenticationFailed { kind: KeyKind::Auth })?;
        let auth_data: AuthKeyPackData = self.encryptor.open_verified(
            KeyKind::Auth,
            pack_set_id,
            &auth_pwd,
            &auth.auth_key_pwd_hash,
            &auth.encrypted,
        )?;

        let cloud_pwd = derive_cloud_key_pwd(
            &auth_data.cloud_key_pwd_slice,
            &auth_data.user_info.onekey_id_user_id,
        )
        .map_err(|_| KeylessError::AuthenticationFailed { kind: KeyKind::Cloud })?;
        let cloud_data: CloudKeyPackData = self.encryptor.open_verified(
            KeyKind::Cloud,
            pack_set_id,
            &cloud_pwd,
            &cloud.cloud_key_pwd_hash,
            &cloud.encrypted,
        )?;

        Ok(Unlocked {
            known: [
                (KeyKind::Auth, auth_data.auth_key.clone()),
                (KeyKind::Cloud, cloud_data.cloud_key.clone()),
            ],
            user_info: auth_data.user_info.clone(),
            x_coordination: auth_data.x_coordination,
            device_key_pwd_slice: auth_data.device_key_pwd_slice.clone(),
            cloud_key_pwd_slice: auth_data.cloud_key_pwd_slice.clone(),
            auth_key_pwd_slice: cloud.auth_key_pwd_slice.clone(),
            device_data: None,
            cloud_data: Some(cloud_data),
            auth_data: Some(auth_data),
        })
    }

    fn rebuild(
        &self,
        pack_set_id: &PackSetId,
        unlocked: Unlocked,
        extra: Option<ExtraPack<'_>>,
        flow: &mut RecoveryFlow,
    ) -> Result<KeylessWalletRestoredData> {
        let [(first_kind, first), (second_kind, second)] = &unlocked.known;

        let raw = [first, second]
            .into_iter()
            .map(|value| ShamirShare::from_base64(value))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| flow.fail(e.into()))?;
        let mnemonic = reconstruct_mnemonic(&raw, KEYLESS_THRESHOLD).map_err(|e| flow.fail(e.into()))?;
        flow.advance(RecoveryState::Reconstructed)?;

        verify_unlocked(&unlocked, &raw).map_err(|e| flow.fail(e))?;
        flow.advance(RecoveryState::Verified)?;

        let missing = unlocked.missing();
        flow.advance(RecoveryState::RegeneratingMissingShare)?;
        debug!(pack_set_id = %pack_set_id, kind = %missing, "Regenerating missing share");

        let regenerated = missing::regenerate_share(
            &mnemonic,
            first,
            missing,
            &unlocked.x_coordination,
            unlocked.pwd_slice(missing),
        )
        .map_err(|e| flow.fail(e))?;

        let value_of = |kind: KeyKind| -> String {
            if kind == *first_kind {
                first.clone()
            } else if kind == *second_kind {
                second.clone()
            } else {
                regenerated.value.clone()
            }
        };

        let mnemonic_info = KeylessMnemonicInfo {
            mnemonic: mnemonic.to_string(),
            device_key: value_of(KeyKind::Device),
            cloud_key: value_of(KeyKind::Cloud),
            auth_key: value_of(KeyKind::Auth),
            device_key_x: unlocked.x_coordination.device_key_x,
            cloud_key_x: unlocked.x_coordination.cloud_key_x,
            auth_key_x: unlocked.x_coordination.auth_key_x,
            device_key_pwd_slice: unlocked.device_key_pwd_slice.clone(),
            cloud_key_pwd_slice: unlocked.cloud_key_pwd_slice.clone(),
            auth_key_pwd_slice: unlocked.auth_key_pwd_slice.clone(),
        };

        let packs = generate_keyless_wallet_packs(
            &self.encryptor,
            &unlocked.user_info,
            &mnemonic_info,
            pack_set_id,
        )
        .map_err(|e| flow.fail(e))?;

        if let Some(extra) = extra {
            self.check_extra_pack(pack_set_id, extra, &packs.device_key_pack, &regenerated)
                .map_err(|e| flow.fail(e))?;
        }

        let Unlocked {
            user_info,
            x_coordination,
            device_key_pwd_slice,
            cloud_key_pwd_slice,
            device_data,
            cloud_data,
            auth_data,
            ..
        } = unlocked;

        let device_key_pack_data = device_data.unwrap_or_else(|| DeviceKeyPackData {
            device_key: mnemonic_info.device_key.clone(),
            user_info: user_info.clone(),
            x_coordination,
        });
        let cloud_key_pack_data = cloud_data.unwrap_or_else(|| CloudKeyPackData {
            cloud_key: mnemonic_info.cloud_key.clone(),
            device_key_pwd_slice: device_key_pwd_slice.clone(),
            user_info: user_info.clone(),
            x_coordination,
        });
        let auth_key_pack_data = auth_data.unwrap_or_else(|| AuthKeyPackData {
            auth_key: mnemonic_info.auth_key.clone(),
            cloud_key_pwd_slice,
            device_key_pwd_slice,
            user_info,
            x_coordination,
        });

        flow.advance(RecoveryState::Done)?;

        Ok(KeylessWalletRestoredData {
            packs,
            device_key_pack_data,
            cloud_key_pack_data,
            auth_key_pack_data,
        })
    }

    fn check_extra_pack(
        &self,
        pack_set_id: &PackSetId,
        extra: ExtraPack<'_>,
        rebuilt_device: &DeviceKeyPack,
        regenerated: &Share,
    ) -> Result<()> {
        let stored_value = match extra {
            ExtraPack::Cloud(cloud) => {
                let data: CloudKeyPackData = self.encryptor.open_verified(
                    KeyKind::Cloud,
                    pack_set_id,
                    &rebuilt_device.cloud_key_pwd,
                    &cloud.cloud_key_pwd_hash,
                    &cloud.encrypted,
                )?;
                data.cloud_key
            }
        };

        if stored_value != regenerated.value {
            warn!(pack_set_id = %pack_set_id, kind = %regenerated.kind, "Supplied pack disagrees with the other two");
            return Err(CryptoError::CorruptShare(format!(
                "{} share is inconsistent with the other shares",
                regenerated.kind
            ))
            .into());
        }
        Ok(())
    }
}

/// The pack left over when all three are supplied.
enum ExtraPack<'a> {
    Cloud(&'a CloudKeyPack),
}

/// Restore a mnemonic directly from raw base64 shares.
///
/// Any two shares suffice; with all three, the third must agree with the
/// polynomial through the first two.
pub fn restore_mnemonic_from_share_key(keys: &ShareKeys) -> Result<RestoredMnemonic> {
    let shares: Vec<String> = [&keys.device_key, &keys.cloud_key, &keys.auth_key]
        .into_iter()
        .flatten()
        .filter(|share| !share.trim().is_empty())
        .cloned()
        .collect();
    if shares.len() < KEYLESS_THRESHOLD {
        return Err(KeylessError::InsufficientShares {
            required: KEYLESS_THRESHOLD,
            provided: shares.len(),
        });
    }

    let raw = shares
        .iter()
        .map(|share| ShamirShare::from_base64(share))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mnemonic = reconstruct_mnemonic(&raw, KEYLESS_THRESHOLD)?;
    Ok(RestoredMnemonic { mnemonic, shares })
}

fn common_pack_set_id<'a, I>(ids: I) -> Result<PackSetId>
where
    I: IntoIterator<Item = &'a PackSetId>,
{
    let mut ids = ids.into_iter();
    let first = ids.next().ok_or(KeylessError::NoPacksProvided)?;
    for other in ids {
        if other != first {
            return Err(KeylessError::PackSetMismatch {
                expected: first.to_string(),
                actual: other.to_string(),
            });
        }
    }
    Ok(first.clone())
}

/// Checks the opened payloads agree with each other and with the shares.
fn verify_unlocked(unlocked: &Unlocked, raw: &[ShamirShare]) -> Result<()> {
    for ((kind, _), share) in unlocked.known.iter().zip(raw) {
        if unlocked.x_coordination.get(*kind) != share.x {
            return Err(CryptoError::CorruptShare(format!(
                "{} share does not sit at its recorded x-coordinate",
                kind
            ))
            .into());
        }
    }

    let payload_views = [
        unlocked.device_data.as_ref().map(|d| (&d.user_info, d.x_coordination)),
        unlocked.cloud_data.as_ref().map(|d| (&d.user_info, d.x_coordination)),
        unlocked.auth_data.as_ref().map(|d| (&d.user_info, d.x_coordination)),
    ];
    for (user_info, x_coordination) in payload_views.into_iter().flatten() {
        if user_info != &unlocked.user_info || x_coordination != unlocked.x_coordination {
            return Err(CryptoError::CorruptShare(
                "Pack payloads describe different wallets".to_string(),
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_keyless_mnemonic;
    use keyless_crypto::KdfParams;

    fn engine() -> RecoveryEngine {
        RecoveryEngine::new(PackEncryptor::new(KdfParams::for_tests()))
    }

    #[test]
    fn test_restore_mnemonic_from_each_share_pair() {
        let info = generate_keyless_mnemonic().unwrap();
        let pairs = [
            ShareKeys { device_key: Some(info.device_key.clone()), cloud_key: Some(info.cloud_key.clone()), auth_key: None },
            ShareKeys { device_key: Some(info.device_key.clone()), cloud_key: None, auth_key: Some(info.auth_key.clone()) },
            ShareKeys { device_key: None, cloud_key: Some(info.cloud_key.clone()), auth_key: Some(info.auth_key.clone()) },
        ];
        for keys in pairs {
            let restored = restore_mnemonic_from_share_key(&keys).unwrap();
            assert_eq!(restored.mnemonic.as_str(), info.mnemonic);
            assert_eq!(restored.shares.len(), 2);
        }
    }

    #[test]
    fn test_restore_mnemonic_from_single_share_fails() {
        let info = generate_keyless_mnemonic().unwrap();
        let keys = ShareKeys {
            auth_key: Some(info.auth_key.clone()),
            ..ShareKeys::default()
        };
        assert!(matches!(
            restore_mnemonic_from_share_key(&keys),
            Err(KeylessError::InsufficientShares { required: 2, provided: 1 })
        ));
    }

    #[test]
    fn test_restore_mnemonic_detects_foreign_third_share() {
        let a = generate_keyless_mnemonic().unwrap();
        let b = generate_keyless_mnemonic().unwrap();
        let mut foreign = ShamirShare::from_base64(&b.auth_key).unwrap();
        // Keep the x-coordinate distinct so the mismatch is in the y-values
        foreign.x = a.auth_key_x;
        let keys = ShareKeys {
            device_key: Some(a.device_key.clone()),
            cloud_key: Some(a.cloud_key.clone()),
            auth_key: Some(foreign.to_base64()),
        };
        assert!(matches!(
            restore_mnemonic_from_share_key(&keys),
            Err(KeylessError::Crypto(CryptoError::CorruptShare(_)))
        ));
    }

    #[test]
    fn test_restore_from_single_share_packs() {
        let info = generate_keyless_mnemonic().unwrap();
        let id = PackSetId::generate();
        let device = engine().encryptor().encrypt_share(&info.share(KeyKind::Device), &id, "pw-d").unwrap();
        let cloud = engine().encryptor().encrypt_share(&info.share(KeyKind::Cloud), &id, "pw-c").unwrap();

        let restored = engine()
            .restore_from_packs(&[(&device, "pw-d"), (&cloud, "pw-c")])
            .unwrap();
        assert_eq!(restored.mnemonic.as_str(), info.mnemonic);
        assert_eq!(restored.shares[0], info.share(KeyKind::Device));
    }

    #[test]
    fn test_restore_from_packs_reports_failing_pack() {
        let info = generate_keyless_mnemonic().unwrap();
        let id = PackSetId::generate();
        let device = engine().encryptor().encrypt_share(&info.share(KeyKind::Device), &id, "pw-d").unwrap();
        let auth = engine().encryptor().encrypt_share(&info.share(KeyKind::Auth), &id, "pw-a").unwrap();

        assert!(matches!(
            engine().restore_from_packs(&[(&device, "pw-d"), (&auth, "wrong")]),
            Err(KeylessError::AuthenticationFailed { kind: KeyKind::Auth })
        ));
    }

    #[test]
    fn test_restore_from_packs_needs_two() {
        let info = generate_keyless_mnemonic().unwrap();
        let id = PackSetId::generate();
        let auth = engine().encryptor().encrypt_share(&info.share(KeyKind::Auth), &id, "pw").unwrap();
        assert!(matches!(
            engine().restore_from_packs(&[(&auth, "pw")]),
            Err(KeylessError::InsufficientShares { required: 2, provided: 1 })
        ));
        assert!(matches!(engine().restore_from_packs(&[]), Err(KeylessError::NoPacksProvided)));
    }

    #[test]
    fn test_restore_from_packs_rejects_mixed_sets() {
        let info = generate_keyless_mnemonic().unwrap();
        let device = engine()
            .encryptor()
            .encrypt_share(&info.share(KeyKind::Device), &PackSetId::generate(), "pw")
            .unwrap();
        let auth = engine()
            .encryptor()
            .encrypt_share(&info.share(KeyKind::Auth), &PackSetId::generate(), "pw")
            .unwrap();
        assert!(matches!(
            engine().restore_from_packs(&[(&device, "pw"), (&auth, "pw")]),
            Err(KeylessError::PackSetMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_request_rejected() {
        assert!(matches!(
            engine().restore_keyless_wallet(&RestoreRequest::default()),
            Err(KeylessError::NoPacksProvided)
        ));
    }
}
