//! Keyless wallet creation: mnemonic, shares, password slices and packs.

use keyless_crypto::{
    derive_auth_key_pwd, derive_cloud_key_pwd, derive_device_key_pwd, entropy_to_mnemonic,
    generate_mnemonic, generate_pwd_slice, hash_password, mnemonic_to_entropy,
    share_x_coordinate, split_mnemonic, KeyKind, KEYLESS_THRESHOLD, KEYLESS_TOTAL_SHARES,
};
use tracing::{debug, info};

use crate::{
    encryptor::PackEncryptor,
    errors::{KeylessError, Result},
    packs::{
        AuthKeyPack, AuthKeyPackData, CloudKeyPack, CloudKeyPackData, DeviceKeyPack,
        DeviceKeyPackData, KeylessWalletPacks,
    },
    types::{KeylessMnemonicInfo, PackSetId, UserInfo},
};

/// Generate a fresh 24-word mnemonic and split it for a keyless wallet.
pub fn generate_keyless_mnemonic() -> Result<KeylessMnemonicInfo> {
    let mnemonic = generate_mnemonic()?;
    keyless_mnemonic_from_phrase(&mnemonic)
}

/// Split an existing mnemonic into device, cloud and auth shares with fresh
/// password slices.
pub fn keyless_mnemonic_from_phrase(mnemonic: &str) -> Result<KeylessMnemonicInfo> {
    let canonical = entropy_to_mnemonic(&mnemonic_to_entropy(mnemonic)?)?;
    let shares = split_mnemonic(&canonical, KEYLESS_TOTAL_SHARES, KEYLESS_THRESHOLD)?;
    let [device, cloud, auth] = [&shares[0], &shares[1], &shares[2]];

    Ok(KeylessMnemonicInfo {
        mnemonic: canonical.to_string(),
        device_key: device.to_base64(),
        cloud_key: cloud.to_base64(),
        auth_key: auth.to_base64(),
        device_key_x: device.x,
        cloud_key_x: cloud.x,
        auth_key_x: auth.x,
        device_key_pwd_slice: generate_pwd_slice()?,
        cloud_key_pwd_slice: generate_pwd_slice()?,
        auth_key_pwd_slice: generate_pwd_slice()?,
    })
}

/// Build the three packs for a wallet.
///
/// Deterministic apart from the sealing randomness: the same inputs always
/// give packs equal under [`crate::is_packs_equal`]. Recovery relies on this
/// to rebuild the exact pack set from two packs.
pub fn generate_keyless_wallet_packs(
    encryptor: &PackEncryptor,
    user_info: &UserInfo,
    mnemonic_info: &KeylessMnemonicInfo,
    pack_set_id: &PackSetId,
) -> Result<KeylessWalletPacks> {
    user_info.validate()?;
    validate_mnemonic_info(mnemonic_info)?;

    let x_coordination = mnemonic_info.x_coordination();

    let device_key_pwd = derive_device_key_pwd(&mnemonic_info.device_key_pwd_slice)?;
    let cloud_key_pwd =
        derive_cloud_key_pwd(&mnemonic_info.cloud_key_pwd_slice, &user_info.onekey_id_user_id)?;
    let auth_key_pwd = derive_auth_key_pwd(&mnemonic_info.auth_key_pwd_slice)?;

    let device_key_pwd_hash = hash_password(&device_key_pwd)?;
    let cloud_key_pwd_hash = hash_password(&cloud_key_pwd)?;
    let auth_key_pwd_hash = hash_password(&auth_key_pwd)?;

    let device_data = DeviceKeyPackData {
        device_key: mnemonic_info.device_key.clone(),
        user_info: user_info.clone(),
        x_coordination,
    };
    let device_key_pack = DeviceKeyPack {
        pack_set_id: pack_set_id.clone(),
        cloud_key_provider: user_info.cloud_key_provider,
        auth_key_pwd: auth_key_pwd.to_string(),
        auth_key_pwd_hash: auth_key_pwd_hash.clone(),
        auth_key_pwd_slice: mnemonic_info.auth_key_pwd_slice.clone(),
        cloud_key_pwd: cloud_key_pwd.to_string(),
        cloud_key_pwd_hash: cloud_key_pwd_hash.clone(),
        cloud_key_pwd_slice: mnemonic_info.cloud_key_pwd_slice.clone(),
        device_key_pwd_hash,
        encrypted: encryptor.seal(KeyKind::Device, pack_set_id, &device_key_pwd, &device_data)?,
    };

    let auth_data = AuthKeyPackData {
        auth_key: mnemonic_info.auth_key.clone(),
        cloud_key_pwd_slice: mnemonic_info.cloud_key_pwd_slice.clone(),
        device_key_pwd_slice: mnemonic_info.device_key_pwd_slice.clone(),
        user_info: user_info.clone(),
        x_coordination,
    };
    let auth_key_pack = AuthKeyPack {
        pack_set_id: pack_set_id.clone(),
        cloud_key_provider: user_info.cloud_key_provider,
        auth_key_pwd_hash,
        encrypted: encryptor.seal(KeyKind::Auth, pack_set_id, &auth_key_pwd, &auth_data)?,
    };

    let cloud_data = CloudKeyPackData {
        cloud_key: mnemonic_info.cloud_key.clone(),
        device_key_pwd_slice: mnemonic_info.device_key_pwd_slice.clone(),
        user_info: user_info.clone(),
        x_coordination,
    };
    let cloud_key_pack = CloudKeyPack {
        pack_set_id: pack_set_id.clone(),
        auth_key_pwd_slice: mnemonic_info.auth_key_pwd_slice.clone(),
        cloud_key_pwd_hash,
        encrypted: encryptor.seal(KeyKind::Cloud, pack_set_id, &cloud_key_pwd, &cloud_data)?,
    };

    debug!(pack_set_id = %pack_set_id, "Keyless wallet packs sealed");

    Ok(KeylessWalletPacks {
        mnemonic_info: mnemonic_info.clone(),
        device_key_pack,
        cloud_key_pack,
        auth_key_pack,
    })
}

/// Generate a mnemonic, a pack set id and the three packs in one step.
pub fn create_keyless_wallet_packs(
    encryptor: &PackEncryptor,
    user_info: &UserInfo,
) -> Result<KeylessWalletPacks> {
    let mnemonic_info = generate_keyless_mnemonic()?;
    let pack_set_id = PackSetId::generate();
    let packs = generate_keyless_wallet_packs(encryptor, user_info, &mnemonic_info, &pack_set_id)?;
    info!(pack_set_id = %pack_set_id, "Keyless wallet packs generated");
    Ok(packs)
}

fn validate_mnemonic_info(info: &KeylessMnemonicInfo) -> Result<()> {
    keyless_crypto::validate_mnemonic(&info.mnemonic)?;

    for kind in KeyKind::ALL {
        let share = info.share(kind);
        if share.value.is_empty() || share.pwd_slice.is_empty() {
            return Err(KeylessError::InvalidInput(format!("{} share is incomplete", kind)));
        }
        if share_x_coordinate(&share.value)? != share.x {
            return Err(KeylessError::InvalidInput(format!(
                "{} x-coordinate does not match the share",
                kind
            )));
        }
    }

    let x = info.x_coordination();
    if x.device_key_x == x.cloud_key_x || x.device_key_x == x.auth_key_x || x.cloud_key_x == x.auth_key_x {
        return Err(KeylessError::InvalidInput(
            "Share x-coordinates must be distinct".to_string(),
        ));
    }
    Ok(())
}
