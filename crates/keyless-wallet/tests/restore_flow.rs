use std::sync::Arc;

use keyless_crypto::derive_cloud_key_pwd;
use keyless_wallet::{
    generate_keyless_wallet_packs, is_packs_equal, keyless_mnemonic_from_phrase,
    Backend, CloudKeyPackData, EngineConfig, FilePackStore, KdfParams, KeyKind, KeylessError,
    KeylessWalletService, PackSetId, RestoreRequest, StoreBackedAuthServer,
};

mod common;
use common::{encryptor, engine, user_info, ABANDON_MNEMONIC};

#[test]
fn test_restore_abandon_mnemonic_from_device_and_cloud() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Split the test vector and seal its packs
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC)?;
    let pack_set_id = PackSetId::generate();
    let packs = generate_keyless_wallet_packs(&encryptor(), &user_info(), &info, &pack_set_id)?;

    // 2. Restore with the auth pack missing
    let restored = engine().restore_keyless_wallet(&RestoreRequest {
        device_key_pack: Some(packs.device_key_pack.clone()),
        cloud_key_pack: Some(packs.cloud_key_pack.clone()),
        auth_key_pack: None,
    })?;

    // 3. Same mnemonic, same pack set apart from the sealed bytes
    assert_eq!(*restored.packs.mnemonic_info.mnemonic(), ABANDON_MNEMONIC);
    assert!(is_packs_equal(&restored.packs, &packs));
    assert_ne!(
        restored.packs.auth_key_pack.encrypted,
        packs.auth_key_pack.encrypted
    );

    // 4. Decrypted payloads carry the original shares
    assert_eq!(restored.device_key_pack_data.device_key, info.device_key);
    assert_eq!(restored.cloud_key_pack_data.cloud_key, info.cloud_key);
    assert_eq!(restored.auth_key_pack_data.auth_key, info.auth_key);
    assert_eq!(restored.auth_key_pack_data.user_info, user_info());
    Ok(())
}

#[test]
fn test_every_pair_restores() {
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap();
    let packs =
        generate_keyless_wallet_packs(&encryptor(), &user_info(), &info, &PackSetId::generate())
            .unwrap();

    let pairs = [
        RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            auth_key_pack: Some(packs.auth_key_pack.clone()),
            ..Default::default()
        },
        RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            cloud_key_pack: Some(packs.cloud_key_pack.clone()),
            ..Default::default()
        },
        RestoreRequest {
            cloud_key_pack: Some(packs.cloud_key_pack.clone()),
            auth_key_pack: Some(packs.auth_key_pack.clone()),
            ..Default::default()
        },
    ];

    for request in &pairs {
        let restored = engine().restore_keyless_wallet(request).unwrap();
        assert_eq!(*restored.packs.mnemonic_info.mnemonic(), ABANDON_MNEMONIC);
        assert!(is_packs_equal(&restored.packs, &packs));
    }
}

#[test]
fn test_all_three_packs_restore() {
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap();
    let packs =
        generate_keyless_wallet_packs(&encryptor(), &user_info(), &info, &PackSetId::generate())
            .unwrap();

    let restored = engine()
        .restore_keyless_wallet(&RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            cloud_key_pack: Some(packs.cloud_key_pack.clone()),
            auth_key_pack: Some(packs.auth_key_pack.clone()),
        })
        .unwrap();
    assert!(is_packs_equal(&restored.packs, &packs));
}

#[test]
fn test_single_pack_is_insufficient() {
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap();
    let packs =
        generate_keyless_wallet_packs(&encryptor(), &user_info(), &info, &PackSetId::generate())
            .unwrap();

    let err = engine()
        .restore_keyless_wallet(&RestoreRequest {
            auth_key_pack: Some(packs.auth_key_pack.clone()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        KeylessError::InsufficientShares {
            required: 2,
            provided: 1
        }
    ));

    assert!(matches!(
        engine().restore_keyless_wallet(&RestoreRequest::default()),
        Err(KeylessError::NoPacksProvided)
    ));
}

#[test]
fn test_mixed_pack_sets_rejected() {
    let user = user_info();
    let a = generate_keyless_wallet_packs(
        &encryptor(),
        &user,
        &keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap(),
        &PackSetId::generate(),
    )
    .unwrap();
    let b = keyless_wallet::create_keyless_wallet_packs(&encryptor(), &user).unwrap();

    let err = engine()
        .restore_keyless_wallet(&RestoreRequest {
            device_key_pack: Some(a.device_key_pack.clone()),
            cloud_key_pack: Some(b.cloud_key_pack.clone()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, KeylessError::PackSetMismatch { .. }));
}

#[test]
fn test_swapped_ciphertext_names_failing_pack() {
    let user = user_info();
    let id = PackSetId::generate();
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap();
    let packs = generate_keyless_wallet_packs(&encryptor(), &user, &info, &id).unwrap();
    let other = generate_keyless_wallet_packs(
        &encryptor(),
        &user,
        &keyless_wallet::generate_keyless_mnemonic().unwrap(),
        &id,
    )
    .unwrap();

    // Auth pack metadata intact, sealed bytes from another wallet
    let mut auth = packs.auth_key_pack.clone();
    auth.encrypted = other.auth_key_pack.encrypted.clone();
    let err = engine()
        .restore_keyless_wallet(&RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            auth_key_pack: Some(auth),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        KeylessError::AuthenticationFailed {
            kind: KeyKind::Auth
        }
    ));

    // Cloud pack from another wallet cannot be opened with this wallet's password
    let err = engine()
        .restore_keyless_wallet(&RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            cloud_key_pack: Some(other.cloud_key_pack.clone()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        KeylessError::AuthenticationFailed {
            kind: KeyKind::Cloud
        }
    ));
}

#[test]
fn test_inconsistent_third_pack_is_corrupt() {
    let user = user_info();
    let id = PackSetId::generate();
    let info = keyless_mnemonic_from_phrase(ABANDON_MNEMONIC).unwrap();
    let packs = generate_keyless_wallet_packs(&encryptor(), &user, &info, &id).unwrap();
    let other = keyless_wallet::generate_keyless_mnemonic().unwrap();

    // Correctly sealed cloud pack holding a share of a different mnemonic
    let cloud_pwd = derive_cloud_key_pwd(&info.cloud_key_pwd_slice, &user.onekey_id_user_id).unwrap();
    let data = CloudKeyPackData {
        cloud_key: other.cloud_key.clone(),
        device_key_pwd_slice: info.device_key_pwd_slice.clone(),
        user_info: user.clone(),
        x_coordination: info.x_coordination(),
    };
    let mut cloud = packs.cloud_key_pack.clone();
    cloud.encrypted = encryptor().seal(KeyKind::Cloud, &id, &cloud_pwd, &data).unwrap();

    let err = engine()
        .restore_keyless_wallet(&RestoreRequest {
            device_key_pack: Some(packs.device_key_pack.clone()),
            cloud_key_pack: Some(cloud),
            auth_key_pack: Some(packs.auth_key_pack.clone()),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        KeylessError::Crypto(keyless_crypto::CryptoError::CorruptShare(_))
    ));
}

#[tokio::test]
async fn test_file_backed_service_restores_after_device_loss() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FilePackStore::open(dir.path().join("packs")).await.unwrap());
    let server_store = Arc::new(FilePackStore::open(dir.path().join("server")).await.unwrap());
    let service = KeylessWalletService::new(
        EngineConfig::with_kdf(KdfParams::for_tests()),
        Arc::clone(&store),
        Arc::new(StoreBackedAuthServer::new(Arc::clone(&server_store))),
    )
    .unwrap();

    let packs = service.generate_keyless_wallet_packs(user_info()).await.unwrap();
    let record_id = service.enable_keyless_wallet(&packs).await.unwrap();
    assert!(!record_id.0.is_empty());

    // New device: empty session cache, local device pack gone
    service.clear_auth_pack_cache(None).await;
    let device_path = store.pack_path(Backend::Device, packs.pack_set_id());
    std::fs::remove_file(&device_path).unwrap();

    let restored = service.restore_from_backends(packs.pack_set_id()).await.unwrap();
    assert_eq!(
        *restored.packs.mnemonic_info.mnemonic(),
        *packs.mnemonic_info.mnemonic()
    );
    assert!(is_packs_equal(&restored.packs, &packs));

    // Regenerated device pack goes back to disk; cloud and server files stay as they were
    let cloud_path = store.pack_path(Backend::Cloud, packs.pack_set_id());
    let server_path = server_store.pack_path(Backend::Server, packs.pack_set_id());
    let cloud_before = std::fs::read(&cloud_path).unwrap();
    let server_before = std::fs::read(&server_path).unwrap();

    let written = service.redistribute_missing_packs(&restored).await.unwrap();
    assert_eq!(written, vec![Backend::Device]);
    assert!(device_path.exists());
    assert_eq!(std::fs::read(&cloud_path).unwrap(), cloud_before);
    assert_eq!(std::fs::read(&server_path).unwrap(), server_before);

    // The re-stored device pack restores together with the cloud pack
    service.clear_auth_pack_cache(None).await;
    std::fs::remove_file(&server_path).unwrap();
    let again = service.restore_from_backends(packs.pack_set_id()).await.unwrap();
    assert_eq!(
        *again.packs.mnemonic_info.mnemonic(),
        *packs.mnemonic_info.mnemonic()
    );
}
