//! Pack password derivation using HKDF-SHA256.
//!
//! Every pack is sealed under a password derived from a random 32-byte
//! password slice. The slice for one pack travels inside (or beside) another
//! pack, which is what lets any two packs open each other.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{
    codec::{base64_decode, base64_encode},
    constants::{DOMAIN_PACK_PASSWORD, PACK_PASSWORD_SIZE, PWD_SLICE_SIZE},
    errors::{CryptoError, Result},
    key_kind::KeyKind,
    utils::generate_random_bytes,
};

/// Derive a key using HKDF-SHA256
pub fn hkdf_derive(ikm: &[u8], salt: Option<&[u8]>, info: &[u8], output_len: usize) -> Result<Vec<u8>> {
    let hkdf = Hkdf::<Sha256>::new(salt, ikm);
    let mut output = vec![0u8; output_len];
    hkdf.expand(info, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(output)
}

/// Generate a fresh base64 password slice.
pub fn generate_pwd_slice() -> Result<String> {
    let slice: Zeroizing<[u8; PWD_SLICE_SIZE]> = Zeroizing::new(generate_random_bytes()?);
    Ok(base64_encode(&slice[..]))
}

/// Derive the base64 pack password for `kind` from a base64 password slice.
///
/// The HKDF salt is `extra_salt || kind salt`; `extra_salt` binds the cloud
/// password to the account that owns the cloud backup.
pub fn derive_key_pwd(pwd_slice: &str, kind: KeyKind, extra_salt: Option<&str>) -> Result<Zeroizing<String>> {
    let slice = Zeroizing::new(base64_decode(pwd_slice)?);
    if slice.len() != PWD_SLICE_SIZE {
        return Err(CryptoError::InvalidInput(format!(
            "Password slice must be {} bytes, got {}",
            PWD_SLICE_SIZE,
            slice.len()
        )));
    }

    let salt = format!("{}{}", extra_salt.unwrap_or_default(), kind.pwd_salt());
    let derived = Zeroizing::new(hkdf_derive(
        &slice,
        Some(salt.as_bytes()),
        DOMAIN_PACK_PASSWORD.as_bytes(),
        PACK_PASSWORD_SIZE,
    )?);
    Ok(Zeroizing::new(base64_encode(&derived)))
}

/// Device pack password.
pub fn derive_device_key_pwd(pwd_slice: &str) -> Result<Zeroizing<String>> {
    derive_key_pwd(pwd_slice, KeyKind::Device, None)
}

/// Cloud pack password, salted with the OneKey ID user id.
pub fn derive_cloud_key_pwd(pwd_slice: &str, onekey_id_user_id: &str) -> Result<Zeroizing<String>> {
    derive_key_pwd(pwd_slice, KeyKind::Cloud, Some(onekey_id_user_id))
}

/// Auth pack password.
pub fn derive_auth_key_pwd(pwd_slice: &str) -> Result<Zeroizing<String>> {
    derive_key_pwd(pwd_slice, KeyKind::Auth, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hkdf_derive_is_deterministic() {
        let a = hkdf_derive(b"ikm", Some(b"salt"), b"info", 32).unwrap();
        let b = hkdf_derive(b"ikm", Some(b"salt"), b"info", 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_derive_key_pwd_is_deterministic() {
        let slice = generate_pwd_slice().unwrap();
        let a = derive_device_key_pwd(&slice).unwrap();
        let b = derive_device_key_pwd(&slice).unwrap();
        assert_eq!(*a, *b);
        assert_eq!(base64_decode(&a).unwrap().len(), PACK_PASSWORD_SIZE);
    }

    #[test]
    fn test_kinds_derive_different_passwords() {
        let slice = generate_pwd_slice().unwrap();
        let device = derive_device_key_pwd(&slice).unwrap();
        let auth = derive_auth_key_pwd(&slice).unwrap();
        let cloud = derive_cloud_key_pwd(&slice, "").unwrap();
        assert_ne!(*device, *auth);
        assert_ne!(*device, *cloud);
        assert_ne!(*auth, *cloud);
    }

    #[test]
    fn test_cloud_password_depends_on_user_id() {
        let slice = generate_pwd_slice().unwrap();
        let a = derive_cloud_key_pwd(&slice, "user-1").unwrap();
        let b = derive_cloud_key_pwd(&slice, "user-2").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_rejects_bad_slices() {
        assert!(matches!(
            derive_device_key_pwd("not base64!"),
            Err(CryptoError::Decode(_))
        ));
        let short = base64_encode(&[1u8; 8]);
        assert!(matches!(
            derive_device_key_pwd(&short),
            Err(CryptoError::InvalidInput(_))
        ));
    }
}
