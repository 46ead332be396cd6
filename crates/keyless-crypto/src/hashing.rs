//! Hashing and constant-time comparison.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{
    codec::{base64_decode, base64_encode},
    errors::Result,
};

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash of a base64 pack password, stored alongside packs so a wrong
/// password can be rejected before running the KDF.
///
/// Returns base64(SHA-256(password bytes)).
pub fn hash_password(password_base64: &str) -> Result<String> {
    let bytes = Zeroizing::new(base64_decode(password_base64)?);
    Ok(base64_encode(&sha256(&bytes)))
}

/// Compare two byte strings without an early exit on the first difference.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Check a base64 password against a stored base64 hash in constant time.
pub fn verify_password_hash(password_base64: &str, expected_hash_base64: &str) -> bool {
    match hash_password(password_base64) {
        Ok(actual) => constant_time_compare(actual.as_bytes(), expected_hash_base64.as_bytes()),
        Err(_) => false,
    }
}
