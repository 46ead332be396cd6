//! Password-based sealing of keyless packs.
//!
//! A sealed pack is a single byte string:
//!
//! ```text
//! version(1) | m_cost(4, LE) | t_cost(4, LE) | p_cost(4, LE) | salt(32) | nonce(24) | ciphertext+tag
//! ```
//!
//! The pack key is Argon2id(password, salt) with the parameters recorded in
//! the header, so packs sealed under one cost setting stay readable after the
//! defaults change. The whole header is authenticated as associated data.
//!
//! Opening never says why it failed: a wrong password, a flipped bit and a
//! forged header are all [`CryptoError::AuthenticationError`].

use argon2::{Algorithm, Argon2, Params};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    constants::{
        argon2_params, DOMAIN_PACK_AAD, KDF_SALT_SIZE, NONCE_SIZE, PACK_FORMAT_VERSION,
        PACK_HEADER_SIZE, PACK_KEY_SIZE, TAG_SIZE,
    },
    errors::{CryptoError, Result},
    utils::generate_random_bytes,
};

/// Argon2id cost parameters for pack key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: argon2_params::MEMORY_COST,
            iterations: argon2_params::TIME_COST,
            parallelism: argon2_params::PARALLELISM,
        }
    }
}

impl KdfParams {
    /// Validated parameters.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    /// Cheap parameters for unit and integration tests.
    ///
    /// Never use these for packs that leave the process.
    pub fn for_tests() -> Self {
        Self {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Check the parameters against the Argon2 minimums and our upper bounds.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib > argon2_params::MAX_MEMORY_COST
            || self.iterations > argon2_params::MAX_TIME_COST
            || self.parallelism > argon2_params::MAX_PARALLELISM
        {
            return Err(CryptoError::InvalidInput(format!(
                "KDF parameters out of range: m={} t={} p={}",
                self.memory_kib, self.iterations, self.parallelism
            )));
        }
        self.to_argon2().map(|_| ())
    }

    fn to_argon2(self) -> Result<Params> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(PACK_KEY_SIZE),
        )
        .map_err(|e| CryptoError::InvalidInput(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// Derive a 32-byte pack key from a password using Argon2id.
pub fn derive_pack_key(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; PACK_KEY_SIZE]>> {
    let argon2 = Argon2::new(Algorithm::Argon2id, argon2_params::VERSION, params.to_argon2()?);

    let mut key = Zeroizing::new([0u8; PACK_KEY_SIZE]);
    argon2
        .hash_password_into(password, salt, &mut *key)
        .map_err(|e| CryptoError::KeyDerivation(format!("Argon2id key derivation failed: {}", e)))?;
    Ok(key)
}

/// Encrypt with XChaCha20-Poly1305. Returns ciphertext with the tag appended.
pub fn encrypt(
    key: &[u8; PACK_KEY_SIZE],
    plaintext: &[u8],
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(XNonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| CryptoError::AuthenticationError)
}

/// Decrypt and verify XChaCha20-Poly1305 ciphertext.
pub fn decrypt(
    key: &[u8; PACK_KEY_SIZE],
    ciphertext: &[u8],
    nonce: &[u8; NONCE_SIZE],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::AuthenticationError)
}

/// Seal `plaintext` under `password`.
///
/// `context` is bound into the associated data next to the header; the same
/// bytes must be supplied to [`open`].
pub fn seal(password: &[u8], plaintext: &[u8], context: &[u8], params: &KdfParams) -> Result<Vec<u8>> {
    params.validate()?;

    let salt: [u8; KDF_SALT_SIZE] = generate_random_bytes()?;
    let nonce: [u8; NONCE_SIZE] = generate_random_bytes()?;

    let mut header = Vec::with_capacity(PACK_HEADER_SIZE);
    header.push(PACK_FORMAT_VERSION);
    header.extend_from_slice(&params.memory_kib.to_le_bytes());
    header.extend_from_slice(&params.iterations.to_le_bytes());
    header.extend_from_slice(&params.parallelism.to_le_bytes());
    header.extend_from_slice(&salt);
    header.extend_from_slice(&nonce);

    let key = derive_pack_key(password, &salt, params)?;
    let aad = pack_aad(context, &header);
    let ciphertext = encrypt(&key, plaintext, &nonce, &aad)?;

    let mut blob = header;
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a blob produced by [`seal`].
pub fn open(password: &[u8], blob: &[u8], context: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let header = parse_header(blob)?;
    let key = derive_pack_key(password, &header.salt, &header.params)
        .map_err(|_| CryptoError::AuthenticationError)?;

    let aad = pack_aad(context, &blob[..PACK_HEADER_SIZE]);
    decrypt(&key, &blob[PACK_HEADER_SIZE..], &header.nonce, &aad)
}

struct SealedHeader {
    params: KdfParams,
    salt: [u8; KDF_SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
}

fn parse_header(blob: &[u8]) -> Result<SealedHeader> {
    if blob.len() < PACK_HEADER_SIZE + TAG_SIZE || blob[0] != PACK_FORMAT_VERSION {
        return Err(CryptoError::AuthenticationError);
    }

    let read_u32 = |offset: usize| {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&blob[offset..offset + 4]);
        u32::from_le_bytes(buf)
    };
    let params = KdfParams {
        memory_kib: read_u32(1),
        iterations: read_u32(5),
        parallelism: read_u32(9),
    };
    // Reject hostile cost parameters before allocating anything for them.
    params
        .validate()
        .map_err(|_| CryptoError::AuthenticationError)?;

    let mut salt = [0u8; KDF_SALT_SIZE];
    salt.copy_from_slice(&blob[13..13 + KDF_SALT_SIZE]);
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&blob[13 + KDF_SALT_SIZE..PACK_HEADER_SIZE]);

    Ok(SealedHeader { params, salt, nonce })
}

fn pack_aad(context: &[u8], header: &[u8]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(DOMAIN_PACK_AAD.len() + context.len() + header.len());
    aad.extend_from_slice(DOMAIN_PACK_AAD.as_bytes());
    aad.extend_from_slice(context);
    aad.extend_from_slice(header);
    aad
}
