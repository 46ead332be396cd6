//! Common utility functions for keyless cryptographic operations.

use crate::errors::{CryptoError, Result};

/// Fill a fixed-size array from the OS random source.
///
/// # Example
///
/// ```
/// use keyless_crypto::generate_random_bytes;
///
/// let nonce: [u8; 24] = generate_random_bytes().unwrap();
/// let salt: [u8; 32] = generate_random_bytes().unwrap();
/// assert_ne!(salt, [0u8; 32]);
/// ```
pub fn generate_random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| CryptoError::RandomGenerationFailed(e.to_string()))?;
    Ok(bytes)
}
