//! Shamir Secret Sharing over GF(256) for keyless wallet shares.
//!
//! Implements k-of-n splitting of the mnemonic entropy (2-of-3 for keyless
//! wallets) plus evaluation of the sharing polynomial at arbitrary points,
//! which is what allows a lost share to be regenerated.
//!
//! # Security Model
//!
//! - Each secret byte gets its own random polynomial of degree k-1
//! - Any k shares reconstruct the secret by Lagrange interpolation at 0
//! - Fewer than k shares reveal no information about the secret
//! - x-coordinates are random, distinct and non-zero
//!
//! # Wire format
//!
//! `y_0 .. y_{m-1} || x`: the y-values come first and the x-coordinate is the
//! trailing byte.

use rand::{seq::index, CryptoRng, RngCore};
use std::collections::HashSet;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    codec::ShareCodec,
    errors::{CryptoError, Result},
    gf256,
    mnemonic::{entropy_to_mnemonic, mnemonic_to_entropy},
};

/// Largest number of shares GF(256) supports (x in 1..=255).
pub const MAX_SHARES: usize = 255;

/// A single Shamir share: a point per secret byte, all at the same `x`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ShamirShare {
    /// Evaluation point (never 0)
    pub x: u8,
    /// One y-value per secret byte
    pub y: Vec<u8>,
}

// Share data must never reach logs.
impl fmt::Debug for ShamirShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShamirShare")
            .field("x", &self.x)
            .field("y", &format_args!("[REDACTED; {}]", self.y.len()))
            .finish()
    }
}

impl ShamirShare {
    /// Create a share from its evaluation point and y-values.
    pub fn new(x: u8, y: Vec<u8>) -> Self {
        Self { x, y }
    }

    /// Raw wire bytes: y-values followed by the x-coordinate.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.y.len() + 1);
        bytes.extend_from_slice(&self.y);
        bytes.push(self.x);
        bytes
    }

    /// Parse raw wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some((&x, y)) = bytes.split_last() else {
            return Err(CryptoError::CorruptShare("Share is empty".to_string()));
        };
        if y.is_empty() {
            return Err(CryptoError::CorruptShare(
                "Share has no data bytes".to_string(),
            ));
        }
        if x == 0 {
            return Err(CryptoError::CorruptShare(
                "Share x-coordinate cannot be 0".to_string(),
            ));
        }
        Ok(Self { x, y: y.to_vec() })
    }

    /// Encode as standard base64 (the form stored in packs).
    pub fn to_base64(&self) -> String {
        let bytes = Zeroizing::new(self.to_bytes());
        ShareCodec::base64().encode(&bytes)
    }

    /// Parse from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(ShareCodec::base64().decode(encoded)?);
        Self::from_bytes(&bytes)
    }

    /// Encode as lowercase hex.
    pub fn to_hex(&self) -> String {
        let bytes = Zeroizing::new(self.to_bytes());
        ShareCodec::hex().encode(&bytes)
    }

    /// Parse from hex.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(ShareCodec::hex().decode(encoded)?);
        Self::from_bytes(&bytes)
    }
}

/// Read the x-coordinate (trailing byte) of a base64 share.
pub fn share_x_coordinate(share_base64: &str) -> Result<u8> {
    ShamirShare::from_base64(share_base64).map(|share| share.x)
}

/// Split a secret into `total` shares, any `threshold` of which reconstruct it.
pub fn split_secret(secret: &[u8], total: usize, threshold: usize) -> Result<Vec<ShamirShare>> {
    split_secret_with_rng(secret, total, threshold, &mut rand::thread_rng())
}

/// [`split_secret`] with an explicit CSPRNG.
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    secret: &[u8],
    total: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<ShamirShare>> {
    if threshold < 2 || threshold > total || total > MAX_SHARES {
        return Err(CryptoError::InvalidThreshold { threshold, total });
    }
    if secret.is_empty() {
        return Err(CryptoError::InvalidInput("Secret is empty".to_string()));
    }

    // Distinct x-coordinates drawn from 1..=255
    let xs: Vec<u8> = index::sample(rng, MAX_SHARES, total)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect();

    let mut shares: Vec<ShamirShare> = xs
        .iter()
        .map(|&x| ShamirShare::new(x, Vec::with_capacity(secret.len())))
        .collect();

    let mut coefficients = Zeroizing::new(vec![0u8; threshold]);
    for &secret_byte in secret {
        coefficients[0] = secret_byte;
        rng.fill_bytes(&mut coefficients[1..]);

        for share in &mut shares {
            share.y.push(gf256::poly_eval(&coefficients, share.x));
        }
    }

    Ok(shares)
}

/// Reconstruct a secret from at least `threshold` shares.
///
/// When more than `threshold` shares are supplied, every extra share must lie
/// on the polynomial defined by the first `threshold`; otherwise the set is
/// inconsistent and [`CryptoError::CorruptShare`] is returned.
pub fn reconstruct_secret(shares: &[ShamirShare], threshold: usize) -> Result<Zeroizing<Vec<u8>>> {
    if threshold < 2 {
        return Err(CryptoError::InvalidThreshold {
            threshold,
            total: shares.len(),
        });
    }
    if shares.len() < threshold {
        return Err(CryptoError::InsufficientShares {
            required: threshold,
            provided: shares.len(),
        });
    }
    validate_share_set(shares)?;

    let (basis, extra) = shares.split_at(threshold);
    let secret_len = basis[0].y.len();

    let mut secret = Zeroizing::new(Vec::with_capacity(secret_len));
    let mut points = Vec::with_capacity(threshold);
    for byte_idx in 0..secret_len {
        points.clear();
        points.extend(basis.iter().map(|s| (s.x, s.y[byte_idx])));

        secret.push(gf256::interpolate_at(&points, 0));

        for share in extra {
            if gf256::interpolate_at(&points, share.x) != share.y[byte_idx] {
                return Err(CryptoError::CorruptShare(format!(
                    "Share at x={} is inconsistent with the other shares",
                    share.x
                )));
            }
        }
    }

    Ok(secret)
}

/// Evaluate the sharing polynomial at `missing_x`.
///
/// The polynomial is pinned down by the secret (the point at x=0) plus
/// `threshold - 1` known shares; for a 2-of-3 scheme a single surviving share
/// is enough. Per byte that is `a1 = (y1 - s) / x1`, `y = s + a1 * x`.
pub fn evaluate_share(secret: &[u8], known: &[ShamirShare], missing_x: u8) -> Result<ShamirShare> {
    if known.is_empty() {
        return Err(CryptoError::InsufficientShares {
            required: 1,
            provided: 0,
        });
    }
    validate_share_set(known)?;
    if missing_x == 0 || known.iter().any(|s| s.x == missing_x) {
        return Err(CryptoError::InvalidEvaluationPoint(missing_x));
    }
    if known[0].y.len() != secret.len() {
        return Err(CryptoError::CorruptShare(format!(
            "Share length {} does not match secret length {}",
            known[0].y.len(),
            secret.len()
        )));
    }

    let mut y = Vec::with_capacity(secret.len());
    let mut points = Vec::with_capacity(known.len() + 1);
    for (byte_idx, &secret_byte) in secret.iter().enumerate() {
        points.clear();
        points.push((0u8, secret_byte));
        points.extend(known.iter().map(|s| (s.x, s.y[byte_idx])));
        y.push(gf256::interpolate_at(&points, missing_x));
    }

    Ok(ShamirShare::new(missing_x, y))
}

/// Split the entropy of a BIP-39 mnemonic.
pub fn split_mnemonic(mnemonic: &str, total: usize, threshold: usize) -> Result<Vec<ShamirShare>> {
    let entropy = mnemonic_to_entropy(mnemonic)?;
    split_secret(&entropy, total, threshold)
}

/// Reconstruct a BIP-39 mnemonic from shares of its entropy.
pub fn reconstruct_mnemonic(shares: &[ShamirShare], threshold: usize) -> Result<Zeroizing<String>> {
    let entropy = reconstruct_secret(shares, threshold)?;
    entropy_to_mnemonic(&entropy)
}

/// Regenerate the share a mnemonic's sharing polynomial has at `missing_x`,
/// given one surviving base64 share. Returns the base64 encoding.
pub fn recover_missing_share(
    mnemonic: &str,
    known_share_base64: &str,
    missing_x: u8,
) -> Result<String> {
    let entropy = mnemonic_to_entropy(mnemonic)?;
    let known = ShamirShare::from_base64(known_share_base64)?;
    let missing = evaluate_share(&entropy, std::slice::from_ref(&known), missing_x)?;
    Ok(missing.to_base64())
}

fn validate_share_set(shares: &[ShamirShare]) -> Result<()> {
    let secret_len = shares[0].y.len();
    if secret_len == 0 {
        return Err(CryptoError::CorruptShare("Share has no data bytes".to_string()));
    }
    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if share.x == 0 {
            return Err(CryptoError::CorruptShare(
                "Share x-coordinate cannot be 0".to_string(),
            ));
        }
        if share.y.len() != secret_len {
            return Err(CryptoError::CorruptShare(
                "Shares have different lengths".to_string(),
            ));
        }
        if !seen.insert(share.x) {
            return Err(CryptoError::DuplicateEvaluationPoint(share.x));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::generate_mnemonic;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";

    #[test]
    fn test_split_and_reconstruct_every_pair() {
        let mnemonic = generate_mnemonic().unwrap();
        let shares = split_mnemonic(&mnemonic, 3, 2).unwrap();
        assert_eq!(shares.len(), 3);

        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            let pair = [shares[a].clone(), shares[b].clone()];
            let recovered = reconstruct_mnemonic(&pair, 2).unwrap();
            assert_eq!(
                recovered.as_str(),
                mnemonic.as_str(),
                "pair ({a}, {b}) should recover the mnemonic"
            );
        }
    }

    #[test]
    fn test_reconstruct_with_all_three() {
        let secret = [0x5au8; 32];
        let shares = split_secret(&secret, 3, 2).unwrap();
        let recovered = reconstruct_secret(&shares, 2).unwrap();
        assert_eq!(recovered.as_slice(), &secret);
    }

    #[test]
    fn test_split_3_of_5() {
        let secret = b"A longer secret for a 3-of-5 split";
        let shares = split_secret(secret, 5, 3).unwrap();
        let subset = [shares[4].clone(), shares[0].clone(), shares[2].clone()];
        assert_eq!(reconstruct_secret(&subset, 3).unwrap().as_slice(), secret);
    }

    #[test]
    fn test_single_share_is_insufficient() {
        let shares = split_mnemonic(ABANDON_ABOUT, 3, 2).unwrap();
        for share in &shares {
            let err = reconstruct_secret(std::slice::from_ref(share), 2).unwrap_err();
            assert_eq!(
                err,
                CryptoError::InsufficientShares {
                    required: 2,
                    provided: 1
                }
            );
        }
    }

    #[test]
    fn test_x_coordinates_distinct_and_nonzero() {
        for _ in 0..32 {
            let shares = split_secret(&[1, 2, 3], 3, 2).unwrap();
            let xs: HashSet<u8> = shares.iter().map(|s| s.x).collect();
            assert_eq!(xs.len(), 3);
            assert!(!xs.contains(&0));
        }
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(matches!(
            split_secret(&[1], 3, 1),
            Err(CryptoError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            split_secret(&[1], 2, 3),
            Err(CryptoError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            split_secret(&[1], 256, 2),
            Err(CryptoError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            split_secret(&[], 3, 2),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_duplicate_x_rejected() {
        let shares = split_secret(&[9; 16], 3, 2).unwrap();
        let dup = [shares[0].clone(), shares[0].clone()];
        assert_eq!(
            reconstruct_secret(&dup, 2).unwrap_err(),
            CryptoError::DuplicateEvaluationPoint(shares[0].x)
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let shares = split_secret(&[9; 16], 3, 2).unwrap();
        let mut short = shares[1].clone();
        short.y.pop();
        assert!(matches!(
            reconstruct_secret(&[shares[0].clone(), short], 2),
            Err(CryptoError::CorruptShare(_))
        ));
    }

    #[test]
    fn test_inconsistent_extra_share_detected() {
        let shares = split_secret(&[0x11; 32], 3, 2).unwrap();
        let mut tampered = shares.clone();
        tampered[2].y[7] ^= 0x01;
        assert!(matches!(
            reconstruct_secret(&tampered, 2),
            Err(CryptoError::CorruptShare(_))
        ));
        // The untampered pair still works
        assert!(reconstruct_secret(&tampered[..2], 2).is_ok());
    }

    #[test]
    fn test_missing_share_matches_original() {
        let mnemonic = generate_mnemonic().unwrap();
        let shares = split_mnemonic(&mnemonic, 3, 2).unwrap();

        for known in 0..3 {
            for missing in 0..3 {
                if known == missing {
                    continue;
                }
                let regenerated = recover_missing_share(
                    &mnemonic,
                    &shares[known].to_base64(),
                    shares[missing].x,
                )
                .unwrap();
                assert_eq!(regenerated, shares[missing].to_base64());
            }
        }
    }

    #[test]
    fn test_missing_share_rejects_colliding_or_zero_x() {
        let shares = split_mnemonic(ABANDON_ABOUT, 3, 2).unwrap();
        let known = shares[0].to_base64();
        assert_eq!(
            recover_missing_share(ABANDON_ABOUT, &known, shares[0].x).unwrap_err(),
            CryptoError::InvalidEvaluationPoint(shares[0].x)
        );
        assert_eq!(
            recover_missing_share(ABANDON_ABOUT, &known, 0).unwrap_err(),
            CryptoError::InvalidEvaluationPoint(0)
        );
    }

    #[test]
    fn test_missing_share_rejects_foreign_length() {
        let other = split_mnemonic(&generate_mnemonic().unwrap(), 3, 2).unwrap();
        // 32-byte share against a 16-byte entropy mnemonic
        let x = if other[0].x == 1 { 2 } else { 1 };
        assert!(matches!(
            recover_missing_share(ABANDON_ABOUT, &other[0].to_base64(), x),
            Err(CryptoError::CorruptShare(_))
        ));
    }

    #[test]
    fn test_missing_share_rejects_invalid_mnemonic() {
        let shares = split_mnemonic(ABANDON_ABOUT, 3, 2).unwrap();
        let bad = ABANDON_ABOUT.replace("about", "abandon");
        assert_eq!(
            recover_missing_share(&bad, &shares[0].to_base64(), shares[1].x).unwrap_err(),
            CryptoError::Checksum
        );
    }

    #[test]
    fn test_wire_format_x_is_trailing_byte() {
        let share = ShamirShare::new(0x2a, vec![1, 2, 3]);
        assert_eq!(share.to_bytes(), vec![1, 2, 3, 0x2a]);
        assert_eq!(share_x_coordinate(&share.to_base64()).unwrap(), 0x2a);
        assert_eq!(ShamirShare::from_hex(&share.to_hex()).unwrap(), share);
    }

    #[test]
    fn test_parse_rejects_malformed_shares() {
        assert!(matches!(
            ShamirShare::from_base64("not base64!"),
            Err(CryptoError::Decode(_))
        ));
        // only an x byte
        assert!(ShamirShare::from_bytes(&[5]).is_err());
        assert!(ShamirShare::from_bytes(&[]).is_err());
        // zero x
        assert!(ShamirShare::from_bytes(&[1, 2, 0]).is_err());
    }

    #[test]
    fn test_debug_redacts_share_data() {
        let share = ShamirShare::new(3, vec![0xde, 0xad]);
        let printed = format!("{share:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("222"));
    }
}
