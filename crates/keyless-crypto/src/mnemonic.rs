//! BIP-39 mnemonic handling.
//!
//! The mnemonic is the root secret of a keyless wallet. It must only exist
//! in memory, wrapped in zeroizing containers, for the duration of a
//! generation or recovery call.

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::{
    constants::MNEMONIC_ENTROPY_SIZE,
    errors::{CryptoError, Result},
    utils::generate_random_bytes,
};

/// Generate a fresh 24-word English mnemonic from OS randomness.
pub fn generate_mnemonic() -> Result<Zeroizing<String>> {
    let entropy: Zeroizing<[u8; MNEMONIC_ENTROPY_SIZE]> =
        Zeroizing::new(generate_random_bytes()?);
    entropy_to_mnemonic(&entropy[..])
}

/// Convert entropy (16, 20, 24, 28 or 32 bytes) into a mnemonic phrase.
///
/// Any other length fails with [`CryptoError::Checksum`], which is how a
/// reconstruction from mismatched shares surfaces.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|_| CryptoError::Checksum)?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Parse and checksum-validate a phrase, returning its entropy.
///
/// Whitespace is normalized so pasted phrases with line breaks still parse.
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let normalized = Zeroizing::new(normalize_phrase(phrase));
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, normalized.as_str())
        .map_err(|_| CryptoError::Checksum)?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Validate a phrase against the BIP-39 English wordlist and checksum.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    mnemonic_to_entropy(phrase).map(|_| ())
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon \
        abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generated_mnemonic_has_24_words() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split(' ').count(), 24);
        validate_mnemonic(&phrase).unwrap();
    }

    #[test]
    fn test_generated_mnemonics_differ() {
        let a = generate_mnemonic().unwrap();
        let b = generate_mnemonic().unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_abandon_about_vector_is_zero_entropy() {
        let entropy = mnemonic_to_entropy(ABANDON_ABOUT).unwrap();
        assert_eq!(entropy.as_slice(), &[0u8; 16]);
        assert_eq!(entropy_to_mnemonic(&entropy).unwrap().as_str(), ABANDON_ABOUT);
    }

    #[test]
    fn test_whitespace_and_case_are_normalized() {
        let messy = "  Abandon abandon\nabandon abandon abandon abandon abandon abandon abandon abandon abandon ABOUT ";
        assert_eq!(mnemonic_to_entropy(messy).unwrap().as_slice(), &[0u8; 16]);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let bad = ABANDON_ABOUT.replace("about", "abandon");
        assert_eq!(validate_mnemonic(&bad), Err(CryptoError::Checksum));
    }

    #[test]
    fn test_unknown_word_rejected() {
        let bad = ABANDON_ABOUT.replace("about", "notaword");
        assert_eq!(validate_mnemonic(&bad), Err(CryptoError::Checksum));
    }

    #[test]
    fn test_invalid_entropy_length_rejected() {
        assert_eq!(entropy_to_mnemonic(&[0u8; 15]).unwrap_err(), CryptoError::Checksum);
        assert_eq!(entropy_to_mnemonic(&[]).unwrap_err(), CryptoError::Checksum);
    }
}
