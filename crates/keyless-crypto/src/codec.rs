//! Transport encoding for shares, password slices and sealed packs.
//!
//! Standard base64 with padding is the canonical form written into packs;
//! hex is accepted for operator tooling.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::errors::{CryptoError, Result};

/// String encoding of raw share bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareEncoding {
    /// RFC 4648 standard alphabet, padded
    #[default]
    Base64,
    /// Lowercase hex
    Hex,
}

/// Lossless, deterministic share encoder/decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareCodec {
    encoding: ShareEncoding,
}

impl ShareCodec {
    /// Codec for the given encoding.
    pub fn new(encoding: ShareEncoding) -> Self {
        Self { encoding }
    }

    /// Base64 codec.
    pub fn base64() -> Self {
        Self::new(ShareEncoding::Base64)
    }

    /// Hex codec.
    pub fn hex() -> Self {
        Self::new(ShareEncoding::Hex)
    }

    /// Encoding in use.
    pub fn encoding(&self) -> ShareEncoding {
        self.encoding
    }

    /// Encode raw bytes.
    pub fn encode(&self, raw: &[u8]) -> String {
        match self.encoding {
            ShareEncoding::Base64 => STANDARD.encode(raw),
            ShareEncoding::Hex => hex::encode(raw),
        }
    }

    /// Decode a string produced by [`ShareCodec::encode`].
    pub fn decode(&self, encoded: &str) -> Result<Vec<u8>> {
        match self.encoding {
            ShareEncoding::Base64 => STANDARD
                .decode(encoded.trim())
                .map_err(|e| CryptoError::Decode(e.to_string())),
            ShareEncoding::Hex => {
                hex::decode(encoded.trim()).map_err(|e| CryptoError::Decode(e.to_string()))
            }
        }
    }
}

/// Standard base64 encode.
///
/// # Example
///
/// ```
/// use keyless_crypto::{base64_decode, base64_encode};
///
/// let encoded = base64_encode(b"keyless");
/// assert_eq!(encoded, "a2V5bGVzcw==");
/// assert_eq!(base64_decode(&encoded).unwrap(), b"keyless");
/// ```
pub fn base64_encode(data: &[u8]) -> String {
    ShareCodec::base64().encode(data)
}

/// Standard base64 decode.
pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    ShareCodec::base64().decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_known_vector() {
        let codec = ShareCodec::base64();
        assert_eq!(codec.encode(b"hello world"), "aGVsbG8gd29ybGQ=");
        assert_eq!(codec.decode("aGVsbG8gd29ybGQ=").unwrap(), b"hello world");
    }

    #[test]
    fn test_hex_known_vector() {
        let codec = ShareCodec::hex();
        assert_eq!(codec.encode(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(codec.decode("00ABff").unwrap(), vec![0x00, 0xab, 0xff]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let raw = [7u8; 33];
        let codec = ShareCodec::default();
        assert_eq!(codec.encoding(), ShareEncoding::Base64);
        assert_eq!(codec.encode(&raw), codec.encode(&raw));
    }

    #[test]
    fn test_base64_rejects_wrong_alphabet() {
        let err = ShareCodec::base64().decode("!!invalid!!").unwrap_err();
        assert!(matches!(err, CryptoError::Decode(_)));
    }

    #[test]
    fn test_base64_rejects_truncated_padding() {
        // "aGVsbG8gd29ybGQ=" with the padding removed and a char dropped
        assert!(base64_decode("aGVsbG8gd29ybG").is_err());
        assert!(base64_decode("aGVsbG8=d29ybGQ").is_err());
    }

    #[test]
    fn test_hex_rejects_odd_length_and_alphabet() {
        assert!(ShareCodec::hex().decode("abc").is_err());
        assert!(ShareCodec::hex().decode("zz").is_err());
    }

    #[test]
    fn test_empty_roundtrip() {
        assert_eq!(base64_decode(&base64_encode(&[])).unwrap(), Vec::<u8>::new());
    }
}
