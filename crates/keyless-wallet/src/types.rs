//! Core value types shared by generation and recovery.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use keyless_crypto::KeyKind;

use crate::errors::{KeylessError, Result};

/// Identifier shared by the three packs of one wallet-creation event.
///
/// Always 32 lowercase hex characters (a v4 UUID without dashes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackSetId(String);

impl PackSetId {
    /// Fresh random pack set id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Validate and wrap a pack set id.
    pub fn parse(value: &str) -> Result<Self> {
        let valid = value.len() == 32
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(KeylessError::InvalidPackSetId);
        }
        Ok(Self(value.to_string()))
    }

    /// String form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackSetId {
    type Err = KeylessError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackSetId {
    type Error = KeylessError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackSetId> for String {
    fn from(id: PackSetId) -> Self {
        id.0
    }
}

/// Cloud storage provider holding the cloud pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudKeyProvider {
    /// Apple iCloud
    #[serde(rename = "iCloud")]
    ICloud,
    /// Google Drive
    #[serde(rename = "googleDrive")]
    GoogleDrive,
}

impl fmt::Display for CloudKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ICloud => f.write_str("iCloud"),
            Self::GoogleDrive => f.write_str("googleDrive"),
        }
    }
}

/// Account details bound into every pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub onekey_id_email: String,
    /// Also salts the cloud pack password.
    pub onekey_id_user_id: String,
    pub cloud_key_provider: CloudKeyProvider,
    pub cloud_key_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_key_user_email: Option<String>,
}

impl UserInfo {
    /// Reject empty required fields.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("onekeyIdEmail", &self.onekey_id_email),
            ("onekeyIdUserId", &self.onekey_id_user_id),
            ("cloudKeyUserId", &self.cloud_key_user_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(KeylessError::InvalidInput(format!("{} is required", name)));
            }
        }
        Ok(())
    }
}

/// Evaluation points of all three shares, carried in every pack payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XCoordination {
    pub device_key_x: u8,
    pub cloud_key_x: u8,
    pub auth_key_x: u8,
}

impl XCoordination {
    /// Evaluation point of `kind`.
    pub fn get(&self, kind: KeyKind) -> u8 {
        match kind {
            KeyKind::Device => self.device_key_x,
            KeyKind::Cloud => self.cloud_key_x,
            KeyKind::Auth => self.auth_key_x,
        }
    }
}

/// A labeled share with the password slice of its pack.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    #[zeroize(skip)]
    pub kind: KeyKind,
    /// Base64 share bytes (`y || x`)
    pub value: String,
    pub x: u8,
    /// Base64 of 32 random bytes
    pub pwd_slice: String,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("kind", &self.kind)
            .field("value", &"[REDACTED]")
            .field("x", &self.x)
            .field("pwd_slice", &"[REDACTED]")
            .finish()
    }
}

/// Output of mnemonic generation: the phrase, its three shares and their
/// password slices. Input to pack generation.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeylessMnemonicInfo {
    pub mnemonic: String,
    pub device_key: String,
    pub cloud_key: String,
    pub auth_key: String,
    pub device_key_x: u8,
    pub cloud_key_x: u8,
    pub auth_key_x: u8,
    pub device_key_pwd_slice: String,
    pub cloud_key_pwd_slice: String,
    pub auth_key_pwd_slice: String,
}

impl fmt::Debug for KeylessMnemonicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeylessMnemonicInfo")
            .field("x_coordination", &self.x_coordination())
            .finish_non_exhaustive()
    }
}

impl KeylessMnemonicInfo {
    /// Evaluation points of the three shares.
    pub fn x_coordination(&self) -> XCoordination {
        XCoordination {
            device_key_x: self.device_key_x,
            cloud_key_x: self.cloud_key_x,
            auth_key_x: self.auth_key_x,
        }
    }

    /// The labeled share of `kind`.
    pub fn share(&self, kind: KeyKind) -> Share {
        let (value, x, pwd_slice) = match kind {
            KeyKind::Device => (&self.device_key, self.device_key_x, &self.device_key_pwd_slice),
            KeyKind::Cloud => (&self.cloud_key, self.cloud_key_x, &self.cloud_key_pwd_slice),
            KeyKind::Auth => (&self.auth_key, self.auth_key_x, &self.auth_key_pwd_slice),
        };
        Share {
            kind,
            value: value.clone(),
            x,
            pwd_slice: pwd_slice.clone(),
        }
    }

    /// Mnemonic phrase in a zeroizing container.
    pub fn mnemonic(&self) -> Zeroizing<String> {
        Zeroizing::new(self.mnemonic.clone())
    }
}

/// Raw base64 shares keyed by kind, any subset of which may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
}

/// Mnemonic reconstructed from raw shares.
#[derive(Clone, PartialEq, Eq)]
pub struct RestoredMnemonic {
    pub mnemonic: Zeroizing<String>,
    /// The base64 shares that were combined, in device, cloud, auth order
    pub shares: Vec<String>,
}

impl fmt::Debug for RestoredMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoredMnemonic")
            .field("mnemonic", &"[REDACTED]")
            .field("shares", &self.shares.len())
            .finish()
    }
}
