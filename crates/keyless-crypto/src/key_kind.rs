//! The three labeled share slots of a keyless wallet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{AUTH_KEY_PWD_SALT, CLOUD_KEY_PWD_SALT, DEVICE_KEY_PWD_SALT};

/// Which share (and therefore which pack) a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyKind {
    /// Held in local secure storage on the device
    #[serde(rename = "deviceKey")]
    Device,
    /// Held in the user's cloud backup
    #[serde(rename = "cloudKey")]
    Cloud,
    /// Held by the auth server
    #[serde(rename = "authKey")]
    Auth,
}

impl KeyKind {
    /// All kinds in split order: share 0 is device, 1 is cloud, 2 is auth.
    pub const ALL: [KeyKind; 3] = [KeyKind::Device, KeyKind::Cloud, KeyKind::Auth];

    /// Stable string form, also used in pack AAD.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Device => "deviceKey",
            KeyKind::Cloud => "cloudKey",
            KeyKind::Auth => "authKey",
        }
    }

    /// Fixed salt suffix for this kind's password derivation.
    pub fn pwd_salt(&self) -> &'static str {
        match self {
            KeyKind::Device => DEVICE_KEY_PWD_SALT,
            KeyKind::Cloud => CLOUD_KEY_PWD_SALT,
            KeyKind::Auth => AUTH_KEY_PWD_SALT,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_display() {
        for kind in KeyKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: KeyKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_split_order() {
        assert_eq!(KeyKind::ALL[0], KeyKind::Device);
        assert_eq!(KeyKind::ALL[1], KeyKind::Cloud);
        assert_eq!(KeyKind::ALL[2], KeyKind::Auth);
    }
}
