//! Regeneration of a lost share from the mnemonic and one surviving share.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

use keyless_crypto::KeyKind;

use crate::{
    errors::Result,
    types::{Share, XCoordination},
};

/// Arguments of a missing-share recovery.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingShareRequest {
    pub mnemonic: Zeroizing<String>,
    pub share_base64: String,
    pub missing_x: u8,
}

impl fmt::Debug for MissingShareRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissingShareRequest")
            .field("missing_x", &self.missing_x)
            .finish_non_exhaustive()
    }
}

/// Base64 value of the share at `missing_x`.
///
/// Deterministic: for a wallet's own mnemonic and share this reproduces the
/// share created at split time.
pub fn recover_missing_share(request: &MissingShareRequest) -> Result<String> {
    Ok(keyless_crypto::recover_missing_share(
        &request.mnemonic,
        &request.share_base64,
        request.missing_x,
    )?)
}

/// Regenerate the labeled share of `missing`, reusing its known password slice.
pub(crate) fn regenerate_share(
    mnemonic: &str,
    known: &str,
    missing: KeyKind,
    x_coordination: &XCoordination,
    pwd_slice: &str,
) -> Result<Share> {
    let x = x_coordination.get(missing);
    let value = keyless_crypto::recover_missing_share(mnemonic, known, x)?;
    Ok(Share {
        kind: missing,
        value,
        x,
        pwd_slice: pwd_slice.to_string(),
    })
}
