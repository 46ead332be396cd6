//! # keyless-crypto
//!
//! Cryptographic primitives for keyless wallets.
//!
//! A BIP-39 mnemonic is split 2-of-3 with Shamir's Secret Sharing over
//! GF(256) into device, cloud and auth shares. Each share is sealed into a
//! pack with Argon2id + XChaCha20-Poly1305 under a password derived (HKDF)
//! from a random password slice. This crate provides the field arithmetic,
//! splitting and interpolation, the share codec, password derivation and
//! the pack sealing envelope. Pack layout and recovery orchestration live
//! in `keyless-wallet`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod constants;
pub mod derivation;
pub mod encryption;
pub mod errors;
pub mod gf256;
pub mod hashing;
pub mod key_kind;
pub mod mnemonic;
pub mod shamir;
pub mod utils;

pub use codec::{base64_decode, base64_encode, ShareCodec, ShareEncoding};
pub use constants::*;
pub use derivation::*;
pub use encryption::*;
pub use errors::{CryptoError, Result};
pub use hashing::*;
pub use key_kind::KeyKind;
pub use mnemonic::*;
pub use shamir::*;
pub use utils::*;
