//! Cryptographic primitives for the container.
//!
//! Provides key derivation, symmetric encryption, and message
//! authentication.

pub mod cipher;
pub mod kdf;
pub mod mac;

pub use cipher::{decrypt, encrypt, generate_iv, generate_salt};
pub use kdf::{DerivedKeys, derive_keys};

/// Length of the key-derivation salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the cipher initialization vector (16 bytes, one AES block).
pub const IV_LEN: usize = 16;
/// Length of a derived key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the authentication tag (32 bytes, HMAC-SHA-256 output).
pub const MAC_LEN: usize = 32;
