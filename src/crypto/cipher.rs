//! Symmetric encryption for the container.
//!
//! AES-256 in CBC mode with PKCS#7 padding. Key and IV lengths are enforced
//! by the array types; decryption of tampered or mismatched input fails on
//! padding validation. Callers must verify the MAC before decrypting
//! untrusted input.

use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use getrandom::fill;
use zeroize::Zeroizing;

use super::{IV_LEN, KEY_LEN, SALT_LEN};
use crate::error::ContainerError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), ContainerError> {
    fill(buf).map_err(|_| {
        ContainerError::Io(std::io::Error::other("OS random generator unavailable"))
    })
}

/// Generate a fresh key-derivation salt
pub fn generate_salt() -> Result<[u8; SALT_LEN], ContainerError> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generate a fresh initialization vector
pub fn generate_iv() -> Result<[u8; IV_LEN], ContainerError> {
    let mut iv = [0u8; IV_LEN];
    secure_random(&mut iv)?;
    Ok(iv)
}

/// Encrypt plaintext; output is padded to a whole number of AES blocks.
pub fn encrypt(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt ciphertext
pub fn decrypt(
    key: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, ContainerError> {
    Aes256CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| ContainerError::Crypto)
}
