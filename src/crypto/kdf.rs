//! Key derivation for the container.
//!
//! Turns the shared secret plus a per-file random salt into two independent
//! 256-bit keys via a two-step HMAC construction (extract-then-expand):
//! an intermediate key is extracted as `HMAC(secret, salt)`, then the
//! encryption and authentication keys are expanded from it under distinct
//! labels.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use super::{KEY_LEN, SALT_LEN};

type HmacSha256 = Hmac<Sha256>;

const ENC_LABEL: &[u8] = b"ENC";
const MAC_LABEL: &[u8] = b"MAC";

/// The two purpose-specific keys derived for one container.
pub struct DerivedKeys {
    enc: [u8; KEY_LEN],
    mac: [u8; KEY_LEN],
}

impl Drop for DerivedKeys {
    fn drop(&mut self) {
        self.enc.zeroize();
        self.mac.zeroize();
    }
}

impl DerivedKeys {
    /// Encryption key for the cipher.
    pub fn enc(&self) -> &[u8; KEY_LEN] {
        &self.enc
    }

    /// Authentication key for the MAC.
    pub fn mac(&self) -> &[u8; KEY_LEN] {
        &self.mac
    }
}

/// Derive the encryption and MAC keys for one salt.
///
/// Pure function; any secret length (including empty) is accepted.
pub fn derive_keys(secret: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKeys {
    let prk = Zeroizing::new(hmac_sha256(secret, salt));

    DerivedKeys {
        enc: hmac_sha256(prk.as_slice(), ENC_LABEL),
        mac: hmac_sha256(prk.as_slice(), MAC_LABEL),
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; KEY_LEN] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; SALT_LEN];

        let k1 = derive_keys(b"secret", &salt);
        let k2 = derive_keys(b"secret", &salt);

        assert_eq!(k1.enc(), k2.enc());
        assert_eq!(k1.mac(), k2.mac());
    }

    #[test]
    fn enc_and_mac_keys_are_independent() {
        let keys = derive_keys(b"secret", &[7u8; SALT_LEN]);
        assert_ne!(keys.enc(), keys.mac());
    }

    #[test]
    fn different_salts_give_unrelated_keys() {
        let a = derive_keys(b"secret", &[1u8; SALT_LEN]);
        let b = derive_keys(b"secret", &[2u8; SALT_LEN]);

        assert_ne!(a.enc(), b.enc());

        // For two unrelated 32-byte keys, more than a handful of coinciding
        // bytes is astronomically unlikely.
        let coinciding = a
            .enc()
            .iter()
            .zip(b.enc().iter())
            .filter(|(x, y)| x == y)
            .count();
        assert!(coinciding < 8, "keys share {coinciding} bytes");
    }

    #[test]
    fn different_secrets_give_unrelated_keys() {
        let salt = [9u8; SALT_LEN];

        let a = derive_keys(b"secret-a", &salt);
        let b = derive_keys(b"secret-b", &salt);

        assert_ne!(a.enc(), b.enc());
        assert_ne!(a.mac(), b.mac());
    }

    #[test]
    fn empty_secret_is_accepted() {
        let keys = derive_keys(b"", &[0u8; SALT_LEN]);
        assert_ne!(keys.enc(), &[0u8; KEY_LEN]);
    }
}
