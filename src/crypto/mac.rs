//! Message authentication for the container.
//!
//! HMAC-SHA-256 over the header (with the tag field zeroed) followed by the
//! ciphertext, fed incrementally so no concatenated copy is needed.
//! Verification is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{KEY_LEN, MAC_LEN};

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8; KEY_LEN], header: &[u8], ciphertext: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(header);
    mac.update(ciphertext);
    mac
}

/// Compute the authentication tag over header-prefix and ciphertext.
pub fn tag(key: &[u8; KEY_LEN], header: &[u8], ciphertext: &[u8]) -> [u8; MAC_LEN] {
    keyed(key, header, ciphertext).finalize().into_bytes().into()
}

/// Verify a claimed tag in constant time.
pub fn verify(
    key: &[u8; KEY_LEN],
    header: &[u8],
    ciphertext: &[u8],
    claimed: &[u8; MAC_LEN],
) -> bool {
    keyed(key, header, ciphertext).verify_slice(claimed).is_ok()
}
