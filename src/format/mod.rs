//! On-disk container format.
//!
//! A container file is an 80-byte header followed by the ciphertext:
//!
//! ```text
//! offset  size  field
//! 0       4     magic          "DECH"
//! 4       1     version major  = 1
//! 5       1     version minor  writer emits 1; reader accepts 0 or 1
//! 6       2     flags          = 0x0003 (deflate + AES-256-CBC)
//! 8       16    salt
//! 24      16    iv
//! 40      8     cipher length  (u64)
//! 48      32    mac            HMAC-SHA-256 over [0..80) with this field
//!                              zeroed, then the ciphertext
//! 80      N     ciphertext
//! ```
//!
//! All integers are little-endian. The minor version selects the payload
//! layout inside the ciphertext; see [`payload`].

use crate::crypto::{IV_LEN, MAC_LEN, SALT_LEN};
use crate::error::{ContainerError, FormatError};

pub mod payload;

/// Magic bytes identifying a dechest container ("DECH").
pub const MAGIC: &[u8; 4] = b"DECH";
/// Major format version; must match exactly.
pub const VERSION_MAJOR: u8 = 1;
/// Minor format version emitted by the writer.
pub const VERSION_MINOR: u8 = 1;
/// Flags recording the compression/cipher combination: bit 0 = deflate,
/// bit 1 = AES-256-CBC. The only accepted value.
pub const FLAGS_DEFLATE_AES_CBC: u16 = 0x0003;

const MAGIC_LEN: usize = 4;
const VER_LEN: usize = 1;
const FLAG_LEN: usize = 2;
const CIPHER_LEN_LEN: usize = 8;

/// Byte offset of the mac field within the header.
pub const MAC_OFFSET: usize =
    MAGIC_LEN + 2 * VER_LEN + FLAG_LEN + SALT_LEN + IV_LEN + CIPHER_LEN_LEN;
/// Total header length (80 bytes).
pub const HEADER_LEN: usize = MAC_OFFSET + MAC_LEN;

/// Parsed cleartext header of a container.
#[derive(Debug)]
pub struct Header {
    version_minor: u8,
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    cipher_len: u64,
}

impl Header {
    /// Header for a freshly written container (current minor version).
    pub fn new(salt: [u8; SALT_LEN], iv: [u8; IV_LEN], cipher_len: u64) -> Self {
        Self {
            version_minor: VERSION_MINOR,
            salt,
            iv,
            cipher_len,
        }
    }

    pub fn version_minor(&self) -> u8 {
        self.version_minor
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn cipher_len(&self) -> u64 {
        self.cipher_len
    }

    /// Serializes the full 80-byte header with the mac field zeroed.
    ///
    /// This is both the writer's scaffold (the tag is spliced in afterwards)
    /// and the exact byte string the MAC is computed over.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);

        buf.extend_from_slice(MAGIC);
        buf.push(VERSION_MAJOR);
        buf.push(self.version_minor);
        buf.extend_from_slice(&FLAGS_DEFLATE_AES_CBC.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.iv);
        buf.extend_from_slice(&self.cipher_len.to_le_bytes());
        buf.extend_from_slice(&[0u8; MAC_LEN]);

        buf
    }
}

/// A parsed container: header, claimed tag, and a view of the ciphertext.
#[derive(Debug)]
pub struct RawContainer<'a> {
    pub header: Header,
    pub mac: [u8; MAC_LEN],
    pub ciphertext: &'a [u8],
}

/// Fixed-size view into a buffer whose bounds were already checked.
fn array_at<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    data[offset..offset + N]
        .try_into()
        .expect("caller checked bounds")
}

/// Parses and validates the cleartext portion of a container.
///
/// Checks magic, major version, flags, and that the declared cipher length
/// matches the bytes actually present. Nothing here trusts the ciphertext;
/// MAC verification happens in the orchestrator before any decryption.
pub fn parse(data: &[u8]) -> Result<RawContainer<'_>, ContainerError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::Truncated("header").into());
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(FormatError::BadMagic.into());
    }

    let major = data[MAGIC_LEN];
    let minor = data[MAGIC_LEN + VER_LEN];
    if major != VERSION_MAJOR || minor > VERSION_MINOR {
        return Err(FormatError::UnsupportedVersion { major, minor }.into());
    }

    let mut offset = MAGIC_LEN + 2 * VER_LEN;

    let flags = u16::from_le_bytes(array_at(data, offset));
    if flags != FLAGS_DEFLATE_AES_CBC {
        return Err(FormatError::UnknownFlags(flags).into());
    }
    offset += FLAG_LEN;

    let salt: [u8; SALT_LEN] = array_at(data, offset);
    offset += SALT_LEN;

    let iv: [u8; IV_LEN] = array_at(data, offset);
    offset += IV_LEN;

    let cipher_len = u64::from_le_bytes(array_at(data, offset));
    offset += CIPHER_LEN_LEN;

    let mac: [u8; MAC_LEN] = array_at(data, offset);
    offset += MAC_LEN;

    let ciphertext = &data[offset..];
    if ciphertext.len() as u64 != cipher_len {
        return Err(FormatError::LengthMismatch {
            expected: cipher_len,
            actual: ciphertext.len() as u64,
        }
        .into());
    }

    Ok(RawContainer {
        header: Header {
            version_minor: minor,
            salt,
            iv,
            cipher_len,
        },
        mac,
        ciphertext,
    })
}
