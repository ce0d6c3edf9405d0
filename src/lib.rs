//! dechest — portable, authenticated chart+audio containers.
//!
//! A container bundles one chart document and one audio asset into a single
//! encrypted file, independent of any asset database. The payload is
//! serialized, deflate-compressed, AES-256-CBC encrypted under a key derived
//! from a shared secret and a per-file salt, and the whole file is
//! authenticated with HMAC-SHA-256. Unpacking verifies the MAC before a
//! single ciphertext byte is decrypted.

mod chart;
mod compress;
mod crypto;
mod error;
mod format;
mod storage;

pub use crate::chart::{BpmPoint, Chart, ChartMeta, Easing, JudgeLine, Keyframe, Note, NoteKind};
pub use crate::error::{ContainerError, FormatError};
pub use crate::format::payload::Payload;
pub use crate::format::{HEADER_LEN, MAGIC, VERSION_MAJOR, VERSION_MINOR};
pub use crate::storage::Storage;

use crate::crypto::{IV_LEN, SALT_LEN};
use crate::format::{Header, MAC_OFFSET};
use zeroize::Zeroize;

/// The result of unpacking a container.
#[derive(Debug, Clone, PartialEq)]
pub struct UnpackedChart {
    pub chart: Chart,
    /// Audio file extension, lowercase, no leading dot.
    pub audio_ext: String,
    pub audio: Vec<u8>,
}

/// Cleartext header summary of a container, readable without the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub version_major: u8,
    pub version_minor: u8,
    /// Ciphertext length in bytes.
    pub cipher_len: u64,
}

/// Summarizes a container's cleartext header.
///
/// Validates magic, version, flags, and framing, but proves nothing about
/// integrity; only [`Dechest::unpack`] authenticates the file.
pub fn inspect(data: &[u8]) -> Result<ContainerInfo, ContainerError> {
    let raw = format::parse(data)?;
    Ok(ContainerInfo {
        version_major: VERSION_MAJOR,
        version_minor: raw.header.version_minor(),
        cipher_len: raw.header.cipher_len(),
    })
}

/// Packs and unpacks containers under one shared secret.
///
/// The secret is injected at construction and zeroized on drop. A `Dechest`
/// holds no other state; pack and unpack are independent and reentrant.
pub struct Dechest {
    secret: Vec<u8>,
}

impl Drop for Dechest {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl Dechest {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Packs a chart and its audio into container bytes.
    ///
    /// The extension is normalized to the on-disk form (lowercase, leading
    /// dot stripped). Salt and IV are freshly generated for every call.
    pub fn pack(
        &self,
        chart: &Chart,
        audio: &[u8],
        audio_ext: &str,
    ) -> Result<Vec<u8>, ContainerError> {
        self.pack_raw(&Payload {
            document: chart.to_bytes()?,
            audio_ext: normalize_ext(audio_ext),
            audio: audio.to_vec(),
        })
    }

    /// Packs a payload whose document bytes are already serialized.
    pub fn pack_raw(&self, payload: &Payload) -> Result<Vec<u8>, ContainerError> {
        let salt = crypto::generate_salt()?;
        let iv = crypto::generate_iv()?;
        self.pack_with_entropy(payload, salt, iv)
    }

    /// Deterministic pack with caller-supplied salt and iv.
    ///
    /// Crate-internal: fixing the entropy makes output byte-reproducible,
    /// which the tests rely on. Production packing always draws fresh values.
    pub(crate) fn pack_with_entropy(
        &self,
        payload: &Payload,
        salt: [u8; SALT_LEN],
        iv: [u8; IV_LEN],
    ) -> Result<Vec<u8>, ContainerError> {
        let serialized = format::payload::encode(payload)?;
        let compressed = compress::compress(&serialized)?;

        let keys = crypto::derive_keys(&self.secret, &salt);
        let ciphertext = crypto::encrypt(keys.enc(), &iv, &compressed);

        let header = Header::new(salt, iv, ciphertext.len() as u64);
        let mut file = header.to_bytes();

        let tag = crypto::mac::tag(keys.mac(), &file, &ciphertext);
        file[MAC_OFFSET..HEADER_LEN].copy_from_slice(&tag);
        file.extend_from_slice(&ciphertext);

        Ok(file)
    }

    /// Unpacks container bytes into a chart, audio extension, and audio.
    pub fn unpack(&self, data: &[u8]) -> Result<UnpackedChart, ContainerError> {
        let payload = self.unpack_raw(data)?;
        Ok(UnpackedChart {
            chart: Chart::from_bytes(&payload.document)?,
            audio_ext: payload.audio_ext,
            audio: payload.audio,
        })
    }

    /// Unpacks container bytes, leaving the document as opaque bytes.
    ///
    /// Verifies the MAC over header and ciphertext before decrypting; any
    /// failure aborts without surfacing partially-decrypted data.
    pub fn unpack_raw(&self, data: &[u8]) -> Result<Payload, ContainerError> {
        let raw = format::parse(data)?;

        let keys = crypto::derive_keys(&self.secret, raw.header.salt());

        let authed = raw.header.to_bytes();
        if !crypto::mac::verify(keys.mac(), &authed, raw.ciphertext, &raw.mac) {
            return Err(ContainerError::Authentication);
        }

        let compressed = crypto::decrypt(keys.enc(), raw.header.iv(), raw.ciphertext)?;
        let serialized = compress::decompress(&compressed)?;

        format::payload::decode(raw.header.version_minor(), &serialized)
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
