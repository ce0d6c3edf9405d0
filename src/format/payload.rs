//! Payload layouts inside the ciphertext.
//!
//! The writer always emits the current layout:
//!
//! ```text
//! u32 docLen | docBytes | u16 extLen | extBytes | u64 audioLen | audioBytes
//! ```
//!
//! where `extBytes` is the audio file extension, UTF-8, lowercase, without a
//! leading dot. Readers dispatch on the header's minor version: minor >= 1
//! parses the layout above, minor 0 parses the legacy layout
//!
//! ```text
//! u32 docLen | docBytes | i32 audioTypeCode | u64 audioLen | audioBytes
//! ```
//!
//! whose only defined audio type code is 1 ("wav"). All integers
//! little-endian.

use crate::error::{ContainerError, FormatError};

/// Legacy audio type code carried by minor-version-0 payloads.
pub const LEGACY_AUDIO_WAV: i32 = 1;

/// The logical content of a container: one document, one audio asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Serialized chart document, opaque to the container layer.
    pub document: Vec<u8>,
    /// Audio file extension, lowercase, no leading dot (e.g. "ogg").
    pub audio_ext: String,
    /// Raw audio bytes.
    pub audio: Vec<u8>,
}

/// Serializes a payload using the current layout.
pub fn encode(payload: &Payload) -> Result<Vec<u8>, ContainerError> {
    let doc_len = u32::try_from(payload.document.len())
        .map_err(|_| FormatError::Oversized("document"))?;
    let ext_len = u16::try_from(payload.audio_ext.len())
        .map_err(|_| FormatError::Oversized("audio extension"))?;

    let mut buf = Vec::with_capacity(
        4 + payload.document.len() + 2 + payload.audio_ext.len() + 8 + payload.audio.len(),
    );

    buf.extend_from_slice(&doc_len.to_le_bytes());
    buf.extend_from_slice(&payload.document);
    buf.extend_from_slice(&ext_len.to_le_bytes());
    buf.extend_from_slice(payload.audio_ext.as_bytes());
    buf.extend_from_slice(&(payload.audio.len() as u64).to_le_bytes());
    buf.extend_from_slice(&payload.audio);

    Ok(buf)
}

/// Deserializes a payload, dispatching on the container's minor version.
pub fn decode(version_minor: u8, data: &[u8]) -> Result<Payload, ContainerError> {
    let mut reader = Reader::new(data);

    let payload = match version_minor {
        0 => decode_legacy(&mut reader)?,
        _ => decode_current(&mut reader)?,
    };

    let trailing = reader.remaining();
    if trailing != 0 {
        return Err(FormatError::TrailingData(trailing).into());
    }

    Ok(payload)
}

fn decode_current(reader: &mut Reader<'_>) -> Result<Payload, ContainerError> {
    let doc_len = reader.read_u32("document length")? as usize;
    let document = reader.read_bytes(doc_len, "document")?.to_vec();

    let ext_len = reader.read_u16("extension length")? as usize;
    let ext_bytes = reader.read_bytes(ext_len, "audio extension")?;
    let audio_ext = std::str::from_utf8(ext_bytes)
        .map_err(|_| FormatError::BadExtension)?
        .to_owned();

    let audio_len = reader.read_u64("audio length")?;
    let audio_len = usize::try_from(audio_len).map_err(|_| FormatError::Truncated("audio"))?;
    let audio = reader.read_bytes(audio_len, "audio")?.to_vec();

    Ok(Payload {
        document,
        audio_ext,
        audio,
    })
}

fn decode_legacy(reader: &mut Reader<'_>) -> Result<Payload, ContainerError> {
    let doc_len = reader.read_u32("document length")? as usize;
    let document = reader.read_bytes(doc_len, "document")?.to_vec();

    let code = reader.read_i32("audio type code")?;
    let audio_ext = match code {
        LEGACY_AUDIO_WAV => "wav".to_owned(),
        other => return Err(FormatError::UnknownAudioType(other).into()),
    };

    let audio_len = reader.read_u64("audio length")?;
    let audio_len = usize::try_from(audio_len).map_err(|_| FormatError::Truncated("audio"))?;
    let audio = reader.read_bytes(audio_len, "audio")?.to_vec();

    Ok(Payload {
        document,
        audio_ext,
        audio,
    })
}

/// Bounds-checked sequential reader over the decompressed payload.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(FormatError::Truncated(field));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_u16(&mut self, field: &'static str) -> Result<u16, FormatError> {
        let bytes = self.read_bytes(2, field)?;
        Ok(u16::from_le_bytes(bytes.try_into().expect("read_bytes returned 2 bytes")))
    }

    fn read_u32(&mut self, field: &'static str) -> Result<u32, FormatError> {
        let bytes = self.read_bytes(4, field)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("read_bytes returned 4 bytes")))
    }

    fn read_i32(&mut self, field: &'static str) -> Result<i32, FormatError> {
        let bytes = self.read_bytes(4, field)?;
        Ok(i32::from_le_bytes(bytes.try_into().expect("read_bytes returned 4 bytes")))
    }

    fn read_u64(&mut self, field: &'static str) -> Result<u64, FormatError> {
        let bytes = self.read_bytes(8, field)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("read_bytes returned 8 bytes")))
    }
}
