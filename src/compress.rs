//! Payload compression.
//!
//! Raw deflate via flate2 at the highest compression level; packing is an
//! offline operation, so ratio wins over speed. The round trip is
//! byte-for-byte lossless.

use std::io::Read;

use flate2::Compression;
use flate2::read::{DeflateDecoder, DeflateEncoder};

use crate::error::ContainerError;

/// Compress a serialized payload.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let mut encoder = DeflateEncoder::new(data, Compression::best());
    let mut out = Vec::new();
    encoder
        .read_to_end(&mut out)
        .map_err(ContainerError::Compression)?;
    Ok(out)
}

/// Decompress a payload; corrupt streams fail rather than truncate.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(ContainerError::Compression)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_is_lossless() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();

        let packed = compress(&data).unwrap();
        let unpacked = decompress(&packed).unwrap();

        assert_eq!(unpacked, data);
    }

    #[test]
    fn empty_input_roundtrips() {
        let packed = compress(b"").unwrap();
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn repetitive_data_shrinks() {
        let data = vec![7u8; 64 * 1024];
        let packed = compress(&data).unwrap();
        assert!(packed.len() < data.len() / 10);
    }

    #[test]
    fn garbage_input_fails_to_decompress() {
        let err = decompress(&[0xDE, 0xAD, 0xBE, 0xEF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, ContainerError::Compression(_)));
    }

    #[test]
    fn truncated_stream_fails() {
        let packed = compress(&vec![3u8; 1000]).unwrap();
        let err = decompress(&packed[..packed.len() / 2]).unwrap_err();
        assert!(matches!(err, ContainerError::Compression(_)));
    }
}
