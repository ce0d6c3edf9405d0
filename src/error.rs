//! Error types for container packing and unpacking.
//!
//! Every layer raises a specific error class; the orchestrator propagates the
//! first failure unchanged. Authentication failures are kept distinct from
//! format failures so callers can treat them as security-relevant events.

use thiserror::Error;

/// Structural problems with the container or its payload framing.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("not a dechest container (bad magic)")]
    BadMagic,

    #[error("unsupported container version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    #[error("unrecognized container flags {0:#06x}")]
    UnknownFlags(u16),

    #[error("container truncated while reading {0}")]
    Truncated(&'static str),

    #[error("ciphertext length mismatch: header records {expected} bytes, file carries {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("{0} bytes of trailing data after payload")]
    TrailingData(usize),

    #[error("unknown legacy audio type code {0}")]
    UnknownAudioType(i32),

    #[error("audio extension is not valid UTF-8")]
    BadExtension,

    #[error("{0} does not fit the payload length field")]
    Oversized(&'static str),

    #[error("chart document is not valid JSON: {0}")]
    Document(#[from] serde_json::Error),
}

/// Top-level error for every pack or unpack operation.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container format error: {0}")]
    Format(#[from] FormatError),

    /// MAC verification failed. The file was tampered with, corrupted in
    /// transit, or sealed with a different secret. Nothing past the header
    /// has been decrypted when this is raised.
    #[error("authentication failed: container is corrupt or was sealed with a different secret")]
    Authentication,

    /// Padding or block-alignment failure during decryption. Only reachable
    /// after MAC verification passed, so it indicates an internal
    /// inconsistency rather than external tampering.
    #[error("decryption failed: invalid cipher padding")]
    Crypto,

    #[error("decompression failed: {0}")]
    Compression(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
