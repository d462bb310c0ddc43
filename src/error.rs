//! Error taxonomy for the group-signature engine.

use thiserror::Error;

/// A single flat error type covering every failure kind the engine can
/// produce: precondition violations, malformed wire input, undersized
/// output buffers, undersized seeds, and verification failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GsError {
    #[error("operation requires state that has not been loaded: {0}")]
    Precondition(&'static str),

    #[error("seed must be at least 128 bytes, got {0}")]
    SeedTooSmall(usize),

    #[error("invalid group private key")]
    InvalidGroupPrivateKey,

    #[error("invalid group public key")]
    InvalidGroupPublicKey,

    #[error("invalid user private key")]
    InvalidUserPrivateKey,

    #[error("invalid user credentials")]
    InvalidUserCredentials,

    #[error("invalid join message")]
    InvalidJoinMessage,

    #[error("invalid join response")]
    InvalidJoinResponse,

    #[error("invalid signature encoding")]
    InvalidSignature,

    #[error("buffer did not decode to a valid curve point")]
    InvalidPointEncoding,

    #[error("output buffer too small")]
    OutputBufferTooSmall,

    #[error("input buffer too short")]
    InputTooShort,

    #[error("signature or proof failed verification")]
    VerificationFailed,
}

pub type Result<T> = std::result::Result<T, GsError>;
