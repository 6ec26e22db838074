use std::time::Duration;
use thiserror::Error;

pub type NimbusResult<T> = Result<T, NimbusError>;

#[derive(Debug, Error)]
pub enum NimbusError {
    #[error("identifier is not valid hex: {0}")]
    InvalidHexId(#[from] hex::FromHexError),

    #[error("{0} must not be empty")]
    EmptySecret(&'static str),

    #[error("envelope truncated: {len} bytes, need at least {min}")]
    TruncatedEnvelope { len: usize, min: usize },

    #[error("envelope is not valid base64: {0}")]
    EnvelopeEncoding(#[from] base64::DecodeError),

    #[error("ciphertext authentication failed")]
    Authentication,

    #[error("cipher operation failed")]
    Cipher,

    #[error("no proxy endpoint became available within {0:?}")]
    ProxyStarved(Duration),
}
