use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Record could not be decoded from CBOR.
    #[error("cbor decode error: {0}")]
    Decode(#[from] ciborium::de::Error<std::io::Error>),

    /// Record could not be encoded to CBOR.
    #[error("cbor encode error: {0}")]
    Encode(#[from] ciborium::ser::Error<std::io::Error>),

    /// Identity reference is not a valid principal.
    #[error("invalid identity reference: {0}")]
    InvalidIdentity(#[from] uuid::Error),

    /// Role string is not one of venue/musician/customer.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
