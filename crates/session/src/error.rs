use thiserror::Error;

use crate::IdentityProviderError;

/// Errors from the in-memory identity provider.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// An identity is already established.
    #[error("already authenticated")]
    AlreadyAuthenticated,

    /// The provider has not finished restoring its previous session.
    #[error("identity provider is still initializing")]
    Initializing,

    /// The login flow was rejected.
    #[error("{0}")]
    LoginFailed(String),
}

impl IdentityProviderError for Error {}
