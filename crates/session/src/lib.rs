//! Identity and session state: who is logged in, and the role a visitor
//! picked on the landing page before their profile exists.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod memory;
mod role;

pub use error::Error;
pub use memory::{MemoryIdentityProvider, MemoryIdentityProviderOptions};
pub use role::RoleSelection;

use std::error::Error as StdError;
use std::fmt::{self, Debug};

use async_trait::async_trait;
use encore_model::IdentityId;
use tokio::sync::watch;

/// Marker trait for identity provider errors.
pub trait IdentityProviderError: Debug + StdError + Send + Sync + 'static {}

/// Progress of the login flow.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoginStatus {
    /// Restoring a previous session; no decision can be made yet.
    Initializing,

    /// Ready, nobody logged in.
    Idle,

    /// A login flow is in progress.
    LoggingIn,

    /// An identity is established.
    Success,

    /// The last login attempt failed.
    LoginError(String),
}

impl LoginStatus {
    /// Whether a login flow is in progress.
    #[must_use]
    pub const fn is_logging_in(&self) -> bool {
        matches!(self, Self::LoggingIn)
    }
}

impl fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => f.write_str("initializing"),
            Self::Idle => f.write_str("idle"),
            Self::LoggingIn => f.write_str("logging-in"),
            Self::Success => f.write_str("success"),
            Self::LoginError(message) => write!(f, "login-error: {message}"),
        }
    }
}

/// Source of the authenticated identity.
#[async_trait]
pub trait IdentityProvider
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for login.
    type Error: IdentityProviderError;

    /// Current login status.
    fn status(&self) -> LoginStatus;

    /// Watches status changes.
    fn watch_status(&self) -> watch::Receiver<LoginStatus>;

    /// The established identity, if any.
    fn identity(&self) -> Option<IdentityId>;

    /// Runs the login flow.
    async fn login(&self) -> Result<IdentityId, Self::Error>;

    /// Forgets the identity.
    async fn clear(&self);
}
