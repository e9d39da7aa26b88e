use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use encore_model::IdentityId;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{Error, IdentityProvider, LoginStatus};

/// Options for the in-memory identity provider.
#[derive(Clone, Debug, Default)]
pub struct MemoryIdentityProviderOptions {
    /// Time the login flow takes before resolving.
    pub login_delay: Option<Duration>,
}

#[derive(Debug)]
struct Inner {
    identity: Mutex<Option<IdentityId>>,
    next_login: Mutex<Result<IdentityId, String>>,
    options: MemoryIdentityProviderOptions,
    status: watch::Sender<LoginStatus>,
}

/// Scripted identity provider. Starts out initializing; every login yields
/// the configured identity or the configured failure.
#[derive(Clone, Debug)]
pub struct MemoryIdentityProvider {
    inner: Arc<Inner>,
}

impl MemoryIdentityProvider {
    /// Creates a provider whose logins yield `identity`.
    #[must_use]
    pub fn new(identity: IdentityId) -> Self {
        Self::with_options(identity, MemoryIdentityProviderOptions::default())
    }

    /// Creates a provider with the given options.
    #[must_use]
    pub fn with_options(identity: IdentityId, options: MemoryIdentityProviderOptions) -> Self {
        let (status, _) = watch::channel(LoginStatus::Initializing);

        Self {
            inner: Arc::new(Inner {
                identity: Mutex::new(None),
                next_login: Mutex::new(Ok(identity)),
                options,
                status,
            }),
        }
    }

    /// Ends initialization with no restored session.
    pub fn finish_initialization(&self) {
        self.inner.status.send_replace(LoginStatus::Idle);
    }

    /// Ends initialization with a session restored from a previous visit.
    pub fn restore(&self, identity: IdentityId) {
        *self.inner.identity.lock() = Some(identity);
        self.inner.status.send_replace(LoginStatus::Success);
    }

    /// Makes subsequent logins yield `identity`.
    pub fn succeed_with(&self, identity: IdentityId) {
        *self.inner.next_login.lock() = Ok(identity);
    }

    /// Makes subsequent logins fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.inner.next_login.lock() = Err(message.into());
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    type Error = Error;

    fn status(&self) -> LoginStatus {
        self.inner.status.borrow().clone()
    }

    fn watch_status(&self) -> watch::Receiver<LoginStatus> {
        self.inner.status.subscribe()
    }

    fn identity(&self) -> Option<IdentityId> {
        *self.inner.identity.lock()
    }

    async fn login(&self) -> Result<IdentityId, Self::Error> {
        match self.status() {
            LoginStatus::Initializing => return Err(Error::Initializing),
            LoginStatus::Success => return Err(Error::AlreadyAuthenticated),
            _ => {}
        }

        self.inner.status.send_replace(LoginStatus::LoggingIn);
        debug!("login started");

        if let Some(delay) = self.inner.options.login_delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.inner.next_login.lock().clone();

        match outcome {
            Ok(identity) => {
                *self.inner.identity.lock() = Some(identity);
                self.inner.status.send_replace(LoginStatus::Success);
                info!(%identity, "logged in");
                Ok(identity)
            }
            Err(message) => {
                self.inner
                    .status
                    .send_replace(LoginStatus::LoginError(message.clone()));
                debug!(%message, "login failed");
                Err(Error::LoginFailed(message))
            }
        }
    }

    async fn clear(&self) {
        *self.inner.identity.lock() = None;
        self.inner.status.send_replace(LoginStatus::Idle);
        debug!("identity cleared");
    }
}
