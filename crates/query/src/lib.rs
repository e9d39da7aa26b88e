//! Keyed cache in front of the backend actor. Concurrent readers of the same
//! key share one remote call, and each successful write stales exactly the
//! scopes it affects.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod client;
mod error;
mod key;
pub mod mutations;
mod notify;
pub mod queries;
mod state;

pub use client::{QueryClient, QueryStats};
pub use error::Error;
pub use key::{QueryKey, QueryScope};
pub use mutations::Mutation;
pub use notify::{Notification, NotificationLevel};
pub use queries::Query;
pub use state::QueryState;

use std::time::Duration;

/// Options for the query client.
#[derive(Clone, Debug)]
pub struct QueryClientOptions {
    /// How long fetched data is served from cache before a read refetches.
    pub stale_time: Duration,

    /// Capacity of the notification channel.
    pub notification_capacity: usize,
}

impl Default for QueryClientOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            notification_capacity: 64,
        }
    }
}
