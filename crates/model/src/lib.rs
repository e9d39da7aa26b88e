//! Records exchanged with the marketplace backend: profiles, gigs, slots,
//! wallet balances and usage telemetry.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod codec;
mod error;
mod gig;
mod identity;
mod profile;
mod slot;
mod usage;
mod wallet;

pub use error::Error;
pub use gig::{Gig, GigId, GigStatus};
pub use identity::IdentityId;
pub use profile::{ContractRef, Role, UserProfile};
pub use slot::{Slot, SlotId};
pub use usage::{AnalyticsSummary, EventType, NewUsageEvent, UsageEvent};
pub use wallet::WalletState;

use chrono::{DateTime, Utc};

/// Anything placed on the timeline, used by the upcoming/sort derivations.
pub trait Timed {
    /// The instant this item is scheduled for (or happened at).
    fn timestamp(&self) -> DateTime<Utc>;
}

impl<T: Timed> Timed for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (*self).timestamp()
    }
}
