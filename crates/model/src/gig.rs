use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContractRef, IdentityId, Timed};

/// Gig identifier, assigned by the booking venue.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct GigId(pub u64);

impl fmt::Display for GigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a gig. Bookings start confirmed; verification completes them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    /// Awaiting confirmation.
    Pending,

    /// Booked; funds locked.
    Confirmed,

    /// Attendance verified; funds released. Terminal.
    Completed,
}

/// A booked performance linking one venue and one musician.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Gig {
    /// Gig identifier.
    pub id: GigId,

    /// Event name.
    pub name: String,

    /// Scheduled time.
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub date: DateTime<Utc>,

    /// Agreed fee.
    pub price: u64,

    /// Current status.
    pub status: GigStatus,

    /// Booking venue.
    pub venue_id: IdentityId,

    /// Booked musician.
    pub musician_id: IdentityId,

    /// Signed contract, once uploaded.
    pub contract: Option<ContractRef>,
}

impl Gig {
    /// Payload a venue expects when scanning this gig's ticket.
    #[must_use]
    pub fn ticket_payload(&self) -> String {
        format!("gig-{}", self.id)
    }
}

impl Timed for Gig {
    fn timestamp(&self) -> DateTime<Utc> {
        self.date
    }
}
