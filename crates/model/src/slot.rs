use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IdentityId, Timed};

/// Slot identifier.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SlotId(pub u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A musician-declared availability window.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Slot {
    /// Slot identifier.
    pub id: SlotId,

    /// Owning musician.
    pub owner: IdentityId,

    /// Window start.
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub start_time: DateTime<Utc>,

    /// Window end; open-ended when absent.
    #[serde(with = "chrono::serde::ts_nanoseconds_option")]
    pub end_time: Option<DateTime<Utc>>,

    /// Whether venues may book this window.
    pub is_available: bool,
}

impl Timed for Slot {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start_time
    }
}
