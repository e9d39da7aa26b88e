use serde::{Deserialize, Serialize};

/// Server-computed balance breakdown for a musician.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct WalletState {
    /// Held in escrow until the gig completes.
    pub locked: u64,

    /// Released and ready to withdraw.
    pub available: u64,

    /// Already withdrawn.
    pub paid: u64,
}

impl WalletState {
    /// Sum of all three components, for display.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.locked
            .saturating_add(self.available)
            .saturating_add(self.paid)
    }

    /// What the musician has actually earned: released plus withdrawn.
    #[must_use]
    pub const fn earnings(&self) -> u64 {
        self.available.saturating_add(self.paid)
    }
}
