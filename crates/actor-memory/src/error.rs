use encore_actor::ActorError;
use encore_model::{GigId, GigStatus, IdentityId, Role, SlotId};
use thiserror::Error;

use crate::Operation;

/// Errors returned by the in-memory backend.
#[derive(Debug, Error)]
pub enum Error {
    /// Stored record could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] encore_model::Error),

    /// A gig with this id already exists.
    #[error("gig {0} already exists")]
    DuplicateGig(GigId),

    /// A slot with this id already exists.
    #[error("slot {0} already exists")]
    DuplicateSlot(SlotId),

    /// Gig does not exist.
    #[error("gig not found: {0}")]
    GigNotFound(GigId),

    /// Failure injected through `MemoryBackend::fail_next`.
    #[error("injected failure in {0}")]
    Injected(Operation),

    /// Payout exceeds the available balance.
    #[error("insufficient funds: {available} available, {requested} requested")]
    InsufficientFunds {
        /// Available balance.
        available: u64,
        /// Requested payout.
        requested: u64,
    },

    /// Gig cannot move to the requested status from its current one.
    #[error("gig {gig_id} is {status:?}")]
    InvalidTransition {
        /// Gig in question.
        gig_id: GigId,
        /// Its current status.
        status: GigStatus,
    },

    /// Profile does not exist.
    #[error("profile not found: {0}")]
    ProfileNotFound(IdentityId),

    /// Attempt to change the role of an existing profile.
    #[error("role is fixed at {existing}, cannot become {requested}")]
    RoleChange {
        /// Role stored on the profile.
        existing: Role,
        /// Role the caller tried to save.
        requested: Role,
    },

    /// Slot does not exist.
    #[error("slot not found: {0}")]
    SlotNotFound(SlotId),

    /// Caller is not allowed to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
}

impl ActorError for Error {}
