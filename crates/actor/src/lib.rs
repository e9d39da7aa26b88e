//! Abstract interface for the marketplace backend actor.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use encore_model::{
    AnalyticsSummary, ContractRef, Gig, GigId, IdentityId, NewUsageEvent, Slot, SlotId,
    UsageEvent, UserProfile, WalletState,
};

/// Marker trait for actor errors.
pub trait ActorError: Debug + Error + Send + Sync + 'static {}

/// A connection to the backend actor, bound to the identity it was opened
/// with. Every call is a remote procedure; the backend is the sole source of
/// truth and the sole arbiter of conflicting writes.
#[async_trait]
pub trait Actor
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for remote calls.
    type Error: ActorError;

    /// The caller's own profile, or `None` if it has not been created yet.
    async fn get_caller_profile(&self) -> Result<Option<UserProfile>, Self::Error>;

    /// Profile of an explicit identity.
    async fn get_profile(&self, identity: IdentityId) -> Result<Option<UserProfile>, Self::Error>;

    /// Creates or updates the caller's profile.
    async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), Self::Error>;

    /// Every musician profile.
    async fn fetch_all_musicians(&self) -> Result<Vec<UserProfile>, Self::Error>;

    /// Musician profiles whose location matches.
    async fn fetch_musicians_by_location(
        &self,
        location: String,
    ) -> Result<Vec<UserProfile>, Self::Error>;

    /// Every gig.
    async fn fetch_all_gigs(&self) -> Result<Vec<Gig>, Self::Error>;

    /// Gigs booked by a venue.
    async fn fetch_gigs_by_venue(&self, venue: IdentityId) -> Result<Vec<Gig>, Self::Error>;

    /// Gigs a musician is booked for.
    async fn fetch_gigs_by_musician(&self, musician: IdentityId)
    -> Result<Vec<Gig>, Self::Error>;

    /// Books a gig on behalf of the calling venue.
    async fn book_gig(&self, gig: Gig) -> Result<(), Self::Error>;

    /// Verifies attendance, moving the gig from confirmed to completed.
    async fn verify_gig(&self, gig_id: GigId) -> Result<(), Self::Error>;

    /// Attaches a signed contract to a gig.
    async fn upload_contract(&self, gig_id: GigId, contract: ContractRef)
    -> Result<(), Self::Error>;

    /// Slots owned by a musician.
    async fn fetch_slots_by_musician(&self, musician: IdentityId)
    -> Result<Vec<Slot>, Self::Error>;

    /// Creates a slot owned by the calling musician.
    async fn create_slot(&self, slot: Slot) -> Result<(), Self::Error>;

    /// Marks one of the caller's slots available or unavailable.
    async fn update_slot_availability(
        &self,
        slot_id: SlotId,
        available: bool,
    ) -> Result<(), Self::Error>;

    /// Wallet breakdown of an identity.
    async fn get_wallet_state(&self, identity: IdentityId) -> Result<WalletState, Self::Error>;

    /// Whether the caller carries the admin flag.
    async fn is_caller_admin(&self) -> Result<bool, Self::Error>;

    /// Aggregated usage counts. Admin only.
    async fn get_analytics_summary(&self) -> Result<AnalyticsSummary, Self::Error>;

    /// Full usage log, newest first. Admin only.
    async fn get_usage_events(&self) -> Result<Vec<UsageEvent>, Self::Error>;

    /// Appends a usage event for the caller.
    async fn record_usage_event(&self, event: NewUsageEvent) -> Result<(), Self::Error>;
}

/// Opens actor connections bound to a caller identity.
pub trait Connector
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The actor type produced.
    type Actor: Actor;

    /// Connects as `caller`, or anonymously when `None`.
    fn connect(&self, caller: Option<IdentityId>) -> Self::Actor;
}
