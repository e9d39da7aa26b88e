//! Typed writes and the cache scopes each one stales on success.

use std::fmt::Debug;

use async_trait::async_trait;
use encore_actor::Actor;
use encore_model::{ContractRef, Gig, GigId, Slot, SlotId, UserProfile};

use crate::QueryScope;

/// A write through the query client.
#[async_trait]
pub trait Mutation<A>
where
    Self: Debug + Send + Sync,
    A: Actor,
{
    /// Scopes staled when the write succeeds.
    fn invalidates(&self) -> &'static [QueryScope];

    /// Notification text on success.
    fn success_message(&self) -> &'static str;

    /// Prefix of the notification text on failure.
    fn failure_prefix(&self) -> &'static str;

    /// Performs the remote call.
    async fn run(&self, actor: &A) -> Result<(), A::Error>;
}

/// Creates or updates the caller's profile.
#[derive(Clone, Debug)]
pub struct SaveProfile(pub UserProfile);

/// Books a gig.
#[derive(Clone, Debug)]
pub struct BookGig(pub Gig);

/// Verifies attendance of a gig.
#[derive(Clone, Copy, Debug)]
pub struct VerifyGig(pub GigId);

/// Attaches a contract to a gig.
#[derive(Clone, Debug)]
pub struct UploadContract {
    /// Gig the contract belongs to.
    pub gig_id: GigId,

    /// Reference to the uploaded blob.
    pub contract: ContractRef,
}

/// Creates an availability slot.
#[derive(Clone, Debug)]
pub struct CreateSlot(pub Slot);

/// Toggles a slot's availability.
#[derive(Clone, Copy, Debug)]
pub struct UpdateSlotAvailability {
    /// Slot to update.
    pub slot_id: SlotId,

    /// New availability.
    pub available: bool,
}

#[async_trait]
impl<A: Actor> Mutation<A> for SaveProfile {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[QueryScope::CurrentUserProfile]
    }

    fn success_message(&self) -> &'static str {
        "Profile saved successfully"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to save profile"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor.save_caller_profile(self.0.clone()).await
    }
}

#[async_trait]
impl<A: Actor> Mutation<A> for BookGig {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[QueryScope::Gigs, QueryScope::VenueGigs]
    }

    fn success_message(&self) -> &'static str {
        "Gig booked successfully!"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to book gig"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor.book_gig(self.0.clone()).await
    }
}

#[async_trait]
impl<A: Actor> Mutation<A> for VerifyGig {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[
            QueryScope::Gigs,
            QueryScope::VenueGigs,
            QueryScope::MusicianGigs,
            QueryScope::Wallet,
        ]
    }

    fn success_message(&self) -> &'static str {
        "Gig verified successfully!"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to verify gig"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor.verify_gig(self.0).await
    }
}

#[async_trait]
impl<A: Actor> Mutation<A> for UploadContract {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[
            QueryScope::Gigs,
            QueryScope::VenueGigs,
            QueryScope::MusicianGigs,
        ]
    }

    fn success_message(&self) -> &'static str {
        "Contract uploaded successfully"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to upload contract"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor
            .upload_contract(self.gig_id, self.contract.clone())
            .await
    }
}

#[async_trait]
impl<A: Actor> Mutation<A> for CreateSlot {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[QueryScope::Slots]
    }

    fn success_message(&self) -> &'static str {
        "Availability slot created"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to create slot"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor.create_slot(self.0.clone()).await
    }
}

#[async_trait]
impl<A: Actor> Mutation<A> for UpdateSlotAvailability {
    fn invalidates(&self) -> &'static [QueryScope] {
        &[QueryScope::Slots]
    }

    fn success_message(&self) -> &'static str {
        "Availability updated"
    }

    fn failure_prefix(&self) -> &'static str {
        "Failed to update availability"
    }

    async fn run(&self, actor: &A) -> Result<(), A::Error> {
        actor
            .update_slot_availability(self.slot_id, self.available)
            .await
    }
}
