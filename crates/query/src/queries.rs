//! Typed reads. Each query names its cache key and how to run it against an
//! actor; a query without a key is disabled.

use std::fmt::Debug;

use async_trait::async_trait;
use encore_actor::Actor;
use encore_model::{AnalyticsSummary, Gig, IdentityId, Slot, UsageEvent, UserProfile, WalletState};

use crate::QueryKey;

/// A read through the cache.
#[async_trait]
pub trait Query<A>
where
    Self: Clone + Debug + Send + Sync + 'static,
    A: Actor,
{
    /// Data returned by the read.
    type Output: Clone + Send + Sync + 'static;

    /// Cache key, or `None` while a required parameter is missing.
    fn key(&self) -> Option<QueryKey>;

    /// Performs the remote call. Only invoked when `key` is `Some`.
    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error>;
}

/// The caller's own profile.
#[derive(Clone, Copy, Debug)]
pub struct CallerProfile;

/// Profile of an explicit identity.
#[derive(Clone, Copy, Debug)]
pub struct ProfileOf(pub Option<IdentityId>);

/// Every musician.
#[derive(Clone, Copy, Debug)]
pub struct AllMusicians;

/// Musicians whose location matches.
#[derive(Clone, Debug)]
pub struct MusiciansByLocation(pub String);

/// Every gig.
#[derive(Clone, Copy, Debug)]
pub struct AllGigs;

/// Gigs booked by a venue.
#[derive(Clone, Copy, Debug)]
pub struct VenueGigs(pub Option<IdentityId>);

/// Gigs a musician is booked for.
#[derive(Clone, Copy, Debug)]
pub struct MusicianGigs(pub Option<IdentityId>);

/// Slots owned by a musician.
#[derive(Clone, Copy, Debug)]
pub struct SlotsOf(pub Option<IdentityId>);

/// Wallet of an identity.
#[derive(Clone, Copy, Debug)]
pub struct WalletOf(pub Option<IdentityId>);

/// Whether the caller is an admin. A failed call reads as `false`.
#[derive(Clone, Copy, Debug)]
pub struct IsAdmin;

/// Analytics summary, enabled once the admin flag is known to be true.
#[derive(Clone, Copy, Debug)]
pub struct Analytics(pub Option<bool>);

/// Usage log, enabled once the admin flag is known to be true.
#[derive(Clone, Copy, Debug)]
pub struct UsageLog(pub Option<bool>);

#[async_trait]
impl<A: Actor> Query<A> for CallerProfile {
    type Output = Option<UserProfile>;

    fn key(&self) -> Option<QueryKey> {
        Some(QueryKey::CurrentUserProfile)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.get_caller_profile().await
    }
}

#[async_trait]
impl<A: Actor> Query<A> for ProfileOf {
    type Output = Option<UserProfile>;

    fn key(&self) -> Option<QueryKey> {
        self.0.map(QueryKey::UserProfile)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match self.0 {
            Some(identity) => actor.get_profile(identity).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for AllMusicians {
    type Output = Vec<UserProfile>;

    fn key(&self) -> Option<QueryKey> {
        Some(QueryKey::Musicians)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.fetch_all_musicians().await
    }
}

#[async_trait]
impl<A: Actor> Query<A> for MusiciansByLocation {
    type Output = Vec<UserProfile>;

    fn key(&self) -> Option<QueryKey> {
        (!self.0.is_empty()).then(|| QueryKey::MusiciansByLocation(self.0.clone()))
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.fetch_musicians_by_location(self.0.clone()).await
    }
}

#[async_trait]
impl<A: Actor> Query<A> for AllGigs {
    type Output = Vec<Gig>;

    fn key(&self) -> Option<QueryKey> {
        Some(QueryKey::Gigs)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.fetch_all_gigs().await
    }
}

#[async_trait]
impl<A: Actor> Query<A> for VenueGigs {
    type Output = Vec<Gig>;

    fn key(&self) -> Option<QueryKey> {
        self.0.map(QueryKey::VenueGigs)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match self.0 {
            Some(venue) => actor.fetch_gigs_by_venue(venue).await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for MusicianGigs {
    type Output = Vec<Gig>;

    fn key(&self) -> Option<QueryKey> {
        self.0.map(QueryKey::MusicianGigs)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match self.0 {
            Some(musician) => actor.fetch_gigs_by_musician(musician).await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for SlotsOf {
    type Output = Vec<Slot>;

    fn key(&self) -> Option<QueryKey> {
        self.0.map(QueryKey::Slots)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match self.0 {
            Some(musician) => actor.fetch_slots_by_musician(musician).await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for WalletOf {
    type Output = WalletState;

    fn key(&self) -> Option<QueryKey> {
        self.0.map(QueryKey::Wallet)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match self.0 {
            Some(identity) => actor.get_wallet_state(identity).await,
            None => Ok(WalletState::default()),
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for IsAdmin {
    type Output = bool;

    fn key(&self) -> Option<QueryKey> {
        Some(QueryKey::IsAdmin)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        match actor.is_caller_admin().await {
            Ok(is_admin) => Ok(is_admin),
            Err(error) => {
                tracing::debug!(%error, "admin check failed, treating caller as non-admin");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<A: Actor> Query<A> for Analytics {
    type Output = AnalyticsSummary;

    fn key(&self) -> Option<QueryKey> {
        (self.0 == Some(true)).then_some(QueryKey::AnalyticsSummary)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.get_analytics_summary().await
    }
}

#[async_trait]
impl<A: Actor> Query<A> for UsageLog {
    type Output = Vec<UsageEvent>;

    fn key(&self) -> Option<QueryKey> {
        (self.0 == Some(true)).then_some(QueryKey::UsageEvents)
    }

    async fn run(&self, actor: &A) -> Result<Self::Output, A::Error> {
        actor.get_usage_events().await
    }
}
