//! In-memory (single process) implementation of the marketplace backend for
//! local development and tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod operation;

pub use error::Error;
pub use operation::Operation;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeDelta, Utc};
use encore_actor::{Actor, Connector};
use encore_model::{
    AnalyticsSummary, ContractRef, EventType, Gig, GigId, GigStatus, IdentityId, NewUsageEvent,
    Role, Slot, SlotId, UsageEvent, UserProfile, WalletState,
};
use tokio::sync::{Mutex, MutexGuard};

/// Options for the in-memory backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackendOptions {
    /// Delay applied to every call before it touches state.
    pub latency: Option<Duration>,
}

/// Records are kept CBOR-encoded, the way they would cross the wire.
#[derive(Debug, Default)]
struct State {
    admins: HashSet<IdentityId>,
    calls: HashMap<Operation, usize>,
    events: Vec<Bytes>,
    failures: HashMap<Operation, usize>,
    gigs: BTreeMap<GigId, Bytes>,
    payouts: HashMap<IdentityId, u64>,
    profiles: HashMap<IdentityId, Bytes>,
    slots: BTreeMap<SlotId, Bytes>,
}

fn decode<T>(bytes: &Bytes) -> Result<T, Error>
where
    T: TryFrom<Bytes, Error = encore_model::Error>,
{
    Ok(T::try_from(bytes.clone())?)
}

fn encode<T>(record: T) -> Result<Bytes, Error>
where
    T: TryInto<Bytes, Error = encore_model::Error>,
{
    Ok(record.try_into()?)
}

impl State {
    fn profile(&self, identity: &IdentityId) -> Result<Option<UserProfile>, Error> {
        self.profiles.get(identity).map(decode).transpose()
    }

    fn profiles(&self) -> Result<Vec<UserProfile>, Error> {
        self.profiles.values().map(decode).collect()
    }

    fn gig(&self, gig_id: GigId) -> Result<Gig, Error> {
        self.gigs
            .get(&gig_id)
            .map(decode)
            .transpose()?
            .ok_or(Error::GigNotFound(gig_id))
    }

    fn gigs(&self) -> Result<Vec<Gig>, Error> {
        self.gigs.values().map(decode).collect()
    }

    fn slot(&self, slot_id: SlotId) -> Result<Slot, Error> {
        self.slots
            .get(&slot_id)
            .map(decode)
            .transpose()?
            .ok_or(Error::SlotNotFound(slot_id))
    }

    fn events(&self) -> Result<Vec<UsageEvent>, Error> {
        self.events.iter().map(decode).collect()
    }

    fn role_of(&self, identity: &IdentityId) -> Result<Option<Role>, Error> {
        Ok(self.profile(identity)?.map(|profile| profile.role))
    }
}

/// Shared backend state. Clone it freely; every clone sees the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    options: MemoryBackendOptions,
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(MemoryBackendOptions::default())
    }

    /// Creates an empty backend with the given options.
    #[must_use]
    pub fn with_options(options: MemoryBackendOptions) -> Self {
        Self {
            options,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Opens an actor connection for `caller` (`None` is anonymous).
    #[must_use]
    pub fn connect(&self, caller: Option<IdentityId>) -> MemoryActor {
        MemoryActor {
            backend: self.clone(),
            caller,
        }
    }

    /// Gives an identity the admin flag.
    pub async fn grant_admin(&self, identity: IdentityId) {
        self.state.lock().await.admins.insert(identity);
    }

    /// Makes the next `operation` call fail once.
    pub async fn fail_next(&self, operation: Operation) {
        *self
            .state
            .lock()
            .await
            .failures
            .entry(operation)
            .or_default() += 1;
    }

    /// Number of calls `operation` has received, failed ones included.
    pub async fn call_count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or_default()
    }

    /// Moves `amount` of a musician's available balance to paid.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if more than the available balance is requested.
    pub async fn record_payout(&self, musician: IdentityId, amount: u64) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let wallet = wallet_of(&state, musician)?;

        if amount > wallet.available {
            return Err(Error::InsufficientFunds {
                available: wallet.available,
                requested: amount,
            });
        }

        *state.payouts.entry(musician).or_default() += amount;
        drop(state);

        tracing::debug!(%musician, amount, "recorded payout");
        Ok(())
    }

    async fn enter(&self, operation: Operation) -> Result<MutexGuard<'_, State>, Error> {
        if let Some(latency) = self.options.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        *state.calls.entry(operation).or_default() += 1;

        if let Some(pending) = state.failures.get_mut(&operation) {
            if *pending > 0 {
                *pending -= 1;
                tracing::trace!(%operation, "injecting failure");
                return Err(Error::Injected(operation));
            }
        }

        Ok(state)
    }
}

impl Connector for MemoryBackend {
    type Actor = MemoryActor;

    fn connect(&self, caller: Option<IdentityId>) -> Self::Actor {
        Self::connect(self, caller)
    }
}

fn wallet_of(state: &State, musician: IdentityId) -> Result<WalletState, Error> {
    let mut locked = 0u64;
    let mut earned = 0u64;

    for gig in state.gigs()? {
        if gig.musician_id != musician {
            continue;
        }
        match gig.status {
            GigStatus::Pending | GigStatus::Confirmed => locked = locked.saturating_add(gig.price),
            GigStatus::Completed => earned = earned.saturating_add(gig.price),
        }
    }

    let paid = state.payouts.get(&musician).copied().unwrap_or_default();

    Ok(WalletState {
        locked,
        available: earned.saturating_sub(paid),
        paid,
    })
}

/// An actor connection to a `MemoryBackend`, bound to one caller.
#[derive(Clone, Debug)]
pub struct MemoryActor {
    backend: MemoryBackend,
    caller: Option<IdentityId>,
}

impl MemoryActor {
    /// The identity this connection acts as.
    #[must_use]
    pub const fn caller(&self) -> Option<IdentityId> {
        self.caller
    }

    fn require_caller(&self) -> Result<IdentityId, Error> {
        self.caller.ok_or(Error::Unauthorized("anonymous caller"))
    }

    fn require_admin(&self, state: &State) -> Result<(), Error> {
        let caller = self.require_caller()?;

        if state.admins.contains(&caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized("only admins can view analytics"))
        }
    }
}

#[async_trait]
impl Actor for MemoryActor {
    type Error = Error;

    async fn get_caller_profile(&self) -> Result<Option<UserProfile>, Self::Error> {
        let state = self.backend.enter(Operation::GetCallerProfile).await?;

        match self.caller {
            Some(caller) => state.profile(&caller),
            None => Ok(None),
        }
    }

    async fn get_profile(&self, identity: IdentityId) -> Result<Option<UserProfile>, Self::Error> {
        let state = self.backend.enter(Operation::GetProfile).await?;

        state.profile(&identity)
    }

    async fn save_caller_profile(&self, profile: UserProfile) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::SaveCallerProfile).await?;
        let caller = self.require_caller()?;

        if profile.id != caller {
            return Err(Error::Unauthorized("can only save your own profile"));
        }

        if let Some(existing) = state.role_of(&caller)? {
            if existing != profile.role {
                return Err(Error::RoleChange {
                    existing,
                    requested: profile.role,
                });
            }
        }

        let role = profile.role;
        state.profiles.insert(caller, encode(profile)?);
        drop(state);

        tracing::debug!(%caller, %role, "saved profile");
        Ok(())
    }

    async fn fetch_all_musicians(&self) -> Result<Vec<UserProfile>, Self::Error> {
        let state = self.backend.enter(Operation::FetchAllMusicians).await?;

        Ok(state
            .profiles()?
            .into_iter()
            .filter(|profile| profile.role == Role::Musician)
            .collect())
    }

    async fn fetch_musicians_by_location(
        &self,
        location: String,
    ) -> Result<Vec<UserProfile>, Self::Error> {
        let state = self.backend.enter(Operation::FetchMusiciansByLocation).await?;
        let needle = location.to_lowercase();

        Ok(state
            .profiles()?
            .into_iter()
            .filter(|profile| {
                profile.role == Role::Musician && profile.location.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn fetch_all_gigs(&self) -> Result<Vec<Gig>, Self::Error> {
        let state = self.backend.enter(Operation::FetchAllGigs).await?;

        state.gigs()
    }

    async fn fetch_gigs_by_venue(&self, venue: IdentityId) -> Result<Vec<Gig>, Self::Error> {
        let state = self.backend.enter(Operation::FetchGigsByVenue).await?;

        Ok(state
            .gigs()?
            .into_iter()
            .filter(|gig| gig.venue_id == venue)
            .collect())
    }

    async fn fetch_gigs_by_musician(
        &self,
        musician: IdentityId,
    ) -> Result<Vec<Gig>, Self::Error> {
        let state = self.backend.enter(Operation::FetchGigsByMusician).await?;

        Ok(state
            .gigs()?
            .into_iter()
            .filter(|gig| gig.musician_id == musician)
            .collect())
    }

    async fn book_gig(&self, mut gig: Gig) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::BookGig).await?;
        let caller = self.require_caller()?;

        if state.role_of(&caller)? != Some(Role::Venue) {
            return Err(Error::Unauthorized("only venues can book gigs"));
        }

        if gig.venue_id != caller {
            return Err(Error::Unauthorized("can only book gigs for your own venue"));
        }

        match state.role_of(&gig.musician_id)? {
            Some(Role::Musician) => {}
            Some(_) => return Err(Error::Unauthorized("only musicians can be booked")),
            None => return Err(Error::ProfileNotFound(gig.musician_id)),
        }

        if state.gigs.contains_key(&gig.id) {
            return Err(Error::DuplicateGig(gig.id));
        }

        gig.status = GigStatus::Confirmed;
        let gig_id = gig.id;
        state.gigs.insert(gig_id, encode(gig)?);
        drop(state);

        tracing::debug!(%gig_id, venue = %caller, "booked gig");
        Ok(())
    }

    async fn verify_gig(&self, gig_id: GigId) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::VerifyGig).await?;
        let caller = self.require_caller()?;
        let mut gig = state.gig(gig_id)?;

        if gig.venue_id != caller {
            return Err(Error::Unauthorized("only the booking venue can verify a gig"));
        }

        if gig.status != GigStatus::Confirmed {
            return Err(Error::InvalidTransition {
                gig_id,
                status: gig.status,
            });
        }

        gig.status = GigStatus::Completed;
        state.gigs.insert(gig_id, encode(gig)?);
        drop(state);

        tracing::debug!(%gig_id, "verified gig");
        Ok(())
    }

    async fn upload_contract(
        &self,
        gig_id: GigId,
        contract: ContractRef,
    ) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::UploadContract).await?;
        let caller = self.require_caller()?;
        let mut gig = state.gig(gig_id)?;

        if gig.venue_id != caller && gig.musician_id != caller {
            return Err(Error::Unauthorized("only parties to the gig can upload contracts"));
        }

        if gig.status == GigStatus::Completed {
            return Err(Error::InvalidTransition {
                gig_id,
                status: gig.status,
            });
        }

        gig.contract = Some(contract);
        state.gigs.insert(gig_id, encode(gig)?);

        Ok(())
    }

    async fn fetch_slots_by_musician(
        &self,
        musician: IdentityId,
    ) -> Result<Vec<Slot>, Self::Error> {
        let state = self.backend.enter(Operation::FetchSlotsByMusician).await?;

        let slots = state
            .slots
            .values()
            .map(decode::<Slot>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(slots
            .into_iter()
            .filter(|slot| slot.owner == musician)
            .collect())
    }

    async fn create_slot(&self, slot: Slot) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::CreateSlot).await?;
        let caller = self.require_caller()?;

        if state.role_of(&caller)? != Some(Role::Musician) {
            return Err(Error::Unauthorized("only musicians can create slots"));
        }

        if slot.owner != caller {
            return Err(Error::Unauthorized("can only create your own slots"));
        }

        if state.slots.contains_key(&slot.id) {
            return Err(Error::DuplicateSlot(slot.id));
        }

        state.slots.insert(slot.id, encode(slot)?);

        Ok(())
    }

    async fn update_slot_availability(
        &self,
        slot_id: SlotId,
        available: bool,
    ) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::UpdateSlotAvailability).await?;
        let caller = self.require_caller()?;
        let mut slot = state.slot(slot_id)?;

        if slot.owner != caller {
            return Err(Error::Unauthorized("only the owner can update a slot"));
        }

        slot.is_available = available;
        state.slots.insert(slot_id, encode(slot)?);

        Ok(())
    }

    async fn get_wallet_state(&self, identity: IdentityId) -> Result<WalletState, Self::Error> {
        let state = self.backend.enter(Operation::GetWalletState).await?;

        wallet_of(&state, identity)
    }

    async fn is_caller_admin(&self) -> Result<bool, Self::Error> {
        let state = self.backend.enter(Operation::IsCallerAdmin).await?;

        Ok(self
            .caller
            .is_some_and(|caller| state.admins.contains(&caller)))
    }

    async fn get_analytics_summary(&self) -> Result<AnalyticsSummary, Self::Error> {
        let state = self.backend.enter(Operation::GetAnalyticsSummary).await?;
        self.require_admin(&state)?;

        let events = state.events()?;
        let now = Utc::now();
        let day_ago = now - TimeDelta::days(1);
        let hour_ago = now - TimeDelta::hours(1);

        let distinct = |since: Option<chrono::DateTime<Utc>>| {
            events
                .iter()
                .filter(|event| since.is_none_or(|since| event.timestamp > since))
                .map(|event| event.principal)
                .collect::<HashSet<_>>()
                .len() as u64
        };

        Ok(AnalyticsSummary {
            total_unique_users: distinct(None),
            total_sessions: events
                .iter()
                .filter(|event| event.event_type == EventType::SessionStart)
                .count() as u64,
            daily_active_users: distinct(Some(day_ago)),
            last_active_users: distinct(Some(hour_ago)),
        })
    }

    async fn get_usage_events(&self) -> Result<Vec<UsageEvent>, Self::Error> {
        let state = self.backend.enter(Operation::GetUsageEvents).await?;
        self.require_admin(&state)?;

        let mut events = state.events()?;
        events.reverse();

        Ok(events)
    }

    async fn record_usage_event(&self, event: NewUsageEvent) -> Result<(), Self::Error> {
        let mut state = self.backend.enter(Operation::RecordUsageEvent).await?;
        let caller = self.require_caller()?;

        let NewUsageEvent {
            event_type,
            page,
            action_category,
            action_detail,
        } = event;

        let recorded = UsageEvent {
            timestamp: Utc::now(),
            principal: caller,
            event_type,
            page,
            action_category,
            action_detail,
        };
        state.events.push(encode(recorded)?);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn profile(id: IdentityId, role: Role) -> UserProfile {
        UserProfile {
            id,
            name: format!("{role} user"),
            bio: String::new(),
            phone: "+91 1234567890".to_string(),
            location: "Mumbai, MH".to_string(),
            role,
            rating: 0.0,
            contract: None,
        }
    }

    fn gig(id: u64, venue: IdentityId, musician: IdentityId, price: u64) -> Gig {
        Gig {
            id: GigId(id),
            name: "Friday Night Jazz".to_string(),
            date: Utc::now() + TimeDelta::days(3),
            price,
            status: GigStatus::Pending,
            venue_id: venue,
            musician_id: musician,
            contract: None,
        }
    }

    async fn setup() -> (MemoryBackend, MemoryActor, MemoryActor) {
        let backend = MemoryBackend::new();
        let venue = backend.connect(Some(IdentityId::new()));
        let musician = backend.connect(Some(IdentityId::new()));

        venue
            .save_caller_profile(profile(venue.caller().unwrap(), Role::Venue))
            .await
            .unwrap();
        musician
            .save_caller_profile(profile(musician.caller().unwrap(), Role::Musician))
            .await
            .unwrap();

        (backend, venue, musician)
    }

    #[tokio::test]
    async fn test_caller_profile_absent_until_saved() {
        let backend = MemoryBackend::new();
        let actor = backend.connect(Some(IdentityId::new()));

        assert_eq!(actor.get_caller_profile().await.unwrap(), None);

        actor
            .save_caller_profile(profile(actor.caller().unwrap(), Role::Customer))
            .await
            .unwrap();

        let saved = actor.get_caller_profile().await.unwrap().unwrap();
        assert_eq!(saved.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_role_is_fixed_after_creation() {
        let (_, venue, _) = setup().await;

        let result = venue
            .save_caller_profile(profile(venue.caller().unwrap(), Role::Musician))
            .await;

        assert_matches!(
            result,
            Err(Error::RoleChange {
                existing: Role::Venue,
                requested: Role::Musician
            })
        );
    }

    #[tokio::test]
    async fn test_cannot_save_someone_elses_profile() {
        let backend = MemoryBackend::new();
        let actor = backend.connect(Some(IdentityId::new()));

        let result = actor
            .save_caller_profile(profile(IdentityId::new(), Role::Venue))
            .await;

        assert_matches!(result, Err(Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_booking_confirms_and_locks_funds() {
        let (_, venue, musician) = setup().await;
        let musician_id = musician.caller().unwrap();

        venue
            .book_gig(gig(1, venue.caller().unwrap(), musician_id, 5000))
            .await
            .unwrap();

        let gigs = musician.fetch_gigs_by_musician(musician_id).await.unwrap();
        assert_eq!(gigs.len(), 1);
        assert_eq!(gigs[0].status, GigStatus::Confirmed);

        let wallet = musician.get_wallet_state(musician_id).await.unwrap();
        assert_eq!(
            wallet,
            WalletState {
                locked: 5000,
                available: 0,
                paid: 0
            }
        );
    }

    #[tokio::test]
    async fn test_only_venues_book() {
        let (_, venue, musician) = setup().await;
        let musician_id = musician.caller().unwrap();

        let result = musician
            .book_gig(gig(1, musician_id, musician_id, 10))
            .await;
        assert_matches!(result, Err(Error::Unauthorized(_)));

        let result = venue
            .book_gig(gig(2, venue.caller().unwrap(), IdentityId::new(), 10))
            .await;
        assert_matches!(result, Err(Error::ProfileNotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_gig_rejected() {
        let (_, venue, musician) = setup().await;
        let venue_id = venue.caller().unwrap();
        let musician_id = musician.caller().unwrap();

        venue.book_gig(gig(7, venue_id, musician_id, 10)).await.unwrap();
        let result = venue.book_gig(gig(7, venue_id, musician_id, 10)).await;

        assert_matches!(result, Err(Error::DuplicateGig(GigId(7))));
    }

    #[tokio::test]
    async fn test_verification_completes_once() {
        let (backend, venue, musician) = setup().await;
        let musician_id = musician.caller().unwrap();

        venue
            .book_gig(gig(1, venue.caller().unwrap(), musician_id, 5000))
            .await
            .unwrap();

        assert_matches!(
            musician.verify_gig(GigId(1)).await,
            Err(Error::Unauthorized(_))
        );

        venue.verify_gig(GigId(1)).await.unwrap();
        assert_matches!(
            venue.verify_gig(GigId(1)).await,
            Err(Error::InvalidTransition {
                status: GigStatus::Completed,
                ..
            })
        );

        backend.record_payout(musician_id, 1000).await.unwrap();

        let wallet = musician.get_wallet_state(musician_id).await.unwrap();
        assert_eq!(
            wallet,
            WalletState {
                locked: 0,
                available: 4000,
                paid: 1000
            }
        );
        assert_matches!(
            backend.record_payout(musician_id, 4001).await,
            Err(Error::InsufficientFunds {
                available: 4000,
                requested: 4001
            })
        );
    }

    #[tokio::test]
    async fn test_completed_gig_rejects_contract() {
        let (_, venue, musician) = setup().await;

        venue
            .book_gig(gig(1, venue.caller().unwrap(), musician.caller().unwrap(), 1))
            .await
            .unwrap();
        musician
            .upload_contract(GigId(1), ContractRef("blob-1".to_string()))
            .await
            .unwrap();
        venue.verify_gig(GigId(1)).await.unwrap();

        let result = venue
            .upload_contract(GigId(1), ContractRef("blob-2".to_string()))
            .await;
        assert_matches!(result, Err(Error::InvalidTransition { .. }));

        let gig = venue.fetch_all_gigs().await.unwrap().remove(0);
        assert_eq!(gig.contract, Some(ContractRef("blob-1".to_string())));
    }

    #[tokio::test]
    async fn test_slot_owner_only_toggle() {
        let (_, venue, musician) = setup().await;
        let musician_id = musician.caller().unwrap();

        let slot = Slot {
            id: SlotId(1),
            owner: musician_id,
            start_time: Utc::now(),
            end_time: None,
            is_available: true,
        };

        assert_matches!(
            venue.create_slot(slot.clone()).await,
            Err(Error::Unauthorized(_))
        );
        musician.create_slot(slot).await.unwrap();

        assert_matches!(
            venue.update_slot_availability(SlotId(1), false).await,
            Err(Error::Unauthorized(_))
        );
        musician
            .update_slot_availability(SlotId(1), false)
            .await
            .unwrap();

        let slots = venue.fetch_slots_by_musician(musician_id).await.unwrap();
        assert!(!slots[0].is_available);
    }

    #[tokio::test]
    async fn test_musicians_by_location_is_case_insensitive() {
        let (_, venue, _) = setup().await;

        let found = venue
            .fetch_musicians_by_location("mumbai".to_string())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let found = venue
            .fetch_musicians_by_location("Delhi".to_string())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_analytics_are_admin_only() {
        let (backend, venue, musician) = setup().await;

        venue
            .record_usage_event(NewUsageEvent::bare(EventType::SessionStart))
            .await
            .unwrap();
        musician
            .record_usage_event(NewUsageEvent::bare(EventType::SessionStart))
            .await
            .unwrap();
        venue
            .record_usage_event(NewUsageEvent {
                event_type: EventType::PageView,
                page: Some("/".to_string()),
                action_category: None,
                action_detail: None,
            })
            .await
            .unwrap();

        assert!(!venue.is_caller_admin().await.unwrap());
        assert_matches!(
            venue.get_analytics_summary().await,
            Err(Error::Unauthorized(_))
        );

        backend.grant_admin(venue.caller().unwrap()).await;
        assert!(venue.is_caller_admin().await.unwrap());

        let summary = venue.get_analytics_summary().await.unwrap();
        assert_eq!(summary.total_unique_users, 2);
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.daily_active_users, 2);

        let events = venue.get_usage_events().await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, EventType::PageView);
    }

    #[tokio::test]
    async fn test_anonymous_caller() {
        let backend = MemoryBackend::new();
        let anonymous = backend.connect(None);

        assert_eq!(anonymous.get_caller_profile().await.unwrap(), None);
        assert!(!anonymous.is_caller_admin().await.unwrap());
        assert_matches!(
            anonymous
                .record_usage_event(NewUsageEvent::bare(EventType::PageView))
                .await,
            Err(Error::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let backend = MemoryBackend::new();
        let actor = backend.connect(None);

        backend.fail_next(Operation::FetchAllGigs).await;

        assert_matches!(
            actor.fetch_all_gigs().await,
            Err(Error::Injected(Operation::FetchAllGigs))
        );
        assert!(actor.fetch_all_gigs().await.unwrap().is_empty());
        assert_eq!(backend.call_count(Operation::FetchAllGigs).await, 2);
    }
}
