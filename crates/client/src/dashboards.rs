use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use encore_actor::Connector;
use encore_model::{AnalyticsSummary, Gig, GigStatus, Slot, UsageEvent, UserProfile, WalletState};
use encore_query::QueryState;
use encore_query::queries::{
    AllGigs, AllMusicians, Analytics, CallerProfile, IsAdmin, MusicianGigs, SlotsOf, UsageLog,
    VenueGigs, WalletOf,
};
use encore_session::IdentityProvider;

use crate::Client;
use crate::derive::{
    awaiting_verification, matches_search, short_principal, sort_by_time, upcoming,
};

/// Gigs shown on the landing page.
const LANDING_GIGS: usize = 6;

/// Usage events shown on the admin dashboard.
const ADMIN_EVENTS: usize = 50;

/// Venue view: bookings, musician search and verification queue.
#[derive(Clone, Debug, PartialEq)]
pub struct VenueDashboard {
    /// The venue's profile.
    pub profile: Option<UserProfile>,

    /// Every gig the venue booked.
    pub gigs: Vec<Gig>,

    /// Musicians matching the search on name, location or bio.
    pub musicians: Vec<UserProfile>,

    /// Gigs still ahead.
    pub upcoming_count: usize,

    /// Gigs whose attendance was verified.
    pub completed_count: usize,

    /// Confirmed gigs in the past, ready to scan.
    pub awaiting_verification: Vec<Gig>,
}

impl VenueDashboard {
    /// Derives the view from fetched data.
    #[must_use]
    pub fn build(
        profile: Option<UserProfile>,
        gigs: Vec<Gig>,
        musicians: Vec<UserProfile>,
        search: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let musicians = musicians
            .into_iter()
            .filter(|m| {
                matches_search(
                    search,
                    &[m.name.as_str(), m.location.as_str(), m.bio.as_str()],
                )
            })
            .collect();

        Self {
            profile,
            upcoming_count: upcoming(&gigs, now).len(),
            completed_count: gigs
                .iter()
                .filter(|gig| gig.status == GigStatus::Completed)
                .count(),
            awaiting_verification: awaiting_verification(&gigs, now)
                .into_iter()
                .cloned()
                .collect(),
            gigs,
            musicians,
        }
    }
}

/// Musician view: gigs, tickets, wallet and availability.
#[derive(Clone, Debug, PartialEq)]
pub struct MusicianDashboard {
    /// The musician's profile.
    pub profile: Option<UserProfile>,

    /// Every gig the musician is booked for.
    pub gigs: Vec<Gig>,

    /// Gigs still ahead.
    pub upcoming_count: usize,

    /// Confirmed gigs, each with a downloadable ticket.
    pub tickets: Vec<Gig>,

    /// Wallet balances.
    pub wallet: WalletState,

    /// Available plus paid. Locked funds are not earnings yet.
    pub earnings: u64,

    /// Availability slots, earliest first.
    pub slots: Vec<Slot>,
}

impl MusicianDashboard {
    /// Derives the view from fetched data.
    #[must_use]
    pub fn build(
        profile: Option<UserProfile>,
        gigs: Vec<Gig>,
        wallet: WalletState,
        mut slots: Vec<Slot>,
        now: DateTime<Utc>,
    ) -> Self {
        sort_by_time(&mut slots);

        Self {
            profile,
            upcoming_count: upcoming(&gigs, now).len(),
            tickets: gigs
                .iter()
                .filter(|gig| gig.status == GigStatus::Confirmed)
                .cloned()
                .collect(),
            gigs,
            wallet,
            earnings: wallet.earnings(),
            slots,
        }
    }
}

fn upcoming_by_name(gigs: Vec<Gig>, search: &str, now: DateTime<Utc>) -> Vec<Gig> {
    let mut gigs = upcoming(
        gigs.into_iter()
            .filter(|gig| matches_search(search, &[gig.name.as_str()])),
        now,
    );
    sort_by_time(&mut gigs);
    gigs
}

/// Customer view: upcoming gigs, soonest first.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerDashboard {
    /// The customer's profile.
    pub profile: Option<UserProfile>,

    /// Upcoming gigs matching the name search.
    pub gigs: Vec<Gig>,
}

impl CustomerDashboard {
    /// Derives the view from fetched data.
    #[must_use]
    pub fn build(
        profile: Option<UserProfile>,
        gigs: Vec<Gig>,
        search: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            profile,
            gigs: upcoming_by_name(gigs, search, now),
        }
    }
}

/// Public landing page listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandingView {
    /// The first few upcoming gigs matching the name search.
    pub gigs: Vec<Gig>,
}

impl LandingView {
    /// Derives the view from fetched data.
    #[must_use]
    pub fn build(gigs: Vec<Gig>, search: &str, now: DateTime<Utc>) -> Self {
        let mut gigs = upcoming_by_name(gigs, search, now);
        gigs.truncate(LANDING_GIGS);

        Self { gigs }
    }
}

/// One line of the admin usage log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageEventRow {
    /// When it happened.
    pub timestamp: DateTime<Utc>,

    /// Shortened principal.
    pub principal: String,

    /// Event label.
    pub event: &'static str,

    /// Page, for page views.
    pub page: Option<String>,

    /// "category: detail", for actions.
    pub action: Option<String>,
}

impl From<&UsageEvent> for UsageEventRow {
    fn from(event: &UsageEvent) -> Self {
        Self {
            timestamp: event.timestamp,
            principal: short_principal(&event.principal.to_string()),
            event: event.event_type.label(),
            page: event.page.clone(),
            action: event.action_summary(),
        }
    }
}

/// Admin analytics view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminDashboard {
    /// Aggregated counts.
    pub summary: AnalyticsSummary,

    /// Most recent events, newest first.
    pub events: Vec<UsageEventRow>,
}

impl AdminDashboard {
    /// Derives the view from fetched data, in any order.
    #[must_use]
    pub fn build(summary: AnalyticsSummary, events: &[UsageEvent]) -> Self {
        let mut events: Vec<_> = events.iter().collect();
        events.sort_by_key(|event| Reverse(event.timestamp));

        Self {
            summary,
            events: events
                .into_iter()
                .take(ADMIN_EVENTS)
                .map(UsageEventRow::from)
                .collect(),
        }
    }
}

impl<C, P> Client<C, P>
where
    C: Connector,
    P: IdentityProvider,
{
    /// Venue dashboard for the caller.
    pub async fn venue_dashboard(&self, search: &str, now: DateTime<Utc>) -> VenueDashboard {
        let venue_gigs = VenueGigs(self.sync().await);
        let (profile, gigs, musicians) = tokio::join!(
            self.query.fetch(&CallerProfile),
            self.query.fetch(&venue_gigs),
            self.query.fetch(&AllMusicians),
        );

        VenueDashboard::build(
            profile.into_data().flatten(),
            gigs.unwrap_or_default(),
            musicians.unwrap_or_default(),
            search,
            now,
        )
    }

    /// Musician dashboard for the caller.
    pub async fn musician_dashboard(&self, now: DateTime<Utc>) -> MusicianDashboard {
        let identity = self.sync().await;
        let (musician_gigs, wallet_of, slots_of) = (
            MusicianGigs(identity),
            WalletOf(identity),
            SlotsOf(identity),
        );
        let (profile, gigs, wallet, slots) = tokio::join!(
            self.query.fetch(&CallerProfile),
            self.query.fetch(&musician_gigs),
            self.query.fetch(&wallet_of),
            self.query.fetch(&slots_of),
        );

        MusicianDashboard::build(
            profile.into_data().flatten(),
            gigs.unwrap_or_default(),
            wallet.unwrap_or_default(),
            slots.unwrap_or_default(),
            now,
        )
    }

    /// Customer dashboard for the caller.
    pub async fn customer_dashboard(&self, search: &str, now: DateTime<Utc>) -> CustomerDashboard {
        self.sync().await;
        let (profile, gigs) = tokio::join!(
            self.query.fetch(&CallerProfile),
            self.query.fetch(&AllGigs),
        );

        CustomerDashboard::build(
            profile.into_data().flatten(),
            gigs.unwrap_or_default(),
            search,
            now,
        )
    }

    /// Landing page listing. Works anonymously.
    pub async fn landing(&self, search: &str, now: DateTime<Utc>) -> LandingView {
        self.sync().await;
        let gigs = self.query.fetch(&AllGigs).await;

        LandingView::build(gigs.unwrap_or_default(), search, now)
    }

    /// Admin dashboard. Disabled unless the caller is an admin.
    pub async fn admin_dashboard(&self) -> QueryState<AdminDashboard> {
        self.sync().await;
        let is_admin = self.query.fetch(&IsAdmin).await.into_data();
        let (analytics, usage_log) = (Analytics(is_admin), UsageLog(is_admin));
        let (summary, events) = tokio::join!(
            self.query.fetch(&analytics),
            self.query.fetch(&usage_log),
        );

        match (summary, events) {
            (QueryState::Success(summary), QueryState::Success(events)) => {
                QueryState::Success(AdminDashboard::build(summary, &events))
            }
            (QueryState::Error(error), _) | (_, QueryState::Error(error)) => {
                QueryState::Error(error)
            }
            (QueryState::Disabled, _) | (_, QueryState::Disabled) => QueryState::Disabled,
            _ => QueryState::Pending,
        }
    }
}
