//! Client for the Encore gig marketplace: the operations behind every view,
//! the dashboard view models and the root gate wiring.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod dashboards;
pub mod derive;
mod error;
mod forms;
mod telemetry;
pub mod tickets;

pub use dashboards::{
    AdminDashboard, CustomerDashboard, LandingView, MusicianDashboard, UsageEventRow,
    VenueDashboard,
};
pub use error::Error;
pub use forms::{BookingForm, ProfileForm};
pub use telemetry::Telemetry;
pub use tickets::TicketOptions;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use encore_actor::Connector;
use encore_gate::{GateInput, GateState};
use encore_model::{ContractRef, Gig, GigId, IdentityId, Role, Slot, SlotId, UserProfile};
use encore_query::mutations::{
    BookGig, CreateSlot, SaveProfile, UpdateSlotAvailability, UploadContract, VerifyGig,
};
use encore_query::queries::{CallerProfile, IsAdmin};
use encore_query::{Notification, QueryClient, QueryClientOptions, QueryState};
use encore_session::{IdentityProvider, RoleSelection};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

/// Options for the client.
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// Path of the admin analytics route.
    pub admin_path: String,

    /// Query client options.
    pub query: QueryClientOptions,

    /// Ticket image geometry.
    pub ticket: TicketOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            admin_path: "/admin".to_string(),
            query: QueryClientOptions::default(),
            ticket: TicketOptions::default(),
        }
    }
}

/// The client. Owns the query cache, the identity provider and the actor
/// connection, which always follows the provider's current identity.
#[derive(Clone, Debug)]
pub struct Client<C, P>
where
    C: Connector,
    P: IdentityProvider,
{
    connected: Arc<Mutex<Option<IdentityId>>>,
    connector: C,
    identity: P,
    options: ClientOptions,
    query: QueryClient<C::Actor>,
    roles: RoleSelection,
    telemetry: Telemetry<C::Actor>,
}

impl<C, P> Client<C, P>
where
    C: Connector,
    P: IdentityProvider,
{
    /// Creates a client connected as the provider's current identity, or
    /// anonymously.
    pub async fn new(connector: C, identity: P, options: ClientOptions) -> Self {
        let query = QueryClient::new(options.query.clone());
        let current = identity.identity();
        query.connect(connector.connect(current)).await;

        Self {
            connected: Arc::new(Mutex::new(current)),
            connector,
            identity,
            options,
            telemetry: Telemetry::new(query.clone()),
            query,
            roles: RoleSelection::default(),
        }
    }

    /// The query client.
    pub const fn query(&self) -> &QueryClient<C::Actor> {
        &self.query
    }

    /// The identity provider.
    pub const fn identity_provider(&self) -> &P {
        &self.identity
    }

    /// The role picked on the landing page.
    pub const fn role_selection(&self) -> &RoleSelection {
        &self.roles
    }

    /// The established identity, if any.
    pub fn identity(&self) -> Option<IdentityId> {
        self.identity.identity()
    }

    /// Subscribes to user-visible notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.query.subscribe()
    }

    /// Usage tracking.
    pub const fn telemetry(&self) -> &Telemetry<C::Actor> {
        &self.telemetry
    }

    /// Reconnects the actor if the provider's identity changed, for example
    /// when a session is restored, and returns the current identity.
    async fn sync(&self) -> Option<IdentityId> {
        let current = self.identity.identity();
        let mut connected = self.connected.lock().await;

        if *connected != current {
            self.query.connect(self.connector.connect(current)).await;
            debug!(from = ?*connected, to = ?current, "reconnected actor");
            *connected = current;
        }

        current
    }

    fn reject<T>(&self, error: Error) -> Result<T, Error> {
        self.query.notify(Notification::error(error.to_string()));
        Err(error)
    }

    /// Logs in, remembering `role` for profile setup.
    ///
    /// # Errors
    ///
    /// Returns `Login` if the identity provider rejects the attempt.
    pub async fn login(&self, role: Option<Role>) -> Result<IdentityId, Error> {
        if let Some(role) = role {
            self.roles.set(role);
        }

        let identity = match self.identity.login().await {
            Ok(identity) => identity,
            // Already logged in: carry on with that identity.
            Err(error) => match self.identity.identity() {
                Some(identity) => identity,
                None => {
                    warn!(%error, "login failed");
                    return Err(Error::Login(error.to_string()));
                }
            },
        };

        self.sync().await;
        self.telemetry.login(Some(identity)).await;
        info!(%identity, ?role, "logged in");

        Ok(identity)
    }

    /// Logs out: forgets the identity, the cache and the role selection, and
    /// falls back to an anonymous connection.
    pub async fn logout(&self) {
        let identity = self.identity.identity();
        self.telemetry.logout(identity).await;

        self.identity.clear().await;
        self.query.clear().await;
        self.roles.clear();
        self.sync().await;

        info!(?identity, "logged out");
    }

    async fn require_identity(&self, message: &'static str) -> Result<IdentityId, Error> {
        self.sync()
            .await
            .map_or_else(|| self.reject(Error::Validation(message)), Ok)
    }

    /// Validates and saves the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any remote call, or `Query` if the save failed.
    pub async fn submit_profile(&self, form: ProfileForm) -> Result<UserProfile, Error> {
        let identity = self.require_identity("Please log in first").await?;
        let profile = match form.into_profile(identity, self.roles.get()) {
            Ok(profile) => profile,
            Err(error) => return self.reject(error),
        };

        self.query.mutate(&SaveProfile(profile.clone())).await?;
        self.roles.clear();
        self.telemetry
            .action(Some(identity), "profile", Some(profile.role.to_string()))
            .await;

        Ok(profile)
    }

    /// Validates and books `musician` for the calling venue.
    ///
    /// # Errors
    ///
    /// Returns `Validation` before any remote call, or `Query` if the booking failed.
    pub async fn submit_booking(
        &self,
        musician: &UserProfile,
        form: BookingForm,
        now: DateTime<Utc>,
    ) -> Result<GigId, Error> {
        let venue = self.require_identity("Please log in first").await?;
        let gig = match form.into_gig(venue, musician.id, now) {
            Ok(gig) => gig,
            Err(error) => return self.reject(error),
        };
        let gig_id = gig.id;

        self.query.mutate(&BookGig(gig)).await?;
        self.telemetry
            .action(Some(venue), "booking", Some(gig_id.to_string()))
            .await;

        Ok(gig_id)
    }

    /// Creates an available slot at 20:00 UTC tomorrow for the calling musician.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when logged out, or `Query` if the write failed.
    pub async fn create_slot(&self, now: DateTime<Utc>) -> Result<SlotId, Error> {
        let owner = self.require_identity("User ID not available").await?;
        let start_time = now.date_naive().and_time(NaiveTime::MIN).and_utc()
            + TimeDelta::days(1)
            + TimeDelta::hours(20);

        let slot = Slot {
            id: SlotId(forms::id_from(now)),
            owner,
            start_time,
            end_time: None,
            is_available: true,
        };
        let slot_id = slot.id;

        self.query.mutate(&CreateSlot(slot)).await?;

        Ok(slot_id)
    }

    /// Flips a slot's availability.
    ///
    /// # Errors
    ///
    /// Returns `Query` if the write failed.
    pub async fn toggle_slot(&self, slot: &Slot) -> Result<(), Error> {
        self.sync().await;
        self.query
            .mutate(&UpdateSlotAvailability {
                slot_id: slot.id,
                available: !slot.is_available,
            })
            .await?;

        Ok(())
    }

    /// Verifies attendance from a scanned ticket. Only the exact payload of
    /// `gig` triggers verification.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTicket` without any remote call if the payload does
    /// not match, or `Query` if verification failed.
    pub async fn confirm_scan(&self, gig: &Gig, payload: &str) -> Result<(), Error> {
        let identity = self.sync().await;

        if payload != gig.ticket_payload() {
            debug!(gig_id = %gig.id, payload, "rejected ticket");
            self.query.notify(Notification::error(
                "Invalid QR code. Please scan the correct musician ticket.",
            ));
            return Err(Error::InvalidTicket(gig.id));
        }

        self.query.mutate(&VerifyGig(gig.id)).await?;
        self.telemetry
            .action(identity, "verification", Some(gig.id.to_string()))
            .await;

        Ok(())
    }

    /// Writes the ticket for `gig` into `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns `Image` or `Io` if the ticket could not be produced.
    pub async fn download_ticket(&self, gig: &Gig, dir: &Path) -> Result<PathBuf, Error> {
        let identity = self.sync().await;

        match tickets::write_ticket(gig, dir, &self.options.ticket).await {
            Ok(path) => {
                self.query
                    .notify(Notification::success("QR ticket downloaded successfully!"));
                self.telemetry
                    .action(identity, "ticket", Some(gig.id.to_string()))
                    .await;
                Ok(path)
            }
            Err(error) => {
                warn!(gig_id = %gig.id, %error, "failed to write ticket");
                self.query
                    .notify(Notification::error("Failed to generate QR code"));
                Err(error)
            }
        }
    }

    /// Attaches a contract to a gig.
    ///
    /// # Errors
    ///
    /// Returns `Query` if the upload failed.
    pub async fn upload_contract(&self, gig_id: GigId, contract: ContractRef) -> Result<(), Error> {
        self.sync().await;
        self.query
            .mutate(&UploadContract { gig_id, contract })
            .await?;

        Ok(())
    }

    fn evaluate(
        &self,
        identity: Option<IdentityId>,
        profile: &QueryState<Option<UserProfile>>,
        is_admin: &QueryState<bool>,
        path: &str,
    ) -> GateState {
        encore_gate::evaluate(&GateInput {
            status: &self.identity.status(),
            has_identity: identity.is_some(),
            profile,
            is_admin,
            admin_route: path == self.options.admin_path,
        })
    }

    /// Resolves the gate for `path`, fetching the profile and admin flag.
    /// Authenticated navigation is recorded as a page view.
    pub async fn route(&self, path: &str) -> GateState {
        let identity = self.sync().await;

        let (profile, is_admin) = if identity.is_some() {
            tokio::join!(self.query.fetch(&CallerProfile), self.query.fetch(&IsAdmin))
        } else {
            (QueryState::Disabled, QueryState::Disabled)
        };

        let state = self.evaluate(identity, &profile, &is_admin, path);

        if identity.is_some() {
            self.telemetry.session_start(identity).await;
            self.telemetry.page_view(identity, path).await;
        }

        state
    }

    /// The gate for `path` from what is cached right now, without fetching.
    pub async fn gate(&self, path: &str) -> GateState {
        let identity = self.sync().await;

        let (profile, is_admin) = if identity.is_some() {
            (
                self.query.peek(&CallerProfile).await,
                self.query.peek(&IsAdmin).await,
            )
        } else {
            (QueryState::Disabled, QueryState::Disabled)
        };

        self.evaluate(identity, &profile, &is_admin, path)
    }
}
