//! Root gate: decides which top-level view to show from the login status,
//! the caller's profile read, the admin flag read and the requested route.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt;

use encore_model::{Role, UserProfile};
use encore_query::QueryState;
use encore_session::LoginStatus;

/// Role-specific dashboard.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dashboard {
    /// Bookings, musician search and attendance verification.
    Venue,

    /// Gigs, tickets, wallet and availability.
    Musician,

    /// Upcoming gig browsing.
    Customer,
}

impl From<Role> for Dashboard {
    fn from(role: Role) -> Self {
        match role {
            Role::Venue => Self::Venue,
            Role::Musician => Self::Musician,
            Role::Customer => Self::Customer,
        }
    }
}

/// Top-level view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GateState {
    /// Landing page with login buttons.
    Unauthenticated,

    /// Login flow in progress.
    Authenticating,

    /// Waiting on the profile or admin flag.
    ProfileLoading,

    /// Logged in with no profile yet.
    NeedsProfileSetup,

    /// Admin analytics.
    AdminView,

    /// Admin route requested by a non-admin.
    AccessDenied,

    /// Dashboard for the caller's role.
    Dashboard(Dashboard),

    /// Fallback when the profile could not be read.
    Landing,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => f.write_str("unauthenticated"),
            Self::Authenticating => f.write_str("authenticating"),
            Self::ProfileLoading => f.write_str("profile-loading"),
            Self::NeedsProfileSetup => f.write_str("needs-profile-setup"),
            Self::AdminView => f.write_str("admin-view"),
            Self::AccessDenied => f.write_str("access-denied"),
            Self::Dashboard(dashboard) => write!(f, "dashboard/{dashboard:?}"),
            Self::Landing => f.write_str("landing"),
        }
    }
}

/// Everything the gate looks at.
#[derive(Clone, Copy, Debug)]
pub struct GateInput<'a> {
    /// Login status reported by the identity provider.
    pub status: &'a LoginStatus,

    /// Whether an identity is established.
    pub has_identity: bool,

    /// The caller's profile read.
    pub profile: &'a QueryState<Option<UserProfile>>,

    /// The admin flag read.
    pub is_admin: &'a QueryState<bool>,

    /// Whether the admin route is requested.
    pub admin_route: bool,
}

/// Evaluates the gate.
///
/// An explicit "no profile" answer always leads to profile setup, but only
/// once it has arrived; the admin route outranks role routing; an unreadable
/// profile falls back to the landing page.
#[must_use]
pub fn evaluate(input: &GateInput<'_>) -> GateState {
    let state = decide(input);
    tracing::trace!(%state, status = %input.status, "gate evaluated");
    state
}

fn decide(input: &GateInput<'_>) -> GateState {
    if *input.status == LoginStatus::Initializing {
        return GateState::Unauthenticated;
    }

    if !input.has_identity {
        return if input.status.is_logging_in() {
            GateState::Authenticating
        } else {
            GateState::Unauthenticated
        };
    }

    if matches!(input.profile, QueryState::Success(None)) {
        return GateState::NeedsProfileSetup;
    }

    if input.profile.is_loading() || input.is_admin.is_loading() {
        return GateState::ProfileLoading;
    }

    if input.admin_route {
        return if matches!(input.is_admin, QueryState::Success(true)) {
            GateState::AdminView
        } else {
            GateState::AccessDenied
        };
    }

    match input.profile {
        QueryState::Success(Some(profile)) => GateState::Dashboard(profile.role.into()),
        _ => GateState::Landing,
    }
}
