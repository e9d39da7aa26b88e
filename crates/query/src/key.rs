use std::fmt;

use encore_model::IdentityId;

/// Cache key: a read operation plus its parameters.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[allow(missing_docs)]
pub enum QueryKey {
    CurrentUserProfile,
    UserProfile(IdentityId),
    Musicians,
    MusiciansByLocation(String),
    Gigs,
    VenueGigs(IdentityId),
    MusicianGigs(IdentityId),
    Slots(IdentityId),
    Wallet(IdentityId),
    IsAdmin,
    AnalyticsSummary,
    UsageEvents,
}

/// Invalidation scope. Staling a scope stales every key of that operation,
/// whatever its parameters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(missing_docs)]
pub enum QueryScope {
    CurrentUserProfile,
    UserProfile,
    Musicians,
    MusiciansByLocation,
    Gigs,
    VenueGigs,
    MusicianGigs,
    Slots,
    Wallet,
    IsAdmin,
    AnalyticsSummary,
    UsageEvents,
}

impl QueryKey {
    /// The scope this key belongs to.
    #[must_use]
    pub const fn scope(&self) -> QueryScope {
        match self {
            Self::CurrentUserProfile => QueryScope::CurrentUserProfile,
            Self::UserProfile(_) => QueryScope::UserProfile,
            Self::Musicians => QueryScope::Musicians,
            Self::MusiciansByLocation(_) => QueryScope::MusiciansByLocation,
            Self::Gigs => QueryScope::Gigs,
            Self::VenueGigs(_) => QueryScope::VenueGigs,
            Self::MusicianGigs(_) => QueryScope::MusicianGigs,
            Self::Slots(_) => QueryScope::Slots,
            Self::Wallet(_) => QueryScope::Wallet,
            Self::IsAdmin => QueryScope::IsAdmin,
            Self::AnalyticsSummary => QueryScope::AnalyticsSummary,
            Self::UsageEvents => QueryScope::UsageEvents,
        }
    }
}

impl QueryScope {
    /// Operation name shared by every key in the scope.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CurrentUserProfile => "currentUserProfile",
            Self::UserProfile => "userProfile",
            Self::Musicians => "musicians",
            Self::MusiciansByLocation => "musiciansByLocation",
            Self::Gigs => "gigs",
            Self::VenueGigs => "venueGigs",
            Self::MusicianGigs => "musicianGigs",
            Self::Slots => "slots",
            Self::Wallet => "wallet",
            Self::IsAdmin => "isAdmin",
            Self::AnalyticsSummary => "analyticsSummary",
            Self::UsageEvents => "usageEvents",
        }
    }
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.scope();

        match self {
            Self::UserProfile(id)
            | Self::VenueGigs(id)
            | Self::MusicianGigs(id)
            | Self::Slots(id)
            | Self::Wallet(id) => write!(f, "{scope}/{id}"),
            Self::MusiciansByLocation(location) => write!(f, "{scope}/{location}"),
            _ => write!(f, "{scope}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_with_different_parameters_share_a_scope() {
        let a = QueryKey::VenueGigs(IdentityId::new());
        let b = QueryKey::VenueGigs(IdentityId::new());

        assert_ne!(a, b);
        assert_eq!(a.scope(), b.scope());
        assert_ne!(a.scope(), QueryKey::Gigs.scope());
    }

    #[test]
    fn test_display() {
        let id = IdentityId::new();

        assert_eq!(QueryKey::Gigs.to_string(), "gigs");
        assert_eq!(QueryKey::Wallet(id).to_string(), format!("wallet/{id}"));
    }
}
