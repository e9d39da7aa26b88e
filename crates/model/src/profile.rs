use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, IdentityId};

/// Marketplace role, fixed when the profile is first created.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books musicians and verifies attendance.
    Venue,

    /// Publishes availability and performs gigs.
    Musician,

    /// Browses upcoming events.
    Customer,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Musician => "musician",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venue" => Ok(Self::Venue),
            "musician" => Ok(Self::Musician),
            "customer" => Ok(Self::Customer),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

/// Opaque reference to an uploaded contract blob.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContractRef(pub String);

/// A user's marketplace profile. One per identity.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserProfile {
    /// Owning identity.
    pub id: IdentityId,

    /// Display name.
    pub name: String,

    /// Free-form biography.
    pub bio: String,

    /// Contact phone number.
    pub phone: String,

    /// City/state the user operates in.
    pub location: String,

    /// Marketplace role.
    pub role: Role,

    /// Average rating; zero means not yet rated.
    pub rating: f64,

    /// Attached contract, if any.
    pub contract: Option<ContractRef>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_role_round_trips_through_its_name() {
        for role in [Role::Venue, Role::Musician, Role::Customer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_matches!("admin".parse::<Role>(), Err(Error::UnknownRole(role)) if role == "admin");
        assert_matches!("Venue".parse::<Role>(), Err(Error::UnknownRole(_)));
    }
}
