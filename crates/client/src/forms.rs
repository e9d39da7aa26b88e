//! Form input and its validation. Everything here runs before any remote
//! call, so a rejected form never reaches the network.

use chrono::{DateTime, NaiveDateTime, Utc};
use encore_model::{Gig, GigId, GigStatus, IdentityId, Role, UserProfile};

use crate::Error;

/// Profile setup form.
#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    /// Display name. Required.
    pub name: String,

    /// Phone number. Required.
    pub phone: String,

    /// Free-form bio.
    pub bio: String,

    /// City and state. Required.
    pub location: String,

    /// Role picked on the form, if the user changed it.
    pub role: Option<Role>,
}

impl ProfileForm {
    /// Builds the profile to save. The role falls back to the one picked on
    /// the landing page, then to musician.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a required field is empty.
    pub fn into_profile(
        self,
        identity: IdentityId,
        preselected: Option<Role>,
    ) -> Result<UserProfile, Error> {
        if self.name.is_empty() || self.phone.is_empty() || self.location.is_empty() {
            return Err(Error::Validation("Please fill in all required fields"));
        }

        Ok(UserProfile {
            id: identity,
            name: self.name,
            bio: self.bio,
            phone: self.phone,
            location: self.location,
            role: self.role.or(preselected).unwrap_or(Role::Musician),
            rating: 0.0,
            contract: None,
        })
    }
}

/// Booking form, as typed by the venue.
#[derive(Clone, Debug, Default)]
pub struct BookingForm {
    /// Event name.
    pub name: String,

    /// Event date, `YYYY-MM-DDTHH:MM` (UTC) or RFC 3339.
    pub date: String,

    /// Payment amount.
    pub price: String,
}

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|date| date.with_timezone(&Utc))
        })
}

impl BookingForm {
    /// Builds the gig to book. The id comes from the current time in
    /// milliseconds and the status is confirmed from the start.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a field is empty, the date is unreadable or
    /// the price is not a whole number.
    pub fn into_gig(
        self,
        venue: IdentityId,
        musician: IdentityId,
        now: DateTime<Utc>,
    ) -> Result<Gig, Error> {
        if self.name.is_empty() || self.date.is_empty() || self.price.is_empty() {
            return Err(Error::Validation("Please fill in all fields"));
        }

        let date = parse_date(self.date.trim())
            .ok_or(Error::Validation("Please enter a valid date"))?;
        let price = self
            .price
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Validation("Please enter a valid price"))?;

        Ok(Gig {
            id: GigId(id_from(now)),
            name: self.name,
            date,
            price,
            status: GigStatus::Confirmed,
            venue_id: venue,
            musician_id: musician,
            contract: None,
        })
    }
}

/// Record id derived from the current time in milliseconds.
pub(crate) fn id_from(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn booking(name: &str, date: &str, price: &str) -> BookingForm {
        BookingForm {
            name: name.to_string(),
            date: date.to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn test_profile_requires_name_phone_location() {
        let form = ProfileForm {
            name: "Asha".to_string(),
            phone: String::new(),
            location: "Pune".to_string(),
            ..ProfileForm::default()
        };

        assert_matches!(
            form.into_profile(IdentityId::new(), None),
            Err(Error::Validation("Please fill in all required fields"))
        );
    }

    #[test]
    fn test_profile_role_fallbacks() {
        let form = ProfileForm {
            name: "Asha".to_string(),
            phone: "1".to_string(),
            location: "Pune".to_string(),
            ..ProfileForm::default()
        };

        let profile = form.clone().into_profile(IdentityId::new(), None).unwrap();
        assert_eq!(profile.role, Role::Musician);
        assert_eq!(profile.rating, 0.0);

        let profile = form
            .clone()
            .into_profile(IdentityId::new(), Some(Role::Venue))
            .unwrap();
        assert_eq!(profile.role, Role::Venue);

        let form = ProfileForm {
            role: Some(Role::Customer),
            ..form
        };
        let profile = form.into_profile(IdentityId::new(), Some(Role::Venue)).unwrap();
        assert_eq!(profile.role, Role::Customer);
    }

    #[test]
    fn test_booking_builds_confirmed_gig() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let venue = IdentityId::new();
        let musician = IdentityId::new();

        let gig = booking("Friday Night Jazz", "2026-11-20T20:00", " 5000 ")
            .into_gig(venue, musician, now)
            .unwrap();

        assert_eq!(gig.id, GigId(1_792_411_200_000));
        assert_eq!(gig.date, Utc.with_ymd_and_hms(2026, 11, 20, 20, 0, 0).unwrap());
        assert_eq!(gig.price, 5000);
        assert_eq!(gig.status, GigStatus::Confirmed);
        assert_eq!(gig.venue_id, venue);
        assert_eq!(gig.musician_id, musician);
    }

    #[test]
    fn test_booking_rejects_bad_input() {
        let now = Utc::now();
        let (venue, musician) = (IdentityId::new(), IdentityId::new());

        assert_matches!(
            booking("", "2026-11-20T20:00", "1").into_gig(venue, musician, now),
            Err(Error::Validation("Please fill in all fields"))
        );
        assert_matches!(
            booking("Jazz", "next friday", "1").into_gig(venue, musician, now),
            Err(Error::Validation("Please enter a valid date"))
        );
        assert_matches!(
            booking("Jazz", "2026-11-20T20:00", "five").into_gig(venue, musician, now),
            Err(Error::Validation("Please enter a valid price"))
        );
    }
}
