//! Pure derivations over fetched data, recomputed on every render.

use chrono::{DateTime, Utc};
use encore_model::{Gig, GigStatus, Timed};

/// Items scheduled strictly after `now`, in their original order.
pub fn upcoming<I>(items: I, now: DateTime<Utc>) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Timed,
{
    items
        .into_iter()
        .filter(|item| item.timestamp() > now)
        .collect()
}

/// Sorts by timestamp, earliest first. Ties keep their order.
pub fn sort_by_time<T: Timed>(items: &mut [T]) {
    items.sort_by_key(Timed::timestamp);
}

/// Case-insensitive substring match over any of `fields`. An empty query
/// matches everything.
#[must_use]
pub fn matches_search(query: &str, fields: &[&str]) -> bool {
    let query = query.to_lowercase();

    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Confirmed gigs whose date has passed: the venue can now verify attendance.
pub fn awaiting_verification<'a, I>(gigs: I, now: DateTime<Utc>) -> Vec<&'a Gig>
where
    I: IntoIterator<Item = &'a Gig>,
{
    gigs.into_iter()
        .filter(|gig| gig.status == GigStatus::Confirmed && gig.date < now)
        .collect()
}

/// Up to two uppercase initials, one per space-separated word.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// `abcdef...uvwxyz` for identifiers longer than twelve characters.
#[must_use]
pub fn short_principal(principal: &str) -> String {
    let chars: Vec<char> = principal.chars().collect();

    if chars.len() <= 12 {
        return principal.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();

    format!("{head}...{tail}")
}
