//! Contains all the data structures that map to database tables or query results,
//! plus the small value types the flows pass into the store.

use sqlx::Type;
use sqlx::types::chrono::{DateTime, Utc};
use std::fmt;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub platform_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `@handle` when the platform gave us one, otherwise the internal id.
    pub fn display_handle(&self) -> String {
        match &self.username {
            Some(name) => format!("@{name}"),
            None => format!("user #{}", self.id),
        }
    }
}

/// Identity details used to create (or refresh) a `users` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub platform_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    /// Submitted by the owner and waiting for a moderator.
    Moderation,
    Active,
    Rejected,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Moderation => "moderation",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub price: f64,
    pub location: String,
    pub contact: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The four owner-supplied fields collected by the submission flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub price: f64,
    pub location: String,
    pub contact: String,
}

/// Editable listing fields, numbered 1-4 in the edit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    Title,
    Price,
    Location,
    Contact,
}

impl ListingField {
    pub const ALL: [ListingField; 4] = [Self::Title, Self::Price, Self::Location, Self::Contact];

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Title),
            2 => Some(Self::Price),
            3 => Some(Self::Location),
            4 => Some(Self::Contact),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Title => 1,
            Self::Price => 2,
            Self::Location => 3,
            Self::Contact => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Item name",
            Self::Price => "Rental price",
            Self::Location => "Item location",
            Self::Contact => "Contact details",
        }
    }

    /// Current value of this field on `listing`, formatted for display.
    pub fn value_of(self, listing: &Listing) -> String {
        match self {
            Self::Title => listing.title.clone(),
            Self::Price => listing.price.to_string(),
            Self::Location => listing.location.clone(),
            Self::Contact => listing.contact.clone(),
        }
    }
}

/// A validated single-field change. Column names never come from user input.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingUpdate {
    Title(String),
    Price(f64),
    Location(String),
    Contact(String),
}

impl ListingUpdate {
    pub fn field(&self) -> ListingField {
        match self {
            Self::Title(_) => ListingField::Title,
            Self::Price(_) => ListingField::Price,
            Self::Location(_) => ListingField::Location,
            Self::Contact(_) => ListingField::Contact,
        }
    }

    pub fn apply(&self, listing: &mut Listing) {
        match self {
            Self::Title(v) => listing.title = v.clone(),
            Self::Price(v) => listing.price = *v,
            Self::Location(v) => listing.location = v.clone(),
            Self::Contact(v) => listing.contact = v.clone(),
        }
    }
}

/// Inclusive price bounds. Current flows always set `min == max`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn exact(price: f64) -> Self {
        Self {
            min: Some(price),
            max: Some(price),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// Filters collected by the search flow and persisted as a saved search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub price: PriceRange,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.location.is_none() && self.price.is_unbounded()
    }

    /// Listing-side predicate shared by the in-memory store and saved-search matching.
    /// Keyword hits title or location, location hits location, both case-insensitive substrings.
    pub fn matches(&self, listing: &Listing) -> bool {
        let keyword_ok = self.keyword.as_deref().map_or(true, |k| {
            contains_ignore_case(&listing.title, k) || contains_ignore_case(&listing.location, k)
        });
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |l| contains_ignore_case(&listing.location, l));
        keyword_ok && location_ok && self.price.contains(listing.price)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct SavedSearch {
    pub id: i64,
    pub user_id: i64,
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            keyword: self.keyword.clone(),
            location: self.location.clone(),
            price: PriceRange {
                min: self.min_price,
                max: self.max_price,
            },
        }
    }

    /// A saved search with no filters is a "browse everything" search and never triggers alerts.
    pub fn matches(&self, listing: &Listing) -> bool {
        let filters = self.filters();
        !filters.is_empty() && filters.matches(listing)
    }
}

#[derive(Debug, Clone, Copy, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "review_kind", rename_all = "lowercase")]
pub enum ReviewKind {
    Bot,
    #[sqlx(rename = "ad")]
    Listing,
    Content,
}

/// What a review is about. Only listing reviews carry a listing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Bot,
    Listing(i64),
    Content,
}

impl ReviewTarget {
    pub fn kind(self) -> ReviewKind {
        match self {
            Self::Bot => ReviewKind::Bot,
            Self::Listing(_) => ReviewKind::Listing,
            Self::Content => ReviewKind::Content,
        }
    }

    pub fn listing_id(self) -> Option<i64> {
        match self {
            Self::Listing(id) => Some(id),
            Self::Bot | Self::Content => None,
        }
    }

    pub fn from_parts(kind: ReviewKind, listing_id: Option<i64>) -> Option<Self> {
        match (kind, listing_id) {
            (ReviewKind::Bot, None) => Some(Self::Bot),
            (ReviewKind::Content, None) => Some(Self::Content),
            (ReviewKind::Listing, Some(id)) => Some(Self::Listing(id)),
            _ => None,
        }
    }
}

/// Raw `reviews` row; converted into `Review` once the kind/listing pairing is checked.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ReviewRow {
    pub id: i64,
    pub user_id: i64,
    pub kind: ReviewKind,
    pub ad_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub target: ReviewTarget,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = ReviewRow;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        match ReviewTarget::from_parts(row.kind, row.ad_id) {
            Some(target) => Ok(Review {
                id: row.id,
                user_id: row.user_id,
                target,
                text: row.text,
                created_at: row.created_at,
            }),
            None => Err(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, location: &str, price: f64) -> Listing {
        Listing {
            id: 1,
            user_id: 1,
            title: title.into(),
            price,
            location: location.into(),
            contact: "@bob".into(),
            status: ListingStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn keyword_matches_title_or_location() {
        let filters = SearchFilters {
            keyword: Some("moSc".into()),
            ..Default::default()
        };
        assert!(filters.matches(&listing("Dress", "Moscow", 10.0)));
        assert!(filters.matches(&listing("Moscow coat", "Kazan", 10.0)));
        assert!(!filters.matches(&listing("Dress", "Kazan", 10.0)));
    }

    #[test]
    fn all_present_filters_must_hold() {
        let filters = SearchFilters {
            keyword: Some("dress".into()),
            location: Some("kazan".into()),
            price: PriceRange::exact(900.0),
        };
        assert!(filters.matches(&listing("Red dress", "Kazan", 900.0)));
        assert!(!filters.matches(&listing("Red dress", "Kazan", 901.0)));
        assert!(!filters.matches(&listing("Red dress", "Moscow", 900.0)));
    }

    #[test]
    fn price_range_is_inclusive_and_open_ended() {
        let range = PriceRange {
            min: Some(100.0),
            max: None,
        };
        assert!(range.contains(100.0));
        assert!(range.contains(1e9));
        assert!(!range.contains(99.9));
        assert!(PriceRange::default().contains(0.0));
    }

    #[test]
    fn empty_saved_search_never_alerts() {
        let search = SavedSearch {
            id: 1,
            user_id: 1,
            keyword: None,
            location: None,
            min_price: None,
            max_price: None,
            created_at: Utc::now(),
        };
        assert!(!search.matches(&listing("Dress", "Moscow", 1.0)));
    }

    #[test]
    fn review_target_requires_listing_for_listing_kind() {
        assert_eq!(
            ReviewTarget::from_parts(ReviewKind::Listing, Some(3)),
            Some(ReviewTarget::Listing(3))
        );
        assert_eq!(ReviewTarget::from_parts(ReviewKind::Listing, None), None);
        assert_eq!(ReviewTarget::from_parts(ReviewKind::Bot, Some(3)), None);
    }
}
