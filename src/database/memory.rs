//! In-process `Store` used by the test suite and local dry runs.
//! Mirrors the Postgres schema rules that the flows rely on: unique platform ids,
//! foreign keys on listings/searches/reviews and review-before-listing deletion.

use super::models::{
    Listing, ListingDraft, ListingStatus, ListingUpdate, NewUser, Review, ReviewKind,
    ReviewTarget, SavedSearch, SearchFilters, User,
};
use super::store::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    listings: Vec<Listing>,
    searches: Vec<SavedSearch>,
    reviews: Vec<Review>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, id: i64) -> StoreResult<()> {
        if self.users.iter().any(|u| u.id == id) {
            Ok(())
        } else {
            Err(StoreError::Database(sqlx::Error::RowNotFound))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
    read_latency_ms: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every mutating call fails with `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays every single-listing lookup, to exercise callers racing a slow store.
    pub fn set_read_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.read_latency_ms.store(millis, Ordering::SeqCst);
    }

    async fn simulate_latency(&self) {
        let millis = self.read_latency_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn all_listings(&self) -> Vec<Listing> {
        self.lock().listings.clone()
    }

    pub fn all_searches(&self) -> Vec<SavedSearch> {
        self.lock().searches.clone()
    }

    pub fn all_reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut tables = self.write()?;
        if let Some(existing) = tables
            .users
            .iter_mut()
            .find(|u| u.platform_id == user.platform_id)
        {
            existing.username = user.username.clone();
            existing.first_name = user.first_name.clone();
            existing.last_name = user.last_name.clone();
            return Ok(existing.clone());
        }
        let row = User {
            id: tables.next_id(),
            platform_id: user.platform_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_listing(&self, owner_id: i64, draft: &ListingDraft) -> StoreResult<i64> {
        let mut tables = self.write()?;
        tables.require_user(owner_id)?;
        let id = tables.next_id();
        let now = Utc::now();
        tables.listings.push(Listing {
            id,
            user_id: owner_id,
            title: draft.title.clone(),
            price: draft.price,
            location: draft.location.clone(),
            contact: draft.contact.clone(),
            status: ListingStatus::Moderation,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn listing(&self, id: i64) -> StoreResult<Option<Listing>> {
        self.simulate_latency().await;
        Ok(self.lock().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn listings_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Listing>> {
        Ok(self
            .lock()
            .listings
            .iter()
            .filter(|l| l.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn listings_by_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>> {
        Ok(self
            .lock()
            .listings
            .iter()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn update_listing_field(&self, id: i64, update: &ListingUpdate) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let Some(listing) = tables.listings.iter_mut().find(|l| l.id == id) else {
            return Ok(false);
        };
        update.apply(listing);
        listing.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_listing_status(&self, id: i64, status: ListingStatus) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let Some(listing) = tables.listings.iter_mut().find(|l| l.id == id) else {
            return Ok(false);
        };
        listing.status = status;
        listing.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_listing(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.write()?;
        tables
            .reviews
            .retain(|r| r.target != ReviewTarget::Listing(id));
        let before = tables.listings.len();
        tables.listings.retain(|l| l.id != id);
        Ok(tables.listings.len() != before)
    }

    async fn search_listings(&self, filters: &SearchFilters) -> StoreResult<Vec<Listing>> {
        Ok(self
            .lock()
            .listings
            .iter()
            .filter(|l| l.status == ListingStatus::Active && filters.matches(l))
            .cloned()
            .collect())
    }

    async fn create_search(&self, owner_id: i64, filters: &SearchFilters) -> StoreResult<i64> {
        let mut tables = self.write()?;
        tables.require_user(owner_id)?;
        let id = tables.next_id();
        tables.searches.push(SavedSearch {
            id,
            user_id: owner_id,
            keyword: filters.keyword.clone(),
            location: filters.location.clone(),
            min_price: filters.price.min,
            max_price: filters.price.max,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn saved_searches(&self) -> StoreResult<Vec<SavedSearch>> {
        Ok(self.lock().searches.clone())
    }

    async fn create_review(
        &self,
        author_id: i64,
        target: ReviewTarget,
        text: &str,
    ) -> StoreResult<i64> {
        let mut tables = self.write()?;
        tables.require_user(author_id)?;
        if let ReviewTarget::Listing(listing_id) = target {
            if !tables.listings.iter().any(|l| l.id == listing_id) {
                return Err(StoreError::Database(sqlx::Error::RowNotFound));
            }
        }
        let id = tables.next_id();
        tables.reviews.push(Review {
            id,
            user_id: author_id,
            target,
            text: text.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn reviews_by_kind(&self, kind: ReviewKind) -> StoreResult<Vec<Review>> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.target.kind() == kind)
            .cloned()
            .collect())
    }

    async fn listing_reviews(&self, listing_id: i64) -> StoreResult<Vec<Review>> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.target == ReviewTarget::Listing(listing_id))
            .cloned()
            .collect())
    }
}
