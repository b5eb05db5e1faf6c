//! The CRUD contract the conversation flows depend on.
//!
//! Every method maps to one statement (or, for `delete_listing`, one transaction).
//! Callers treat any `Err` as "the operation did not happen": they log it and
//! show the user a generic failure, never the underlying error.

use super::models::{
    Listing, ListingDraft, ListingStatus, ListingUpdate, NewUser, Review, ReviewKind,
    ReviewTarget, SavedSearch, SearchFilters, User,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("review {0} has an inconsistent kind/listing pairing")]
    CorruptReview(i64),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /// Creates the user on first contact, refreshes handle/names afterwards. Never duplicates.
    async fn upsert_user(&self, user: &NewUser) -> StoreResult<User>;
    async fn user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Inserts a listing in `moderation` status and returns its id.
    async fn create_listing(&self, owner_id: i64, draft: &ListingDraft) -> StoreResult<i64>;
    async fn listing(&self, id: i64) -> StoreResult<Option<Listing>>;
    async fn listings_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Listing>>;
    async fn listings_by_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>>;
    /// Returns `false` when no listing with `id` exists.
    async fn update_listing_field(&self, id: i64, update: &ListingUpdate) -> StoreResult<bool>;
    async fn set_listing_status(&self, id: i64, status: ListingStatus) -> StoreResult<bool>;
    /// Deletes the listing's reviews and then the listing, atomically.
    async fn delete_listing(&self, id: i64) -> StoreResult<bool>;
    /// Active listings matching every present filter, ordered by id.
    async fn search_listings(&self, filters: &SearchFilters) -> StoreResult<Vec<Listing>>;

    async fn create_search(&self, owner_id: i64, filters: &SearchFilters) -> StoreResult<i64>;
    async fn saved_searches(&self) -> StoreResult<Vec<SavedSearch>>;

    async fn create_review(
        &self,
        author_id: i64,
        target: ReviewTarget,
        text: &str,
    ) -> StoreResult<i64>;
    async fn reviews_by_kind(&self, kind: ReviewKind) -> StoreResult<Vec<Review>>;
    async fn listing_reviews(&self, listing_id: i64) -> StoreResult<Vec<Review>>;
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn upsert_user(&self, user: &NewUser) -> StoreResult<User> {
        (**self).upsert_user(user).await
    }
    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        (**self).user(id).await
    }
    async fn create_listing(&self, owner_id: i64, draft: &ListingDraft) -> StoreResult<i64> {
        (**self).create_listing(owner_id, draft).await
    }
    async fn listing(&self, id: i64) -> StoreResult<Option<Listing>> {
        (**self).listing(id).await
    }
    async fn listings_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Listing>> {
        (**self).listings_by_owner(owner_id).await
    }
    async fn listings_by_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>> {
        (**self).listings_by_status(status).await
    }
    async fn update_listing_field(&self, id: i64, update: &ListingUpdate) -> StoreResult<bool> {
        (**self).update_listing_field(id, update).await
    }
    async fn set_listing_status(&self, id: i64, status: ListingStatus) -> StoreResult<bool> {
        (**self).set_listing_status(id, status).await
    }
    async fn delete_listing(&self, id: i64) -> StoreResult<bool> {
        (**self).delete_listing(id).await
    }
    async fn search_listings(&self, filters: &SearchFilters) -> StoreResult<Vec<Listing>> {
        (**self).search_listings(filters).await
    }
    async fn create_search(&self, owner_id: i64, filters: &SearchFilters) -> StoreResult<i64> {
        (**self).create_search(owner_id, filters).await
    }
    async fn saved_searches(&self) -> StoreResult<Vec<SavedSearch>> {
        (**self).saved_searches().await
    }
    async fn create_review(
        &self,
        author_id: i64,
        target: ReviewTarget,
        text: &str,
    ) -> StoreResult<i64> {
        (**self).create_review(author_id, target, text).await
    }
    async fn reviews_by_kind(&self, kind: ReviewKind) -> StoreResult<Vec<Review>> {
        (**self).reviews_by_kind(kind).await
    }
    async fn listing_reviews(&self, listing_id: i64) -> StoreResult<Vec<Review>> {
        (**self).listing_reviews(listing_id).await
    }
}
