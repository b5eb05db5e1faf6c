//! `Store` implementation backed by the PostgreSQL pool.

use super::init::DbPool;
use super::models::{
    Listing, ListingDraft, ListingStatus, ListingUpdate, NewUser, Review, ReviewKind, ReviewRow,
    ReviewTarget, SavedSearch, SearchFilters, User,
};
use super::store::{Store, StoreError, StoreResult};
use super::{listings, reviews, searches, users};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_reviews(rows: Vec<ReviewRow>) -> StoreResult<Vec<Review>> {
    rows.into_iter()
        .map(|row| Review::try_from(row).map_err(|bad| StoreError::CorruptReview(bad.id)))
        .collect()
}

#[async_trait]
impl Store for PgStore {
    #[instrument(level = "debug", skip(self, user), fields(platform_id = user.platform_id))]
    async fn upsert_user(&self, user: &NewUser) -> StoreResult<User> {
        Ok(users::upsert_user(&self.pool, user).await?)
    }

    async fn user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(users::get_user(&self.pool, id).await?)
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn create_listing(&self, owner_id: i64, draft: &ListingDraft) -> StoreResult<i64> {
        Ok(listings::create_listing(&self.pool, owner_id, draft).await?)
    }

    async fn listing(&self, id: i64) -> StoreResult<Option<Listing>> {
        Ok(listings::get_listing(&self.pool, id).await?)
    }

    async fn listings_by_owner(&self, owner_id: i64) -> StoreResult<Vec<Listing>> {
        Ok(listings::get_owner_listings(&self.pool, owner_id).await?)
    }

    async fn listings_by_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>> {
        Ok(listings::get_listings_by_status(&self.pool, status).await?)
    }

    #[instrument(level = "debug", skip(self, update), fields(field = ?update.field()))]
    async fn update_listing_field(&self, id: i64, update: &ListingUpdate) -> StoreResult<bool> {
        Ok(listings::update_listing_field(&self.pool, id, update).await?)
    }

    #[instrument(level = "debug", skip(self))]
    async fn set_listing_status(&self, id: i64, status: ListingStatus) -> StoreResult<bool> {
        Ok(listings::set_listing_status(&self.pool, id, status).await?)
    }

    async fn delete_listing(&self, id: i64) -> StoreResult<bool> {
        Ok(listings::delete_listing(&self.pool, id).await?)
    }

    async fn search_listings(&self, filters: &SearchFilters) -> StoreResult<Vec<Listing>> {
        Ok(listings::search_listings(&self.pool, filters).await?)
    }

    async fn create_search(&self, owner_id: i64, filters: &SearchFilters) -> StoreResult<i64> {
        Ok(searches::create_search(&self.pool, owner_id, filters).await?)
    }

    async fn saved_searches(&self) -> StoreResult<Vec<SavedSearch>> {
        Ok(searches::get_saved_searches(&self.pool).await?)
    }

    #[instrument(level = "debug", skip(self, text))]
    async fn create_review(
        &self,
        author_id: i64,
        target: ReviewTarget,
        text: &str,
    ) -> StoreResult<i64> {
        Ok(reviews::create_review(&self.pool, author_id, target, text).await?)
    }

    async fn reviews_by_kind(&self, kind: ReviewKind) -> StoreResult<Vec<Review>> {
        into_reviews(reviews::get_reviews_by_kind(&self.pool, kind).await?)
    }

    async fn listing_reviews(&self, listing_id: i64) -> StoreResult<Vec<Review>> {
        into_reviews(reviews::get_listing_reviews(&self.pool, listing_id).await?)
    }
}
