//! Functions for the `searches` table (saved searches used for new-listing alerts).

use super::models::{SavedSearch, SearchFilters};
use sqlx::Postgres;

pub async fn create_search<'e, E>(
    executor: E,
    owner_id: i64,
    filters: &SearchFilters,
) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        "INSERT INTO searches (user_id, keyword, location, min_price, max_price) VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(owner_id)
    .bind(&filters.keyword)
    .bind(&filters.location)
    .bind(filters.price.min)
    .bind(filters.price.max)
    .fetch_one(executor)
    .await
}

pub async fn get_saved_searches<'e, E>(executor: E) -> Result<Vec<SavedSearch>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, SavedSearch>(
        "SELECT id, user_id, keyword, location, min_price, max_price, created_at FROM searches ORDER BY id",
    )
    .fetch_all(executor)
    .await
}
