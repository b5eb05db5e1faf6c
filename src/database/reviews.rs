//! Functions for the `reviews` table: bot feedback, listing reviews and content reports.

use super::models::{ReviewKind, ReviewRow, ReviewTarget};
use sqlx::Postgres;

const REVIEW_COLUMNS: &str = "id, user_id, kind, ad_id, text, created_at";

pub async fn create_review<'e, E>(
    executor: E,
    author_id: i64,
    target: ReviewTarget,
    text: &str,
) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        "INSERT INTO reviews (user_id, kind, ad_id, text) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(author_id)
    .bind(target.kind())
    .bind(target.listing_id())
    .bind(text)
    .fetch_one(executor)
    .await
}

pub async fn get_reviews_by_kind<'e, E>(
    executor: E,
    kind: ReviewKind,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE kind = $1 ORDER BY id");
    sqlx::query_as::<_, ReviewRow>(&query)
        .bind(kind)
        .fetch_all(executor)
        .await
}

pub async fn get_listing_reviews<'e, E>(
    executor: E,
    listing_id: i64,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE kind = $1 AND ad_id = $2 ORDER BY id"
    );
    sqlx::query_as::<_, ReviewRow>(&query)
        .bind(ReviewKind::Listing)
        .bind(listing_id)
        .fetch_all(executor)
        .await
}
