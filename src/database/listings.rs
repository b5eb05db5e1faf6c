//! Functions for the `ads` table, including the filtered search used by /search_ads.

use super::models::{Listing, ListingDraft, ListingStatus, ListingUpdate, SearchFilters};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

const LISTING_COLUMNS: &str =
    "id, user_id, title, price, location, contact, status, created_at, updated_at";

pub async fn create_listing<'e, E>(
    executor: E,
    owner_id: i64,
    draft: &ListingDraft,
) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        "INSERT INTO ads (user_id, title, price, location, contact, status) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(owner_id)
    .bind(&draft.title)
    .bind(draft.price)
    .bind(&draft.location)
    .bind(&draft.contact)
    .bind(ListingStatus::Moderation)
    .fetch_one(executor)
    .await
}

pub async fn get_listing<'e, E>(executor: E, id: i64) -> Result<Option<Listing>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!("SELECT {LISTING_COLUMNS} FROM ads WHERE id = $1");
    sqlx::query_as::<_, Listing>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_owner_listings<'e, E>(
    executor: E,
    owner_id: i64,
) -> Result<Vec<Listing>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!("SELECT {LISTING_COLUMNS} FROM ads WHERE user_id = $1 ORDER BY id");
    sqlx::query_as::<_, Listing>(&query)
        .bind(owner_id)
        .fetch_all(executor)
        .await
}

pub async fn get_listings_by_status<'e, E>(
    executor: E,
    status: ListingStatus,
) -> Result<Vec<Listing>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!("SELECT {LISTING_COLUMNS} FROM ads WHERE status = $1 ORDER BY id");
    sqlx::query_as::<_, Listing>(&query)
        .bind(status)
        .fetch_all(executor)
        .await
}

/// Updates one column and bumps `updated_at`. The column is picked from the
/// update variant, never from caller text.
pub async fn update_listing_field<'e, E>(
    executor: E,
    id: i64,
    update: &ListingUpdate,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let column = match update {
        ListingUpdate::Title(_) => "title",
        ListingUpdate::Price(_) => "price",
        ListingUpdate::Location(_) => "location",
        ListingUpdate::Contact(_) => "contact",
    };
    let sql = format!("UPDATE ads SET {column} = $1, updated_at = NOW() WHERE id = $2");
    let query = match update {
        ListingUpdate::Price(price) => sqlx::query(&sql).bind(*price),
        ListingUpdate::Title(text) | ListingUpdate::Location(text) | ListingUpdate::Contact(text) => {
            sqlx::query(&sql).bind(text)
        }
    };
    let result = query.bind(id).execute(executor).await?;
    Ok(result.rows_affected() == 1)
}

pub async fn set_listing_status<'e, E>(
    executor: E,
    id: i64,
    status: ListingStatus,
) -> Result<bool, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("UPDATE ads SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Removes the listing's reviews and then the listing inside one transaction.
#[instrument(level = "debug", skip(pool))]
pub async fn delete_listing(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM reviews WHERE ad_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM ads WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tx.commit().await?;
    Ok(deleted == 1)
}

/// Escapes LIKE metacharacters so caller text matches literally, then wraps it in `%`.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Appends one `AND ...` clause per present filter onto the active-listing query.
pub fn build_search_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM ads WHERE status = "));
    builder.push_bind(ListingStatus::Active);

    if let Some(keyword) = &filters.keyword {
        let pattern = like_pattern(keyword);
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR location ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(location) = &filters.location {
        builder.push(" AND location ILIKE ");
        builder.push_bind(like_pattern(location));
    }
    if let Some(min) = filters.price.min {
        builder.push(" AND price >= ");
        builder.push_bind(min);
    }
    if let Some(max) = filters.price.max {
        builder.push(" AND price <= ");
        builder.push_bind(max);
    }
    builder.push(" ORDER BY id");
    builder
}

#[instrument(level = "debug", skip(pool))]
pub async fn search_listings(
    pool: &PgPool,
    filters: &SearchFilters,
) -> Result<Vec<Listing>, sqlx::Error> {
    let mut builder = build_search_query(filters);
    builder.build_query_as::<Listing>().fetch_all(pool).await
}
