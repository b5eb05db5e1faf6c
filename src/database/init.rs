//! Connection pool creation and idempotent schema bootstrap.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{info, instrument};

/// A type alias for the database connection pool (`Pool<Postgres>`).
pub type DbPool = Pool<Postgres>;

const SCHEMA: &[&str] = &[
    r#"
    DO $$ BEGIN
        CREATE TYPE listing_status AS ENUM ('draft', 'moderation', 'active', 'rejected');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE review_kind AS ENUM ('bot', 'ad', 'content');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        platform_id BIGINT UNIQUE NOT NULL,
        username VARCHAR(255),
        first_name VARCHAR(255),
        last_name VARCHAR(255),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ads (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id),
        title VARCHAR(255) NOT NULL,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        location VARCHAR(255) NOT NULL,
        contact VARCHAR(50) NOT NULL,
        status listing_status NOT NULL DEFAULT 'moderation',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS searches (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id),
        keyword VARCHAR(255),
        location VARCHAR(255),
        min_price DOUBLE PRECISION,
        max_price DOUBLE PRECISION,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id),
        kind review_kind NOT NULL,
        ad_id BIGINT REFERENCES ads(id),
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK ((kind = 'ad') = (ad_id IS NOT NULL))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ads_status_idx ON ads (status)",
    "CREATE INDEX IF NOT EXISTS ads_user_idx ON ads (user_id)",
    "CREATE INDEX IF NOT EXISTS reviews_ad_idx ON reviews (ad_id)",
];

pub async fn connect(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Creates the enum types, tables and indexes if they do not exist yet.
#[instrument(level = "debug", skip(pool))]
pub async fn init_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(target = "store.pg", statements = SCHEMA.len(), "schema ready");
    Ok(())
}
