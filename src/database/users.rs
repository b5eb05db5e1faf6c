//! Functions for the `users` table.

use super::models::{NewUser, User};
use sqlx::Postgres;

const USER_COLUMNS: &str = "id, platform_id, username, first_name, last_name, created_at";

/// Inserts the user or refreshes their handle and names; the row keyed by
/// `platform_id` is returned either way.
pub async fn upsert_user<'e, E>(executor: E, user: &NewUser) -> Result<User, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!(
        r#"
        INSERT INTO users (platform_id, username, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (platform_id) DO UPDATE SET
            username = EXCLUDED.username,
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name
        RETURNING {USER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, User>(&query)
        .bind(user.platform_id)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(executor)
        .await
}

pub async fn get_user<'e, E>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}
