use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

/// Municipality (kommun) row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Municipality {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Municipality {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>("SELECT * FROM municipalities ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM municipalities WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Insert by name, or overwrite the status of the existing row.
    ///
    /// Returns whether a row was written; an unchanged status is left untouched.
    pub async fn upsert(name: &str, status: &str, conn: &mut PgConnection) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO municipalities (name, status)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = NOW()
            WHERE municipalities.status IS DISTINCT FROM EXCLUDED.status
            "#,
        )
        .bind(name)
        .bind(status)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
