use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

/// Process-wide key/value setting
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemSetting {
    pub id: i32,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl SystemSetting {
    pub async fn find_by_key(key: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>("SELECT * FROM system_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Insert once; an existing key keeps its value.
    ///
    /// Returns whether the setting was inserted.
    pub async fn insert_if_absent(
        key: &str,
        value: &str,
        description: &str,
        conn: &mut PgConnection,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO system_settings (key, value, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
