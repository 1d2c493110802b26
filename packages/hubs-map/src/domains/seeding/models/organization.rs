use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::OrganizationType;

/// Authority or other organization row, unique on (name, type)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub organization_type: String, // 'authority' | 'other'
    pub status: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Organization {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>("SELECT * FROM organizations ORDER BY type, name")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_name_and_type(
        name: &str,
        organization_type: OrganizationType,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, Self>(
            "SELECT * FROM organizations WHERE name = $1 AND type = $2",
        )
        .bind(name)
        .bind(organization_type.as_str())
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    pub fn parsed_type(&self) -> Option<OrganizationType> {
        OrganizationType::parse(&self.organization_type)
    }

    /// Insert by (name, type), or overwrite status and coordinates of the existing row.
    ///
    /// Returns whether a row was written; identical values are left untouched.
    pub async fn upsert(
        name: &str,
        organization_type: OrganizationType,
        status: &str,
        latitude: Option<&str>,
        longitude: Option<&str>,
        conn: &mut PgConnection,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO organizations (name, type, status, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name, type) DO UPDATE SET
                status = EXCLUDED.status,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = NOW()
            WHERE organizations.status IS DISTINCT FROM EXCLUDED.status
               OR organizations.latitude IS DISTINCT FROM EXCLUDED.latitude
               OR organizations.longitude IS DISTINCT FROM EXCLUDED.longitude
            "#,
        )
        .bind(name)
        .bind(organization_type.as_str())
        .bind(status)
        .bind(latitude)
        .bind(longitude)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
