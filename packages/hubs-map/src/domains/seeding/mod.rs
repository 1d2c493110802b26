//! Database seeding from scraped DIGG data
//!
//! Seeding is split in two: [`plan_seed`] resolves every row's final values
//! from the scraped data and the hubs policy without touching the database,
//! and [`apply_seed`] writes the plan inside a single transaction.
//!
//! All writes are upserts, so seeding the same plan twice leaves the tables
//! as seeding it once.

pub mod models;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection};
use tracing::info;

use crate::common::{EntityKind, OrganizationType, ScrapedData, ScrapedEntity};
use crate::domains::hubs_policy::HubsPolicy;
use models::{Municipality, Organization, Region, SystemSetting};

pub const AUTO_SYNC_ENABLED: &str = "auto_sync_enabled";
pub const LAST_DIGG_CHECK: &str = "last_digg_check";

/// Municipality or region row to upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySeed {
    pub name: String,
    pub status: String,
}

/// Organization row to upsert; coordinates are NULL unless listed in
/// `seed_coordinates`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSeed {
    pub name: String,
    pub organization_type: OrganizationType,
    pub status: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Setting inserted only when its key is absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingSeed {
    pub key: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedPlan {
    pub municipalities: Vec<EntitySeed>,
    pub regions: Vec<EntitySeed>,
    pub organizations: Vec<OrganizationSeed>,
    pub settings: Vec<SettingSeed>,
}

/// Rows processed vs. rows actually written for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertCounts {
    pub processed: usize,
    pub written: usize,
}

impl UpsertCounts {
    fn record(&mut self, written: bool) {
        self.processed += 1;
        if written {
            self.written += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub municipalities: UpsertCounts,
    pub regions: UpsertCounts,
    pub organizations: UpsertCounts,
    pub settings_inserted: usize,
}

/// Resolve final statuses and coordinates for every scraped row.
///
/// Names on a hubs list get status "hubs"; everything else keeps its
/// scraped status. Organization coordinates come from the policy's
/// `seed_coordinates` as text, never from the map's coordinate table.
/// `now` becomes the initial `last_digg_check` value.
pub fn plan_seed(data: &ScrapedData, policy: &HubsPolicy, now: DateTime<Utc>) -> SeedPlan {
    let overrides = &policy.overrides;

    let entities = |kind: EntityKind, rows: &[ScrapedEntity]| -> Vec<EntitySeed> {
        rows.iter()
            .map(|row| EntitySeed {
                name: row.name.clone(),
                status: overrides.resolve(kind, &row.name, &row.status),
            })
            .collect()
    };

    let organizations = [
        (EntityKind::Authority, OrganizationType::Authority, &data.authorities),
        (EntityKind::Other, OrganizationType::Other, &data.others),
    ]
    .into_iter()
    .flat_map(|(kind, organization_type, rows)| {
        rows.iter().map(move |row| {
            let coordinate = policy.seed_coordinates.get(&row.name);
            OrganizationSeed {
                name: row.name.clone(),
                organization_type,
                status: overrides.resolve(kind, &row.name, &row.status),
                latitude: coordinate.map(|c| c.lat.clone()),
                longitude: coordinate.map(|c| c.lon.clone()),
            }
        })
    })
    .collect();

    SeedPlan {
        municipalities: entities(EntityKind::Municipality, &data.municipalities),
        regions: entities(EntityKind::Region, &data.regions),
        organizations,
        settings: vec![
            SettingSeed {
                key: AUTO_SYNC_ENABLED.to_string(),
                value: "false".to_string(),
                description: "Enable automatic daily sync from DIGG".to_string(),
            },
            SettingSeed {
                key: LAST_DIGG_CHECK.to_string(),
                value: now.to_rfc3339(),
                description: "Timestamp of last DIGG check".to_string(),
            },
        ],
    }
}

/// Write the plan in one transaction, committed once at the end.
///
/// Any failure returns early and the transaction rolls back on drop.
pub async fn apply_seed(conn: &mut PgConnection, plan: &SeedPlan) -> Result<SeedReport> {
    let mut tx = conn.begin().await.context("Failed to begin transaction")?;
    let mut report = SeedReport::default();

    info!(count = plan.municipalities.len(), "Seeding municipalities...");
    for row in &plan.municipalities {
        let written = Municipality::upsert(&row.name, &row.status, &mut *tx)
            .await
            .with_context(|| format!("Failed to upsert municipality '{}'", row.name))?;
        report.municipalities.record(written);
    }

    info!(count = plan.regions.len(), "Seeding regions...");
    for row in &plan.regions {
        let written = Region::upsert(&row.name, &row.status, &mut *tx)
            .await
            .with_context(|| format!("Failed to upsert region '{}'", row.name))?;
        report.regions.record(written);
    }

    info!(count = plan.organizations.len(), "Seeding organizations...");
    for row in &plan.organizations {
        let written = Organization::upsert(
            &row.name,
            row.organization_type,
            &row.status,
            row.latitude.as_deref(),
            row.longitude.as_deref(),
            &mut *tx,
        )
        .await
        .with_context(|| format!("Failed to upsert {} '{}'", row.organization_type, row.name))?;
        report.organizations.record(written);
    }

    info!("Initializing system settings...");
    for setting in &plan.settings {
        let inserted = SystemSetting::insert_if_absent(
            &setting.key,
            &setting.value,
            &setting.description,
            &mut *tx,
        )
        .await
        .with_context(|| format!("Failed to initialize setting '{}'", setting.key))?;
        if inserted {
            report.settings_inserted += 1;
        }
    }

    tx.commit().await.context("Failed to commit seed transaction")?;

    info!(
        municipalities = report.municipalities.written,
        regions = report.regions.written,
        organizations = report.organizations.written,
        settings = report.settings_inserted,
        "Database seeding complete"
    );

    Ok(report)
}
