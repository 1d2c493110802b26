//! Compare freshly scraped DIGG data with what the database holds

use anyhow::Result;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

use crate::common::{status_label, EntityKind, OrganizationType, ScrapedData, ScrapedEntity};
use crate::domains::seeding::models::{Municipality, Organization, Region};

/// Changes listed per entity group before the report truncates
const REPORT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    New,
    StatusChange,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityChange {
    pub kind: EntityKind,
    pub change_type: ChangeType,
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub new_entities: usize,
    pub status_changes: usize,
    pub removed_entities: usize,
    pub total_changes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub changes: Vec<EntityChange>,
    pub summary: ComparisonSummary,
}

impl ComparisonResult {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// A row as currently stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingEntity {
    pub id: i32,
    pub name: String,
    pub status: String,
}

/// Current database contents, grouped like [`ScrapedData`]
#[derive(Debug, Clone, Default)]
pub struct ExistingEntities {
    pub municipalities: Vec<ExistingEntity>,
    pub regions: Vec<ExistingEntity>,
    pub authorities: Vec<ExistingEntity>,
    pub others: Vec<ExistingEntity>,
}

impl ExistingEntities {
    pub async fn load(pool: &PgPool) -> Result<Self> {
        let mut existing = Self {
            municipalities: Municipality::find_all(pool)
                .await?
                .into_iter()
                .map(|m| ExistingEntity {
                    id: m.id,
                    name: m.name,
                    status: m.status,
                })
                .collect(),
            regions: Region::find_all(pool)
                .await?
                .into_iter()
                .map(|r| ExistingEntity {
                    id: r.id,
                    name: r.name,
                    status: r.status,
                })
                .collect(),
            ..Default::default()
        };

        for org in Organization::find_all(pool).await? {
            let target = match org.parsed_type() {
                Some(OrganizationType::Authority) => &mut existing.authorities,
                Some(OrganizationType::Other) => &mut existing.others,
                None => continue,
            };
            target.push(ExistingEntity {
                id: org.id,
                name: org.name,
                status: org.status,
            });
        }

        Ok(existing)
    }
}

/// Detect new, changed, and removed entities per collection.
///
/// Organizations are compared within their own type.
pub fn compare(existing: &ExistingEntities, scraped: &ScrapedData) -> ComparisonResult {
    let mut changes = Vec::new();

    for (kind, stored, fresh) in [
        (EntityKind::Municipality, &existing.municipalities, &scraped.municipalities),
        (EntityKind::Region, &existing.regions, &scraped.regions),
        (EntityKind::Authority, &existing.authorities, &scraped.authorities),
        (EntityKind::Other, &existing.others, &scraped.others),
    ] {
        compare_collection(kind, stored, fresh, &mut changes);
    }

    let count = |t: ChangeType| changes.iter().filter(|c| c.change_type == t).count();
    let summary = ComparisonSummary {
        new_entities: count(ChangeType::New),
        status_changes: count(ChangeType::StatusChange),
        removed_entities: count(ChangeType::Removed),
        total_changes: changes.len(),
    };

    ComparisonResult { changes, summary }
}

fn compare_collection(
    kind: EntityKind,
    stored: &[ExistingEntity],
    fresh: &[ScrapedEntity],
    changes: &mut Vec<EntityChange>,
) {
    let by_name: HashMap<&str, &ExistingEntity> =
        stored.iter().map(|e| (e.name.as_str(), e)).collect();
    let fresh_names: HashSet<&str> = fresh.iter().map(|e| e.name.as_str()).collect();

    for scraped in fresh {
        match by_name.get(scraped.name.as_str()) {
            None => changes.push(EntityChange {
                kind,
                change_type: ChangeType::New,
                entity_name: scraped.name.clone(),
                entity_id: None,
                old_status: None,
                new_status: Some(scraped.status.clone()),
            }),
            Some(current) if current.status != scraped.status => changes.push(EntityChange {
                kind,
                change_type: ChangeType::StatusChange,
                entity_name: scraped.name.clone(),
                entity_id: Some(current.id),
                old_status: Some(current.status.clone()),
                new_status: Some(scraped.status.clone()),
            }),
            Some(_) => {}
        }
    }

    for current in stored {
        if !fresh_names.contains(current.name.as_str()) {
            changes.push(EntityChange {
                kind,
                change_type: ChangeType::Removed,
                entity_name: current.name.clone(),
                entity_id: Some(current.id),
                old_status: Some(current.status.clone()),
                new_status: None,
            });
        }
    }
}

/// Human-readable change report
pub fn format_report(result: &ComparisonResult) -> String {
    if !result.has_changes() {
        return "No changes detected in DIGG data.".to_string();
    }

    let s = &result.summary;
    let mut lines = vec![
        format!("DIGG update: {} changes detected", s.total_changes),
        String::new(),
        "Summary:".to_string(),
        format!("- New entries: {}", s.new_entities),
        format!("- Status changes: {}", s.status_changes),
        format!("- Removed entries: {}", s.removed_entities),
        String::new(),
    ];

    let groups = [
        ("Municipalities", &[EntityKind::Municipality][..]),
        ("Regions", &[EntityKind::Region][..]),
        ("Organizations", &[EntityKind::Authority, EntityKind::Other][..]),
    ];

    for (title, kinds) in groups {
        let group: Vec<&EntityChange> = result
            .changes
            .iter()
            .filter(|c| kinds.contains(&c.kind))
            .collect();
        if group.is_empty() {
            continue;
        }

        lines.push(format!("{} ({} changes):", title, group.len()));
        lines.extend(group.iter().take(REPORT_LIMIT).map(|c| format_change(c)));
        if group.len() > REPORT_LIMIT {
            lines.push(format!("  ... and {} more", group.len() - REPORT_LIMIT));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn format_change(change: &EntityChange) -> String {
    let label = |s: &Option<String>| s.as_deref().map(status_label).unwrap_or("?").to_string();

    match change.change_type {
        ChangeType::New => format!(
            "  NEW: {} ({})",
            change.entity_name,
            label(&change.new_status)
        ),
        ChangeType::StatusChange => format!(
            "  {}: {} -> {}",
            change.entity_name,
            label(&change.old_status),
            label(&change.new_status)
        ),
        ChangeType::Removed => format!(
            "  REMOVED: {} (was {})",
            change.entity_name,
            label(&change.old_status)
        ),
    }
}
