use tracing::info;

use super::{MapData, MapEntry, MapOrganization};
use crate::common::{EntityKind, OrganizationType, ScrapedData, ScrapedEntity};
use crate::domains::hubs_policy::{CoordinateTable, StatusOverrides};

/// Build the map data from scraped collections.
///
/// Every input record becomes exactly one entry, in input order; duplicate
/// names are kept. Organizations are authorities followed by others, each
/// type numbered by its own counter. With `overrides`, statuses go through
/// [`StatusOverrides::resolve`]; without, the scraped status is kept.
pub fn generate(
    data: &ScrapedData,
    coordinates: &CoordinateTable,
    overrides: Option<&StatusOverrides>,
) -> MapData {
    let status = |kind: EntityKind, entity: &ScrapedEntity| match overrides {
        Some(o) => o.resolve(kind, &entity.name, &entity.status),
        None => entity.status.clone(),
    };

    let municipalities = data
        .municipalities
        .iter()
        .enumerate()
        .map(|(i, m)| MapEntry {
            id: format!("m{:04}", i),
            name: m.name.clone(),
            status: status(EntityKind::Municipality, m),
        })
        .collect();

    let regions = data
        .regions
        .iter()
        .enumerate()
        .map(|(i, r)| MapEntry {
            id: format!("r{:02}", i),
            name: r.name.clone(),
            status: status(EntityKind::Region, r),
        })
        .collect();

    let organizations = [
        (EntityKind::Authority, OrganizationType::Authority, "auth", &data.authorities),
        (EntityKind::Other, OrganizationType::Other, "other", &data.others),
    ]
    .into_iter()
    .flat_map(|(kind, organization_type, prefix, entities)| {
        entities.iter().enumerate().map(move |(i, o)| MapOrganization {
            id: format!("{}{:02}", prefix, i),
            name: o.name.clone(),
            organization_type,
            status: status(kind, o),
            location: coordinates.resolve(&o.name),
        })
    })
    .collect::<Vec<_>>();

    let map = MapData {
        municipalities,
        regions,
        organizations,
    };

    info!(
        municipalities = map.municipalities.len(),
        regions = map.regions.len(),
        organizations = map.organizations.len(),
        overrides = overrides.is_some(),
        "Generated map data"
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::hubs_policy::{HubsPolicy, Location};

    fn entities(names: &[(&str, &str)]) -> Vec<ScrapedEntity> {
        names.iter().map(|(n, s)| ScrapedEntity::new(*n, *s)).collect()
    }

    #[test]
    fn test_single_municipality() {
        let data = ScrapedData {
            municipalities: entities(&[("A kommun", "qa")]),
            ..Default::default()
        };

        let map = generate(&data, &CoordinateTable::new(), None);

        assert_eq!(
            map.municipalities,
            vec![MapEntry {
                id: "m0000".into(),
                name: "A kommun".into(),
                status: "qa".into(),
            }]
        );
        assert!(map.regions.is_empty());
        assert!(map.organizations.is_empty());
    }

    #[test]
    fn test_ids_are_sequential_and_padded() {
        let data = ScrapedData {
            municipalities: entities(&[("A", "qa"), ("B", "qa"), ("C", "qa")]),
            regions: entities(&[("Region X", "connected"), ("Region Y", "started")]),
            ..Default::default()
        };

        let map = generate(&data, &CoordinateTable::new(), None);

        let ids: Vec<_> = map.municipalities.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m0000", "m0001", "m0002"]);
        let ids: Vec<_> = map.regions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r00", "r01"]);
    }

    #[test]
    fn test_authorities_precede_others_with_separate_counters() {
        let data = ScrapedData {
            authorities: entities(&[("Skolverket", "connected"), ("Polismyndigheten", "qa")]),
            others: entities(&[("Capio AB", "started")]),
            ..Default::default()
        };

        let map = generate(&data, &CoordinateTable::new(), None);

        let summary: Vec<_> = map
            .organizations
            .iter()
            .map(|o| (o.id.as_str(), o.organization_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("auth00", OrganizationType::Authority),
                ("auth01", OrganizationType::Authority),
                ("other00", OrganizationType::Other),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_are_not_merged() {
        let data = ScrapedData {
            others: entities(&[("Capio AB", "qa"), ("Capio AB", "connected")]),
            ..Default::default()
        };

        let map = generate(&data, &CoordinateTable::new(), None);

        assert_eq!(map.organizations.len(), 2);
        assert_eq!(map.organizations[1].id, "other01");
    }

    #[test]
    fn test_locations_use_table_then_fallback() {
        let mut table = CoordinateTable::new();
        table.insert("Skolverket", Location::new(59.35, 18.0, "Solna"));
        let data = ScrapedData {
            authorities: entities(&[("Skolverket", "connected"), ("Tullverket", "qa")]),
            ..Default::default()
        };

        let map = generate(&data, &table, None);

        assert_eq!(map.organizations[0].location, Location::new(59.35, 18.0, "Solna"));
        assert_eq!(map.organizations[1].location, Location::fallback());
    }

    #[test]
    fn test_builtin_table_has_no_entry_for_patched_extra_record() {
        let data = ScrapedData {
            others: entities(&[("Cityurologen", "connected")]),
            ..Default::default()
        };

        let map = generate(&data, &HubsPolicy::builtin().coordinates, None);

        assert_eq!(map.organizations[0].location, Location::fallback());
    }

    #[test]
    fn test_overrides_apply_only_when_given() {
        let overrides = StatusOverrides {
            hubs_municipalities: ["Habo kommun".to_string()].into(),
            ..Default::default()
        };
        let data = ScrapedData {
            municipalities: entities(&[("Habo kommun", "qa"), ("Vetlanda kommun", "qa")]),
            ..Default::default()
        };

        let plain = generate(&data, &CoordinateTable::new(), None);
        let overridden = generate(&data, &CoordinateTable::new(), Some(&overrides));

        assert_eq!(plain.municipalities[0].status, "qa");
        assert_eq!(overridden.municipalities[0].status, "hubs");
        assert_eq!(overridden.municipalities[1].status, "qa");
    }
}
