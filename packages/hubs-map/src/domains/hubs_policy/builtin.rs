// Built-in hubs policy, used when no HUBS_POLICY_PATH is configured.
//
// Coordinates are approximate head-office locations.

use super::{
    CoordinateTable, ExtraRecord, HubsPolicy, Location, PatchRules, SeedCoordinate, StatusOverrides,
};
use crate::common::{EntityStatus, OrganizationType};

const HUBS_MUNICIPALITIES: &[&str] = &[
    "Habo kommun",
    "Vaxholms kommun",
    "Vännäs kommun",
    "Sundbybergs kommun",
    "Trollhättan stad",
    "Solna stad",
    "Sundsvalls kommun",
    "Ånge kommun",
    "Hudiksvalls kommun",
    "Nordanstigs kommun",
];

const HUBS_AUTHORITIES: &[&str] = &["Socialstyrelsen"];

const HUBS_OTHERS: &[&str] = &["Cityurologen"];

const COORDINATES: &[(&str, f64, f64, &str)] = &[
    ("Arbetsförmedlingen", 59.3340, 18.0580, "Stockholm"),
    ("Försäkringskassan", 59.3293, 18.0686, "Stockholm"),
    ("Inspektionen för vård och omsorg", 59.3326, 18.0649, "Stockholm"),
    ("Polismyndigheten", 59.3300, 18.0500, "Stockholm"),
    ("Rättsmedicinalverket", 59.3400, 18.0700, "Stockholm"),
    ("Skolverket", 59.3500, 18.0000, "Solna"),
    ("Socialstyrelsen", 59.3350, 18.0200, "Stockholm"),
    ("Statens Institutionsstyrelse", 59.3450, 18.0300, "Solna"),
    ("Capio AB", 57.7089, 11.9746, "Göteborg"),
    ("Folktandvården Gävleborg AB", 60.6749, 17.1413, "Gävle"),
    ("Hälsa Hemma Sverige AB", 57.7000, 11.9600, "Göteborg"),
    ("Höglandsförbundet", 57.6496, 14.9675, "Eksjö"),
    ("Introcentrum AB", 59.3293, 18.0686, "Stockholm"),
    ("Kommunalförbundet ITSAM", 57.9945, 15.6560, "Kisa"),
    ("Kunskapsförbundet Väst", 58.2833, 12.2833, "Trollhättan"),
    ("Sveriges kommuner och regioner", 59.3170, 18.0530, "Stockholm"),
    ("Unilabs AB", 59.3293, 18.0686, "Stockholm"),
];

// Database coordinates, written to the latitude/longitude columns verbatim
const SEED_COORDINATES: &[(&str, &str, &str)] = &[
    ("Socialstyrelsen", "59.3293", "18.0686"),
    ("Cityurologen", "59.3293", "18.0686"),
];

// Search strings as they appear in the generated module
const PATCH_NAMES: &[&str] = &[
    "Habo",
    "Vaxholms stad",
    "Vännäs",
    "Sundbybergs stad",
    "Trollhättans stad",
    "Solna stad",
    "Sundsvalls",
    "Ånge",
    "Hudiksvalls",
    "Nordanstigs",
    "Socialstyrelsen",
];

const PATCH_NAME_MAPPING: &[(&str, &str)] = &[
    ("Vaxholms kommun", "Vaxholms stad"),
    ("Vännäs kommun", "Vännäs"),
    ("Sundbybergs kommun", "Sundbybergs stad"),
    ("Trollhättan stad", "Trollhättans stad"),
    ("Sundsvalls kommun", "Sundsvalls"),
    ("Ånge kommun", "Ånge"),
    ("Hudisvalls kommun", "Hudiksvalls"),
    ("Nordanstigs kommun", "Nordanstigs"),
];

fn names(list: &[&str]) -> std::collections::BTreeSet<String> {
    list.iter().map(|n| n.to_string()).collect()
}

pub(super) fn policy() -> HubsPolicy {
    let coordinates: CoordinateTable = COORDINATES
        .iter()
        .map(|&(name, lat, lng, city)| (name, Location::new(lat, lng, city)))
        .collect();

    HubsPolicy {
        overrides: StatusOverrides {
            hubs_municipalities: names(HUBS_MUNICIPALITIES),
            hubs_regions: Default::default(),
            hubs_authorities: names(HUBS_AUTHORITIES),
            hubs_others: names(HUBS_OTHERS),
        },
        coordinates,
        seed_coordinates: SEED_COORDINATES
            .iter()
            .map(|&(name, lat, lon)| (name.to_string(), SeedCoordinate::new(lat, lon)))
            .collect(),
        patch: PatchRules {
            names: PATCH_NAMES.iter().map(|n| n.to_string()).collect(),
            name_mapping: PATCH_NAME_MAPPING
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            apply_name_mapping: false,
            extra_record: Some(ExtraRecord {
                id: "new_hubs_1".to_string(),
                name: "Cityurologen".to_string(),
                organization_type: OrganizationType::Other,
                status: EntityStatus::Hubs.as_str().to_string(),
                location: Location::new(59.3326, 18.0649, "Stockholm"),
            }),
        },
    }
}
