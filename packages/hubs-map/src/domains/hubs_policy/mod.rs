//! Hubs policy - which entities are forced to "hubs", and where organizations sit on the map
//!
//! The policy is data: it is loaded from a JSON file (`HUBS_POLICY_PATH`) or
//! taken from [`HubsPolicy::builtin`]. Every job reads its lists from here.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::common::{read_json, EntityKind, EntityStatus, OrganizationType, PolicyError};

/// Approximate location of an organization's head office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub city: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, city: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            city: city.into(),
        }
    }

    /// Used for every organization missing from the coordinate table
    pub fn fallback() -> Self {
        Self::new(59.3293, 18.0686, "Stockholm")
    }

    fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Name lists whose members get status "hubs" regardless of the scraped status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusOverrides {
    pub hubs_municipalities: BTreeSet<String>,
    pub hubs_regions: BTreeSet<String>,
    pub hubs_authorities: BTreeSet<String>,
    pub hubs_others: BTreeSet<String>,
}

impl StatusOverrides {
    pub fn names_for(&self, kind: EntityKind) -> &BTreeSet<String> {
        match kind {
            EntityKind::Municipality => &self.hubs_municipalities,
            EntityKind::Region => &self.hubs_regions,
            EntityKind::Authority => &self.hubs_authorities,
            EntityKind::Other => &self.hubs_others,
        }
    }

    pub fn is_hubs(&self, kind: EntityKind, name: &str) -> bool {
        self.names_for(kind).contains(name)
    }

    /// Final status for an entity: "hubs" when listed, the scraped status otherwise
    pub fn resolve(&self, kind: EntityKind, name: &str, scraped_status: &str) -> String {
        if self.is_hubs(kind, name) {
            EntityStatus::Hubs.as_str().to_string()
        } else {
            scraped_status.to_string()
        }
    }
}

/// Hand-curated `name -> location` lookup for organizations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateTable(HashMap<String, Location>);

impl CoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, location: Location) {
        self.0.insert(name.into(), location);
    }

    /// Exact-name lookup without fallback
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.0.get(name)
    }

    /// Exact-name lookup, silently falling back to [`Location::fallback`]
    pub fn resolve(&self, name: &str) -> Location {
        match self.0.get(name) {
            Some(location) => location.clone(),
            None => {
                debug!(name = %name, "No coordinates on file, using fallback");
                Location::fallback()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Location)> {
        self.0.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Location)> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = (N, Location)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, l)| (n.into(), l)).collect())
    }
}

/// Seeded `latitude`/`longitude` column values, stored exactly as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCoordinate {
    pub lat: String,
    pub lon: String,
}

impl SeedCoordinate {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }

    fn is_valid(&self) -> bool {
        match (self.lat.trim().parse::<f64>(), self.lon.trim().parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Location::new(lat, lon, "").is_valid(),
            _ => false,
        }
    }
}

/// Hand-coded organization appended by the status patcher when missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub organization_type: OrganizationType,
    pub status: String,
    pub location: Location,
}

/// Rules for patching statuses in an already generated module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchRules {
    /// Literal `name` values to search for
    pub names: Vec<String>,
    /// Scrape name -> name as it appears in the generated module
    pub name_mapping: BTreeMap<String, String>,
    /// Also search the scrape-side names whose mapped value is listed in `names`
    pub apply_name_mapping: bool,
    pub extra_record: Option<ExtraRecord>,
}

impl PatchRules {
    /// Strings the patcher will look for, in order, without duplicates.
    ///
    /// With `apply_name_mapping` off this is exactly `names`; the mapping
    /// table is then informational only.
    pub fn search_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.names.len());
        for name in &self.names {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
            if self.apply_name_mapping {
                for (scraped, mapped) in &self.name_mapping {
                    if mapped == name && !out.contains(&scraped.as_str()) {
                        out.push(scraped);
                    }
                }
            }
        }
        out
    }
}

/// Complete override policy shared by every job
///
/// The generator and the seeder keep separate coordinate tables: the map
/// always needs a location (with fallback), while the database only stores
/// coordinates for the few organizations listed in `seed_coordinates` and
/// NULL for everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubsPolicy {
    #[serde(flatten)]
    pub overrides: StatusOverrides,
    pub coordinates: CoordinateTable,
    pub seed_coordinates: BTreeMap<String, SeedCoordinate>,
    pub patch: PatchRules,
}

impl HubsPolicy {
    /// Policy file when a path is given, built-in policy otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, PolicyError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No HUBS_POLICY_PATH set, using built-in hubs policy");
                Ok(Self::builtin())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let policy: Self = read_json(path)?;
        policy.validate()?;

        info!(
            path = %path.display(),
            municipalities = policy.overrides.hubs_municipalities.len(),
            authorities = policy.overrides.hubs_authorities.len(),
            others = policy.overrides.hubs_others.len(),
            coordinates = policy.coordinates.len(),
            seed_coordinates = policy.seed_coordinates.len(),
            "Loaded hubs policy"
        );

        Ok(policy)
    }

    pub fn builtin() -> Self {
        builtin::policy()
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let extra = self.patch.extra_record.as_ref().map(|r| (&r.name, &r.location));
        for (name, location) in self.coordinates.iter().chain(extra) {
            if !location.is_valid() {
                return Err(PolicyError::InvalidCoordinate {
                    name: name.clone(),
                    lat: location.lat,
                    lng: location.lng,
                });
            }
        }
        for (name, coordinate) in &self.seed_coordinates {
            if !coordinate.is_valid() {
                return Err(PolicyError::InvalidSeedCoordinate {
                    name: name.clone(),
                    lat: coordinate.lat.clone(),
                    lon: coordinate.lon.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> StatusOverrides {
        StatusOverrides {
            hubs_municipalities: ["Habo kommun".to_string()].into(),
            hubs_authorities: ["Socialstyrelsen".to_string()].into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_listed_name_resolves_to_hubs() {
        let status = overrides().resolve(EntityKind::Municipality, "Habo kommun", "qa");
        assert_eq!(status, "hubs");
    }

    #[test]
    fn test_unlisted_name_keeps_scraped_status() {
        let status = overrides().resolve(EntityKind::Municipality, "Vetlanda kommun", "qa");
        assert_eq!(status, "qa");
    }

    #[test]
    fn test_lists_are_scoped_by_kind() {
        // Socialstyrelsen is only listed as an authority
        let o = overrides();
        assert!(o.is_hubs(EntityKind::Authority, "Socialstyrelsen"));
        assert!(!o.is_hubs(EntityKind::Other, "Socialstyrelsen"));
    }

    #[test]
    fn test_coordinate_fallback() {
        let table: CoordinateTable =
            [("Skolverket", Location::new(59.35, 18.0, "Solna"))].into_iter().collect();

        assert_eq!(table.resolve("Skolverket").city, "Solna");
        assert_eq!(table.resolve("Okänd myndighet"), Location::fallback());
        assert!(table.get("Okänd myndighet").is_none());
    }

    #[test]
    fn test_search_names_ignore_mapping_by_default() {
        let rules = PatchRules {
            names: vec!["Vaxholms stad".into()],
            name_mapping: [("Vaxholms kommun".to_string(), "Vaxholms stad".to_string())].into(),
            apply_name_mapping: false,
            extra_record: None,
        };

        assert_eq!(rules.search_names(), vec!["Vaxholms stad"]);
    }

    #[test]
    fn test_search_names_include_mapped_scrape_names_when_enabled() {
        let rules = PatchRules {
            names: vec!["Vaxholms stad".into(), "Habo".into()],
            name_mapping: [("Vaxholms kommun".to_string(), "Vaxholms stad".to_string())].into(),
            apply_name_mapping: true,
            extra_record: None,
        };

        assert_eq!(
            rules.search_names(),
            vec!["Vaxholms stad", "Vaxholms kommun", "Habo"]
        );
    }

    #[test]
    fn test_policy_file_with_partial_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{
                "hubs_others": ["Cityurologen"],
                "coordinates": {
                    "Cityurologen": { "lat": 59.3326, "lng": 18.0649, "city": "Stockholm" }
                }
            }"#,
        )
        .unwrap();

        let policy = HubsPolicy::from_file(&path).unwrap();

        assert!(policy.overrides.is_hubs(EntityKind::Other, "Cityurologen"));
        assert!(policy.overrides.hubs_municipalities.is_empty());
        assert_eq!(policy.coordinates.len(), 1);
        assert!(policy.patch.names.is_empty());
        assert!(!policy.patch.apply_name_mapping);
    }

    #[test]
    fn test_policy_file_rejects_out_of_range_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{ "coordinates": { "Nowhere": { "lat": 159.0, "lng": 18.0, "city": "X" } } }"#,
        )
        .unwrap();

        let err = HubsPolicy::from_file(&path).unwrap_err();

        assert!(matches!(err, PolicyError::InvalidCoordinate { ref name, .. } if name == "Nowhere"));
    }

    #[test]
    fn test_policy_file_seed_coordinates_keep_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{ "seed_coordinates": { "Skolverket": { "lat": "59.3500", "lon": "18.0000" } } }"#,
        )
        .unwrap();

        let policy = HubsPolicy::from_file(&path).unwrap();

        assert_eq!(
            policy.seed_coordinates.get("Skolverket"),
            Some(&SeedCoordinate::new("59.3500", "18.0000"))
        );
        assert!(policy.coordinates.is_empty());
    }

    #[test]
    fn test_policy_file_rejects_non_numeric_seed_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{ "seed_coordinates": { "Skolverket": { "lat": "norr", "lon": "18.0" } } }"#,
        )
        .unwrap();

        let err = HubsPolicy::from_file(&path).unwrap_err();

        assert!(matches!(err, PolicyError::InvalidSeedCoordinate { ref name, .. } if name == "Skolverket"));
    }

    #[test]
    fn test_builtin_policy_covers_seeded_organizations() {
        let policy = HubsPolicy::builtin();

        assert!(policy.overrides.is_hubs(EntityKind::Authority, "Socialstyrelsen"));
        assert!(policy.overrides.is_hubs(EntityKind::Other, "Cityurologen"));
        assert!(policy.overrides.hubs_regions.is_empty());
        assert!(policy.coordinates.get("Cityurologen").is_none());
        assert_eq!(
            policy.seed_coordinates.get("Cityurologen"),
            Some(&SeedCoordinate::new("59.3293", "18.0686"))
        );
        assert_eq!(
            policy.seed_coordinates.get("Socialstyrelsen"),
            Some(&SeedCoordinate::new("59.3293", "18.0686"))
        );
        assert_eq!(policy.seed_coordinates.len(), 2);
        assert_eq!(
            policy.patch.extra_record.as_ref().map(|r| r.name.as_str()),
            Some("Cityurologen")
        );
    }
}
