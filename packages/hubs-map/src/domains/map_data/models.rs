use serde::Serialize;

use crate::common::OrganizationType;
use crate::domains::hubs_policy::Location;

/// Municipality or region entry in the generated module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Organization entry in the generated module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOrganization {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub organization_type: OrganizationType,
    pub status: String,
    pub location: Location,
}

/// Everything the map client needs, in render order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapData {
    pub municipalities: Vec<MapEntry>,
    pub regions: Vec<MapEntry>,
    pub organizations: Vec<MapOrganization>,
}
