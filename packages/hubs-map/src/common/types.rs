use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::LoadError;

pub const MUNICIPALITIES_FILE: &str = "scraped_municipalities.json";
pub const REGIONS_FILE: &str = "scraped_regions.json";
pub const AUTHORITIES_FILE: &str = "scraped_authorities.json";
pub const OTHERS_FILE: &str = "scraped_others.json";

/// One row of a scraped DIGG connection table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedEntity {
    pub name: String,
    pub status: String,
}

impl ScrapedEntity {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// The four scraped collections, in the order DIGG publishes them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedData {
    pub municipalities: Vec<ScrapedEntity>,
    pub regions: Vec<ScrapedEntity>,
    pub authorities: Vec<ScrapedEntity>,
    pub others: Vec<ScrapedEntity>,
}

impl ScrapedData {
    /// Load the four `scraped_*.json` files from a directory.
    ///
    /// Any missing or malformed file aborts the load.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            municipalities: read_json(&dir.join(MUNICIPALITIES_FILE))?,
            regions: read_json(&dir.join(REGIONS_FILE))?,
            authorities: read_json(&dir.join(AUTHORITIES_FILE))?,
            others: read_json(&dir.join(OTHERS_FILE))?,
        })
    }

    /// Write the four `scraped_*.json` files into a directory, overwriting them.
    pub fn write_dir(&self, dir: &Path) -> Result<(), LoadError> {
        write_json(&dir.join(MUNICIPALITIES_FILE), &self.municipalities)?;
        write_json(&dir.join(REGIONS_FILE), &self.regions)?;
        write_json(&dir.join(AUTHORITIES_FILE), &self.authorities)?;
        write_json(&dir.join(OTHERS_FILE), &self.others)?;
        Ok(())
    }

    pub fn total(&self) -> usize {
        self.municipalities.len() + self.regions.len() + self.authorities.len() + self.others.len()
    }
}

/// Which scraped collection an entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Municipality,
    Region,
    Authority,
    Other,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Municipality => "municipality",
            Self::Region => "region",
            Self::Authority => "authority",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organization type tag, stored in `organizations.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationType {
    Authority,
    Other,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authority => "authority",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "authority" => Some(Self::Authority),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status values this system produces itself.
///
/// Stored statuses stay free-form strings; this enum only names the known ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    None,
    Started,
    Qa,
    Connected,
    Hubs,
}

impl EntityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Started => "started",
            Self::Qa => "qa",
            Self::Connected => "connected",
            Self::Hubs => "hubs",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "started" => Some(Self::Started),
            "qa" => Some(Self::Qa),
            "connected" => Some(Self::Connected),
            "hubs" => Some(Self::Hubs),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "Not connected",
            Self::Started => "Started",
            Self::Qa => "QA",
            Self::Connected => "Connected",
            Self::Hubs => "Hubs",
        }
    }
}

/// Human label for a free-form status; unknown values are shown as-is
pub fn status_label(status: &str) -> &str {
    EntityStatus::parse(status).map_or(status, |s| s.label())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| LoadError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    })
}
