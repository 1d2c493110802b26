//! Test fixtures for scraped data and generated modules.

use chrono::NaiveDate;
use hubs_map_core::common::{ScrapedData, ScrapedEntity};

pub fn entities(rows: &[(&str, &str)]) -> Vec<ScrapedEntity> {
    rows.iter()
        .map(|(name, status)| ScrapedEntity::new(*name, *status))
        .collect()
}

/// Small but complete DIGG scrape: hubs-listed names mixed with ordinary ones
pub fn sample_scrape() -> ScrapedData {
    ScrapedData {
        municipalities: entities(&[
            ("Habo kommun", "connected"),
            ("Vaxholms kommun", "qa"),
            ("Vetlanda kommun", "started"),
        ]),
        regions: entities(&[("Region Stockholm", "connected"), ("Region Skåne", "qa")]),
        authorities: entities(&[
            ("Socialstyrelsen", "connected"),
            ("Skolverket", "qa"),
            ("Tullverket", "started"),
        ]),
        others: entities(&[("Capio AB", "connected")]),
    }
}

pub fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 14).unwrap()
}
