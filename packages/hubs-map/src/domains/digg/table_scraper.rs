//! Scraper for the DIGG connection tables
//!
//! DIGG publishes one HTML page per entity kind, each with a table of
//! `name | status text` rows. The pages are static, so reqwest + scraper
//! is enough.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::common::{EntityStatus, ScrapedData, ScrapedEntity};

const BASE_URL: &str = "https://www.digg.se/saker-digital-kommunikation/vilka-ar-anslutna-till-sdk";

/// Page paths under [`BASE_URL`], one per collection
pub const MUNICIPALITIES_PAGE: &str = "anslutna-kommuner";
pub const REGIONS_PAGE: &str = "anslutna-regioner";
pub const AUTHORITIES_PAGE: &str = "anslutna-statliga-myndigheter";
pub const OTHERS_PAGE: &str = "anslutna-ovriga-organisationer";

/// Map DIGG's Swedish status text to a status value
pub fn map_digg_status(status_text: &str) -> EntityStatus {
    let lower = status_text.to_lowercase();
    if lower.contains("påbörjat") {
        EntityStatus::Started
    } else if lower.contains("qa") {
        EntityStatus::Qa
    } else if lower.contains("ansluten") {
        EntityStatus::Connected
    } else {
        EntityStatus::None
    }
}

/// Extract `{name, status}` rows from a DIGG connection table page.
///
/// Rows need at least two cells; rows with an empty name are skipped.
pub fn parse_connection_table(html: &str) -> Vec<ScrapedEntity> {
    let document = Html::parse_document(html);
    let (Ok(row_selector), Ok(cell_selector)) =
        (Selector::parse("table tbody tr"), Selector::parse("td"))
    else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .filter_map(|row| {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if cells.len() < 2 || cells[0].is_empty() {
                return None;
            }
            Some(ScrapedEntity::new(
                cells[0].clone(),
                map_digg_status(&cells[1]).as_str(),
            ))
        })
        .collect()
}

pub struct DiggScraper {
    client: reqwest::Client,
    base_url: String,
}

impl DiggScraper {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("hubs-map/0.1 (DIGG connection table import)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and parse all four tables concurrently; any failure aborts
    pub async fn scrape_all(&self) -> Result<ScrapedData> {
        info!("Starting DIGG scraping...");

        let (municipalities, regions, authorities, others) = tokio::try_join!(
            self.scrape_table(MUNICIPALITIES_PAGE),
            self.scrape_table(REGIONS_PAGE),
            self.scrape_table(AUTHORITIES_PAGE),
            self.scrape_table(OTHERS_PAGE),
        )?;

        let data = ScrapedData {
            municipalities,
            regions,
            authorities,
            others,
        };

        info!(
            municipalities = data.municipalities.len(),
            regions = data.regions.len(),
            authorities = data.authorities.len(),
            others = data.others.len(),
            "Scraped DIGG tables"
        );

        Ok(data)
    }

    async fn scrape_table(&self, page: &str) -> Result<Vec<ScrapedEntity>> {
        let url = format!("{}/{}", self.base_url, page);
        debug!(url = %url, "Fetching DIGG table");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("HTTP request failed for {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let html = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        let rows = parse_connection_table(&html);
        if rows.is_empty() {
            warn!(url = %url, "No table rows found on DIGG page");
        }
        Ok(rows)
    }
}
