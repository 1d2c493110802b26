//! Scrape the DIGG connection tables into `scraped_*.json`

use anyhow::{Context, Result};
use hubs_map_core::domains::digg::DiggScraper;
use hubs_map_core::{init_tracing, Config};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    let scraper = DiggScraper::new()?;
    let data = scraper.scrape_all().await?;

    data.write_dir(&config.scraped_data_dir)
        .context("Failed to write scraped data")?;

    println!(
        "✓ Scraped {} municipalities, {} regions, {} authorities, {} others",
        data.municipalities.len(),
        data.regions.len(),
        data.authorities.len(),
        data.others.len()
    );
    Ok(())
}
