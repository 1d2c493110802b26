//! Generate the map client's data module from scraped DIGG data
//!
//! Reads the four `scraped_*.json` files from SCRAPED_DATA_DIR and overwrites
//! MAP_DATA_OUTPUT. Hubs overrides are applied only with
//! GENERATE_WITH_OVERRIDES=true.

use anyhow::{Context, Result};
use chrono::Local;
use hubs_map_core::common::ScrapedData;
use hubs_map_core::domains::hubs_policy::HubsPolicy;
use hubs_map_core::domains::map_data::{generate, render_module, write_module};
use hubs_map_core::{init_tracing, Config};

fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let policy = HubsPolicy::load(config.hubs_policy_path.as_deref())
        .context("Failed to load hubs policy")?;

    let data = ScrapedData::load_dir(&config.scraped_data_dir)
        .context("Failed to load scraped data")?;
    tracing::info!(entities = data.total(), "Loaded scraped data");

    let overrides = config.generate_with_overrides.then_some(&policy.overrides);
    let map = generate(&data, &policy.coordinates, overrides);
    let text = render_module(&map, Local::now().date_naive());

    write_module(&config.map_data_output, &text)?;

    tracing::info!(
        path = %config.map_data_output.display(),
        "Map data module updated"
    );
    Ok(())
}
