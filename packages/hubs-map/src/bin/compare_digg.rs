//! Compare scraped DIGG data with the database and print the changes

use anyhow::{Context, Result};
use clap::Parser;
use hubs_map_core::common::ScrapedData;
use hubs_map_core::domains::digg::{compare, format_report, DiggScraper, ExistingEntities};
use hubs_map_core::{init_tracing, Config};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "compare_digg")]
#[command(about = "Compare DIGG connection tables with the database")]
struct Cli {
    /// Scrape DIGG live instead of reading scraped_*.json
    #[arg(long)]
    live: bool,

    /// Print the comparison as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let database = config.database()?;

    let scraped = if cli.live {
        DiggScraper::new()?.scrape_all().await?
    } else {
        ScrapedData::load_dir(&config.scraped_data_dir).context("Failed to load scraped data")?
    };

    let pool = PgPool::connect_with(database.connect_options())
        .await
        .context("Failed to connect to database")?;
    let existing = ExistingEntities::load(&pool).await?;

    let result = compare(&existing, &scraped);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_report(&result));
    }

    Ok(())
}
