//! Patch statuses to "hubs" in an already generated map data module

use anyhow::{Context, Result};
use hubs_map_core::domains::hubs_policy::HubsPolicy;
use hubs_map_core::domains::status_patch::update_file;
use hubs_map_core::{init_tracing, Config};

fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let policy = HubsPolicy::load(config.hubs_policy_path.as_deref())
        .context("Failed to load hubs policy")?;

    let outcome = update_file(&config.map_data_output, &policy.patch)?;

    for m in &outcome.matches {
        if m.replacements > 0 {
            tracing::info!(name = %m.name, replacements = m.replacements, "Updated status to hubs");
        } else {
            tracing::warn!(name = %m.name, "No matching record");
        }
    }
    if outcome.appended {
        tracing::info!("Appended extra record");
    }

    Ok(())
}
