use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use super::{MapData, MapEntry, MapOrganization};
use crate::domains::hubs_policy::Location;

/// Render the map data as the client's `mockData.ts` module.
///
/// One record per line. The status patcher relies on this layout: `name`
/// precedes `status` inside the same `{ ... }`, and the organizations list
/// is the last one closed by a line starting with `  ]`.
pub fn render_module(map: &MapData, generated_on: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str("import { MapData } from \"@/types/data\";\n\n");
    let _ = writeln!(
        out,
        "// Uppdaterad data från DIGG ({})",
        generated_on.format("%Y-%m-%d")
    );
    out.push_str("export const mockData: MapData = {\n");

    out.push_str("  municipalities: [\n");
    for entry in &map.municipalities {
        out.push_str(&entry_line(entry));
    }
    out.push_str("  ],\n  regions: [\n");
    for entry in &map.regions {
        out.push_str(&entry_line(entry));
    }
    out.push_str("  ],\n  organizations: [\n");
    for org in &map.organizations {
        out.push_str(&organization_line(org));
    }
    out.push_str("  ]\n};\n");

    out
}

/// Overwrite `path` with the rendered module
pub fn write_module(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = text.len(), "Wrote map data module");
    Ok(())
}

fn entry_line(entry: &MapEntry) -> String {
    format!(
        "    {{ id: {}, name: {}, status: {} }},\n",
        ts_string(&entry.id),
        ts_string(&entry.name),
        ts_string(&entry.status)
    )
}

/// Single organization record line, shared with the status patcher's extra record
pub(crate) fn organization_record(
    id: &str,
    name: &str,
    organization_type: &str,
    status: &str,
    location: &Location,
) -> String {
    format!(
        "    {{ id: {}, name: {}, type: {}, status: {}, location: {{ lat: {}, lng: {}, city: {} }} }},\n",
        ts_string(id),
        ts_string(name),
        ts_string(organization_type),
        ts_string(status),
        ts_number(location.lat),
        ts_number(location.lng),
        ts_string(&location.city)
    )
}

fn organization_line(org: &MapOrganization) -> String {
    organization_record(
        &org.id,
        &org.name,
        org.organization_type.as_str(),
        &org.status,
        &org.location,
    )
}

/// Double-quoted string literal; JSON escaping is valid TypeScript
pub(crate) fn ts_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Shortest round-trip form, keeping one decimal on whole numbers (`18.0`)
fn ts_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
