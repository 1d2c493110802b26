//! In-place status patch over a generated map data module
//!
//! Works on the module text only. A record is matched when its `name` equals
//! a search string exactly and a `status` follows before the record's closing
//! brace; only that status value is rewritten. Names without a match are
//! skipped silently.
//!
//! Regenerating with `GENERATE_WITH_OVERRIDES=true` applies the hubs lists at
//! generation time instead; this pass is for modules that are already written.

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

use crate::common::EntityStatus;
use crate::domains::hubs_policy::{ExtraRecord, PatchRules};
use crate::domains::map_data::render::{organization_record, ts_string};

/// Marker of the organizations list end: the last list closer in the module
const LIST_CLOSER: &str = "  ]";

/// Replacements made for one search string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub name: String,
    pub replacements: usize,
}

#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub text: String,
    pub matches: Vec<NameMatch>,
    /// Whether the extra record was inserted
    pub appended: bool,
}

impl PatchOutcome {
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.matches
            .iter()
            .filter(|m| m.replacements == 0)
            .map(|m| m.name.as_str())
    }
}

/// Rewrite the status of every record named in `rules` to "hubs", then
/// append the extra record if its name is absent from the text.
pub fn patch_status(text: &str, rules: &PatchRules) -> Result<PatchOutcome> {
    let hubs = EntityStatus::Hubs.as_str();
    let mut content = text.to_string();
    let mut matches = Vec::new();

    for name in rules.search_names() {
        let pattern = status_pattern(name)?;
        let replacements = pattern.find_iter(&content).count();

        if replacements == 0 {
            debug!(name = %name, "No record found, skipping");
        } else {
            content = pattern
                .replace_all(&content, format!("${{1}}\"{}\"", hubs).as_str())
                .into_owned();
            debug!(name = %name, replacements, "Updated status to hubs");
        }

        matches.push(NameMatch {
            name: name.to_string(),
            replacements,
        });
    }

    let appended = match &rules.extra_record {
        Some(record) => append_if_missing(&mut content, record),
        None => false,
    };

    Ok(PatchOutcome {
        text: content,
        matches,
        appended,
    })
}

/// Patch the module at `path` in place
pub fn update_file(path: &Path, rules: &PatchRules) -> Result<PatchOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let outcome = patch_status(&text, rules)?;

    std::fs::write(path, &outcome.text)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        searched = outcome.matches.len(),
        unmatched = outcome.unmatched().count(),
        appended = outcome.appended,
        "Patched hubs statuses"
    );

    Ok(outcome)
}

/// `name` as it appears between the quotes of a rendered string literal
fn rendered_name(name: &str) -> String {
    let quoted = ts_string(name);
    quoted[1..quoted.len() - 1].to_string()
}

fn status_pattern(name: &str) -> Result<Regex> {
    let pattern = format!(
        r#"(name:\s*"{}",[^}}]*status:\s*)"[^"]*""#,
        regex::escape(&rendered_name(name))
    );
    Regex::new(&pattern).with_context(|| format!("Invalid status pattern for '{}'", name))
}

fn append_if_missing(content: &mut String, record: &ExtraRecord) -> bool {
    if content.contains(&rendered_name(&record.name)) {
        return false;
    }

    let Some(pos) = content.rfind(LIST_CLOSER) else {
        debug!(name = %record.name, "No list closer found, not appending");
        return false;
    };

    let line = organization_record(
        &record.id,
        &record.name,
        record.organization_type.as_str(),
        &record.status,
        &record.location,
    );
    content.insert_str(pos, &line);

    info!(name = %record.name, id = %record.id, "Added extra record");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::OrganizationType;
    use crate::domains::hubs_policy::Location;

    fn rules(names: &[&str]) -> PatchRules {
        PatchRules {
            names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_only_named_record_status_changes() {
        let text = r#"    { id: "m0000", name: "Habo", status: "qa" },
    { id: "m0001", name: "Habo kommun", status: "qa" },
"#;

        let outcome = patch_status(text, &rules(&["Habo"])).unwrap();

        assert!(outcome.text.contains(r#"name: "Habo", status: "hubs""#));
        assert!(outcome.text.contains(r#"name: "Habo kommun", status: "qa""#));
        assert_eq!(outcome.matches[0].replacements, 1);
    }

    #[test]
    fn test_status_after_other_fields_in_record() {
        let text = r#"{ id: "auth03", name: "Socialstyrelsen", type: "authority", status: "connected", location: { lat: 59.335, lng: 18.02, city: "Stockholm" } },"#;

        let outcome = patch_status(text, &rules(&["Socialstyrelsen"])).unwrap();

        assert!(outcome.text.contains(r#"type: "authority", status: "hubs""#));
    }

    #[test]
    fn test_missing_name_is_silent() {
        let text = r#"{ id: "m0000", name: "Habo", status: "qa" },"#;

        let outcome = patch_status(text, &rules(&["Vännäs"])).unwrap();

        assert_eq!(outcome.text, text);
        assert_eq!(outcome.unmatched().collect::<Vec<_>>(), vec!["Vännäs"]);
    }

    #[test]
    fn test_regex_metacharacters_in_names_are_literal() {
        let text = r#"{ id: "other00", name: "A.B (AB)", status: "qa" },
{ id: "other01", name: "AxB (AB)", status: "qa" },"#;

        let outcome = patch_status(text, &rules(&["A.B (AB)"])).unwrap();

        assert!(outcome.text.contains(r#"name: "A.B (AB)", status: "hubs""#));
        assert!(outcome.text.contains(r#"name: "AxB (AB)", status: "qa""#));
    }

    #[test]
    fn test_names_with_quotes_and_backslashes_match_rendered_records() {
        let text = format!(
            "{}{}",
            organization_record("other00", r#"Kliniken "Hubs" AB"#, "other", "qa", &Location::fallback()),
            organization_record("other01", r"Vård\Omsorg", "other", "qa", &Location::fallback()),
        );

        let outcome =
            patch_status(&text, &rules(&[r#"Kliniken "Hubs" AB"#, r"Vård\Omsorg"])).unwrap();

        assert_eq!(outcome.unmatched().count(), 0);
        assert!(outcome
            .text
            .contains(r#"name: "Kliniken \"Hubs\" AB", type: "other", status: "hubs""#));
        assert!(outcome
            .text
            .contains(r#"name: "Vård\\Omsorg", type: "other", status: "hubs""#));
    }

    #[test]
    fn test_extra_record_with_quoted_name_is_not_appended_twice() {
        let record = ExtraRecord {
            id: "new_hubs_1".to_string(),
            name: r#"Kliniken "Hubs" AB"#.to_string(),
            organization_type: OrganizationType::Other,
            status: "hubs".to_string(),
            location: Location::fallback(),
        };
        let rules = PatchRules {
            extra_record: Some(record),
            ..Default::default()
        };
        let text = "  organizations: [\n  ]\n};\n";

        let first = patch_status(text, &rules).unwrap();
        let second = patch_status(&first.text, &rules).unwrap();

        assert!(first.appended);
        assert!(!second.appended);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_no_extra_record_configured() {
        let text = "  organizations: [\n  ]\n};\n";

        let outcome = patch_status(text, &rules(&[])).unwrap();

        assert!(!outcome.appended);
        assert_eq!(outcome.text, text);
    }
}
