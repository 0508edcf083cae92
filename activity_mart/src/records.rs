//! Typed wire records and JSON-lines readers for source units.
//!
//! Source units are JSON-lines files: one JSON object per line. Records are
//! deserialized into the structs below at the ingest boundary so every later
//! stage works with named, typed fields. All identifying fields are optional
//! on the wire; an empty or whitespace-only string counts as missing.
//! Unknown keys are ignored, since log records carry fields this pipeline
//! never reads.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// One catalog source record: a provider and its nested items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogRecord {
    /// Provider identifier.
    pub id: Option<String>,
    /// Provider name.
    pub name: Option<String>,
    /// Provider location text.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Items owned by this provider; a unit is expected to carry one.
    #[serde(default)]
    pub items: Vec<RawCatalogItem>,
}

/// One nested catalog item record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalogItem {
    /// Item identifier.
    pub id: Option<String>,
    /// Item title.
    pub title: Option<String>,
    /// Owning provider reference.
    pub provider_id: Option<String>,
    /// Release year.
    pub release_year: Option<i32>,
    /// Playback duration in seconds.
    pub duration: Option<f64>,
}

/// One raw activity record from a log batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    /// Action tag; only play events feed the mart.
    pub page: Option<String>,
    /// Event instant as a millisecond UTC epoch.
    pub ts: Option<i64>,
    /// Actor identifier.
    pub actor_id: Option<String>,
    /// Actor given name.
    pub first_name: Option<String>,
    /// Actor family name.
    pub last_name: Option<String>,
    /// Actor gender marker.
    pub gender: Option<String>,
    /// Actor subscription tier.
    pub tier: Option<String>,
    /// Title of the played item, as logged.
    pub title: Option<String>,
    /// Name of the item's provider, as logged.
    pub provider: Option<String>,
    /// Playback duration in seconds, as logged.
    pub duration: Option<f64>,
    /// Client session identifier.
    pub session_id: Option<i64>,
    /// Free-form location text.
    pub location: Option<String>,
    /// Client user agent string.
    pub user_agent: Option<String>,
}

/// Read every record of a JSON-lines source unit.
///
/// Blank lines are skipped; a malformed line fails the whole unit with the
/// offending line number in the error chain.
pub fn read_units<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("open source unit {}", path.display()))?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read source unit {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("parse {}:{}", path.display(), idx + 1))?;
        out.push(record);
    }
    Ok(out)
}

/// The field value with empty and whitespace-only strings treated as missing.
pub fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

/// Whether an optional string field carries a usable value.
pub fn has_value(v: &Option<String>) -> bool {
    non_empty(v).is_some()
}
