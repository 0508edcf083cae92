//! Catalog source units: one provider and its item, in dependency order.

use std::path::Path;

use diesel::SqliteConnection;

use crate::ledger::LoadLedger;
use crate::load::{LoadOptions, UnitStats, apply_row};
use crate::models::{NewItem, NewProvider};
use crate::records::{self, RawCatalogRecord};
use crate::repo;

/// Load one catalog source unit.
///
/// The provider insert is attempted before the item insert so the item's
/// provider reference always lands on a persisted row. Either insert may be
/// rejected as a duplicate without affecting the other; re-running a unit
/// ledgers the duplicates and changes nothing.
pub fn load_catalog_unit(
    conn: &mut SqliteConnection,
    ledger: &mut LoadLedger,
    opts: &LoadOptions,
    path: &Path,
) -> anyhow::Result<UnitStats> {
    let recs: Vec<RawCatalogRecord> = records::read_units(path)?;
    let mut stats = UnitStats::default();

    // One provider+item pair per unit is a source-format contract; anything
    // beyond the first record is not read.
    let Some(rec) = recs.first() else {
        tracing::warn!(unit = %path.display(), "catalog unit holds no records, nothing inserted");
        return Ok(stats);
    };
    if recs.len() > 1 {
        tracing::debug!(
            unit = %path.display(),
            ignored = recs.len() - 1,
            "catalog unit holds more than one record, reading the first"
        );
    }

    match records::non_empty(&rec.id) {
        Some(id) => {
            let row = NewProvider {
                id,
                name: rec.name.as_deref(),
                location: rec.location.as_deref(),
                latitude: rec.latitude,
                longitude: rec.longitude,
            };
            let res = repo::insert_provider(conn, &row);
            stats.record(apply_row(res, &row, "provider", ledger, opts)?);
        }
        None => {
            tracing::warn!(unit = %path.display(), "catalog record missing its provider id, provider not inserted");
        }
    }

    let Some(raw) = rec.items.first() else {
        tracing::warn!(unit = %path.display(), "catalog record holds no item, item not inserted");
        return Ok(stats);
    };
    if rec.items.len() > 1 {
        tracing::debug!(
            unit = %path.display(),
            ignored = rec.items.len() - 1,
            "catalog record holds more than one item, reading the first"
        );
    }

    match records::non_empty(&raw.id) {
        Some(id) => {
            let row = NewItem {
                id,
                title: raw.title.as_deref(),
                provider_id: raw.provider_id.as_deref(),
                release_year: raw.release_year,
                duration_seconds: raw.duration,
            };
            let res = repo::insert_item(conn, &row);
            stats.record(apply_row(res, &row, "item", ledger, opts)?);
        }
        None => {
            tracing::warn!(unit = %path.display(), "catalog record missing its item id, item not inserted");
        }
    }

    Ok(stats)
}
