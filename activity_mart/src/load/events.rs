//! Log-batch source units: time marks, actors, and activity facts.

use std::path::Path;

use diesel::{QueryResult, SqliteConnection};

use crate::ledger::LoadLedger;
use crate::load::{ErrorPolicy, LoadOptions, RowOutcome, UnitStats, apply_row};
use crate::models::{NewActivityFact, NewActor, NewTimeMark};
use crate::normalize::normalize;
use crate::records::{self, RawEventRecord};
use crate::repo;
use crate::timemark;

/// Action marker identifying a play event in the raw logs.
pub const TRACK_PLAYED: &str = "NextSong";

/// Load one log-batch source unit.
///
/// Only play events feed the mart. The time and actor dimensions are
/// deduplicated in-batch before loading; the fact rows are not, one row per
/// play event. Every insert goes through the shared per-row machinery, so a
/// bad row never takes the rest of the unit with it under the default
/// policy.
pub fn load_event_unit(
    conn: &mut SqliteConnection,
    ledger: &mut LoadLedger,
    opts: &LoadOptions,
    path: &Path,
) -> anyhow::Result<UnitStats> {
    let events: Vec<RawEventRecord> = records::read_units(path)?;
    let mut stats = UnitStats::default();

    let plays: Vec<RawEventRecord> = events
        .into_iter()
        .filter(|e| e.page.as_deref() == Some(TRACK_PLAYED))
        .collect();

    // Time dimension: one mark per distinct timestamp.
    let stamped = normalize(
        plays.iter().collect::<Vec<_>>(),
        |e| e.ts.is_some(),
        |e| e.ts,
    );
    for ev in stamped {
        let Some(parts) = ev.ts.and_then(timemark::derive) else {
            tracing::error!(row = ?ev, "timestamp out of range, time mark skipped");
            stats.record(RowOutcome::Skipped);
            continue;
        };
        let row = NewTimeMark {
            ts: &parts.ts,
            hour: parts.hour,
            day_of_month: parts.day_of_month,
            iso_week: parts.iso_week,
            month: parts.month,
            year: parts.year,
            weekday: parts.weekday,
        };
        let res = repo::insert_time_mark(conn, &row);
        stats.record(apply_row(res, &row, "time mark", ledger, opts)?);
    }

    // Actor dimension: first occurrence per actor id wins.
    let actors = normalize(
        plays.iter().collect::<Vec<_>>(),
        |e| records::has_value(&e.actor_id),
        |e| e.actor_id.clone(),
    );
    for ev in actors {
        let Some(id) = records::non_empty(&ev.actor_id) else {
            continue;
        };
        let row = NewActor {
            id,
            first_name: ev.first_name.as_deref(),
            last_name: ev.last_name.as_deref(),
            gender: ev.gender.as_deref(),
            tier: ev.tier.as_deref(),
        };
        let res = repo::insert_actor(conn, &row);
        stats.record(apply_row(res, &row, "actor", ledger, opts)?);
    }

    // Fact rows: no dedup, one row per play event. The timestamp is derived
    // again from the raw epoch; the fact needs it even when the time-mark
    // insert for the same instant was rejected.
    for ev in &plays {
        let Some(parts) = ev.ts.and_then(timemark::derive) else {
            tracing::error!(row = ?ev, "activity record has no usable timestamp, fact skipped");
            stats.record(RowOutcome::Skipped);
            continue;
        };

        let refs = match resolve_refs(conn, ev) {
            Ok(refs) => refs,
            Err(err) => match opts.on_error {
                ErrorPolicy::SkipRow => {
                    tracing::error!(row = ?ev, error = %err, "catalog lookup failed, fact skipped");
                    stats.record(RowOutcome::Skipped);
                    continue;
                }
                ErrorPolicy::AbortUnit => {
                    return Err(anyhow::Error::new(err).context("catalog lookup failed"));
                }
            },
        };
        let (item_id, provider_id) = refs.map_or((None, None), |(i, p)| (Some(i), Some(p)));

        let row = NewActivityFact {
            ts: &parts.ts,
            actor_id: ev.actor_id.as_deref(),
            tier: ev.tier.as_deref(),
            item_id: item_id.as_deref(),
            provider_id: provider_id.as_deref(),
            session_id: ev.session_id,
            location: ev.location.as_deref(),
            user_agent: ev.user_agent.as_deref(),
        };
        let res = repo::insert_activity_fact(conn, &row);
        stats.record(apply_row(res, &row, "activity fact", ledger, opts)?);
    }

    Ok(stats)
}

/// Match a play event against already-loaded catalog rows.
///
/// A miss (or a record without the three lookup fields) resolves to `None`;
/// only store failures are errors.
fn resolve_refs(
    conn: &mut SqliteConnection,
    ev: &RawEventRecord,
) -> QueryResult<Option<(String, String)>> {
    let (Some(title), Some(name), Some(duration)) =
        (ev.title.as_deref(), ev.provider.as_deref(), ev.duration)
    else {
        return Ok(None);
    };
    repo::find_item(conn, title, name, duration)
}
