//! Unit-by-unit batch driving with progress narration.

use std::path::Path;

use diesel::SqliteConnection;

use crate::discover;
use crate::ledger::LoadLedger;
use crate::load::{LoadOptions, UnitStats};

/// A per-unit loader entry point.
pub type UnitLoader =
    fn(&mut SqliteConnection, &mut LoadLedger, &LoadOptions, &Path) -> anyhow::Result<UnitStats>;

/// Aggregate counters for one batch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Source units discovered under the root.
    pub discovered: usize,
    /// Source units driven to a terminal state.
    pub processed: usize,
    /// Row counters summed across units.
    pub rows: UnitStats,
}

/// Process every source unit under `root` with `loader`.
///
/// Units run in discovery order, one at a time. A unit that ledgered
/// rejections still counts as processed; rejection is a handled outcome.
/// The session runs in autocommit, so each successful row is already
/// durable when the unit completes and the per-unit boundary is a progress
/// marker, not a transaction.
pub fn process_root(
    conn: &mut SqliteConnection,
    ledger: &mut LoadLedger,
    opts: &LoadOptions,
    root: &Path,
    loader: UnitLoader,
) -> anyhow::Result<RunStats> {
    let units = discover::source_units(root)?;
    let mut stats = RunStats {
        discovered: units.len(),
        ..Default::default()
    };
    tracing::info!(root = %root.display(), total = units.len(), "source units discovered");

    for (i, unit) in units.iter().enumerate() {
        let unit_stats = loader(conn, ledger, opts, unit)?;
        stats.rows.absorb(&unit_stats);
        stats.processed += 1;
        tracing::info!(unit = %unit.display(), "{}/{} units processed", i + 1, units.len());
    }

    Ok(stats)
}
