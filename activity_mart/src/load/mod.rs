//! Loaders and the per-row outcome machinery they share.
//!
//! Every insert attempt in either loader is driven to one of three terminal
//! row states through [`apply_row`]:
//! - `Inserted`: the store took the row.
//! - `Rejected`: uniqueness violation; narrated, appended to the ledger,
//!   and skipped. Re-running a batch lands here for every row that already
//!   made it in, which is what makes re-runs safe.
//! - `Skipped`: any other store failure under [`ErrorPolicy::SkipRow`];
//!   narrated with the offending row and skipped.
//!
//! Under [`ErrorPolicy::AbortUnit`] a non-uniqueness failure propagates
//! instead, aborting the unit and the run. The policy is uniform across
//! both loaders; one bad row never blocks the rest of a unit unless the
//! caller explicitly asked for that.

pub mod catalog;
pub mod events;

use diesel::QueryResult;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::ledger::{AuditFields, LoadLedger};

/// Why a row insert did not land.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// The row is already present by key.
    #[error("row already present by key")]
    Duplicate(#[source] DieselError),
    /// Any other store failure.
    #[error(transparent)]
    Store(DieselError),
}

/// Terminal state of one row within a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// The store took the row.
    Inserted,
    /// Uniqueness violation, appended to the ledger.
    Rejected,
    /// Non-uniqueness failure, narrated and dropped.
    Skipped,
}

/// What to do with a store failure that is not a uniqueness violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Narrate the failure and move on to the next row.
    #[default]
    SkipRow,
    /// Propagate the failure; the unit (and the run) aborts.
    AbortUnit,
}

/// Options applied to every loader invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Policy for non-uniqueness store failures.
    pub on_error: ErrorPolicy,
}

/// Row counters for one source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitStats {
    /// Rows the store took.
    pub inserted: usize,
    /// Rows rejected for uniqueness and ledgered.
    pub rejected: usize,
    /// Rows dropped on other failures.
    pub skipped: usize,
}

impl UnitStats {
    /// Count one terminal row state.
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::Rejected => self.rejected += 1,
            RowOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Fold another unit's counters into this one.
    pub fn absorb(&mut self, other: &UnitStats) {
        self.inserted += other.inserted;
        self.rejected += other.rejected;
        self.skipped += other.skipped;
    }
}

fn classify(err: DieselError) -> RowError {
    match err {
        e @ DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RowError::Duplicate(e)
        }
        e => RowError::Store(e),
    }
}

/// Drive one insert attempt to a terminal row state.
pub(crate) fn apply_row<R>(
    result: QueryResult<usize>,
    row: &R,
    what: &str,
    ledger: &mut LoadLedger,
    opts: &LoadOptions,
) -> anyhow::Result<RowOutcome>
where
    R: AuditFields + std::fmt::Debug,
{
    match result.map_err(classify) {
        Ok(_) => Ok(RowOutcome::Inserted),
        Err(RowError::Duplicate(err)) => {
            tracing::warn!(row = ?row, error = %err, "{what} already present, logged to ledger");
            ledger.append(row)?;
            Ok(RowOutcome::Rejected)
        }
        Err(RowError::Store(err)) => match opts.on_error {
            ErrorPolicy::SkipRow => {
                tracing::error!(row = ?row, error = %err, "{what} insert failed, row skipped");
                Ok(RowOutcome::Skipped)
            }
            ErrorPolicy::AbortUnit => {
                Err(anyhow::Error::new(err).context(format!("{what} insert failed")))
            }
        },
    }
}
